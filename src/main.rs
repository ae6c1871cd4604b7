//! Groovy Surf headless runner
//!
//! Paces the simulation core through a fixed-timestep clock at a simulated
//! host frame rate, without rendering, and reports what happened on the water.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;

use groovy_surf::cli::Args;
use groovy_surf::consts::FRAME_DT;
use groovy_surf::sim::{FrameClock, GameEvent, Session, SimConfig, TickInput, tick};

/// What a headless run produced
#[derive(Debug, Default, Serialize)]
struct RunSummary {
    seed: u64,
    frames: u64,
    seconds: f64,
    wave_intensity: f32,
    score: u64,
    trick_count: u32,
    multiplier: f32,
    distinct_tricks: Vec<String>,
    jumps: u32,
    clean_landings: u32,
    best_air_time: f64,
    best_height: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.frames == 0 {
        return Err(anyhow!("--frames must be > 0"));
    }
    if !(args.fps.is_finite() && args.fps >= 1.0) {
        return Err(anyhow!("--fps must be >= 1, got {}", args.fps));
    }

    let settings = args.resolve_settings();
    let config = SimConfig {
        wave_intensity: settings.wave_intensity,
        paused: false,
    };
    let mut session = match args.seed {
        Some(seed) => Session::new(seed, settings),
        None => Session::new_random(settings),
    };
    log::info!(
        "Groovy Surf (headless) riding {} frames at intensity {:.2}, host at {} fps{}",
        args.frames,
        config.wave_intensity,
        args.fps,
        if args.autopilot { " on autopilot" } else { "" }
    );

    let input = TickInput {
        autopilot: args.autopilot,
        ..Default::default()
    };
    let mut summary = RunSummary {
        seed: session.seed(),
        wave_intensity: config.wave_intensity,
        ..Default::default()
    };

    let mut clock = FrameClock::new();
    let host_dt = 1.0 / args.fps;
    while session.frame() < args.frames {
        for _ in 0..clock.advance(host_dt) {
            if session.frame() >= args.frames {
                break;
            }
            for event in tick(&mut session, &input, &config, FRAME_DT) {
                match event {
                    GameEvent::Airborne => summary.jumps += 1,
                    GameEvent::Landed {
                        air_time,
                        max_height,
                        clean,
                    } => {
                        if clean {
                            summary.clean_landings += 1;
                        }
                        summary.best_air_time = summary.best_air_time.max(air_time);
                        summary.best_height = summary.best_height.max(max_height);
                    }
                    GameEvent::TrickRegistered { name, score, multiplier } => {
                        log::info!("{} +{} (x{}) at {:.2}s", name, score, multiplier, session.elapsed());
                    }
                    GameEvent::TrickExpired | GameEvent::ScoreReset => {}
                }
            }
        }
    }

    summary.frames = session.frame();
    summary.seconds = session.elapsed();
    summary.score = session.game().score();
    summary.trick_count = session.game().trick_count();
    summary.multiplier = session.tricks().session().multiplier();
    summary.distinct_tricks = session.tricks().session().distinct_tricks.iter().cloned().collect();

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("serializing run summary")?;
        println!("{json}");
    } else {
        println!("Seed:           {}", summary.seed);
        println!("Simulated:      {:.1}s ({} frames)", summary.seconds, summary.frames);
        println!("Score:          {}", summary.score);
        println!(
            "Tricks:         {} ({} distinct, x{} combo)",
            summary.trick_count,
            summary.distinct_tricks.len(),
            summary.multiplier
        );
        println!("Jumps:          {} ({} clean landings)", summary.jumps, summary.clean_landings);
        println!("Best air:       {:.2}s, {:.2} high", summary.best_air_time, summary.best_height);
    }

    Ok(())
}
