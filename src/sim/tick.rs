//! Per-frame simulation step
//!
//! Runs swell sampling, rider physics, trick detection and score keeping in
//! that order, each stage reading the previous stage's output from the same
//! frame.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::autopilot::Autopilot;
use super::rider::{RiderController, Rotation};
use super::state::{GameEvent, GameState};
use super::trick::TrickEngine;
use super::wave::{HeightVertex, WaveField, WaveSnapshot, sanitize_intensity};
use crate::consts::*;
use crate::input::ControlFlags;
use crate::settings::{IntensityChangePolicy, Settings};

/// Externally owned parameters, read fresh every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Swell strength (0.0 - 1.0)
    pub wave_intensity: f32,
    pub paused: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            wave_intensity: 0.5,
            paused: false,
        }
    }
}

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub flags: ControlFlags,
    /// Idle/demo mode - the autopilot rides
    pub autopilot: bool,
}

impl From<ControlFlags> for TickInput {
    fn from(flags: ControlFlags) -> Self {
        Self {
            flags,
            autopilot: false,
        }
    }
}

/// Fixed-timestep accumulator for hosts with variable frame times
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add real elapsed time and return how many fixed frames to run
    pub fn advance(&mut self, real_dt: f32) -> u32 {
        let dt = if real_dt.is_finite() { real_dt.clamp(0.0, MAX_FRAME_DELTA) } else { 0.0 };
        self.accumulator += dt;

        let mut frames = 0;
        while self.accumulator >= FRAME_DT && frames < MAX_SUBSTEPS {
            self.accumulator -= FRAME_DT;
            frames += 1;
        }
        frames
    }
}

/// Read-only view for the rendering and UI layers
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub position: Vec3,
    pub rotation: Rotation,
    pub is_jumping: bool,
    pub active_trick: Option<&'a str>,
    pub heights: &'a [HeightVertex],
    pub snapshot: &'a WaveSnapshot,
    pub score: u64,
    pub trick_count: u32,
    pub game_over: bool,
}

/// One play session: everything here is dropped when the session ends
#[derive(Debug, Clone)]
pub struct Session {
    seed: u64,
    frame: u64,
    elapsed: f64,
    settings: Settings,
    wave: WaveField,
    snapshot: WaveSnapshot,
    rider: RiderController,
    tricks: TrickEngine,
    game: GameState,
    autopilot: Autopilot,
    last_intensity: Option<f32>,
}

impl Session {
    /// Create a session whose swell phase is derived from `seed`
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut settings = settings;
        settings.validate();

        let mut rng = Pcg32::seed_from_u64(seed);
        let time_offset = rng.random_range(0.0..MAX_TIME_OFFSET);
        log::info!("Session started (seed {}, swell offset {:.2}s)", seed, time_offset);

        Self {
            seed,
            frame: 0,
            elapsed: 0.0,
            wave: WaveField::new(time_offset),
            snapshot: WaveSnapshot::default(),
            rider: RiderController::new(settings.physics.clone()),
            tricks: TrickEngine::new(settings.tricks.clone()),
            game: GameState::new(),
            autopilot: Autopilot::new(),
            last_intensity: None,
            settings,
        }
    }

    /// Create a session with a fresh random seed
    pub fn new_random(settings: Settings) -> Self {
        let seed = rand::rng().random();
        Self::new(seed, settings)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Session time in seconds
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn wave(&self) -> &WaveField {
        &self.wave
    }

    /// Snapshot produced by the most recent frame
    pub fn snapshot(&self) -> &WaveSnapshot {
        &self.snapshot
    }

    pub fn rider(&self) -> &RiderController {
        &self.rider
    }

    pub fn tricks(&self) -> &TrickEngine {
        &self.tricks
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// End the run; the tick stops advancing until `reset`
    pub fn end_game(&mut self) {
        self.game.end_game();
        self.tricks.clear_display();
    }

    /// Start over with the same swell identity
    pub fn reset(&mut self) {
        self.rider.reset();
        self.tricks.reset();
        self.game.reset_game();
        self.autopilot = Autopilot::new();
        log::info!("Session reset (seed {})", self.seed);
    }

    pub fn view(&self) -> RenderView<'_> {
        let rider = self.rider.state();
        RenderView {
            position: rider.position,
            rotation: rider.rotation,
            is_jumping: rider.is_jumping,
            active_trick: self.tricks.session().active_trick_name(),
            heights: self.wave.heights(),
            snapshot: &self.snapshot,
            score: self.game.score(),
            trick_count: self.game.trick_count(),
            game_over: self.game.is_game_over(),
        }
    }

    /// Apply the intensity-change policy when the external intensity moved
    fn observe_intensity(&mut self, intensity: f32, events: &mut Vec<GameEvent>) {
        if let Some(previous) = self.last_intensity {
            if previous != intensity {
                log::info!("Wave intensity {:.2} -> {:.2}", previous, intensity);
                if self.settings.intensity_change == IntensityChangePolicy::ResetScore {
                    events.push(GameEvent::ScoreReset);
                }
            }
        }
        self.last_intensity = Some(intensity);
    }
}

/// Advance the session by one frame of `dt` seconds.
///
/// Physics rates are per frame; `dt` drives the session clock (swell time,
/// air time, trick cooldown and display expiry). Returns the frame's events.
pub fn tick(session: &mut Session, input: &TickInput, config: &SimConfig, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Paused or finished sessions do not advance
    if config.paused || session.game.is_game_over() {
        return events;
    }

    let intensity = sanitize_intensity(config.wave_intensity);
    session.observe_intensity(intensity, &mut events);

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    session.frame += 1;
    session.elapsed += dt as f64;
    let now = session.elapsed;

    let snapshot = session.wave.sample(now as f32, intensity);

    let flags = if input.autopilot {
        session.autopilot.flags(session.rider.state(), &snapshot, now)
    } else {
        input.flags
    };

    let rider_events = session.rider.update(&flags, &snapshot, now);
    if rider_events.became_airborne {
        events.push(GameEvent::Airborne);
    }
    if rider_events.landed {
        events.push(GameEvent::Landed {
            air_time: rider_events.air_time,
            max_height: rider_events.max_height,
            clean: rider_events.clean_landing(),
        });
    }

    let outcome = session
        .tricks
        .evaluate(&flags, session.rider.state(), &rider_events, now);
    if outcome.display_expired {
        events.push(GameEvent::TrickExpired);
    }
    if let Some(trick) = outcome.scored {
        events.push(GameEvent::TrickRegistered {
            name: trick.name.to_string(),
            score: trick.score,
            multiplier: trick.multiplier,
        });
    }

    for event in &events {
        session.game.apply(event);
    }
    session.snapshot = snapshot;

    events
}
