//! Scenario Tests
//!
//! End-to-end checks of trick scoring and full sessions through the public API.
//!
//! # Running tests
//! ```bash
//! cargo test --test scenarios
//! ```

use groovy_surf::consts::{BASE_OCEAN_OFFSET, FRAME_DT, TRICK_BONUS};
use groovy_surf::sim::{
    GameEvent, GameState, RiderEvents, RiderState, Session, SimConfig, TickInput, TrickEngine,
    WaveField, base_score, tick,
};
use groovy_surf::{ControlFlags, Settings, TrickTuning};

// ==================== HELPER FUNCTIONS ====================

/// Rider in the air at `height` above its surface after `air_time` seconds
fn airborne(height: f32, air_time: f64) -> RiderState {
    let mut rider = RiderState::default();
    rider.is_jumping = true;
    rider.is_on_surface = false;
    rider.position.y = rider.surface_height + height;
    rider.air_time = air_time;
    rider
}

fn take_off() -> RiderEvents {
    RiderEvents {
        became_airborne: true,
        ..Default::default()
    }
}

fn landing() -> RiderEvents {
    RiderEvents {
        landed: true,
        air_time: 1.0,
        ..Default::default()
    }
}

/// Run one trick-engine frame and fold its result into the score
fn trick_frame(
    engine: &mut TrickEngine,
    game: &mut GameState,
    flags: ControlFlags,
    rider: &RiderState,
    events: RiderEvents,
    now: f64,
) -> Option<(String, u64, f32)> {
    let outcome = engine.evaluate(&flags, rider, &events, now);
    let scored = outcome.scored?;
    game.apply(&GameEvent::TrickRegistered {
        name: scored.name.to_string(),
        score: scored.score,
        multiplier: scored.multiplier,
    });
    Some((scored.name.to_string(), scored.score, scored.multiplier))
}

// ==================== TRICK SCENARIOS ====================

#[test]
fn test_ollie_at_moderate_swell() {
    // Intensity only shapes the surface; the rider is already 0.8 above it
    let mut field = WaveField::new(0.0);
    let snapshot = field.sample(1.0, 0.5);
    assert!(!snapshot.is_empty());

    let mut engine = TrickEngine::new(TrickTuning::default());
    let mut game = GameState::new();
    let jump = ControlFlags {
        jump: true,
        ..Default::default()
    };

    let scored = trick_frame(&mut engine, &mut game, jump, &airborne(0.8, 0.2), take_off(), 3.0);
    assert_eq!(scored, Some(("Ollie".to_string(), 50, 1.0)));
    assert_eq!(game.trick_count(), 1);
    assert_eq!(game.score(), 50 + TRICK_BONUS);
}

#[test]
fn test_backflip_takes_precedence_over_long_air_tricks() {
    let mut engine = TrickEngine::new(TrickTuning::default());
    let mut game = GameState::new();
    let flags = ControlFlags {
        left: true,
        up: true,
        ..Default::default()
    };

    let rider = airborne(1.6, 1.3);
    let scored = trick_frame(&mut engine, &mut game, flags, &rider, take_off(), 3.0);
    assert_eq!(scored, Some(("Backflip".to_string(), 200, 1.0)));

    // Same pass, same flags: nothing more
    let again = trick_frame(&mut engine, &mut game, flags, &rider, RiderEvents::default(), 3.0);
    assert!(again.is_none());
    assert_eq!(game.trick_count(), 1);
    assert_eq!(game.score(), 200 + TRICK_BONUS);
}

#[test]
fn test_second_match_inside_cooldown_is_ignored() {
    let mut engine = TrickEngine::new(TrickTuning::default());
    let mut game = GameState::new();
    let rider = airborne(2.0, 0.6);
    let kick = ControlFlags {
        left: true,
        right: true,
        ..Default::default()
    };
    let heel = ControlFlags {
        up: true,
        down: true,
        ..Default::default()
    };

    trick_frame(&mut engine, &mut game, kick, &rider, take_off(), 10.0);
    let blocked = trick_frame(&mut engine, &mut game, heel, &rider, RiderEvents::default(), 10.999);
    assert!(blocked.is_none());
    assert_eq!(game.trick_count(), 1);
    assert_eq!(game.score(), base_score("Kickflip").unwrap() as u64 + TRICK_BONUS);
}

#[test]
fn test_combo_multiplier_a_b_a() {
    let mut engine = TrickEngine::new(TrickTuning::default());
    let mut game = GameState::new();
    let rider = airborne(2.0, 0.6);
    let spin = ControlFlags {
        left: true,
        down: true,
        ..Default::default()
    };
    let roll = ControlFlags {
        right: true,
        down: true,
        ..Default::default()
    };

    trick_frame(&mut engine, &mut game, spin, &rider, take_off(), 1.0);
    trick_frame(&mut engine, &mut game, ControlFlags::NONE, &rider, landing(), 1.5);
    trick_frame(&mut engine, &mut game, roll, &rider, take_off(), 2.5);
    trick_frame(&mut engine, &mut game, ControlFlags::NONE, &rider, landing(), 3.0);
    let (name, score, multiplier) =
        trick_frame(&mut engine, &mut game, spin, &rider, take_off(), 4.0).unwrap();

    let distinct: Vec<_> = engine.session().distinct_tricks.iter().cloned().collect();
    assert_eq!(distinct, vec!["360 Spin".to_string(), "Barrel Roll".to_string()]);
    assert_eq!(name, "360 Spin");
    assert_eq!(multiplier, 1.25);
    assert_eq!(score, (150.0f32 * 1.25).round() as u64);
    assert_eq!(game.trick_count(), 3);
}

// ==================== SESSION SCENARIOS ====================

#[test]
fn test_calm_session_jump_scores_one_ollie() {
    let mut session = Session::new(42, Settings::default());
    let calm = SimConfig {
        wave_intensity: 0.0,
        paused: false,
    };
    let jump: TickInput = ControlFlags {
        jump: true,
        ..Default::default()
    }
    .into();

    let mut events = Vec::new();
    for frame in 0..200 {
        let input = if frame < 20 { jump } else { TickInput::default() };
        events.extend(tick(&mut session, &input, &calm, FRAME_DT));
    }

    let tricks: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::TrickRegistered { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    let landings = events
        .iter()
        .filter(|e| matches!(e, GameEvent::Landed { clean: true, .. }))
        .count();

    assert_eq!(tricks, vec!["Ollie"]);
    assert_eq!(landings, 1);
    assert_eq!(session.game().score(), 50 + TRICK_BONUS);
    assert!(events.contains(&GameEvent::TrickExpired));

    let view = session.view();
    assert!(!view.is_jumping);
    assert!((view.position.y + BASE_OCEAN_OFFSET).abs() < 1e-5);
}

#[test]
fn test_autopilot_session_scores_and_keeps_invariants() {
    let mut session = Session::new(2024, Settings::default());
    let config = SimConfig {
        wave_intensity: 0.8,
        paused: false,
    };
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let max_speed = session.settings().physics.max_speed;

    let mut take_offs = 0;
    let mut touchdowns = 0;
    for _ in 0..1200 {
        for event in tick(&mut session, &input, &config, FRAME_DT) {
            match event {
                GameEvent::Airborne => take_offs += 1,
                GameEvent::Landed { .. } => touchdowns += 1,
                _ => {}
            }
        }
        let rider = session.rider().state();
        assert!(rider.position.x.abs() <= 45.0 && rider.position.z.abs() <= 45.0);
        assert!(rider.horizontal_speed() <= max_speed + 1e-4);
        assert_eq!(rider.is_jumping, !rider.is_on_surface);
    }

    assert!(take_offs > 0);
    assert!(touchdowns == take_offs || touchdowns + 1 == take_offs);
    assert!(session.game().trick_count() > 0);
    assert!(session.game().score() > 0);
}
