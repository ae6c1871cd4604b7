//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed per-frame physics rates
//! - Seeded RNG only (the per-session swell phase)
//! - Strict stage order within a frame: wave, rider, tricks, score
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod rider;
pub mod state;
pub mod tick;
pub mod trick;
pub mod wave;

pub use autopilot::Autopilot;
pub use rider::{Contact, RiderController, RiderEvents, RiderState, Rotation, resolve_contact};
pub use state::{GameEvent, GameState};
pub use tick::{FrameClock, RenderView, Session, SimConfig, TickInput, tick};
pub use trick::{
    ScoredTrick, TRICKS, TrickDef, TrickDisplay, TrickEngine, TrickOutcome, TrickPhase,
    TrickSession, base_score, combo_multiplier, match_trick,
};
pub use wave::{HeightVertex, WaveField, WaveSample, WaveSnapshot, swell_height};
