//! Groovy Surf - real-time surfing simulation core
//!
//! Core modules:
//! - `sim`: Deterministic per-frame simulation (swell, rider physics, tricks, score)
//! - `input`: Device key state to control flags
//! - `settings`: Data-driven tuning and session configuration
//! - `cli`: Arguments for the headless runner

pub mod cli;
pub mod input;
pub mod settings;
pub mod sim;

pub use input::{ControlFlags, InputMapper};
pub use settings::{IntensityChangePolicy, PhysicsTuning, Settings, TrickTuning};

use glam::Vec3;

/// Simulation configuration constants
pub mod consts {
    /// Nominal frame interval the per-frame physics rates are tuned for (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum fixed frames per host callback to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest real delta the frame clock will accumulate in one call
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Wave grid: square extent in field units, samples per side
    pub const WAVE_GRID_EXTENT: f32 = 100.0;
    pub const WAVE_GRID_RESOLUTION: usize = 128;
    /// Half-size of the region where samples are classified as peaks/troughs
    pub const GAMEPLAY_REGION_HALF: f32 = 15.0;
    /// Peak/trough threshold as a fraction of wave intensity
    pub const CLASSIFY_THRESHOLD: f32 = 0.75;
    /// Upper bound of the per-session random phase offset (seconds)
    pub const MAX_TIME_OFFSET: f32 = 1000.0;

    /// Rider arena half-extent on x and z
    pub const ARENA_HALF_EXTENT: f32 = 45.0;
    /// Ocean mesh sits this far below the origin; also the flat-water rest height
    pub const BASE_OCEAN_OFFSET: f32 = 2.0;
    /// Radius in which classified samples can support the rider
    pub const CONTACT_RADIUS: f32 = 5.0;
    /// Jumps shorter than this touch down without a landing event
    pub const MIN_LANDING_AIR_TIME: f64 = 0.3;

    /// Flat bonus added by `GameState::add_trick`
    pub const TRICK_BONUS: u64 = 100;
    /// Multiplier step per additional distinct trick
    pub const COMBO_STEP: f32 = 0.25;
}

/// Length of the horizontal (x/z) component of a velocity
#[inline]
pub fn horizontal_speed(vel: Vec3) -> f32 {
    (vel.x * vel.x + vel.z * vel.z).sqrt()
}

/// Clamp a value into `[-half, half]`
#[inline]
pub fn clamp_symmetric(value: f32, half: f32) -> f32 {
    value.clamp(-half, half)
}
