//! Simulation settings and tuning
//!
//! Persisted as JSON next to the runner; everything here is read once per
//! session, while `SimConfig` carries the values that may change per frame.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// What happens to the score when wave intensity changes mid-session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IntensityChangePolicy {
    /// Keep playing; the new intensity applies from the next frame
    #[default]
    KeepScore,
    /// Reset score and trick count whenever intensity changes
    ResetScore,
}

impl IntensityChangePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityChangePolicy::KeepScore => "keep",
            IntensityChangePolicy::ResetScore => "reset",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "keep" | "keep-score" => Some(IntensityChangePolicy::KeepScore),
            "reset" | "reset-score" => Some(IntensityChangePolicy::ResetScore),
            _ => None,
        }
    }
}

/// Per-frame rider physics rates (tuned for 60 Hz)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Horizontal acceleration per frame while a direction is held
    pub acceleration: f32,
    /// Acceleration multiplier while on the water
    pub surface_bonus: f32,
    /// Acceleration multiplier while airborne
    pub air_control: f32,
    /// Base vertical take-off velocity
    pub jump_force: f32,
    /// Extra jump height per unit of lateral speed
    pub jump_speed_bonus: f32,
    /// Vertical velocity lost per airborne frame
    pub gravity: f32,
    /// Horizontal velocity retained per frame
    pub drag: f32,
    /// Horizontal speed cap
    pub max_speed: f32,
    /// Longitudinal push per frame while riding a peak
    pub wave_boost: f32,
    /// Target rotation change per frame while steering
    pub rotation_rate: f32,
    /// Largest target rotation (radians)
    pub max_rotation: f32,
    /// Geometric decay of target rotation with no input on that axis
    pub rotation_decay: f32,
    /// Blend of displayed rotation toward its target per frame
    pub rotation_smoothing: f32,
    /// Velocity-driven wobble while airborne
    pub air_wobble: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            acceleration: 0.01,
            surface_bonus: 1.2,
            air_control: 0.8,
            jump_force: 0.25,
            jump_speed_bonus: 0.2,
            gravity: 0.006,
            drag: 0.98,
            max_speed: 0.5,
            wave_boost: 0.004,
            rotation_rate: 0.03,
            max_rotation: 0.4,
            rotation_decay: 0.92,
            rotation_smoothing: 0.2,
            air_wobble: 0.3,
        }
    }
}

/// Trick timing and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrickTuning {
    /// Minimum time between two scored tricks (seconds)
    pub cooldown: f64,
    /// How long a trick name stays on screen (seconds)
    pub display_duration: f64,
    /// Height above the local surface required for any trick
    pub min_height: f32,
    /// Air time required for long-air tricks (seconds)
    pub long_air_time: f64,
    /// Height required for long-air tricks
    pub long_air_height: f32,
}

impl Default for TrickTuning {
    fn default() -> Self {
        Self {
            cooldown: 1.0,
            display_duration: 1.0,
            min_height: 0.5,
            long_air_time: 1.2,
            long_air_height: 1.5,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Wave intensity at session start (0.0 - 1.0)
    pub wave_intensity: f32,
    /// Score handling when intensity changes
    pub intensity_change: IntensityChangePolicy,
    pub physics: PhysicsTuning,
    pub tricks: TrickTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wave_intensity: 0.5,
            intensity_change: IntensityChangePolicy::KeepScore,
            physics: PhysicsTuning::default(),
            tricks: TrickTuning::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.validate();
        Ok(settings)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("No settings at {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Clamp tuning into ranges the simulation stays stable in
    pub fn validate(&mut self) {
        self.wave_intensity = crate::sim::wave::sanitize_intensity(self.wave_intensity);

        let p = &mut self.physics;
        if !(p.drag > 0.0 && p.drag <= 1.0) {
            p.drag = PhysicsTuning::default().drag;
        }
        if !(p.max_speed > 0.0 && p.max_speed.is_finite()) {
            p.max_speed = PhysicsTuning::default().max_speed;
        }
        p.gravity = finite_or(p.gravity, 0.0).max(0.0);
        p.acceleration = finite_or(p.acceleration, 0.0).max(0.0);
        p.jump_force = finite_or(p.jump_force, 0.0).max(0.0);
        p.wave_boost = finite_or(p.wave_boost, 0.0).max(0.0);
        p.rotation_decay = finite_or(p.rotation_decay, 0.0).clamp(0.0, 1.0);
        p.rotation_smoothing = finite_or(p.rotation_smoothing, 1.0).clamp(0.0, 1.0);

        let t = &mut self.tricks;
        t.cooldown = finite_or64(t.cooldown, 0.0).max(0.0);
        t.display_duration = finite_or64(t.display_duration, 0.0).max(0.0);
    }
}

fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}

fn finite_or64(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}
