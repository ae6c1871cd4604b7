//! Rider physics
//!
//! The rider is integrated with fixed per-frame rates: steering acceleration,
//! jump impulse, gravity, contact with the classified swell samples, peak
//! boost, drag with a hard speed cap, then position integration inside the
//! arena.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::wave::{WaveSample, WaveSnapshot};
use crate::consts::*;
use crate::input::ControlFlags;
use crate::settings::PhysicsTuning;
use crate::{clamp_symmetric, horizontal_speed};

/// Board orientation: `x` pitches about the X axis, `z` rolls about the Z axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f32,
    pub z: f32,
}

/// Everything the simulation knows about the rider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Displayed rotation (smoothed)
    pub rotation: Rotation,
    pub is_jumping: bool,
    pub is_on_surface: bool,
    /// Session time (seconds) of the last take-off
    pub airborne_start_time: f64,
    /// Highest point above the local surface during the current/last jump
    pub max_airborne_height: f32,
    pub last_jump_time: f64,
    /// Air time of the current jump, or of the last one once landed
    pub air_time: f64,
    /// Contact height resolved this frame
    pub surface_height: f32,
    /// Whether the contact sample this frame was a peak
    pub on_wave_peak: bool,
    /// Steering target the displayed rotation eases toward
    target_rotation: Rotation,
}

impl Default for RiderState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -BASE_OCEAN_OFFSET, 0.0),
            velocity: Vec3::ZERO,
            rotation: Rotation::default(),
            is_jumping: false,
            is_on_surface: true,
            airborne_start_time: 0.0,
            max_airborne_height: 0.0,
            last_jump_time: f64::NEG_INFINITY,
            air_time: 0.0,
            surface_height: -BASE_OCEAN_OFFSET,
            on_wave_peak: false,
            target_rotation: Rotation::default(),
        }
    }
}

impl RiderState {
    /// Height of the rider above the surface it last resolved against
    pub fn height_above_surface(&self) -> f32 {
        self.position.y - self.surface_height
    }

    pub fn horizontal_speed(&self) -> f32 {
        horizontal_speed(self.velocity)
    }

    pub fn target_rotation(&self) -> Rotation {
        self.target_rotation
    }
}

/// Airborne transitions produced by one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiderEvents {
    pub became_airborne: bool,
    /// Touched down this frame (every jump ends with exactly one)
    pub landed: bool,
    /// Air time of the jump that just ended
    pub air_time: f64,
    /// Peak height above the surface of the jump that just ended
    pub max_height: f32,
}

impl RiderEvents {
    /// A touchdown that ended a jump long enough to count as a landing
    pub fn clean_landing(&self) -> bool {
        self.landed && self.air_time > MIN_LANDING_AIR_TIME
    }
}

/// Surface support under the rider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// World height of the surface (ocean offset applied)
    pub height: f32,
    pub on_peak: bool,
    pub sample: Option<WaveSample>,
}

/// Find the surface under (x, z): nearest peak within the contact radius,
/// else nearest trough, else flat water at the base ocean level.
pub fn resolve_contact(snapshot: &WaveSnapshot, x: f32, z: f32) -> Contact {
    if let Some(peak) = snapshot.nearest_peak(x, z, CONTACT_RADIUS) {
        return Contact {
            height: peak.height - BASE_OCEAN_OFFSET,
            on_peak: true,
            sample: Some(*peak),
        };
    }
    if let Some(trough) = snapshot.nearest_trough(x, z, CONTACT_RADIUS) {
        return Contact {
            height: trough.height - BASE_OCEAN_OFFSET,
            on_peak: false,
            sample: Some(*trough),
        };
    }
    Contact {
        height: -BASE_OCEAN_OFFSET,
        on_peak: false,
        sample: None,
    }
}

/// Owns and integrates the rider state
#[derive(Debug, Clone)]
pub struct RiderController {
    state: RiderState,
    tuning: PhysicsTuning,
}

impl RiderController {
    pub fn new(tuning: PhysicsTuning) -> Self {
        Self {
            state: RiderState::default(),
            tuning,
        }
    }

    pub fn state(&self) -> &RiderState {
        &self.state
    }

    pub fn tuning(&self) -> &PhysicsTuning {
        &self.tuning
    }

    /// Put the rider back at the start, resting on flat water
    pub fn reset(&mut self) {
        self.state = RiderState::default();
    }

    /// Advance the rider by one frame.
    ///
    /// `now` is session time in seconds; it only stamps jump timing, the
    /// physics rates themselves are per frame.
    pub fn update(&mut self, flags: &ControlFlags, snapshot: &WaveSnapshot, now: f64) -> RiderEvents {
        let p = &self.tuning;
        let s = &mut self.state;
        let mut events = RiderEvents::default();

        // Steering
        let control = if s.is_on_surface {
            p.acceleration * p.surface_bonus
        } else {
            p.acceleration * p.air_control
        };
        let target = &mut s.target_rotation;
        if flags.left {
            s.velocity.x -= control;
            target.z = (target.z + p.rotation_rate).min(p.max_rotation);
        }
        if flags.right {
            s.velocity.x += control;
            target.z = (target.z - p.rotation_rate).max(-p.max_rotation);
        }
        if flags.up {
            s.velocity.z -= control;
            target.x = (target.x - p.rotation_rate).max(-p.max_rotation);
        }
        if flags.down {
            s.velocity.z += control;
            target.x = (target.x + p.rotation_rate).min(p.max_rotation);
        }
        if !flags.left && !flags.right {
            target.z *= p.rotation_decay;
        }
        if !flags.up && !flags.down {
            target.x *= p.rotation_decay;
        }

        // Jump: faster lateral motion launches higher
        if flags.jump && !s.is_jumping && s.is_on_surface {
            s.velocity.y = p.jump_force * (1.0 + p.jump_speed_bonus * s.velocity.x.abs());
            s.is_on_surface = false;
            s.is_jumping = true;
            s.airborne_start_time = now;
            s.last_jump_time = now;
            s.max_airborne_height = 0.0;
            s.air_time = 0.0;
            events.became_airborne = true;
            log::debug!("Take-off at t={:.2}s, vy={:.3}", now, s.velocity.y);
        }

        if !s.is_on_surface {
            s.velocity.y -= p.gravity;
        }

        // Surface contact
        let contact = resolve_contact(snapshot, s.position.x, s.position.z);
        s.surface_height = contact.height;
        s.on_wave_peak = contact.on_peak;

        if s.is_on_surface {
            s.position.y = contact.height;
            s.velocity.y = 0.0;
        } else if s.position.y <= contact.height && s.velocity.y <= 0.0 {
            let air_time = (now - s.airborne_start_time).max(0.0);
            s.position.y = contact.height;
            s.velocity.y = 0.0;
            s.is_on_surface = true;
            s.is_jumping = false;
            s.air_time = air_time;

            events.landed = true;
            events.air_time = air_time;
            events.max_height = s.max_airborne_height;
            if events.clean_landing() {
                log::debug!(
                    "Landed after {:.2}s, peak height {:.2}",
                    air_time,
                    s.max_airborne_height
                );
            }
        } else {
            s.max_airborne_height = s.max_airborne_height.max(s.position.y - contact.height);
            s.air_time = (now - s.airborne_start_time).max(0.0);
        }

        // Riding a peak pushes the rider along its direction of travel
        if s.on_wave_peak && s.is_on_surface {
            let direction = if s.velocity.z.abs() > f32::EPSILON {
                s.velocity.z.signum()
            } else {
                -1.0
            };
            s.velocity.z += p.wave_boost * direction;
        }

        // Drag and speed cap
        s.velocity.x *= p.drag;
        s.velocity.z *= p.drag;
        let speed = horizontal_speed(s.velocity);
        if speed > p.max_speed && speed > 0.0 {
            let scale = p.max_speed / speed;
            s.velocity.x *= scale;
            s.velocity.z *= scale;
        }

        // Integrate
        s.position += s.velocity;
        s.position.x = clamp_symmetric(s.position.x, ARENA_HALF_EXTENT);
        s.position.z = clamp_symmetric(s.position.z, ARENA_HALF_EXTENT);

        let mut desired = s.target_rotation;
        if s.is_jumping {
            desired.x += s.velocity.z * p.air_wobble;
            desired.z -= s.velocity.x * p.air_wobble;
        }
        s.rotation.x += (desired.x - s.rotation.x) * p.rotation_smoothing;
        s.rotation.z += (desired.z - s.rotation.z) * p.rotation_smoothing;

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = FRAME_DT as f64;

    fn controller() -> RiderController {
        RiderController::new(PhysicsTuning::default())
    }

    fn jump() -> ControlFlags {
        ControlFlags {
            jump: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_rests_on_flat_water() {
        let mut rider = controller();
        let calm = WaveSnapshot::default();
        for frame in 0..120 {
            rider.update(&ControlFlags::NONE, &calm, frame as f64 * DT);
        }
        let s = rider.state();
        assert!(s.is_on_surface && !s.is_jumping);
        assert!((s.position.y + BASE_OCEAN_OFFSET).abs() < 1e-6);
        assert_eq!(s.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_jump_arc_takes_off_and_lands_once() {
        let mut rider = controller();
        let calm = WaveSnapshot::default();

        let mut take_offs = 0;
        let mut landings = Vec::new();
        for frame in 0..300 {
            let flags = if frame == 0 { jump() } else { ControlFlags::NONE };
            let events = rider.update(&flags, &calm, frame as f64 * DT);
            if events.became_airborne {
                take_offs += 1;
            }
            if events.landed {
                landings.push(events);
            }
            let s = rider.state();
            assert_eq!(s.is_jumping, !s.is_on_surface);
        }

        assert_eq!(take_offs, 1);
        assert_eq!(landings.len(), 1);
        let landing = landings[0];
        assert!(landing.clean_landing());
        assert!(landing.air_time > 1.2, "air time {}", landing.air_time);
        assert!(landing.max_height > 4.0, "height {}", landing.max_height);
        assert!((rider.state().position.y + BASE_OCEAN_OFFSET).abs() < 1e-6);
    }

    #[test]
    fn test_cannot_double_jump() {
        let mut rider = controller();
        let calm = WaveSnapshot::default();
        let first = rider.update(&jump(), &calm, 0.0);
        assert!(first.became_airborne);
        let vy = rider.state().velocity.y;
        let second = rider.update(&jump(), &calm, DT);
        assert!(!second.became_airborne);
        assert!(rider.state().velocity.y < vy);
    }

    #[test]
    fn test_lateral_speed_raises_jump() {
        let calm = WaveSnapshot::default();
        let mut still = controller();
        still.update(&jump(), &calm, 0.0);

        let mut moving = controller();
        let right = ControlFlags {
            right: true,
            ..Default::default()
        };
        for frame in 0..30 {
            moving.update(&right, &calm, frame as f64 * DT);
        }
        moving.update(&jump(), &calm, 30.0 * DT);

        assert!(moving.state().velocity.y > still.state().velocity.y);
    }

    #[test]
    fn test_speed_cap_preserves_direction() {
        let mut tuning = PhysicsTuning::default();
        tuning.acceleration = 1.0;
        let mut rider = RiderController::new(tuning);
        let flags = ControlFlags {
            right: true,
            down: true,
            ..Default::default()
        };
        rider.update(&flags, &WaveSnapshot::default(), 0.0);
        let s = rider.state();
        assert!((s.horizontal_speed() - 0.5).abs() < 1e-4);
        assert!((s.velocity.x - s.velocity.z).abs() < 1e-6);
    }

    #[test]
    fn test_short_hop_touchdown_is_not_clean() {
        let mut tuning = PhysicsTuning::default();
        tuning.gravity = 0.1;
        let mut rider = RiderController::new(tuning);
        let calm = WaveSnapshot::default();
        let mut touchdown = None;
        for frame in 0..60 {
            let flags = if frame == 0 { jump() } else { ControlFlags::NONE };
            let events = rider.update(&flags, &calm, frame as f64 * DT);
            if events.landed {
                touchdown = Some(events);
                break;
            }
        }
        let touchdown = touchdown.expect("rider should touch down");
        assert!(!touchdown.clean_landing());
        assert!(rider.state().is_on_surface);
    }

    #[test]
    fn test_contact_prefers_peak_then_trough_then_flat() {
        let snapshot = WaveSnapshot {
            peaks: vec![WaveSample { x: 4.0, z: 0.0, height: 0.9 }],
            troughs: vec![WaveSample { x: 0.5, z: 0.0, height: -0.9 }],
        };
        let contact = resolve_contact(&snapshot, 0.0, 0.0);
        assert!(contact.on_peak);
        assert!((contact.height - (0.9 - BASE_OCEAN_OFFSET)).abs() < 1e-6);

        let contact = resolve_contact(&snapshot, -4.0, 0.0);
        assert!(!contact.on_peak);
        assert!((contact.height - (-0.9 - BASE_OCEAN_OFFSET)).abs() < 1e-6);

        let contact = resolve_contact(&snapshot, 30.0, 30.0);
        assert!(contact.sample.is_none());
        assert_eq!(contact.height, -BASE_OCEAN_OFFSET);
    }

    #[test]
    fn test_peak_boost_pushes_forward() {
        let snapshot = WaveSnapshot {
            peaks: vec![WaveSample { x: 0.0, z: 0.0, height: 1.0 }],
            troughs: Vec::new(),
        };
        let mut rider = controller();
        rider.update(&ControlFlags::NONE, &snapshot, 0.0);
        let s = rider.state();
        assert!(s.on_wave_peak);
        assert!(s.velocity.z < 0.0);
        assert!((s.position.y - (1.0 - BASE_OCEAN_OFFSET)).abs() < 1e-6);
    }

    #[test]
    fn test_peak_boost_follows_travel_direction() {
        let peak = WaveSnapshot {
            peaks: vec![WaveSample { x: 0.0, z: 0.0, height: 1.0 }],
            troughs: Vec::new(),
        };
        let back = ControlFlags {
            down: true,
            ..Default::default()
        };

        let mut boosted = controller();
        boosted.update(&back, &peak, 0.0);
        let mut flat = controller();
        flat.update(&back, &WaveSnapshot::default(), 0.0);

        let p = PhysicsTuning::default();
        let vz = boosted.state().velocity.z;
        assert!(boosted.state().on_wave_peak);
        assert!(flat.state().velocity.z > 0.0);
        assert!(vz > flat.state().velocity.z);
        assert!((vz - flat.state().velocity.z - p.wave_boost * p.drag).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_decays_without_input() {
        let mut rider = controller();
        let calm = WaveSnapshot::default();
        let left = ControlFlags {
            left: true,
            ..Default::default()
        };
        for frame in 0..10 {
            rider.update(&left, &calm, frame as f64 * DT);
        }
        let tilted = rider.state().target_rotation().z;
        assert!(tilted > 0.0);
        rider.update(&ControlFlags::NONE, &calm, 10.0 * DT);
        let decayed = rider.state().target_rotation().z;
        assert!((decayed - tilted * 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_arena_clamp() {
        let mut tuning = PhysicsTuning::default();
        tuning.drag = 1.0;
        tuning.max_speed = 5.0;
        tuning.acceleration = 5.0;
        let mut rider = RiderController::new(tuning);
        let flags = ControlFlags {
            left: true,
            up: true,
            ..Default::default()
        };
        for frame in 0..100 {
            rider.update(&flags, &WaveSnapshot::default(), frame as f64 * DT);
        }
        let s = rider.state();
        assert_eq!(s.position.x, -ARENA_HALF_EXTENT);
        assert_eq!(s.position.z, -ARENA_HALF_EXTENT);
    }
}
