//! Idle/demo rider
//!
//! Produces control flags without a player: paddle toward the nearest peak,
//! launch off it, then run through the trick combos while in the air.

use super::rider::RiderState;
use super::wave::WaveSnapshot;
use crate::input::ControlFlags;

/// Combos tried in the air, one per cooldown window
const AIR_COMBOS: [ControlFlags; 9] = [
    combo(false, false, false, false, true),
    combo(true, true, false, false, false),
    combo(false, false, true, true, false),
    combo(true, false, true, false, false),
    combo(false, true, true, false, false),
    combo(true, false, false, true, false),
    combo(false, true, false, true, false),
    combo(false, false, true, false, false),
    combo(false, false, false, true, false),
];

const fn combo(left: bool, right: bool, up: bool, down: bool, jump: bool) -> ControlFlags {
    ControlFlags { left, right, up, down, jump }
}

/// Seconds each air combo is held
const COMBO_HOLD: f64 = 1.05;
/// Steering dead zone (field units)
const DEAD_ZONE: f32 = 0.75;
/// Jump anyway after this long on flat water
const FLAT_WATER_JUMP: f64 = 2.5;
/// Beyond this distance from the centre the autopilot heads home
const HOME_RADIUS: f32 = 12.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    jumps: usize,
    was_airborne: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose this frame's flags from the rider and the fresh snapshot
    pub fn flags(&mut self, rider: &RiderState, snapshot: &WaveSnapshot, now: f64) -> ControlFlags {
        if rider.is_jumping {
            if !self.was_airborne {
                self.was_airborne = true;
                self.jumps += 1;
            }
            let held_for = (now - rider.airborne_start_time).max(0.0);
            let step = (held_for / COMBO_HOLD) as usize;
            return AIR_COMBOS[(self.jumps + step) % AIR_COMBOS.len()];
        }
        self.was_airborne = false;

        let pos = rider.position;
        let target = snapshot
            .peaks
            .iter()
            .min_by(|a, b| {
                a.distance_sq(pos.x, pos.z)
                    .partial_cmp(&b.distance_sq(pos.x, pos.z))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| (p.x, p.z));

        let (tx, tz) = match target {
            Some(t) => t,
            None if pos.x.abs() > HOME_RADIUS || pos.z.abs() > HOME_RADIUS => (0.0, 0.0),
            None => (pos.x, pos.z),
        };

        let dx = tx - pos.x;
        let dz = tz - pos.z;
        let mut flags = ControlFlags {
            left: dx < -DEAD_ZONE,
            right: dx > DEAD_ZONE,
            up: dz < -DEAD_ZONE,
            down: dz > DEAD_ZONE,
            jump: false,
        };

        let idle_on_flat = target.is_none() && now - rider.last_jump_time > FLAT_WATER_JUMP;
        if rider.is_on_surface && (rider.on_wave_peak || idle_on_flat) {
            flags.jump = true;
        }
        flags
    }
}
