//! Trick detection and scoring
//!
//! While the rider is airborne and high enough above the local surface, the
//! current control flags are matched against an ordered trick table. The
//! first match wins; a cooldown keeps held or mashed inputs from scoring
//! twice, and the combo multiplier grows with each distinct trick name seen
//! this session.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::rider::{RiderEvents, RiderState};
use crate::consts::COMBO_STEP;
use crate::input::ControlFlags;
use crate::settings::TrickTuning;

/// A row of the trick table
#[derive(Debug, Clone, Copy)]
pub struct TrickDef {
    pub name: &'static str,
    pub base_score: u32,
    /// Only available on long, high jumps
    pub long_air: bool,
    pub matches: fn(&ControlFlags) -> bool,
}

/// Directional flags held, exactly
#[inline]
fn held(f: &ControlFlags, left: bool, right: bool, up: bool, down: bool) -> bool {
    f.left == left && f.right == right && f.up == up && f.down == down
}

/// Precedence-ordered trick table; basic tricks first, long-air tricks last
pub static TRICKS: [TrickDef; 9] = [
    TrickDef {
        name: "Ollie",
        base_score: 50,
        long_air: false,
        matches: |f: &ControlFlags| f.jump && f.direction_count() == 0,
    },
    TrickDef {
        name: "Kickflip",
        base_score: 100,
        long_air: false,
        matches: |f: &ControlFlags| held(f, true, true, false, false),
    },
    TrickDef {
        name: "Heelflip",
        base_score: 100,
        long_air: false,
        matches: |f: &ControlFlags| held(f, false, false, true, true),
    },
    TrickDef {
        name: "Backflip",
        base_score: 200,
        long_air: false,
        matches: |f: &ControlFlags| held(f, true, false, true, false),
    },
    TrickDef {
        name: "Frontflip",
        base_score: 200,
        long_air: false,
        matches: |f: &ControlFlags| held(f, false, true, true, false),
    },
    TrickDef {
        name: "360 Spin",
        base_score: 150,
        long_air: false,
        matches: |f: &ControlFlags| held(f, true, false, false, true),
    },
    TrickDef {
        name: "Barrel Roll",
        base_score: 175,
        long_air: false,
        matches: |f: &ControlFlags| held(f, false, true, false, true),
    },
    TrickDef {
        name: "Superman",
        base_score: 250,
        long_air: true,
        matches: |f: &ControlFlags| held(f, false, false, true, false),
    },
    TrickDef {
        name: "Rodeo Flip",
        base_score: 300,
        long_air: true,
        matches: |f: &ControlFlags| held(f, false, false, false, true),
    },
];

/// Look up a trick's base score by name
pub fn base_score(name: &str) -> Option<u32> {
    TRICKS.iter().find(|t| t.name == name).map(|t| t.base_score)
}

/// First trick in the table matching `flags`, given the current jump
pub fn match_trick(flags: &ControlFlags, air_time: f64, height: f32, tuning: &TrickTuning) -> Option<&'static TrickDef> {
    let long_air = air_time > tuning.long_air_time && height > tuning.long_air_height;
    TRICKS
        .iter()
        .filter(|t| !t.long_air || long_air)
        .find(|t| (t.matches)(flags))
}

/// Combo multiplier for a count of distinct tricks performed
pub fn combo_multiplier(distinct: usize) -> f32 {
    1.0 + COMBO_STEP * distinct.saturating_sub(1) as f32
}

/// Airborne phase as seen by the trick engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrickPhase {
    #[default]
    Grounded,
    /// In the air, nothing scored yet this jump
    Airborne,
    /// In the air, at least one trick scored this jump
    TrickRegistered,
}

/// On-screen trick text and when it goes away
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrickDisplay {
    pub text: String,
    pub expires_at: f64,
}

/// Trick bookkeeping for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrickSession {
    pub in_progress: bool,
    pub display: Option<TrickDisplay>,
    pub last_trick_time: Option<f64>,
    /// Tricks scored during the current jump
    pub combo_count: u32,
    pub distinct_tricks: BTreeSet<String>,
    /// Last trick scored during the current jump
    #[serde(skip)]
    last_in_air: Option<&'static str>,
}

impl TrickSession {
    pub fn active_trick_name(&self) -> Option<&str> {
        self.display.as_ref().map(|d| d.text.as_str())
    }

    pub fn multiplier(&self) -> f32 {
        combo_multiplier(self.distinct_tricks.len())
    }
}

/// A trick that just scored
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTrick {
    pub name: &'static str,
    pub base_score: u32,
    pub multiplier: f32,
    pub score: u64,
    pub display: String,
}

/// What the trick engine did this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrickOutcome {
    pub scored: Option<ScoredTrick>,
    /// The on-screen trick text cleared this frame
    pub display_expired: bool,
}

/// Trick state machine
#[derive(Debug, Clone)]
pub struct TrickEngine {
    phase: TrickPhase,
    session: TrickSession,
    tuning: TrickTuning,
}

impl TrickEngine {
    pub fn new(tuning: TrickTuning) -> Self {
        Self {
            phase: TrickPhase::Grounded,
            session: TrickSession::default(),
            tuning,
        }
    }

    pub fn phase(&self) -> TrickPhase {
        self.phase
    }

    pub fn session(&self) -> &TrickSession {
        &self.session
    }

    pub fn reset(&mut self) {
        self.phase = TrickPhase::Grounded;
        self.session = TrickSession::default();
    }

    /// Drop any on-screen trick text immediately
    pub fn clear_display(&mut self) {
        self.session.display = None;
    }

    /// Run one frame of trick detection at session time `now` (seconds)
    pub fn evaluate(
        &mut self,
        flags: &ControlFlags,
        rider: &RiderState,
        events: &RiderEvents,
        now: f64,
    ) -> TrickOutcome {
        let mut outcome = TrickOutcome::default();

        if self.session.display.as_ref().is_some_and(|d| now >= d.expires_at) {
            self.session.display = None;
            outcome.display_expired = true;
        }

        if events.became_airborne {
            self.phase = TrickPhase::Airborne;
            self.session.in_progress = true;
            self.session.combo_count = 0;
            self.session.last_in_air = None;
        }
        if events.landed {
            self.phase = TrickPhase::Grounded;
            self.session.in_progress = false;
            self.session.last_in_air = None;
            return outcome;
        }
        if self.phase == TrickPhase::Grounded || !rider.is_jumping {
            return outcome;
        }

        let height = rider.height_above_surface();
        if height <= self.tuning.min_height {
            return outcome;
        }
        let Some(trick) = match_trick(flags, rider.air_time, height, &self.tuning) else {
            return outcome;
        };
        // Holding the same combo keeps its trick; a new combo can score again
        if self.phase == TrickPhase::TrickRegistered && self.session.last_in_air == Some(trick.name) {
            return outcome;
        }
        if let Some(last) = self.session.last_trick_time {
            if now - last < self.tuning.cooldown {
                log::trace!("{} ignored, {:.2}s since last trick", trick.name, now - last);
                return outcome;
            }
        }

        outcome.scored = Some(self.register(trick, now));
        outcome
    }

    fn register(&mut self, trick: &'static TrickDef, now: f64) -> ScoredTrick {
        let session = &mut self.session;
        session.distinct_tricks.insert(trick.name.to_string());
        let multiplier = combo_multiplier(session.distinct_tricks.len());
        let score = (trick.base_score as f32 * multiplier).round() as u64;

        let display = if multiplier > 1.0 {
            format!("{} +{} (x{})", trick.name, score, multiplier)
        } else {
            format!("{} +{}", trick.name, score)
        };

        session.last_trick_time = Some(now);
        session.combo_count += 1;
        session.last_in_air = Some(trick.name);
        session.display = Some(TrickDisplay {
            text: display.clone(),
            expires_at: now + self.tuning.display_duration,
        });
        self.phase = TrickPhase::TrickRegistered;

        log::debug!("Trick: {} (base {}, x{}) = {}", trick.name, trick.base_score, multiplier, score);

        ScoredTrick {
            name: trick.name,
            base_score: trick.base_score,
            multiplier,
            score,
            display,
        }
    }
}
