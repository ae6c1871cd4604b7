//! Score keeping and frame events
//!
//! `GameState` is a plain accumulator. Presentation layers read it; only the
//! mutators below (driven by `GameEvent`s from the tick) change it.

use serde::{Deserialize, Serialize};

use crate::consts::TRICK_BONUS;

/// Something that happened during a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Rider left the water
    Airborne,
    /// Rider touched down; `clean` when the jump was long enough to count
    Landed { air_time: f64, max_height: f32, clean: bool },
    /// A trick scored `score` points (before the flat trick bonus)
    TrickRegistered { name: String, score: u64, multiplier: f32 },
    /// The on-screen trick text timed out
    TrickExpired,
    /// Score and trick count were zeroed
    ScoreReset,
}

/// Session score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    score: u64,
    trick_count: u32,
    game_over: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn trick_count(&self) -> u32 {
        self.trick_count
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Count a trick; every trick is also worth a flat bonus
    pub fn add_trick(&mut self) {
        self.trick_count = self.trick_count.saturating_add(1);
        self.add_score(TRICK_BONUS);
    }

    pub fn end_game(&mut self) {
        if !self.game_over {
            log::info!("Game over with {} points from {} tricks", self.score, self.trick_count);
        }
        self.game_over = true;
    }

    pub fn reset_game(&mut self) {
        self.score = 0;
        self.trick_count = 0;
        self.game_over = false;
    }

    /// Fold a frame event into the score
    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::TrickRegistered { score, .. } => {
                self.add_score(*score);
                self.add_trick();
            }
            GameEvent::ScoreReset => self.reset_game(),
            GameEvent::Airborne | GameEvent::Landed { .. } | GameEvent::TrickExpired => {}
        }
    }
}
