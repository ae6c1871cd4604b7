//! Input mapping
//!
//! Device key state is reduced to five control flags once per frame.
//! The simulation only ever sees the flag snapshot, never key events.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Control flags sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlFlags {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
}

impl ControlFlags {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        up: false,
        down: false,
        jump: false,
    };

    /// Number of directional flags held
    pub fn direction_count(&self) -> usize {
        [self.left, self.right, self.up, self.down]
            .iter()
            .filter(|&&held| held)
            .count()
    }

    pub fn any(&self) -> bool {
        self.direction_count() > 0 || self.jump
    }
}

/// Logical control a key is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Up,
    Down,
    Jump,
}

impl Control {
    /// Default binding for a DOM-style key name (`KeyboardEvent.key` or `.code`)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" | "KeyA" => Some(Control::Left),
            "ArrowRight" | "d" | "D" | "KeyD" => Some(Control::Right),
            "ArrowUp" | "w" | "W" | "KeyW" => Some(Control::Up),
            "ArrowDown" | "s" | "S" | "KeyS" => Some(Control::Down),
            " " | "Space" | "Spacebar" => Some(Control::Jump),
            _ => None,
        }
    }
}

/// Tracks held keys and produces a `ControlFlags` snapshot
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    held: BTreeSet<String>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press; returns true if the key is bound
    pub fn key_down(&mut self, key: &str) -> bool {
        if Control::from_key(key).is_none() {
            return false;
        }
        self.held.insert(key.to_string());
        true
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Forget all held keys (window blur, session reset)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn flags(&self) -> ControlFlags {
        let mut flags = ControlFlags::NONE;
        for control in self.held.iter().filter_map(|k| Control::from_key(k)) {
            match control {
                Control::Left => flags.left = true,
                Control::Right => flags.right = true,
                Control::Up => flags.up = true,
                Control::Down => flags.down = true,
                Control::Jump => flags.jump = true,
            }
        }
        flags
    }
}
