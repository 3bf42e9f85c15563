//! Action Space
//!
//! Discrete movement actions for grid environments.

use serde::{Deserialize, Serialize};

/// Number of discrete actions
pub const NUM_ACTIONS: usize = 4;

/// Discrete action space for grid agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Move one row up
    Up = 0,
    /// Move one column right
    Right = 1,
    /// Move one row down
    Down = 2,
    /// Move one column left
    Left = 3,
}

impl Action {
    /// Convert from action index
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Up),
            1 => Some(Self::Right),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            _ => None,
        }
    }

    /// Convert to action index
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Get all possible actions
    pub fn all() -> &'static [Action] {
        &[Self::Up, Self::Right, Self::Down, Self::Left]
    }

    /// Row/column displacement of this action
    pub fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Right => (0, 1),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Up => "Move up",
            Self::Right => "Move right",
            Self::Down => "Move down",
            Self::Left => "Move left",
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::Up
    }
}
