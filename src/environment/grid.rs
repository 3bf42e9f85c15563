//! Cliff-Walking Grid World
//!
//! A stochastic grid world with a cliff along the bottom row: the agent
//! starts at the bottom-left, the goal sits at the bottom-right, and every
//! bottom-row cell between them is a cliff. Stepping off the cliff costs a
//! large negative reward and teleports the agent back to the start. Each
//! executed action slips to a uniformly random one with a configurable
//! probability, which is what makes the short path along the cliff edge
//! risky and the detour worth pricing.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Environment, Transition};
use crate::core::{Action, GridState};

/// Cliff world configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CliffWorldConfig {
    /// Grid height in cells
    pub height: usize,
    /// Grid width in cells
    pub width: usize,
    /// Probability that the executed action is replaced by a random one
    pub random_action_p: f64,
    /// Reward per ordinary move
    pub step_reward: f64,
    /// Reward for falling off the cliff
    pub fall_reward: f64,
}

impl Default for CliffWorldConfig {
    fn default() -> Self {
        Self {
            height: 4,
            width: 6,
            random_action_p: 0.1,
            step_reward: -1.0,
            fall_reward: -40.0,
        }
    }
}

/// Simulated cliff-walking environment
pub struct CliffWorld {
    config: CliffWorldConfig,
    goal: HashSet<GridState>,
    cliff: HashSet<GridState>,
    rng: rand::rngs::ThreadRng,
}

impl CliffWorld {
    /// Create a new cliff world
    pub fn new(config: CliffWorldConfig) -> Self {
        let bottom = config.height - 1;
        let goal = HashSet::from([GridState::new(bottom, config.width - 1)]);
        let cliff = (1..config.width - 1)
            .map(|col| GridState::new(bottom, col))
            .collect();

        Self {
            config,
            goal,
            cliff,
            rng: rand::thread_rng(),
        }
    }

    /// Cliff cells along the bottom row
    pub fn cliff_states(&self) -> &HashSet<GridState> {
        &self.cliff
    }

    fn target_cell(&self, state: GridState, action: Action) -> GridState {
        let (dr, dc) = action.delta();
        let row = state.row.saturating_add_signed(dr).min(self.config.height - 1);
        let col = state.col.saturating_add_signed(dc).min(self.config.width - 1);
        GridState::new(row, col)
    }
}

impl Environment for CliffWorld {
    fn height(&self) -> usize {
        self.config.height
    }

    fn width(&self) -> usize {
        self.config.width
    }

    fn initial_state(&self) -> GridState {
        GridState::new(self.config.height - 1, 0)
    }

    fn goal_states(&self) -> &HashSet<GridState> {
        &self.goal
    }

    fn actions(&self) -> &'static [Action] {
        Action::all()
    }

    fn sample_transition(&mut self, state: GridState, action: Action) -> Transition {
        let action = if self.rng.gen::<f64>() < self.config.random_action_p {
            *Action::all()
                .choose(&mut self.rng)
                .unwrap_or(&action)
        } else {
            action
        };

        let next = self.target_cell(state, action);
        if self.cliff.contains(&next) {
            Transition {
                state: self.initial_state(),
                reward: self.config.fall_reward,
            }
        } else {
            Transition {
                state: next,
                reward: self.config.step_reward,
            }
        }
    }
}
