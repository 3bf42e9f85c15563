//! Environments
//!
//! The collaborator boundary the learner trains against, plus a simulated
//! cliff-walking grid world for training without any external system.

mod grid;

use std::collections::HashSet;

#[cfg(test)]
use mockall::automock;

use crate::core::{Action, GridState};

pub use grid::{CliffWorld, CliffWorldConfig};

/// Result of sampling one environment transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// State after the action
    pub state: GridState,
    /// Reward received
    pub reward: f64,
}

/// A finite grid-world environment
///
/// The environment owns its randomness: `sample_transition` draws the
/// successor state and reward from the environment's own dynamics.
#[cfg_attr(test, automock)]
pub trait Environment {
    /// Grid height in cells
    fn height(&self) -> usize;

    /// Grid width in cells
    fn width(&self) -> usize;

    /// State every episode starts from
    fn initial_state(&self) -> GridState;

    /// Terminal states
    fn goal_states(&self) -> &HashSet<GridState>;

    /// The action set
    fn actions(&self) -> &'static [Action];

    /// Sample a successor state and reward for taking `action` in `state`
    fn sample_transition(&mut self, state: GridState, action: Action) -> Transition;
}
