//! External Model Boundary
//!
//! The function-approximator seam for observation spaces the tabular core
//! does not cover. A model is an external fitting service: anything that
//! can pick actions from observations and fit itself to transition batches
//! can stand behind this trait, from a linear model to a distributional
//! quantile network. No approximator ships with this crate.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A batch of transitions for one fitting step
///
/// Rows are aligned across all fields: entry `i` of each vector describes
/// the same transition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionBatch {
    /// Observations before the action, one feature vector per row
    pub observations: Vec<Vec<f64>>,
    /// Action index selected on each observation
    pub actions: Vec<usize>,
    /// Immediate reward per row
    pub rewards: Vec<f64>,
    /// Observations after the action
    pub next_observations: Vec<Vec<f64>>,
    /// Whether the row ended its episode
    pub done: Vec<bool>,
    /// Importance weight per row
    pub weights: Vec<f64>,
}

impl TransitionBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one transition
    pub fn push(
        &mut self,
        observation: Vec<f64>,
        action: usize,
        reward: f64,
        next_observation: Vec<f64>,
        done: bool,
        weight: f64,
    ) {
        self.observations.push(observation);
        self.actions.push(action);
        self.rewards.push(reward);
        self.next_observations.push(next_observation);
        self.done.push(done);
        self.weights.push(weight);
    }

    /// Number of transitions in the batch
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Distributional value model fit by an external service
pub trait DistributionalModel {
    /// Choose an action for an observation
    ///
    /// `stochastic` enables the model's own exploration noise; a
    /// deterministic call returns the greedy action.
    fn act(&self, observation: &[f64], stochastic: bool) -> Result<usize>;

    /// Fit the model to a batch, returning the per-row TD errors
    fn train(&mut self, batch: &TransitionBatch) -> Result<Vec<f64>>;

    /// Copy the optimized parameters into the lagging target network
    fn update_target(&mut self);
}

/// Collapse a quantile output into a scalar action value (its mean)
pub fn quantile_mean(quantiles: &[f64]) -> f64 {
    if quantiles.is_empty() {
        return 0.0;
    }
    quantiles.iter().sum::<f64>() / quantiles.len() as f64
}
