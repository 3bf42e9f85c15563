//! Training
//!
//! Episode-driving learner for the tabular CVaR core.

mod learner;

pub use learner::{CvarQLearner, TrainingStats};
