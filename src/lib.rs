//! Risk-Sensitive Distributional Q-Learning
//!
//! Value estimation under CVaR objectives for finite grid worlds.
//!
//! # Overview
//!
//! - **Tabular core**: per-(state, action) value distributions tracked as
//!   quantile estimates plus a scaled CVaR curve over a fixed atom grid,
//!   updated by a quantile-regression stochastic-approximation rule.
//! - **Risk-aware control**: action selection at a fixed risk level at
//!   episode start, then at a running absolute risk budget carried across
//!   the trajectory.
//! - **Environments**: a trait boundary plus a simulated cliff-walking
//!   grid world to train against.
//! - **Model seam**: an interface for external function approximators
//!   covering observation spaces the table does not.
//!
//! # Usage
//!
//! ```no_run
//! use cvarq::{CliffWorld, CliffWorldConfig, CvarQLearner, RunConfig};
//!
//! let config = RunConfig::default();
//! let world = CliffWorld::new(CliffWorldConfig::default());
//! let mut learner =
//!     CvarQLearner::new(world, &config.atoms, config.learning, config.training)?;
//! learner.run()?;
//! let value_grid = learner.table().expected_value_grid();
//! # Ok::<(), cvarq::CvarqError>(())
//! ```

pub mod algorithms;
pub mod config;
pub mod core;
pub mod environment;
pub mod error;
pub mod model;
pub mod risk;
pub mod training;

// Algorithm exports
pub use algorithms::ActionValueFunction;

// Config exports
pub use config::{AtomConfig, ExplorationStrategy, LearningConfig, RunConfig, TrainingConfig};

// Core exports
pub use core::{Action, GridState, NUM_ACTIONS};

// Environment exports
pub use environment::{CliffWorld, CliffWorldConfig, Environment, Transition};

// Error exports
pub use error::{CvarqError, Result};

// Model exports
pub use model::{quantile_mean, DistributionalModel, TransitionBatch};

// Risk exports
pub use risk::{yc_from_var, yc_to_var, AtomGrid, ValueDistribution};

// Training exports
pub use training::{CvarQLearner, TrainingStats};
