//! Configuration
//!
//! Configuration structs for the learning core, loaded from TOML files
//! with environment-variable overrides.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::environment::CliffWorldConfig;

/// Atom grid configuration
///
/// Controls how the [0, 1] probability axis is discretized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtomConfig {
    /// Number of atoms (probability buckets)
    pub nb_atoms: usize,
    /// Spacing exponent for log-spaced grids
    pub spacing: u32,
    /// Log-space the atoms (denser near 0, resolving tail risk finely)
    pub log_spacing: bool,
}

impl Default for AtomConfig {
    fn default() -> Self {
        Self {
            nb_atoms: 4,
            spacing: 2,
            log_spacing: false,
        }
    }
}

/// Update-rule hyperparameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Learning rate (beta)
    pub beta: f64,
    /// Discount factor (gamma)
    pub gamma: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            beta: 0.1,
            gamma: 0.95,
        }
    }
}

/// Exploration strategy for action selection
///
/// Only epsilon-greedy is implemented; requesting any other strategy is a
/// hard failure at learner construction, never a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ExplorationStrategy {
    /// With probability `eps` pick a uniformly random action, else greedy
    EpsilonGreedy { eps: f64 },
    /// Parameter-space noise (not implemented for the tabular core)
    ParameterNoise,
}

impl Default for ExplorationStrategy {
    fn default() -> Self {
        Self::EpsilonGreedy { eps: 0.1 }
    }
}

/// Training loop configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Risk level the policy optimizes for at episode start
    pub alpha: f64,
    /// Number of episodes to run
    pub max_episodes: usize,
    /// Step cap per episode
    pub max_episode_steps: usize,
    /// Exploration strategy
    pub exploration: ExplorationStrategy,
    /// Log progress every N episodes
    pub log_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            max_episodes: 1000,
            max_episode_steps: 100,
            exploration: ExplorationStrategy::default(),
            log_every: 10,
        }
    }
}

/// Aggregate configuration for a training run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub atoms: AtomConfig,
    #[serde(default)]
    pub learning: LearningConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub world: CliffWorldConfig,
}

impl RunConfig {
    /// Load configuration from a TOML file and environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.as_ref().to_path_buf()))
            // Override with environment variables (CVARQ_TRAINING__ALPHA, etc.)
            .add_source(
                Environment::with_prefix("CVARQ")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.atoms.nb_atoms < 1 {
            errors.push("atoms.nb_atoms must be at least 1".to_string());
        }
        if self.atoms.log_spacing && self.atoms.spacing <= 1 {
            errors.push("atoms.spacing must exceed 1 for log spacing".to_string());
        }

        if self.learning.beta <= 0.0 {
            errors.push("learning.beta must be positive".to_string());
        }
        if self.learning.gamma <= 0.0 || self.learning.gamma > 1.0 {
            errors.push("learning.gamma must be in (0, 1]".to_string());
        }

        if self.training.alpha <= 0.0 || self.training.alpha >= 1.0 {
            errors.push("training.alpha must be in (0, 1)".to_string());
        }
        if self.training.max_episodes == 0 {
            errors.push("training.max_episodes must be positive".to_string());
        }
        if let ExplorationStrategy::EpsilonGreedy { eps } = self.training.exploration {
            if !(0.0..=1.0).contains(&eps) {
                errors.push("exploration eps must be in [0, 1]".to_string());
            }
        }

        if self.world.height < 2 || self.world.width < 2 {
            errors.push("world grid must be at least 2x2".to_string());
        }
        if !(0.0..=1.0).contains(&self.world.random_action_p) {
            errors.push("world.random_action_p must be in [0, 1]".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
