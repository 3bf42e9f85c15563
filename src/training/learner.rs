//! Tabular Learning Loop
//!
//! Drives episodes against an environment, maintaining the running risk
//! budget that turns the fixed-risk-level policy into a fixed-threshold
//! policy mid-episode.
//!
//! At episode start the policy commits to a risk level `alpha`: the first
//! greedy action fixes the starting budget `s` at that action's VaR
//! estimate. From then on every observed reward is subtracted from the
//! budget and the remainder rescaled by the discount, `s' = (s - r) / gamma`,
//! so action selection keeps conditioning on the tail outcomes still
//! possible from here.

use rand::Rng;
use tracing::{debug, info};

use crate::algorithms::ActionValueFunction;
use crate::config::{AtomConfig, ExplorationStrategy, LearningConfig, TrainingConfig};
use crate::environment::Environment;
use crate::error::{CvarqError, Result};

/// Training statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainingStats {
    /// Total episodes completed
    pub episodes: usize,
    /// Total steps taken
    pub steps: usize,
    /// Total table updates performed
    pub updates: usize,
    /// Mean reward per episode
    pub avg_episode_reward: f64,
    /// Mean episode length in steps
    pub avg_episode_length: f64,
}

/// Tabular CVaR Q-learner
pub struct CvarQLearner<E: Environment> {
    env: E,
    table: ActionValueFunction,
    config: TrainingConfig,
    stats: TrainingStats,
    rng: rand::rngs::ThreadRng,
}

impl<E: Environment> CvarQLearner<E> {
    /// Create a learner with a fresh zero-initialized table
    ///
    /// Fails with UnimplementedPolicy for exploration strategies the
    /// tabular core does not support.
    pub fn new(
        env: E,
        atoms: &AtomConfig,
        learning: LearningConfig,
        config: TrainingConfig,
    ) -> Result<Self> {
        match config.exploration {
            ExplorationStrategy::EpsilonGreedy { .. } => {}
            ExplorationStrategy::ParameterNoise => {
                return Err(CvarqError::UnimplementedPolicy(
                    "parameter-space noise is not available for the tabular core".to_string(),
                ));
            }
        }

        let table = ActionValueFunction::new(
            env.height(),
            env.width(),
            env.actions().len(),
            atoms,
            learning,
        )?;

        Ok(Self {
            env,
            table,
            config,
            stats: TrainingStats::default(),
            rng: rand::thread_rng(),
        })
    }

    /// Run the configured number of episodes
    pub fn run(&mut self) -> Result<()> {
        info!(
            episodes = self.config.max_episodes,
            alpha = self.config.alpha,
            "starting training run"
        );

        for episode in 0..self.config.max_episodes {
            let reward = self.run_episode()?;
            if episode % self.config.log_every.max(1) == 0 {
                info!(
                    episode,
                    reward,
                    avg_reward = self.stats.avg_episode_reward,
                    "episode complete"
                );
            }
        }

        Ok(())
    }

    /// Run a single episode, returning its total reward
    pub fn run_episode(&mut self) -> Result<f64> {
        let alpha = self.config.alpha;
        let mut x = self.env.initial_state();

        // The opening action is only used to fix the starting risk budget;
        // the in-episode policy re-selects before the first move.
        let a = self.explore(self.table.next_action_alpha(x, alpha)?)?;
        let mut s = self.table.var_alpha(x, a, alpha);
        debug!(state = %x, budget = s, "episode start");

        let mut total_reward = 0.0;
        let mut step = 0;
        while !self.env.goal_states().contains(&x) && step < self.config.max_episode_steps {
            let a = self.explore(self.table.next_action_s(x, s))?;
            let action = self.env.actions()[a];

            let t = self.env.sample_transition(x, action);
            self.table.update(x, a, t.state, t.reward)?;

            s = (s - t.reward) / self.table.gamma();
            x = t.state;
            total_reward += t.reward;
            step += 1;

            self.stats.steps += 1;
            self.stats.updates += 1;
        }

        let n = self.stats.episodes as f64;
        self.stats.avg_episode_reward =
            (self.stats.avg_episode_reward * n + total_reward) / (n + 1.0);
        self.stats.avg_episode_length =
            (self.stats.avg_episode_length * n + step as f64) / (n + 1.0);
        self.stats.episodes += 1;

        Ok(total_reward)
    }

    fn explore(&mut self, greedy: usize) -> Result<usize> {
        match self.config.exploration {
            ExplorationStrategy::EpsilonGreedy { eps } => {
                if self.rng.gen::<f64>() < eps {
                    Ok(self.rng.gen_range(0..self.env.actions().len()))
                } else {
                    Ok(greedy)
                }
            }
            ExplorationStrategy::ParameterNoise => Err(CvarqError::UnimplementedPolicy(
                "parameter-space noise is not available for the tabular core".to_string(),
            )),
        }
    }

    /// Current stats
    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// The learned table
    pub fn table(&self) -> &ActionValueFunction {
        &self.table
    }

    /// Consume the learner, keeping the learned table
    pub fn into_table(self) -> ActionValueFunction {
        self.table
    }
}
