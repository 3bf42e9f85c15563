//! CVaR Q-Learning Table
//!
//! Dense table of per-(state, action) value distributions with the
//! quantile-regression update rule and risk-aware action selection.
//!
//! The Bellman max over actions is taken on the CVaR curves, where the
//! supremum of valid curves stays valid, and only then converted back to
//! quantile space. Taking it naively on the quantiles loses that guarantee.

use ordered_float::OrderedFloat;

use crate::config::{AtomConfig, LearningConfig};
use crate::core::GridState;
use crate::error::{CvarqError, Result};
use crate::risk::{yc_to_var, AtomGrid, ValueDistribution};

/// Table of value distributions indexed by (row, col, action)
///
/// Backed by a flat arena of value-typed records; the offset is computed
/// from the (row, col) position and action index. Exclusively owns every
/// distribution, single writer, no sharing.
#[derive(Debug, Clone)]
pub struct ActionValueFunction {
    grid: AtomGrid,
    learning: LearningConfig,
    height: usize,
    width: usize,
    n_actions: usize,
    q: Vec<ValueDistribution>,
}

impl ActionValueFunction {
    /// Create a zero-initialized table for a `height x width` grid
    pub fn new(
        height: usize,
        width: usize,
        n_actions: usize,
        atoms: &AtomConfig,
        learning: LearningConfig,
    ) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(CvarqError::InvalidArgument(
                "grid dimensions must be positive".to_string(),
            ));
        }
        if n_actions == 0 {
            return Err(CvarqError::InvalidArgument(
                "action set must be non-empty".to_string(),
            ));
        }

        let grid = AtomGrid::new(atoms)?;
        let q = vec![ValueDistribution::zeros(grid.nb_atoms()); height * width * n_actions];

        Ok(Self {
            grid,
            learning,
            height,
            width,
            n_actions,
            q,
        })
    }

    /// The atom grid shared by every distribution in the table
    pub fn atom_grid(&self) -> &AtomGrid {
        &self.grid
    }

    /// Discount factor used by the update rule
    pub fn gamma(&self) -> f64 {
        self.learning.gamma
    }

    /// Number of actions per state
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn index(&self, state: GridState, action: usize) -> usize {
        debug_assert!(state.row < self.height && state.col < self.width);
        debug_assert!(action < self.n_actions);
        (state.row * self.width + state.col) * self.n_actions + action
    }

    /// Distribution stored for one state-action pair
    pub fn state_action(&self, state: GridState, action: usize) -> &ValueDistribution {
        &self.q[self.index(state, action)]
    }

    /// Apply one stochastic-approximation step for an observed transition
    ///
    /// Every value `v` in the current estimate of the successor's
    /// distribution (via [`sup_q`](Self::sup_q)) yields a candidate target
    /// `r + gamma * v`, and each target nudges every atom: the quantile
    /// estimate moves up by `beta * (1 - 1/atom)` when it already dominates
    /// the target and by `beta` otherwise, while the CVaR estimate tracks
    /// `atom * v + min(0, target - v)` through an exponential moving
    /// average. Both reads use the pre-nudge values within a step.
    ///
    /// Fails with MonotonicityViolation if the pair's quantile estimates
    /// come out of the step with `v[0] > v[last]`, the signature of a
    /// diverging update, which must not be silently ignored.
    pub fn update(
        &mut self,
        state: GridState,
        action: usize,
        next_state: GridState,
        reward: f64,
    ) -> Result<()> {
        let targets: Vec<f64> = self
            .sup_q(next_state)
            .into_iter()
            .map(|v| reward + self.learning.gamma * v)
            .collect();

        let beta = self.learning.beta;
        let idx = self.index(state, action);

        for target in targets {
            let dist = &mut self.q[idx];
            for (i, &atom) in self.grid.upper().iter().enumerate() {
                let v_old = dist.v[i];
                let yc_old = dist.yc[i];

                dist.v[i] = if v_old >= target {
                    v_old + beta * (1.0 - 1.0 / atom)
                } else {
                    v_old + beta
                };
                dist.yc[i] =
                    (1.0 - beta) * yc_old + beta * (atom * v_old + (target - v_old).min(0.0));
            }
        }

        let dist = &self.q[idx];
        let last = self.grid.nb_atoms() - 1;
        if dist.v[0] > dist.v[last] {
            return Err(CvarqError::MonotonicityViolation {
                row: state.row,
                col: state.col,
                action,
                first: dist.v[0],
                last: dist.v[last],
                last_index: last,
            });
        }

        Ok(())
    }

    /// Value distribution of a state under the greedy risk-aware policy
    ///
    /// For each atom the supremum of `yc` across the state's actions, then
    /// converted back to a quantile sequence.
    pub fn sup_q(&self, state: GridState) -> Vec<f64> {
        let envelope: Vec<f64> = (0..self.grid.nb_atoms())
            .map(|i| {
                (0..self.n_actions)
                    .map(|a| self.q[self.index(state, a)].yc[i])
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .collect();

        yc_to_var(&self.grid, &envelope)
    }

    /// Greedy action at a fixed risk level: argmax of interpolated CVaR
    pub fn next_action_alpha(&self, state: GridState, alpha: f64) -> Result<usize> {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for a in 0..self.n_actions {
            let score = self.q[self.index(state, a)].yc_alpha(&self.grid, alpha)?;
            if score > best_score {
                best = a;
                best_score = score;
            }
        }
        Ok(best)
    }

    /// Greedy action at a fixed absolute threshold: argmax of `E[(V-s)^-]`
    ///
    /// Used mid-episode once the risk budget has been converted from a
    /// probability level to an absolute value.
    pub fn next_action_s(&self, state: GridState, s: f64) -> usize {
        (0..self.n_actions)
            .max_by_key(|&a| OrderedFloat(self.q[self.index(state, a)].e_min_s(&self.grid, s)))
            .unwrap_or(0)
    }

    /// Quantile estimate for the bucket containing probability level `alpha`
    ///
    /// Returns the `v` of the bucket below the first breakpoint exceeding
    /// `alpha`.
    pub fn var_alpha(&self, state: GridState, action: usize, alpha: f64) -> f64 {
        let atoms = self.grid.breakpoints();
        let mut i = atoms.len() - 1;
        for (j, &atom) in atoms.iter().enumerate() {
            i = j;
            if alpha < atom {
                break;
            }
        }
        self.q[self.index(state, action)].v[i.max(1) - 1]
    }

    /// Expected-value grid under the greedy policy
    ///
    /// `height x width` floats: per cell, the max over actions of each
    /// distribution's expected value. This is one of the two arrays the
    /// visualization side consumes.
    pub fn expected_value_grid(&self) -> Vec<Vec<f64>> {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| {
                        let state = GridState::new(row, col);
                        (0..self.n_actions)
                            .map(|a| self.q[self.index(state, a)].expected_value(&self.grid))
                            .fold(f64::NEG_INFINITY, f64::max)
                    })
                    .collect()
            })
            .collect()
    }

    /// Greedy action-index grid, the companion array to
    /// [`expected_value_grid`](Self::expected_value_grid)
    pub fn greedy_action_grid(&self) -> Vec<Vec<usize>> {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| {
                        let state = GridState::new(row, col);
                        (0..self.n_actions)
                            .max_by_key(|&a| {
                                OrderedFloat(
                                    self.q[self.index(state, a)].expected_value(&self.grid),
                                )
                            })
                            .unwrap_or(0)
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::yc_from_var;

    fn table(height: usize, width: usize, n_actions: usize, nb_atoms: usize) -> ActionValueFunction {
        ActionValueFunction::new(
            height,
            width,
            n_actions,
            &AtomConfig {
                nb_atoms,
                spacing: 2,
                log_spacing: false,
            },
            LearningConfig {
                beta: 0.01,
                gamma: 1.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_action_set() {
        let result = ActionValueFunction::new(
            2,
            2,
            0,
            &AtomConfig::default(),
            LearningConfig::default(),
        );
        assert!(matches!(result, Err(CvarqError::InvalidArgument(_))));
    }

    #[test]
    fn sup_q_envelope_is_exact_max_over_actions() {
        let mut t = table(1, 1, 3, 2);
        let state = GridState::new(0, 0);
        let i0 = t.index(state, 0);
        t.q[i0].yc = vec![-1.0, 0.5];
        let i1 = t.index(state, 1);
        t.q[i1].yc = vec![-0.5, 0.25];
        let i2 = t.index(state, 2);
        t.q[i2].yc = vec![-2.0, 0.75];

        let envelope = yc_from_var(t.atom_grid(), &t.sup_q(state));
        assert_eq!(envelope, vec![-0.5, 0.75]);
    }

    #[test]
    fn var_alpha_reads_the_bucket_containing_alpha() {
        let mut t = table(1, 1, 1, 4);
        let state = GridState::new(0, 0);
        let i0 = t.index(state, 0);
        t.q[i0].v = vec![-3.0, -1.0, 0.0, 2.0];

        // linear breakpoints: 0, 0.25, 0.5, 0.75, 1
        assert_eq!(t.var_alpha(state, 0, 0.1), -3.0);
        assert_eq!(t.var_alpha(state, 0, 0.25), -1.0);
        assert_eq!(t.var_alpha(state, 0, 0.6), 0.0);
        assert_eq!(t.var_alpha(state, 0, 0.9), 2.0);
    }

    #[test]
    fn policies_return_valid_action_indices() {
        let t = table(3, 4, 4, 4);
        for row in 0..3 {
            for col in 0..4 {
                let state = GridState::new(row, col);
                assert!(t.next_action_alpha(state, 0.1).unwrap() < 4);
                assert!(t.next_action_s(state, -5.0) < 4);
            }
        }
    }

    #[test]
    fn next_action_alpha_picks_the_best_cvar() {
        let mut t = table(1, 1, 2, 2);
        let state = GridState::new(0, 0);
        let i0 = t.index(state, 0);
        t.q[i0].yc = vec![-2.0, -1.0];
        let i1 = t.index(state, 1);
        t.q[i1].yc = vec![-0.5, -0.2];

        assert_eq!(t.next_action_alpha(state, 0.3).unwrap(), 1);
    }

    #[test]
    fn next_action_s_prefers_the_smaller_shortfall() {
        let mut t = table(1, 1, 2, 2);
        let state = GridState::new(0, 0);
        let grid = t.atom_grid().clone();
        let i0 = t.index(state, 0);
        t.q[i0].v = vec![-4.0, 1.0];
        t.q[i0].yc = yc_from_var(&grid, &[-4.0, 1.0]);
        let i1 = t.index(state, 1);
        t.q[i1].v = vec![-1.0, 1.0];
        t.q[i1].yc = yc_from_var(&grid, &[-1.0, 1.0]);

        assert_eq!(t.next_action_s(state, 0.0), 1);
    }

    // Degenerate single-successor scenario with a closed-form answer:
    // successor fixed at V = [1, 3], r = 0, gamma = 1. The median-level
    // quantile settles at the lower support point and the top-level
    // quantile at the maximum; yc settles on alpha * CVaR(alpha).
    #[test]
    fn update_converges_on_the_degenerate_two_point_target() {
        let mut t = table(1, 2, 1, 2);
        let state = GridState::new(0, 0);
        let next = GridState::new(0, 1);

        let ni = t.index(next, 0);
        let grid = t.atom_grid().clone();
        t.q[ni].yc = yc_from_var(&grid, &[1.0, 3.0]);
        assert_eq!(t.sup_q(next), vec![1.0, 3.0]);

        for _ in 0..10_000 {
            t.update(state, 0, next, 0.0).unwrap();
        }

        let dist = t.state_action(state, 0);
        assert!((dist.var()[0] - 1.0).abs() < 0.1, "v = {:?}", dist.var());
        assert!((dist.var()[1] - 3.0).abs() < 0.1, "v = {:?}", dist.var());
        assert!((dist.yc()[0] - 0.5).abs() < 0.1, "yc = {:?}", dist.yc());
        assert!((dist.yc()[1] - 2.0).abs() < 0.1, "yc = {:?}", dist.yc());
    }

    #[test]
    fn update_uses_every_successor_candidate() {
        let mut t = table(1, 2, 1, 2);
        let state = GridState::new(0, 0);
        let next = GridState::new(0, 1);
        let ni = t.index(next, 0);
        let grid = t.atom_grid().clone();
        t.q[ni].yc = yc_from_var(&grid, &[1.0, 3.0]);

        t.update(state, 0, next, 0.0).unwrap();

        // Fresh estimates sit below both targets, so each of the two
        // candidate values nudges each quantile up by beta.
        let dist = t.state_action(state, 0);
        assert!((dist.var()[0] - 0.02).abs() < 1e-12);
        assert!((dist.var()[1] - 0.02).abs() < 1e-12);
    }

    #[test]
    fn update_flags_divergence_instead_of_continuing() {
        let mut t = table(1, 2, 1, 2);
        let state = GridState::new(0, 0);
        let next = GridState::new(0, 1);

        // Force an inverted quantile estimate; the next step must refuse it.
        let i0 = t.index(state, 0);
        t.q[i0].v = vec![5.0, -5.0];
        let result = t.update(state, 0, next, 0.0);
        assert!(matches!(
            result,
            Err(CvarqError::MonotonicityViolation { .. })
        ));
    }
}
