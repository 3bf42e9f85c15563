//! Value Distribution
//!
//! Per-(state, action) risk-aware value distribution: quantile estimates
//! and scaled CVaR estimates, one per atom. A pure data holder plus query
//! methods; all mutation goes through the action-value table.

use serde::{Deserialize, Serialize};

use super::atoms::AtomGrid;
use super::cvar;
use crate::error::{CvarqError, Result};

/// Risk-aware value distribution for one state-action pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDistribution {
    /// Quantile (value-at-risk) estimates, one per atom interval.
    /// Non-decreasing when the estimate is healthy.
    pub(crate) v: Vec<f64>,
    /// Scaled CVaR estimates, `CVaR(atom) * atom`, anchored at yc(0) = 0
    pub(crate) yc: Vec<f64>,
}

impl ValueDistribution {
    /// Create a zero-initialized distribution over `nb_atoms` buckets
    pub fn zeros(nb_atoms: usize) -> Self {
        Self {
            v: vec![0.0; nb_atoms],
            yc: vec![0.0; nb_atoms],
        }
    }

    /// Quantile estimates
    pub fn var(&self) -> &[f64] {
        &self.v
    }

    /// Scaled CVaR estimates
    pub fn yc(&self) -> &[f64] {
        &self.yc
    }

    /// Probability-weighted mean of the yc-derived quantile sequence
    ///
    /// This is the mean of the approximated distribution, not a stored
    /// field.
    pub fn expected_value(&self, grid: &AtomGrid) -> f64 {
        let var = cvar::yc_to_var(grid, &self.yc);
        grid.masses().iter().zip(&var).map(|(m, v)| m * v).sum()
    }

    /// Linear interpolation of the scaled CVaR curve at risk level `alpha`
    ///
    /// Piecewise-linear between the stored anchor points, with the first
    /// segment anchored at (0, 0). Fails with InvalidArgument for alpha
    /// outside (0, 1).
    pub fn yc_alpha(&self, grid: &AtomGrid, alpha: f64) -> Result<f64> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(CvarqError::InvalidArgument(format!(
                "risk level must be in (0, 1), got {alpha}"
            )));
        }

        let atoms = grid.breakpoints();
        let mut i = 1;
        for j in 1..atoms.len() {
            i = j;
            if alpha < atoms[j] {
                break;
            }
        }

        let portion = (alpha - atoms[i - 1]) / (atoms[i] - atoms[i - 1]);
        if i == 1 {
            // between 0 and the first upper breakpoint
            Ok(portion * self.yc[0])
        } else {
            Ok(self.yc[i - 2] + portion * (self.yc[i - 1] - self.yc[i - 2]))
        }
    }

    /// Lower partial expectation `E[(V - s)^-]`
    ///
    /// Sums `mass[i] * (v[i] - s)` over the leading atoms whose value lies
    /// below `s`, stopping at the first atom at or above `s`. Relies on `v`
    /// being sorted; on an unsorted estimate the result is approximate.
    pub fn e_min_s(&self, grid: &AtomGrid, s: f64) -> f64 {
        let mut e_min = 0.0;
        for (&mass, &v) in grid.masses().iter().zip(&self.v) {
            if v < s {
                e_min += mass * (v - s);
            } else {
                break;
            }
        }
        e_min
    }

    /// Quantile function implied by the stored CVaR curve
    pub fn var_from_yc(&self, grid: &AtomGrid) -> Vec<f64> {
        cvar::yc_to_var(grid, &self.yc)
    }
}
