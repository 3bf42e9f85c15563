//! Atom Spacing
//!
//! Fixed discretization of the [0, 1] risk axis. Log spacing packs the
//! atoms toward 0 so the loss tail is resolved finely.

use crate::config::AtomConfig;
use crate::error::{CvarqError, Result};

/// Fixed grid of probability thresholds and their masses
///
/// `K + 1` strictly increasing breakpoints covering [0, 1], first 0 and
/// last 1. The `K` masses are the consecutive differences; they are
/// non-negative and sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomGrid {
    breakpoints: Vec<f64>,
    masses: Vec<f64>,
}

impl AtomGrid {
    /// Build the atom grid described by `config`
    pub fn new(config: &AtomConfig) -> Result<Self> {
        let k = config.nb_atoms;
        if k < 1 {
            return Err(CvarqError::InvalidArgument(
                "atom count must be at least 1".to_string(),
            ));
        }

        let breakpoints = if config.log_spacing {
            if config.spacing <= 1 {
                return Err(CvarqError::InvalidArgument(format!(
                    "log spacing requires an exponent above 1, got {}",
                    config.spacing
                )));
            }
            let spacing = f64::from(config.spacing);
            let mut atoms = Vec::with_capacity(k + 1);
            atoms.push(0.0);
            // spacing^(i - K) for i = 1..=K, ending exactly at spacing^0 = 1
            for i in 1..=k {
                atoms.push(spacing.powi(i as i32 - k as i32));
            }
            atoms
        } else {
            (0..=k).map(|i| i as f64 / k as f64).collect()
        };

        let masses = breakpoints.windows(2).map(|w| w[1] - w[0]).collect();

        Ok(Self {
            breakpoints,
            masses,
        })
    }

    /// Number of atoms (probability buckets)
    pub fn nb_atoms(&self) -> usize {
        self.masses.len()
    }

    /// All `K + 1` breakpoints, including 0 and 1
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// The `K` upper breakpoints, i.e. everything past the leading 0
    ///
    /// These are the levels the update rule nudges against.
    pub fn upper(&self) -> &[f64] {
        &self.breakpoints[1..]
    }

    /// Probability mass of each bucket
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(nb_atoms: usize, spacing: u32, log_spacing: bool) -> Result<AtomGrid> {
        AtomGrid::new(&AtomConfig {
            nb_atoms,
            spacing,
            log_spacing,
        })
    }

    #[test]
    fn linear_atoms_are_evenly_spaced() {
        let g = grid(4, 2, false).unwrap();
        assert_eq!(g.breakpoints(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(g.masses(), &[0.25, 0.25, 0.25, 0.25]);
    }

    #[test]
    fn log_atoms_are_denser_near_zero() {
        let g = grid(3, 2, true).unwrap();
        assert_eq!(g.breakpoints(), &[0.0, 0.25, 0.5, 1.0]);
        assert_eq!(g.masses(), &[0.25, 0.25, 0.5]);
    }

    #[test]
    fn masses_sum_to_one_for_all_valid_configs() {
        for &(k, spacing, log) in &[
            (1, 2, false),
            (4, 2, false),
            (16, 2, false),
            (3, 2, true),
            (8, 3, true),
        ] {
            let g = grid(k, spacing, log).unwrap();
            let total: f64 = g.masses().iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "masses sum to {total}");
            assert!(g.masses().iter().all(|&m| m >= 0.0));
            assert!(g
                .breakpoints()
                .windows(2)
                .all(|w| w[1] > w[0]));
        }
    }

    #[test]
    fn rejects_zero_atoms() {
        assert!(matches!(
            grid(0, 2, false),
            Err(CvarqError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_degenerate_log_spacing() {
        assert!(matches!(
            grid(4, 1, true),
            Err(CvarqError::InvalidArgument(_))
        ));
    }
}
