//! CVaR/Quantile Conversion
//!
//! Pure conversions between a scaled CVaR curve sampled at the atom
//! breakpoints and the piecewise-constant quantile function underneath it.
//! `yc[i]` is `CVaR(atom) * atom` at the i-th upper breakpoint, with the
//! curve implicitly anchored at yc(0) = 0.

use super::atoms::AtomGrid;

/// Recover the quantile function from a scaled CVaR curve
///
/// Finite differencing: `v[i] = (yc[i] - yc[i-1]) / mass[i]`, treating the
/// entry before the first as 0. The output is non-decreasing whenever `yc`
/// is a valid (convex) CVaR curve; no clamping is applied otherwise.
pub fn yc_to_var(grid: &AtomGrid, yc: &[f64]) -> Vec<f64> {
    debug_assert_eq!(yc.len(), grid.nb_atoms());

    let mut var = Vec::with_capacity(yc.len());
    let mut prev = 0.0;
    for (&y, &mass) in yc.iter().zip(grid.masses()) {
        var.push((y - prev) / mass);
        prev = y;
    }
    var
}

/// Rebuild the scaled CVaR curve from a quantile function
///
/// Cumulative sum of `mass[i] * v[i]`; the exact inverse of [`yc_to_var`].
pub fn yc_from_var(grid: &AtomGrid, var: &[f64]) -> Vec<f64> {
    debug_assert_eq!(var.len(), grid.nb_atoms());

    let mut yc = Vec::with_capacity(var.len());
    let mut acc = 0.0;
    for (&v, &mass) in var.iter().zip(grid.masses()) {
        acc += mass * v;
        yc.push(acc);
    }
    yc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AtomConfig;

    fn linear_grid(nb_atoms: usize) -> AtomGrid {
        AtomGrid::new(&AtomConfig {
            nb_atoms,
            spacing: 2,
            log_spacing: false,
        })
        .unwrap()
    }

    #[test]
    fn recovers_quantiles_by_finite_differencing() {
        let grid = linear_grid(2);
        // masses [0.5, 0.5], yc = [0.5, 2.0] -> v = [1, 3]
        let var = yc_to_var(&grid, &[0.5, 2.0]);
        assert_eq!(var, vec![1.0, 3.0]);
    }

    #[test]
    fn conversion_round_trips() {
        let grid = AtomGrid::new(&AtomConfig {
            nb_atoms: 4,
            spacing: 2,
            log_spacing: true,
        })
        .unwrap();

        let yc = vec![-3.0, -2.5, -1.0, 0.5];
        let back = yc_from_var(&grid, &yc_to_var(&grid, &yc));
        for (a, b) in yc.iter().zip(&back) {
            assert!((a - b).abs() < 1e-9, "{a} != {b}");
        }
    }

    #[test]
    fn convex_curve_yields_sorted_quantiles() {
        let grid = linear_grid(4);
        let var = yc_to_var(&grid, &[-2.0, -3.5, -4.0, -3.0]);
        assert!(var.windows(2).all(|w| w[0] <= w[1]), "var = {var:?}");
    }
}
