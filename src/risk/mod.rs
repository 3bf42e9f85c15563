//! Risk-Aware Value Distributions
//!
//! The numerical core: atom grids over the [0, 1] probability axis,
//! CVaR/quantile conversions, and the per-(state, action) value
//! distribution the table learns.

mod atoms;
mod cvar;
mod distribution;

pub use atoms::AtomGrid;
pub use cvar::{yc_from_var, yc_to_var};
pub use distribution::ValueDistribution;
