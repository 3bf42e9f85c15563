//! Learning Algorithms
//!
//! Tabular CVaR Q-learning over a dense state-action table.

mod cvar_q;

pub use cvar_q::ActionValueFunction;
