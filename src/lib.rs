//! A DPLL SAT solver: unit propagation to a fixpoint, branching on the most frequent unassigned
//! variable and chronological backtracking.

pub mod common;
pub mod error;
pub mod parser;
pub mod propagator;
pub mod search;

pub use common::{Formula, Literal, Model, Variable};
pub use search::{solve, Solver, Stats, Verdict};
