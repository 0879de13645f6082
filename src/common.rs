mod assignment;
pub mod formula;
mod literal;
mod model;

pub use assignment::*;
pub use formula::Formula;
pub use literal::*;
pub use model::*;

/// Unit propagation falsified a clause under the current assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Conflict {}
