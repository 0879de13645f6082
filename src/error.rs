//! Errors raised while building a formula.

use thiserror::Error;

use crate::common::Literal;

/// Input that does not describe a well-formed CNF instance.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormulaError {
    /// A clause contained the literal 0.
    #[error("literal 0 is not allowed inside a clause")]
    ZeroLiteral,

    /// A literal refers to a variable beyond the declared count.
    #[error("literal {literal} is out of range for {num_vars} variables")]
    VariableOutOfRange { literal: Literal, num_vars: usize },

    /// Literals are 32 bit signed integers, so larger counts cannot be addressed.
    #[error("{0} variables exceed the supported maximum")]
    TooManyVariables(usize),
}
