use std::fmt::Display;

use itertools::Itertools;

use super::{Formula, Literal, Variable};

/// A total assignment of truth values to the variables `1..=n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model(Vec<bool>);

impl Model {
    pub fn new(values: Vec<bool>) -> Self {
        Model(values)
    }

    pub fn num_vars(&self) -> usize {
        self.0.len()
    }

    pub fn value(&self, variable: Variable) -> bool {
        self.0[variable.index() - 1]
    }

    /// Values indexed by `variable - 1`.
    pub fn values(&self) -> &[bool] {
        &self.0
    }

    /// One literal per variable, true under this model.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(i, &value)| Variable::from_index(i + 1).literal(value))
    }

    /// Check that every clause of the formula contains a literal that is true under the model.
    pub fn satisfies(&self, formula: &Formula) -> bool {
        formula.clauses().all(|clause| {
            clause
                .iter()
                .any(|&lit| self.value(lit.variable()) == lit.is_positive())
        })
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.literals().join(" "))
    }
}
