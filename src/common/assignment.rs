use super::{Literal, Model, Variable};

/// Which layer of the search put a value into the assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Chosen by branching.
    Decision,
    /// Forced by unit propagation.
    Propagated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Assigned {
    value: bool,
    reason: Reason,
}

/// A position in the trace of an assignment. Rolling back to it undoes every
/// assignment made after it was taken.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rollback {
    len: usize,
}

/// Truth values of the variables `1..=num_vars` together with the order in
/// which they were assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    // slot 0 is never used so variables can index directly
    values: Vec<Option<Assigned>>,
    trace: Vec<Variable>,
}

impl Assignment {
    /// Create an assignment for `num_vars` variables, all unassigned.
    pub fn new(num_vars: usize) -> Self {
        Assignment {
            values: vec![None; num_vars + 1],
            trace: Vec::with_capacity(num_vars),
        }
    }

    pub fn num_vars(&self) -> usize {
        self.values.len() - 1
    }

    pub fn value_of(&self, variable: Variable) -> Option<bool> {
        self.values[variable.index()].map(|a| a.value)
    }

    pub fn reason_of(&self, variable: Variable) -> Option<Reason> {
        self.values[variable.index()].map(|a| a.reason)
    }

    /// The truth value of a literal, None if its variable is unassigned.
    pub fn literal_value(&self, literal: Literal) -> Option<bool> {
        self.value_of(literal.variable())
            .map(|value| value == literal.is_positive())
    }

    pub fn is_true(&self, literal: Literal) -> bool {
        self.literal_value(literal) == Some(true)
    }

    pub fn is_false(&self, literal: Literal) -> bool {
        self.literal_value(literal) == Some(false)
    }

    /// Make the literal true. Assigning a literal that is already true keeps the layer it was
    /// first assigned on. Panics if the literal is currently false.
    pub fn assign(&mut self, literal: Literal, reason: Reason) {
        let variable = literal.variable();
        let value = literal.is_positive();
        match self.values[variable.index()] {
            Some(current) => assert!(
                current.value == value,
                "{} is already assigned {}",
                variable,
                current.value
            ),
            None => {
                self.values[variable.index()] = Some(Assigned { value, reason });
                self.trace.push(variable);
            }
        }
    }

    /// Reset a single variable. Usually this is the most recently assigned one, in which case the
    /// trace just shrinks by one.
    pub fn unassign(&mut self, variable: Variable) {
        if self.values[variable.index()].take().is_none() {
            return;
        }
        if self.trace.last() == Some(&variable) {
            self.trace.pop();
        } else if let Some(pos) = self.trace.iter().rposition(|&v| v == variable) {
            self.trace.remove(pos);
        }
    }

    pub fn rollback_point(&self) -> Rollback {
        Rollback {
            len: self.trace.len(),
        }
    }

    pub fn rollback(&mut self, rollback_point: Rollback) {
        if rollback_point.len >= self.trace.len() {
            return;
        }
        for variable in self.trace.split_off(rollback_point.len) {
            self.values[variable.index()] = None;
        }
    }

    /// Unassign every variable.
    pub fn reset(&mut self) {
        self.rollback(Rollback { len: 0 });
    }

    pub fn num_assigned(&self) -> usize {
        self.trace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.trace.len() == self.num_vars()
    }

    /// Variables in the order they were assigned.
    pub fn trace(&self) -> impl Iterator<Item = Variable> + '_ {
        self.trace.iter().copied()
    }

    /// Unassigned variables in ascending order.
    pub fn unassigned(&self) -> impl Iterator<Item = Variable> + '_ {
        self.values
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, value)| value.is_none())
            .map(|(index, _)| Variable::from_index(index))
    }

    /// The total assignment, if every variable has a value.
    pub fn model(&self) -> Option<Model> {
        self.values[1..]
            .iter()
            .map(|value| value.map(|a| a.value))
            .collect::<Option<Vec<_>>>()
            .map(Model::new)
    }
}
