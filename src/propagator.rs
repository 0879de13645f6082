use std::cmp::Reverse;

use crate::common::{Assignment, Conflict, Formula, Literal, Reason, Variable};

/// What is left to do once propagation reached its fixpoint without a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saturation {
    /// Every variable has a value and no clause is falsified.
    Complete,
    /// Branch on this variable next.
    Branch(Variable),
}

/// State of a single clause under an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Evaluation {
    Unit(Literal),
    True,
    False,
    Unknown,
}

/// Naive unit propagator. Every pass scans all clauses; while scanning it counts how often each
/// unassigned variable occurs, which is used to pick the branching variable once nothing is
/// forced anymore.
#[derive(Debug, Default)]
pub struct Propagator {
    occurrences: Vec<u32>,
    propagations: u64,
}

impl Propagator {
    pub fn new(formula: &Formula) -> Self {
        Propagator {
            occurrences: vec![0; formula.num_vars() + 1],
            propagations: 0,
        }
    }

    /// Number of literals forced since the propagator was created or last reset.
    pub fn propagations(&self) -> u64 {
        self.propagations
    }

    pub fn reset_propagations(&mut self) {
        self.propagations = 0;
    }

    /// Assign every literal forced by a unit clause until nothing changes. If a clause gets
    /// falsified, the literals forced by this call are rolled back and a conflict is returned.
    pub fn propagate(
        &mut self,
        formula: &Formula,
        assignment: &mut Assignment,
    ) -> Result<Saturation, Conflict> {
        let rollback = assignment.rollback_point();

        loop {
            self.occurrences.clear();
            self.occurrences.resize(formula.num_vars() + 1, 0);
            let mut forced = false;

            for clause in formula.clauses() {
                match self.evaluate(clause, assignment) {
                    Evaluation::False => {
                        tracing::trace!("conflict in clause ({:?})", clause);
                        assignment.rollback(rollback);
                        return Err(Conflict {});
                    }
                    Evaluation::Unit(lit) => {
                        tracing::trace!("propagating unit {}", lit);
                        // later clauses of this pass already see the new value
                        assignment.assign(lit, Reason::Propagated);
                        self.propagations += 1;
                        forced = true;
                    }
                    Evaluation::True | Evaluation::Unknown => {}
                }
            }

            if !forced {
                break;
            }
        }

        Ok(self
            .pick_branch(assignment)
            .map_or(Saturation::Complete, Saturation::Branch))
    }

    /// Evaluate a clause and count its unassigned literals. All literals are visited even if the
    /// clause is already satisfied so that the occurrence counts cover the whole formula.
    fn evaluate(&mut self, clause: &[Literal], assignment: &Assignment) -> Evaluation {
        let mut falsified = 0;
        let mut satisfied = false;
        let mut last_unknown = None;

        for &lit in clause {
            match assignment.literal_value(lit) {
                Some(false) => falsified += 1,
                Some(true) => satisfied = true,
                None => {
                    last_unknown = Some(lit);
                    self.occurrences[lit.variable().index()] += 1;
                }
            }
        }

        if falsified == clause.len() {
            Evaluation::False
        } else if satisfied {
            Evaluation::True
        } else if falsified + 1 == clause.len() {
            // not satisfied and exactly one literal left, so it must be unassigned
            last_unknown.map_or(Evaluation::Unknown, Evaluation::Unit)
        } else {
            Evaluation::Unknown
        }
    }

    /// The unassigned variable occurring most often in the last pass, lowest index first on ties.
    fn pick_branch(&self, assignment: &Assignment) -> Option<Variable> {
        assignment
            .unassigned()
            .min_by_key(|&var| (Reverse(self.occurrences[var.index()]), var))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formula(num_vars: usize, clauses: &[&[i32]]) -> Formula {
        Formula::from_clauses(num_vars, clauses.iter().map(|c| c.iter().copied())).unwrap()
    }

    fn var(index: usize) -> Variable {
        Variable::from_index(index)
    }

    #[test]
    fn unit_clause_is_forced() {
        let formula = formula(1, &[&[1]]);
        let mut assignment = Assignment::new(1);
        let mut propagator = Propagator::new(&formula);

        let result = propagator.propagate(&formula, &mut assignment);
        assert_eq!(result, Ok(Saturation::Complete));
        assert_eq!(assignment.value_of(var(1)), Some(true));
        assert_eq!(assignment.reason_of(var(1)), Some(Reason::Propagated));
        assert_eq!(propagator.propagations(), 1);
    }

    #[test]
    fn contradicting_units_conflict_and_roll_back() {
        let formula = formula(2, &[&[1], &[-1]]);
        let mut assignment = Assignment::new(2);
        let mut propagator = Propagator::new(&formula);

        assert_eq!(
            propagator.propagate(&formula, &mut assignment),
            Err(Conflict {})
        );
        assert!(assignment.is_empty());
    }

    #[test]
    fn conflict_keeps_earlier_assignments() {
        let formula = formula(3, &[&[-1, 2], &[-2, 3], &[-3, -2]]);
        let mut assignment = Assignment::new(3);
        assignment.assign(Literal::from(1), Reason::Decision);
        let before = assignment.clone();

        let mut propagator = Propagator::new(&formula);
        assert!(propagator.propagate(&formula, &mut assignment).is_err());
        assert_eq!(assignment, before);
    }

    #[test]
    fn propagation_chains_across_passes() {
        // the unit on 3 only appears after 2 was forced by 1
        let formula = formula(4, &[&[-2, 3], &[-1, 2], &[1], &[3, 4]]);
        let mut assignment = Assignment::new(4);
        let mut propagator = Propagator::new(&formula);

        let result = propagator.propagate(&formula, &mut assignment);
        assert_eq!(result, Ok(Saturation::Branch(var(4))));
        assert_eq!(assignment.value_of(var(1)), Some(true));
        assert_eq!(assignment.value_of(var(2)), Some(true));
        assert_eq!(assignment.value_of(var(3)), Some(true));
        assert_eq!(assignment.value_of(var(4)), None);
    }

    #[test]
    fn branches_on_most_frequent_variable() {
        let formula = formula(4, &[&[1, 3], &[-3, 4], &[2, 3], &[1, 2, 4]]);
        let mut assignment = Assignment::new(4);
        let mut propagator = Propagator::new(&formula);

        assert_eq!(
            propagator.propagate(&formula, &mut assignment),
            Ok(Saturation::Branch(var(3)))
        );
        assert!(assignment.is_empty());
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        let formula = formula(4, &[&[4, 2], &[-4, -2]]);
        let mut assignment = Assignment::new(4);
        let mut propagator = Propagator::new(&formula);

        assert_eq!(
            propagator.propagate(&formula, &mut assignment),
            Ok(Saturation::Branch(var(2)))
        );
    }

    #[test]
    fn variables_outside_the_clauses_still_need_a_value() {
        let formula = formula(2, &[&[1]]);
        let mut assignment = Assignment::new(2);
        let mut propagator = Propagator::new(&formula);

        assert_eq!(
            propagator.propagate(&formula, &mut assignment),
            Ok(Saturation::Branch(var(2)))
        );
    }

    #[test]
    fn empty_clause_is_a_conflict() {
        let formula = formula(1, &[&[1], &[]]);
        let mut assignment = Assignment::new(1);
        let mut propagator = Propagator::new(&formula);
        assert!(propagator.propagate(&formula, &mut assignment).is_err());
    }

    #[test]
    fn satisfied_clause_is_not_unit() {
        let formula = formula(3, &[&[1, 2, 3]]);
        let mut assignment = Assignment::new(3);
        assignment.assign(Literal::from(1), Reason::Decision);
        assignment.assign(Literal::from(-2), Reason::Decision);
        let mut propagator = Propagator::new(&formula);

        assert_eq!(
            propagator.propagate(&formula, &mut assignment),
            Ok(Saturation::Branch(var(3)))
        );
        assert_eq!(assignment.value_of(var(3)), None);
    }

    #[test]
    fn duplicate_literals_do_not_hide_units() {
        let formula = formula(2, &[&[1, 1, 2], &[-2]]);
        let mut assignment = Assignment::new(2);
        let mut propagator = Propagator::new(&formula);

        assert_eq!(
            propagator.propagate(&formula, &mut assignment),
            Ok(Saturation::Complete)
        );
        assert_eq!(assignment.value_of(var(1)), Some(true));
        assert_eq!(assignment.value_of(var(2)), Some(false));
    }

    #[test]
    fn propagating_at_fixpoint_changes_nothing() {
        let formula = formula(4, &[&[-1, 2], &[1], &[3, 4], &[-3, 4, 2]]);
        let mut assignment = Assignment::new(4);
        let mut propagator = Propagator::new(&formula);

        let first = propagator.propagate(&formula, &mut assignment);
        let after_first = assignment.clone();
        let forced = propagator.propagations();

        let second = propagator.propagate(&formula, &mut assignment);
        assert_eq!(first, second);
        assert_eq!(assignment, after_first);
        assert_eq!(propagator.propagations(), forced);
    }
}
