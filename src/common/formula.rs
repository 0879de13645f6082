use std::{collections::BTreeSet, fmt::Display, ops::Range};

use itertools::Itertools;

use super::Literal;
use crate::error::FormulaError;

/// A CNF formula. All literals live in one flat vector and each clause is a range into it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Formula {
    num_vars: usize,
    literals: Vec<Literal>,
    ranges: Vec<Range<usize>>,
}

impl Formula {
    /// Build a formula from raw DIMACS style clauses. Duplicate literals inside a clause are
    /// collapsed.
    pub fn from_clauses<I, C>(num_vars: usize, clauses: I) -> Result<Self, FormulaError>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = i32>,
    {
        let mut builder = Builder::new(num_vars)?;
        for clause in clauses {
            let clause = clause
                .into_iter()
                .map(|raw| Literal::new_checked(raw).ok_or(FormulaError::ZeroLiteral))
                .collect::<Result<BTreeSet<_>, _>>()?;
            builder.add_clause(clause)?;
        }
        Ok(builder.finish())
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    // how many clauses are in the formula?
    pub fn number_of_clauses(&self) -> usize {
        self.ranges.len()
    }

    /// Get the literals of the nth clause
    pub fn clause(&self, index: usize) -> &[Literal] {
        &self.literals[self.ranges[index].clone()]
    }

    pub fn clauses(&self) -> impl Iterator<Item = &[Literal]> + '_ {
        self.ranges
            .iter()
            .map(|range| &self.literals[range.start..range.end])
    }

    /// Reorder the clauses by the largest variable they mention, smallest first. Clauses over
    /// low variables are then checked first, which helps when those are decided early.
    pub fn sort_by_max_variable(&mut self) {
        let literals = &self.literals;
        self.ranges.sort_by_key(|range| {
            literals[range.clone()]
                .iter()
                .map(|lit| lit.variable())
                .max()
        });
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.clauses()
                .map(|clause| format!("({})", clause.iter().join(" ")))
                .join(" ")
        )
    }
}

/// Validating constructor for formulas.
#[derive(Debug)]
pub struct Builder {
    formula: Formula,
}

impl Builder {
    pub fn new(num_vars: usize) -> Result<Self, FormulaError> {
        if num_vars > i32::MAX as usize {
            return Err(FormulaError::TooManyVariables(num_vars));
        }
        Ok(Builder {
            formula: Formula {
                num_vars,
                ..Formula::default()
            },
        })
    }

    /// Add a new clause to the formula containing the specified literals.
    pub fn add_clause(&mut self, clause: BTreeSet<Literal>) -> Result<(), FormulaError> {
        let num_vars = self.formula.num_vars;
        if let Some(&literal) = clause
            .iter()
            .find(|lit| lit.variable().index() > num_vars)
        {
            return Err(FormulaError::VariableOutOfRange { literal, num_vars });
        }

        let start = self.formula.literals.len();
        self.formula.literals.extend(clause);
        let end = self.formula.literals.len();
        self.formula.ranges.push(start..end);
        Ok(())
    }

    pub fn number_of_clauses(&self) -> usize {
        self.formula.number_of_clauses()
    }

    pub fn finish(self) -> Formula {
        self.formula
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(clause: &[Literal]) -> Vec<i32> {
        clause.iter().map(Literal::raw).collect()
    }

    #[test]
    fn duplicate_literals_collapse() {
        let formula = Formula::from_clauses(2, [vec![1, 1, 2], vec![-2, -2]]).unwrap();
        assert_eq!(formula.number_of_clauses(), 2);
        assert_eq!(raw(formula.clause(0)), vec![1, 2]);
        assert_eq!(raw(formula.clause(1)), vec![-2]);
    }

    #[test]
    fn keeps_empty_clauses() {
        let formula = Formula::from_clauses(1, [vec![], vec![1]]).unwrap();
        assert_eq!(formula.number_of_clauses(), 2);
        assert!(formula.clause(0).is_empty());
    }

    #[test]
    fn rejects_malformed_literals() {
        assert_eq!(
            Formula::from_clauses(2, [vec![1, 0]]),
            Err(FormulaError::ZeroLiteral)
        );
        assert_eq!(
            Formula::from_clauses(2, [vec![1, -3]]),
            Err(FormulaError::VariableOutOfRange {
                literal: Literal::from(-3),
                num_vars: 2
            })
        );
        assert!(matches!(
            Builder::new(usize::MAX),
            Err(FormulaError::TooManyVariables(_))
        ));
    }

    #[test]
    fn sorts_by_largest_variable() {
        let mut formula =
            Formula::from_clauses(9, [vec![3, -5, 2], vec![1, 9, -4], vec![6, -3, 8], vec![7, 2]])
                .unwrap();
        formula.sort_by_max_variable();
        let order = formula.clauses().map(raw).collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                vec![-5, 2, 3],
                vec![2, 7],
                vec![-3, 6, 8],
                vec![-4, 1, 9]
            ]
        );
    }

    #[test]
    fn display_lists_clauses() {
        let formula = Formula::from_clauses(2, [vec![1, -2], vec![2]]).unwrap();
        assert_eq!(formula.to_string(), "(-2 1) (2)");
    }
}
