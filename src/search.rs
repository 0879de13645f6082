//! Chronological backtracking search.
//!
//! Every node of the search tree propagates first and then either reports a conflict, a complete
//! assignment or a variable to branch on. Branches try `true` before `false`. Instead of
//! recursing, the open nodes live on an explicit stack of frames so deep instances do not
//! exhaust the native stack. A frame remembers where the trace stood when the node was entered;
//! rolling back to that point undoes both its propagation and its decisions.

use std::fmt::Display;

use indicatif::ProgressBar;
use tracing::{debug, info, trace};

use crate::common::{Assignment, Formula, Model, Reason, Rollback, Variable};
use crate::propagator::{Propagator, Saturation};

/// The end result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The model satisfies every clause of the formula.
    Satisfiable(Model),
    /// No assignment satisfies the formula.
    Unsatisfiable,
}

impl Verdict {
    pub fn is_sat(&self) -> bool {
        matches!(self, Verdict::Satisfiable(_))
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            Verdict::Satisfiable(model) => Some(model),
            Verdict::Unsatisfiable => None,
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Satisfiable(_) => write!(f, "SAT"),
            Verdict::Unsatisfiable => write!(f, "UNSAT"),
        }
    }
}

/// Counters collected during a search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub decisions: u64,
    pub conflicts: u64,
    pub propagations: u64,
    pub max_depth: usize,
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} decisions, {} conflicts, {} propagations, depth {}",
            self.decisions, self.conflicts, self.propagations, self.max_depth
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Positive,
    Negative,
}

/// An open node of the search tree that has branched on `variable`.
#[derive(Debug)]
struct Frame {
    /// Trace position before the node propagated.
    entry: Rollback,
    variable: Variable,
    phase: Phase,
}

pub struct Solver<'a> {
    formula: &'a Formula,
    assignment: Assignment,
    propagator: Propagator,
    stats: Stats,
    progress: ProgressBar,
}

impl<'a> Solver<'a> {
    pub fn new(formula: &'a Formula) -> Self {
        Solver {
            formula,
            assignment: Assignment::new(formula.num_vars()),
            propagator: Propagator::new(formula),
            stats: Stats::default(),
            progress: ProgressBar::hidden(),
        }
    }

    /// Report decisions to the given progress bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn stats(&self) -> Stats {
        Stats {
            propagations: self.propagator.propagations(),
            ..self.stats
        }
    }

    /// The current assignment. After an unsatisfiable search every variable is unassigned again.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Decide the formula. The search starts from scratch on every call.
    pub fn solve(&mut self) -> Verdict {
        info!(
            "solving {} clauses over {} variables",
            self.formula.number_of_clauses(),
            self.formula.num_vars()
        );
        self.assignment.reset();
        self.propagator.reset_propagations();
        self.stats = Stats::default();
        self.progress.reset();

        let verdict = self.search();

        self.progress.finish_and_clear();
        info!("{}: {}", verdict, self.stats());
        verdict
    }

    fn search(&mut self) -> Verdict {
        let mut frames: Vec<Frame> = Vec::new();

        loop {
            // entering a node
            let entry = self.assignment.rollback_point();
            match self.propagator.propagate(self.formula, &mut self.assignment) {
                Ok(Saturation::Complete) => {
                    let Some(model) = self.assignment.model() else {
                        unreachable!("propagation reported a partial assignment as complete")
                    };
                    return Verdict::Satisfiable(model);
                }
                Ok(Saturation::Branch(variable)) => {
                    frames.push(Frame {
                        entry,
                        variable,
                        phase: Phase::Positive,
                    });
                    self.decide(variable, true, frames.len());
                }
                Err(_) => {
                    self.stats.conflicts += 1;
                    self.assignment.rollback(entry);
                    trace!("conflict at depth {}", frames.len());
                    if !self.backtrack(&mut frames) {
                        return Verdict::Unsatisfiable;
                    }
                }
            }
        }
    }

    /// Undo failed branches until a node still has its negative branch to try and take it.
    /// Returns false once the root node is exhausted.
    fn backtrack(&mut self, frames: &mut Vec<Frame>) -> bool {
        while let Some(frame) = frames.last_mut() {
            self.assignment.unassign(frame.variable);
            match frame.phase {
                Phase::Positive => {
                    frame.phase = Phase::Negative;
                    let variable = frame.variable;
                    self.decide(variable, false, frames.len());
                    return true;
                }
                Phase::Negative => {
                    debug!("both branches on {} failed", frame.variable);
                    self.assignment.rollback(frame.entry);
                    frames.pop();
                }
            }
        }
        false
    }

    fn decide(&mut self, variable: Variable, value: bool, depth: usize) {
        trace!("deciding {} = {} at depth {}", variable, value, depth);
        self.assignment
            .assign(variable.literal(value), Reason::Decision);
        self.stats.decisions += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        self.progress.inc(1);
        if self.stats.decisions % 4096 == 0 {
            self.progress
                .set_message(format!("{} conflicts", self.stats.conflicts));
        }
    }
}

/// Decide the formula with a fresh solver.
pub fn solve(formula: &Formula) -> Verdict {
    Solver::new(formula).solve()
}
