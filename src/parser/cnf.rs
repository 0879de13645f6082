use std::collections::BTreeSet;

use anyhow::{anyhow, Context, Result};
use fxhash::FxHashSet;
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1},
    sequence::tuple,
    IResult, Parser,
};
use tracing::{debug, info, warn};

use super::{parse_integers, parse_usize};
use crate::common::{formula::Builder, Formula, Literal};

pub struct Header {
    pub vars: usize,
    pub clauses: usize,
}

fn parse_header(input: &str) -> IResult<&str, Header> {
    let (input, _) =
        tuple((multispace0, tag("p"), multispace1, tag("cnf"), multispace1)).parse(input)?;
    let (input, (vars, _, clauses)) =
        tuple((parse_usize, multispace1, parse_usize)).parse(input)?;
    Ok((input, Header { vars, clauses }))
}

/// Collects clauses into the builder and remembers which ones were already seen.
struct Clauses {
    builder: Builder,
    seen: FxHashSet<BTreeSet<Literal>>,
}

impl Clauses {
    fn add(&mut self, clause: BTreeSet<Literal>) -> Result<()> {
        let index = self.builder.number_of_clauses();
        if !self.seen.insert(clause.clone()) {
            warn!("clause {} appears more than once", index + 1);
        }
        self.builder
            .add_clause(clause)
            .with_context(|| format!("invalid clause {}", index + 1))
    }
}

/// Parse a formula in DIMACS CNF format. Clauses end with a 0 and may span several lines. A
/// line starting with `%` ends the input.
pub fn parse(input: &str) -> Result<Formula> {
    debug!("parsing cnf");
    let mut lines = input
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with('c'))
        .take_while(|s| !s.starts_with('%'));

    let header = {
        let line = lines.next().ok_or(anyhow!("empty input"))?;
        let (_, header) =
            parse_header(line).map_err(|_| anyhow!("invalid dimacs header '{}'", line))?;
        info!("{} variables and {} clauses", header.vars, header.clauses);
        header
    };

    let mut clauses = Clauses {
        builder: Builder::new(header.vars)?,
        seen: FxHashSet::default(),
    };
    let mut clause = BTreeSet::new();
    for line in lines {
        let (_, ids) =
            parse_integers(line).map_err(|_| anyhow!("invalid clause line '{}'", line))?;
        for id in ids {
            match Literal::new_checked(id) {
                Some(lit) => {
                    clause.insert(lit);
                }
                None => clauses.add(std::mem::take(&mut clause))?,
            }
        }
    }
    if !clause.is_empty() {
        warn!("last clause is not terminated by 0");
        clauses.add(clause)?;
    }

    let formula = clauses.builder.finish();
    if formula.number_of_clauses() != header.clauses {
        warn!(
            "header announces {} clauses but {} were read",
            header.clauses,
            formula.number_of_clauses()
        );
    }
    Ok(formula)
}
