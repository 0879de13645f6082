use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::ProgressBar;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dpll::{parser, Solver, Verdict};

#[derive(Parser, Debug)]
pub struct Flags {
    #[arg(short, long)]
    /// Show a spinner counting the decisions made during the search.
    progress: bool,
    #[arg(short, long)]
    /// Reorder the clauses by their largest variable before searching.
    sort: bool,
    #[arg(long)]
    /// Check the model against the formula before printing it.
    verify: bool,
    cnf: String,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();
    let flags = Flags::parse();

    let input = std::fs::read_to_string(&flags.cnf)
        .with_context(|| format!("could not read {}", flags.cnf))?;
    let mut formula = parser::cnf::parse(&input)?;
    if flags.sort {
        formula.sort_by_max_variable();
    }

    let progress = if flags.progress {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    } else {
        ProgressBar::hidden()
    };

    let start = Instant::now();
    let mut solver = Solver::new(&formula).with_progress(progress);
    let verdict = solver.solve();
    let elapsed = start.elapsed();

    println!("{}", verdict);
    if let Verdict::Satisfiable(model) = &verdict {
        if flags.verify && !model.satisfies(&formula) {
            bail!("model does not satisfy the formula");
        }
        println!("{}", model);
    }
    println!("elapsed time: {} microsec.", elapsed.as_micros());
    Ok(())
}
