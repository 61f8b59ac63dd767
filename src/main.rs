use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use snailfish::{solve, Options, Rules, Strategy};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Adds up snailfish homework and finds the best pair to add.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Homework file, one number per line. Reads stdin when absent or `-`.
    path: Option<PathBuf>,

    /// Search pairs on all cores.
    #[arg(long)]
    parallel: bool,

    /// Also print the reduced sum in bracket notation.
    #[arg(long)]
    print_sum: bool,

    /// Pairs nested deeper than this explode.
    #[arg(long, default_value_t = Rules::default().explode_depth)]
    explode_depth: usize,

    /// Leaves at or above this value split.
    #[arg(long, default_value_t = Rules::default().split_threshold)]
    split_threshold: u64,

    /// Give up on a reduction after this many rewrites (0 for no limit).
    #[arg(long, default_value_t = Rules::default().step_limit.unwrap_or(0))]
    step_limit: usize,
}

impl Args {
    fn options(&self) -> Options {
        Options {
            rules: Rules {
                explode_depth: self.explode_depth,
                split_threshold: self.split_threshold,
                step_limit: (self.step_limit > 0).then_some(self.step_limit),
            },
            strategy: if self.parallel {
                Strategy::Parallel
            } else {
                Strategy::Sequential
            },
        }
    }

    fn read_input(&self) -> anyhow::Result<String> {
        match &self.path {
            Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
            _ => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read stdin")?;
                Ok(text)
            }
        }
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing()?;

    let text = args.read_input()?;
    let answers = solve(&text, &args.options()).context("failed to solve homework")?;

    if args.print_sum {
        println!("{}", answers.sum);
    }
    println!("Part 1: {}", answers.sum_magnitude);
    match answers.best_pair {
        Some(pair) => {
            info!(first = pair.left + 1, second = pair.right + 1, "best ordered pair");
            println!("Part 2: {}", pair.magnitude);
        }
        None => println!("Part 2: 0"),
    }

    Ok(())
}
