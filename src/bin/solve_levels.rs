//! Batch solver: iterates a level file, races the strategies on each
//! level, and writes improved solutions back into the file.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;

use chroma_solver::coordinator::{pick_best, race, RaceConfig, Strategy};
use chroma_solver::level::{parse_levels, render_levels, Level};
use chroma_solver::utils::validate_existing_solution;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the levels XML file
    levels_file: PathBuf,

    /// Level selector: an index like "7", or "7+" for that level onward.
    /// All levels when omitted.
    level: Option<String>,

    /// Depth budget per strategy
    #[clap(long, default_value_t = 40)]
    max_steps: u32,

    /// Frontier cap for the queue-based strategies
    #[clap(long, default_value_t = 100_000)]
    queue_size: usize,

    /// Wall-clock budget (seconds) for IDA* and MCTS
    #[clap(long, default_value_t = 60)]
    timeout: u64,

    /// Stop a level's race after this many solutions
    #[clap(long, default_value_t = 2)]
    solutions: usize,

    /// Seed for the MCTS rollouts
    #[clap(long, default_value_t = 514_514)]
    seed: u64,

    /// Comma-separated strategy names (dfs,bfs,greedy,a*,enhanced-a*,
    /// ida*,mcts); all of them when omitted
    #[clap(long)]
    strategies: Option<String>,

    /// Solve without writing the improved solutions back
    #[clap(long)]
    dry_run: bool,
}

/// Which levels of the file to visit.
enum Selector {
    All,
    Single(usize),
    From(usize),
}

impl Selector {
    fn parse(arg: Option<&str>) -> anyhow::Result<Self> {
        match arg {
            None => Ok(Selector::All),
            Some(text) => {
                if let Some(start) = text.strip_suffix('+') {
                    Ok(Selector::From(start.parse().context("bad level range")?))
                } else {
                    Ok(Selector::Single(text.parse().context("bad level index")?))
                }
            }
        }
    }

    fn includes(&self, index: usize) -> bool {
        match self {
            Selector::All => true,
            Selector::Single(n) => index == *n,
            Selector::From(n) => index >= *n,
        }
    }
}

fn build_config(args: &Args) -> anyhow::Result<RaceConfig> {
    let strategies = match &args.strategies {
        None => Strategy::ALL.to_vec(),
        Some(list) => {
            let mut chosen = Vec::new();
            for name in list.split(',') {
                let name = name.trim();
                match Strategy::from_name(name) {
                    Some(strategy) => chosen.push(strategy),
                    None => bail!("unknown strategy '{name}'"),
                }
            }
            if chosen.is_empty() {
                bail!("no strategies selected");
            }
            chosen
        }
    };
    Ok(RaceConfig {
        strategies,
        max_steps: args.max_steps,
        max_queue: args.queue_size,
        timeout: Duration::from_secs(args.timeout),
        solutions_wanted: args.solutions,
        mcts_seed: args.seed,
    })
}

fn solve_level(index: usize, level: &mut Level, config: &RaceConfig) -> bool {
    let board = match level.to_board() {
        Ok(board) => board,
        Err(error) => {
            tracing::warn!(index, %error, "skipping malformed level");
            return false;
        }
    };
    println!(
        "\nLevel {index} ({}x{}{})",
        board.rows(),
        board.cols(),
        if board.has_bombs() { ", bombs" } else { "" }
    );

    let existing = level
        .solution()
        .and_then(|solution| validate_existing_solution(&board, solution));
    match &existing {
        Some(replayed) => println!("# existing solution valid ({} moves)", replayed.moves().len()),
        None if level.solution().is_some() => println!("# existing solution INVALID"),
        None => {}
    }

    let new_best = pick_best(race(&board, config));

    let chosen = match (new_best, existing) {
        (Some(new), Some(old)) => {
            if new.moves().len() < old.moves().len() {
                println!("# new solution is better");
                new
            } else {
                println!("# keeping existing solution");
                old
            }
        }
        (Some(new), None) => {
            println!("# using new solution");
            new
        }
        (None, Some(old)) => {
            println!("# solver failed, keeping existing solution");
            old
        }
        (None, None) => {
            println!("# no solution found");
            return false;
        }
    };

    println!("Solution: {}", chosen.moves());
    println!("{chosen}");

    let rendered = chosen.moves().to_string();
    if level.solution() != Some(rendered.as_str()) {
        level.set_solution(&rendered);
        return true;
    }
    false
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let selector = Selector::parse(args.level.as_deref())?;
    let config = build_config(&args)?;

    let xml = fs::read_to_string(&args.levels_file)
        .with_context(|| format!("reading {}", args.levels_file.display()))?;
    let mut levels = parse_levels(&xml)?;
    println!("Parsed {} levels", levels.len());

    for index in 0..levels.len() {
        if !selector.includes(index) {
            continue;
        }
        let improved = solve_level(index, &mut levels[index], &config);
        if improved && !args.dry_run {
            fs::write(&args.levels_file, render_levels(&levels))
                .with_context(|| format!("writing {}", args.levels_file.display()))?;
            tracing::info!(index, "solution written back");
        }
    }
    Ok(())
}
