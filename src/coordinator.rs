//! Races the strategies against each other on one level.
//!
//! One OS thread per enabled strategy, each with its own deep copy of
//! the initial board; nothing mutable is shared. Workers report through
//! a channel and are cancelled cooperatively (a shared flag polled at
//! every expansion) once enough solutions have arrived. A worker panic
//! is contained, logged, and counted as "no solution" — it never takes
//! its peers down.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::unbounded;

use crate::engine::Board;
use crate::solver::{
    solve_a_star, solve_bfs, solve_dfs, solve_enhanced_a_star, solve_greedy, solve_ida_star,
    solve_mcts, SearchContext,
};

/// The search strategies the coordinator can race.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Dfs,
    Bfs,
    Greedy,
    AStar,
    EnhancedAStar,
    IdaStar,
    Mcts,
}

impl Strategy {
    pub const ALL: [Strategy; 7] = [
        Strategy::Dfs,
        Strategy::Bfs,
        Strategy::Greedy,
        Strategy::AStar,
        Strategy::EnhancedAStar,
        Strategy::IdaStar,
        Strategy::Mcts,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Dfs => "dfs",
            Strategy::Bfs => "bfs",
            Strategy::Greedy => "greedy",
            Strategy::AStar => "a*",
            Strategy::EnhancedAStar => "enhanced-a*",
            Strategy::IdaStar => "ida*",
            Strategy::Mcts => "mcts",
        }
    }

    /// Looks a strategy up by its CLI name.
    pub fn from_name(name: &str) -> Option<Strategy> {
        Strategy::ALL.iter().copied().find(|s| s.name() == name)
    }

    fn run(&self, board: &Board, config: &RaceConfig, cancel: Arc<AtomicBool>) -> Option<Board> {
        let ctx = SearchContext::new(config.max_steps, config.max_queue).with_cancel(cancel);
        match self {
            Strategy::Dfs => solve_dfs(board, &ctx),
            Strategy::Bfs => solve_bfs(board, &ctx),
            Strategy::Greedy => solve_greedy(board, &ctx),
            Strategy::AStar => solve_a_star(board, &ctx),
            Strategy::EnhancedAStar => solve_enhanced_a_star(board, &ctx),
            // The open-ended strategies also get a wall-clock deadline.
            Strategy::IdaStar => solve_ida_star(board, &ctx.with_deadline(config.timeout)),
            Strategy::Mcts => {
                solve_mcts(board, &ctx.with_deadline(config.timeout), config.mcts_seed)
            }
        }
    }
}

/// Budgets and strategy selection for one race.
#[derive(Clone, Debug)]
pub struct RaceConfig {
    pub strategies: Vec<Strategy>,
    /// Depth budget per strategy.
    pub max_steps: u32,
    /// Frontier cap for the queue-based strategies.
    pub max_queue: usize,
    /// Self-termination deadline for IDA* and MCTS.
    pub timeout: Duration,
    /// Stop the race once this many solved boards have arrived.
    pub solutions_wanted: usize,
    pub mcts_seed: u64,
}

impl Default for RaceConfig {
    fn default() -> Self {
        RaceConfig {
            strategies: Strategy::ALL.to_vec(),
            max_steps: 40,
            max_queue: 100_000,
            timeout: Duration::from_secs(60),
            solutions_wanted: 2,
            mcts_seed: 514_514,
        }
    }
}

struct WorkerReport {
    strategy: Strategy,
    result: Option<Board>,
    panic: Option<String>,
}

/// Runs every configured strategy concurrently and collects up to
/// `solutions_wanted` solved boards.
///
/// Result order is arrival order and therefore nondeterministic; use
/// [`pick_best`] (or [`solve_best`]) for the shortest answer. Returns an
/// empty vector when no strategy solved the board.
pub fn race(initial: &Board, config: &RaceConfig) -> Vec<Board> {
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = unbounded();

    let mut workers = Vec::with_capacity(config.strategies.len());
    for &strategy in &config.strategies {
        let board = initial.clone();
        let config = config.clone();
        let cancel = Arc::clone(&cancel);
        let tx = tx.clone();
        workers.push(thread::spawn(move || {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| strategy.run(&board, &config, cancel)));
            let report = match outcome {
                Ok(result) => WorkerReport {
                    strategy,
                    result,
                    panic: None,
                },
                Err(payload) => WorkerReport {
                    strategy,
                    result: None,
                    panic: Some(panic_message(payload)),
                },
            };
            // The coordinator may have stopped listening already.
            let _ = tx.send(report);
        }));
    }
    drop(tx);

    let mut solved = Vec::new();
    for report in &rx {
        let name = report.strategy.name();
        if let Some(message) = report.panic {
            tracing::error!(strategy = name, message = %message, "worker crashed");
            continue;
        }
        match report.result {
            Some(board) if board.is_solved() => {
                tracing::info!(strategy = name, moves = board.moves().len(), "worker solved");
                solved.push(board);
            }
            Some(_) => tracing::info!(strategy = name, "worker returned an unsolved board"),
            None => tracing::info!(strategy = name, "worker found no solution"),
        }
        if solved.len() >= config.solutions_wanted {
            tracing::debug!(collected = solved.len(), "enough solutions, cancelling peers");
            cancel.store(true, std::sync::atomic::Ordering::Relaxed);
            break;
        }
    }

    for worker in workers {
        let _ = worker.join();
    }
    solved
}

/// Shortest solution by move count.
pub fn pick_best(solutions: Vec<Board>) -> Option<Board> {
    solutions.into_iter().min_by_key(|b| b.moves().len())
}

/// Convenience wrapper: race everything, return the shortest solution.
pub fn solve_best(initial: &Board, config: &RaceConfig) -> Option<Board> {
    pick_best(race(initial, config))
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Board;

    fn board(colors: &[&str], modifiers: &[&str]) -> Board {
        Board::from_strings(&colors.join(" "), &modifiers.join(" ")).unwrap()
    }

    fn quick_config() -> RaceConfig {
        RaceConfig {
            max_steps: 6,
            max_queue: 1_000,
            timeout: Duration::from_secs(5),
            ..RaceConfig::default()
        }
    }

    #[test]
    fn race_collects_at_most_k_solutions() {
        let initial = board(&["ggg", "ggg", "ggg"], &["000", "0B0", "000"]);
        let config = RaceConfig {
            solutions_wanted: 2,
            ..quick_config()
        };
        let solutions = race(&initial, &config);
        assert!(!solutions.is_empty());
        assert!(solutions.len() <= 2);
        for solution in &solutions {
            assert!(solution.is_solved());
        }
    }

    #[test]
    fn solve_best_returns_minimum_move_count() {
        // Bomb solves in one; the rotor path needs two.
        let initial = board(&["gg", "gg"], &["w0", "0B"]);
        let config = RaceConfig {
            solutions_wanted: 4,
            ..quick_config()
        };
        let best = solve_best(&initial, &config).unwrap();
        assert_eq!(best.moves().len(), 1);
        assert_eq!(best.moves().to_string(), "B2");
    }

    #[test]
    fn solved_boards_replay_on_the_original() {
        let initial = board(&["rr", "rr", "r0"], &["00", "00", "F0"]);
        let solutions = race(&initial, &quick_config());
        assert!(!solutions.is_empty());
        for solution in solutions {
            let mut replayed = initial.clone();
            for mv in solution.moves().as_slice() {
                assert!(replayed.apply_click(mv.row as usize, mv.col as usize));
            }
            assert_eq!(replayed, solution);
            assert!(replayed.is_solved());
        }
    }

    #[test]
    fn race_returns_empty_when_unsolvable() {
        let initial = board(&["rg"], &["R0"]);
        let config = RaceConfig {
            // Only the bounded strategies; no point waiting on timeouts.
            strategies: vec![Strategy::Dfs, Strategy::Bfs, Strategy::AStar],
            ..quick_config()
        };
        assert!(race(&initial, &config).is_empty());
    }

    #[test]
    fn pick_best_prefers_fewest_moves() {
        let base = board(&["gg", "gg"], &["w0", "0B"]);

        let mut one_click = base.clone();
        assert!(one_click.apply_click(1, 1));
        assert!(one_click.is_solved());

        let mut three_clicks = base.clone();
        assert!(three_clicks.apply_click(0, 0));
        assert!(three_clicks.apply_click(0, 0));
        assert!(three_clicks.apply_click(1, 1));
        assert!(three_clicks.is_solved());

        let best = pick_best(vec![three_clicks, one_click]).unwrap();
        assert_eq!(best.moves().len(), 1);
    }

    #[test]
    fn pick_best_of_nothing_is_none() {
        assert!(pick_best(Vec::new()).is_none());
    }

    #[test]
    fn strategy_names_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(Strategy::from_name(strategy.name()), Some(strategy));
        }
        assert_eq!(Strategy::from_name("nope"), None);
    }
}
