//! Search strategies over the click-induced state graph.
//!
//! Every strategy takes the initial board by reference, clones its own
//! working copies, and answers with a solved board (carrying the move
//! log that produced it) or `None`. Budgets and cancellation come in
//! through a shared [`SearchContext`]:
//!
//! - `max_steps` bounds solution depth,
//! - `max_queue` bounds frontier memory for the queue-based strategies,
//! - an optional deadline self-terminates IDA* and MCTS,
//! - the cancel token lets the parallel coordinator stop losers.
//!
//! Visited-set keying differs by strategy on purpose: DFS deduplicates
//! on the plain state hash and tracks its best solution globally, while
//! the queue strategies key on `(hash, depth)` so a state reached at a
//! shallower depth may be expanded again. IDA* keeps only the hashes on
//! the current path. Clicks that report no change are never expanded:
//! the move counter advances even for no-ops and would eat into the
//! `max_steps` budget.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::{Board, Position};
use crate::heuristics::{h_enhanced, h_wrong};

/// Shared limits and stop signals for one strategy run.
#[derive(Clone, Debug)]
pub struct SearchContext {
    pub max_steps: u32,
    pub max_queue: usize,
    deadline: Option<Instant>,
    cancel: Arc<AtomicBool>,
}

impl SearchContext {
    pub fn new(max_steps: u32, max_queue: usize) -> Self {
        SearchContext {
            max_steps,
            max_queue,
            deadline: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Self-termination deadline, counted from now.
    pub fn with_deadline(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Shares an external cancellation token (the coordinator's).
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Polled at every expansion; true once cancelled or past deadline.
    pub fn should_stop(&self) -> bool {
        self.cancel.load(AtomicOrdering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

fn click(board: &Board, mv: Position) -> Option<Board> {
    let mut next = board.clone();
    if next.apply_click(mv.row as usize, mv.col as usize) {
        Some(next)
    } else {
        None
    }
}

/// Exhaustive depth-first search tracking the globally best solution.
pub fn solve_dfs(initial: &Board, ctx: &SearchContext) -> Option<Board> {
    let mut visited = HashSet::new();
    let mut best = None;
    dfs(initial, ctx, &mut visited, &mut best);
    best
}

fn dfs(
    board: &Board,
    ctx: &SearchContext,
    visited: &mut HashSet<u64>,
    best: &mut Option<Board>,
) {
    if ctx.should_stop() {
        return;
    }
    if board.moves().len() as u32 > ctx.max_steps {
        return;
    }
    if board.is_solved() {
        if best
            .as_ref()
            .map_or(true, |b| board.moves().len() < b.moves().len())
        {
            *best = Some(board.clone());
        }
        return;
    }
    if !visited.insert(board.state_hash()) {
        return;
    }
    for mv in board.legal_clicks() {
        if let Some(next) = click(board, mv) {
            dfs(&next, ctx, visited, best);
        }
    }
}

/// Breadth-first search; the first solved pop is the answer.
///
/// The frontier is lossy: past `max_queue` entries the oldest element is
/// discarded, trading completeness for bounded memory.
pub fn solve_bfs(initial: &Board, ctx: &SearchContext) -> Option<Board> {
    let mut queue = VecDeque::new();
    let mut seen: HashSet<(u64, u32)> = HashSet::new();

    seen.insert((initial.state_hash(), initial.moves().len() as u32));
    queue.push_back(initial.clone());

    while let Some(board) = queue.pop_front() {
        if ctx.should_stop() {
            return None;
        }
        if board.is_solved() {
            return Some(board);
        }
        if board.moves().len() as u32 >= ctx.max_steps {
            continue;
        }
        for mv in board.legal_clicks() {
            let Some(next) = click(&board, mv) else { continue };
            if !seen.insert((next.state_hash(), next.moves().len() as u32)) {
                continue;
            }
            queue.push_back(next);
            if queue.len() > ctx.max_queue {
                queue.pop_front();
            }
        }
    }
    None
}

/// Greedy best-first: frontier ordered by `h_wrong` alone.
pub fn solve_greedy(initial: &Board, ctx: &SearchContext) -> Option<Board> {
    best_first(initial, ctx, h_wrong, false)
}

/// A*: frontier ordered by `moves + h_wrong`.
pub fn solve_a_star(initial: &Board, ctx: &SearchContext) -> Option<Board> {
    best_first(initial, ctx, h_wrong, true)
}

/// A* with the hint-aware heuristic.
pub fn solve_enhanced_a_star(initial: &Board, ctx: &SearchContext) -> Option<Board> {
    best_first(initial, ctx, h_enhanced, true)
}

struct SearchNode {
    priority: u32,
    depth: u32,
    seq: u64,
    board: Board,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest element; invert so the cheapest
        // node (then shallowest, then first-inserted) pops first.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.depth.cmp(&self.depth))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.depth == other.depth && self.seq == other.seq
    }
}

impl Eq for SearchNode {}

// Overflow slack before the frontier is rebuilt; amortizes the O(n log n)
// worst-tail eviction across many pushes.
const QUEUE_SLACK: usize = 1024;

fn shrink_to_best(open: &mut BinaryHeap<SearchNode>, cap: usize) {
    let mut nodes = std::mem::take(open).into_vec();
    nodes.sort_unstable_by(|a, b| b.cmp(a));
    nodes.truncate(cap);
    *open = BinaryHeap::from(nodes);
}

fn best_first(
    initial: &Board,
    ctx: &SearchContext,
    h: fn(&Board) -> u32,
    weigh_depth: bool,
) -> Option<Board> {
    let mut open = BinaryHeap::new();
    let mut seen: HashSet<(u64, u32)> = HashSet::new();
    let mut seq = 0u64;

    let depth = initial.moves().len() as u32;
    seen.insert((initial.state_hash(), depth));
    open.push(SearchNode {
        priority: h(initial) + if weigh_depth { depth } else { 0 },
        depth,
        seq,
        board: initial.clone(),
    });

    while let Some(node) = open.pop() {
        if ctx.should_stop() {
            return None;
        }
        if node.board.is_solved() {
            return Some(node.board);
        }
        if node.depth >= ctx.max_steps {
            continue;
        }
        for mv in node.board.legal_clicks() {
            let Some(next) = click(&node.board, mv) else { continue };
            let depth = next.moves().len() as u32;
            if !seen.insert((next.state_hash(), depth)) {
                continue;
            }
            seq += 1;
            open.push(SearchNode {
                priority: h(&next) + if weigh_depth { depth } else { 0 },
                depth,
                seq,
                board: next,
            });
        }
        if open.len() > ctx.max_queue + QUEUE_SLACK {
            shrink_to_best(&mut open, ctx.max_queue);
        }
    }
    None
}

enum IdaResult {
    Found(Board),
    /// Minimum f-cost that exceeded the bound; `u32::MAX` when the
    /// subtree is exhausted.
    Exceeded(u32),
    Aborted,
}

/// Iterative-deepening A* with path-set deduplication.
///
/// The bound starts at `h_wrong(initial)` and ratchets up to the
/// smallest f-cost pruned in the previous iteration. Unlike the queue
/// strategies, only the current path is deduplicated, so a state may be
/// re-derived through different branches but cycles are cut.
pub fn solve_ida_star(initial: &Board, ctx: &SearchContext) -> Option<Board> {
    let mut bound = h_wrong(initial);
    loop {
        if bound > ctx.max_steps {
            return None;
        }
        let mut path = HashSet::new();
        path.insert(initial.state_hash());
        match contour(initial, bound, ctx, &mut path) {
            IdaResult::Found(board) => return Some(board),
            IdaResult::Aborted => return None,
            IdaResult::Exceeded(next) => {
                if next == u32::MAX {
                    return None;
                }
                tracing::debug!(bound = next, "ida* bound raised");
                bound = next;
            }
        }
    }
}

fn contour(
    board: &Board,
    bound: u32,
    ctx: &SearchContext,
    path: &mut HashSet<u64>,
) -> IdaResult {
    if ctx.should_stop() {
        return IdaResult::Aborted;
    }
    let f = board.moves().len() as u32 + h_wrong(board);
    if f > bound {
        return IdaResult::Exceeded(f);
    }
    if board.is_solved() {
        return IdaResult::Found(board.clone());
    }

    let mut next_bound = u32::MAX;
    for mv in board.legal_clicks() {
        let Some(next) = click(board, mv) else { continue };
        let hash = next.state_hash();
        if !path.insert(hash) {
            continue;
        }
        let result = contour(&next, bound, ctx, path);
        path.remove(&hash);
        match result {
            IdaResult::Found(b) => return IdaResult::Found(b),
            IdaResult::Aborted => return IdaResult::Aborted,
            IdaResult::Exceeded(f) => next_bound = next_bound.min(f),
        }
    }
    IdaResult::Exceeded(next_bound)
}

const UCB_C: f64 = std::f64::consts::SQRT_2;
// Keeps the UCB denominators away from zero for unvisited children.
const UCB_EPSILON: f64 = 1e-6;

struct MctsNode {
    parent: Option<usize>,
    children: Vec<usize>,
    visits: f64,
    reward: f64,
    untried: VecDeque<Position>,
    board: Board,
}

/// Monte-Carlo tree search with uniform random rollouts.
///
/// Runs until the deadline unless a rollout solves the board, in which
/// case that rollout (whose move log includes the tree path) is the
/// answer. Without a solved rollout the most-visited root child is
/// returned so the caller can at least inspect the preferred line; the
/// coordinator discards it unless it happens to be solved.
pub fn solve_mcts(initial: &Board, ctx: &SearchContext, seed: u64) -> Option<Board> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut tree = vec![MctsNode {
        parent: None,
        children: Vec::new(),
        visits: 0.0,
        reward: 0.0,
        untried: initial.legal_clicks().into(),
        board: initial.clone(),
    }];
    let mut solved: Option<Board> = None;

    while !ctx.should_stop() {
        // Selection: descend while fully expanded.
        let mut idx = 0;
        while tree[idx].untried.is_empty() && !tree[idx].children.is_empty() {
            idx = select_child(&tree, idx);
        }

        // Expansion: a click that changes nothing creates no child.
        if let Some(mv) = tree[idx].untried.pop_front() {
            if let Some(board) = click(&tree[idx].board, mv) {
                let untried = board.legal_clicks().into();
                tree.push(MctsNode {
                    parent: Some(idx),
                    children: Vec::new(),
                    visits: 0.0,
                    reward: 0.0,
                    untried,
                    board,
                });
                let child = tree.len() - 1;
                tree[idx].children.push(child);
                idx = child;
            }
        } else if idx == 0 && tree[0].children.is_empty() {
            // Dead initial board: nothing to expand, nothing to visit.
            break;
        }

        // Simulation.
        let mut rollout = tree[idx].board.clone();
        let mut plies = 0;
        while !rollout.is_solved() && plies < ctx.max_steps {
            let moves = rollout.legal_clicks();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            rollout.apply_click(mv.row as usize, mv.col as usize);
            plies += 1;
        }
        let reward = if rollout.is_solved() {
            1.0
        } else {
            1.0 / (1.0 + f64::from(h_wrong(&rollout)))
        };
        if rollout.is_solved() {
            solved = Some(rollout);
        }

        // Backpropagation.
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            tree[i].visits += 1.0;
            tree[i].reward += reward;
            cursor = tree[i].parent;
        }

        if solved.is_some() {
            break;
        }
    }

    solved.or_else(|| {
        tree[0]
            .children
            .iter()
            .max_by(|&&a, &&b| {
                tree[a]
                    .visits
                    .partial_cmp(&tree[b].visits)
                    .unwrap_or(Ordering::Equal)
            })
            .map(|&i| tree[i].board.clone())
    })
}

fn select_child(tree: &[MctsNode], parent: usize) -> usize {
    let parent_visits = tree[parent].visits;
    let mut best = tree[parent].children[0];
    let mut best_score = f64::NEG_INFINITY;
    for &child in &tree[parent].children {
        let node = &tree[child];
        let exploit = node.reward / (node.visits + UCB_EPSILON);
        let explore = UCB_C * ((parent_visits + 1.0).ln() / (node.visits + UCB_EPSILON)).sqrt();
        let score = exploit + explore;
        if score > best_score {
            best_score = score;
            best = child;
        }
    }
    best
}
