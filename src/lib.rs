//! # chroma_solver
//!
//! Solver library for click-to-paint grid puzzles: every cell carries a
//! color and a behavioral modifier (paint rays, floods, bombs, rotating
//! arrows), and the goal is to click the board into a state where every
//! cell satisfies its correctness predicate — in as few clicks as
//! possible.
//!
//! Two binaries drive it:
//! - `solve_levels`: iterates an XML level file, races the strategies on
//!   each level, and writes improved solutions back.
//! - `play_level`: interactive terminal play using the `B3` notation.
//!
//! ## Modules
//! - `engine`: board model, rule engine (`apply_click`) and move
//!   enumeration.
//! - `heuristics`: distance-to-goal estimates for the informed searches.
//! - `solver`: the seven strategy engines plus their shared budgets and
//!   cancellation context.
//! - `coordinator`: races the strategies on OS threads and keeps the
//!   shortest solution.
//! - `level`: level-file parsing and re-rendering.
//! - `hash`: the MurmurHash2-64 used for state identity.
//! - `utils`: move-notation parsing and solution replay.

pub mod coordinator;
pub mod engine;
pub mod error;
pub mod hash;
pub mod heuristics;
pub mod level;
pub mod solver;
pub mod utils;

pub use error::{Error, Result};
