use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while loading levels or replaying moves.
///
/// Search itself never fails; strategies report "no solution" as `None`
/// rather than an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed level file at byte {pos}: {message}")]
    Xml { pos: usize, message: String },

    #[error("board dimensions {rows}x{cols} out of range (1..=15 each)")]
    Dimensions { rows: usize, cols: usize },

    #[error("unrecognized color character '{0}'")]
    Color(char),

    #[error("unrecognized modifier character '{0}'")]
    Modifier(char),

    #[error("invalid move '{0}'")]
    InvalidMove(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
