//! Move-string helpers: parsing the `B3,A1` notation and replaying
//! recorded solutions.

use crate::engine::{Board, Position};
use crate::{Error, Result};

/// Parses a single move like `B3` into a position (col `B`, row 3,
/// both 1-based in the notation). The letter is case-insensitive.
pub fn parse_move(text: &str) -> Result<Position> {
    let mut chars = text.chars();
    let letter = chars
        .next()
        .ok_or_else(|| Error::InvalidMove(text.to_string()))?;
    let col = (letter.to_ascii_uppercase() as i32) - ('A' as i32);
    let row: i32 = chars
        .as_str()
        .parse::<i32>()
        .map_err(|_| Error::InvalidMove(text.to_string()))?
        - 1;
    // 15 is reserved for the "unconstrained" sentinel; boards never
    // reach it, so a move naming it is garbage rather than a position.
    if !(0..15).contains(&row) || !(0..15).contains(&col) {
        return Err(Error::InvalidMove(text.to_string()));
    }
    Ok(Position::new(row as usize, col as usize))
}

/// Parses a comma-joined move string; empty items are rejected.
pub fn parse_moves(text: &str) -> Result<Vec<Position>> {
    text.split(',').map(|item| parse_move(item.trim())).collect()
}

/// Replays a recorded solution on a copy of `initial`.
///
/// A click that changes nothing means the recording does not fit this
/// board and is reported as an [`Error::InvalidMove`].
pub fn replay_moves(initial: &Board, solution: &str) -> Result<Board> {
    let mut board = initial.clone();
    for (mv, item) in parse_moves(solution)?
        .into_iter()
        .zip(solution.split(','))
    {
        if !board.apply_click(mv.row as usize, mv.col as usize) {
            return Err(Error::InvalidMove(item.trim().to_string()));
        }
    }
    Ok(board)
}

/// Checks a level's recorded solution: `Some(solved board)` when the
/// replay works out, `None` (with a log line) when it does not.
pub fn validate_existing_solution(initial: &Board, solution: &str) -> Option<Board> {
    match replay_moves(initial, solution) {
        Ok(board) if board.is_solved() => Some(board),
        Ok(_) => {
            tracing::warn!(solution, "recorded solution does not solve the level");
            None
        }
        Err(error) => {
            tracing::warn!(solution, %error, "recorded solution does not replay");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(colors: &str, modifiers: &str) -> Board {
        Board::from_strings(colors, modifiers).unwrap()
    }

    #[test]
    fn parse_move_round_trips_display() {
        for text in ["A1", "B3", "F8", "O15"] {
            assert_eq!(parse_move(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn parse_move_is_case_insensitive() {
        assert_eq!(parse_move("b3").unwrap(), Position::new(2, 1));
    }

    #[test]
    fn parse_move_rejects_garbage() {
        // "P16" names (15, 15), the reserved sentinel position.
        for text in ["", "3", "A", "AA", "A0", "Z9", "P16", "A16"] {
            assert!(parse_move(text).is_err(), "accepted {:?}", text);
        }
    }

    #[test]
    fn parse_moves_splits_on_commas() {
        let moves = parse_moves("B3,A1, D2").unwrap();
        assert_eq!(
            moves,
            vec![Position::new(2, 1), Position::new(0, 0), Position::new(1, 3)]
        );
        assert!(parse_moves("B3,,A1").is_err());
    }

    #[test]
    fn replay_applies_the_recorded_clicks() {
        let initial = board("ggg ggg ggg", "000 0B0 000");
        let replayed = replay_moves(&initial, "B2").unwrap();
        assert!(replayed.is_solved());
        assert_eq!(replayed.moves().to_string(), "B2");
    }

    #[test]
    fn replay_rejects_no_op_clicks() {
        let initial = board("rr", "R0");
        // B1 lands on the plain empty cell, which is inert.
        assert!(matches!(
            replay_moves(&initial, "B1"),
            Err(Error::InvalidMove(_))
        ));
    }

    #[test]
    fn validate_accepts_only_solving_replays() {
        let initial = board("ggg ggg ggg", "000 0B0 000");
        assert!(validate_existing_solution(&initial, "B2").is_some());
        // Replays but does not solve: the rotor fires off-board.
        let rotor = board("gg gg", "w0 0B");
        assert!(validate_existing_solution(&rotor, "A1").is_none());
        // Does not replay at all.
        assert!(validate_existing_solution(&initial, "A1").is_none());
    }
}
