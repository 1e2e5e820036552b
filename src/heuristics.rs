//! Distance estimates used by the informed strategies.
//!
//! Neither heuristic is strictly admissible, so the A* family here is an
//! approximation rather than an optimality guarantee. That tradeoff is
//! deliberate: the coordinator races several strategies and keeps the
//! shortest answer anyway.

use crate::engine::{Board, Position};

/// Count of cells failing their correctness predicate.
pub fn h_wrong(board: &Board) -> u32 {
    board.incorrect_cells()
}

// Weight for cells annotated as needing a bomb to reach.
const BOMB_WEIGHT: u32 = 2;

/// Hint-aware estimate: every incorrect cell costs 1, plus 2 if it is
/// flagged as bomb-dependent, plus the taxicab distance to its target
/// hint. Cells without hints degrade to the plain count.
pub fn h_enhanced(board: &Board) -> u32 {
    let mut total = 0;
    for r in 0..board.rows() {
        for c in 0..board.cols() {
            let cell = board.get(r, c);
            if cell.is_correct() {
                continue;
            }
            total += 1;
            if cell.bomb_hint {
                total += BOMB_WEIGHT;
            }
            if cell.target_hint != Position::NONE {
                total += Position::new(r, c).manhattan(&cell.target_hint);
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Board;

    fn board(colors: &str, modifiers: &str) -> Board {
        Board::from_strings(colors, modifiers).unwrap()
    }

    #[test]
    fn h_wrong_counts_incorrect_cells() {
        assert_eq!(h_wrong(&board("rr", "Rr")), 0);
        assert_eq!(h_wrong(&board("rr", "R0")), 1);
        assert_eq!(h_wrong(&board("rrr", "000")), 3);
    }

    #[test]
    fn h_enhanced_without_hints_equals_h_wrong() {
        let b = board("rr gg", "00 00");
        assert_eq!(h_enhanced(&b), h_wrong(&b));
    }

    #[test]
    fn h_enhanced_adds_hint_weights() {
        let mut b = board("rr", "00");
        b.get_mut(0, 0).bomb_hint = true;
        b.get_mut(0, 1).target_hint = Position::new(0, 0);
        // (0,0): 1 + 2 bomb. (0,1): 1 + manhattan 1.
        assert_eq!(h_enhanced(&b), 5);
    }

    #[test]
    fn hints_on_correct_cells_cost_nothing() {
        let mut b = board("rr", "rr");
        b.get_mut(0, 0).bomb_hint = true;
        b.get_mut(0, 1).target_hint = Position::new(0, 0);
        assert_eq!(h_enhanced(&b), 0);
    }
}
