//! Core board model and rule engine.
//!
//! This module defines the puzzle's fundamental components:
//! - `Color` / `Modifier`: what a cell looks like and how it behaves.
//! - `Cell`: one grid square, including its reachability constraint and
//!   optional heuristic hints.
//! - `Board`: the grid plus the move log, with `apply_click` implementing
//!   the full transition function (arrow rays, flood toggle, bomb paint,
//!   rotating arrows) and `legal_clicks` enumerating playable positions.
//!
//! Everything here is deterministic and purely local: a click's effect is
//! bounded by the grid, and repeated clicks on equal boards produce equal
//! results.

use std::collections::VecDeque;
use std::fmt;

use crate::hash::murmur64;
use crate::{Error, Result};

/// Largest supported board extent in either dimension.
pub const MAX_DIM: usize = 15;

/// A grid coordinate. `(15, 15)` is reserved as the [`Position::NONE`]
/// sentinel, which is why boards stay strictly below 15 cells per side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Sentinel meaning "no position" / "unconstrained".
    pub const NONE: Position = Position { row: 15, col: 15 };

    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row <= MAX_DIM && col <= MAX_DIM);
        Position {
            row: row as u8,
            col: col as u8,
        }
    }

    /// Taxicab distance to `other`.
    pub fn manhattan(&self, other: &Position) -> u32 {
        let dr = (self.row as i32 - other.row as i32).unsigned_abs();
        let dc = (self.col as i32 - other.col as i32).unsigned_abs();
        dr + dc
    }
}

impl fmt::Display for Position {
    /// Move notation: column letter then 1-based row, e.g. `B3`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.col) as char, self.row + 1)
    }
}

/// Cell color. `None` ('0') marks a cell with no color at all; such cells
/// are always considered correct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Blue,
    Orange,
    Dark,
    None,
}

impl Color {
    pub fn from_char(c: char) -> Result<Self> {
        Ok(match c {
            'r' => Color::Red,
            'g' => Color::Green,
            'b' => Color::Blue,
            'o' => Color::Orange,
            'd' => Color::Dark,
            '0' => Color::None,
            other => return Err(Error::Color(other)),
        })
    }

    pub fn to_char(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Green => 'g',
            Color::Blue => 'b',
            Color::Orange => 'o',
            Color::Dark => 'd',
            Color::None => '0',
        }
    }

    pub fn is_playable(self) -> bool {
        self != Color::None
    }

    /// ANSI background color code for terminal rendering, `None` for
    /// transparent cells.
    fn ansi_bg(self) -> Option<u8> {
        match self {
            Color::Red => Some(41),
            Color::Green => Some(42),
            Color::Blue => Some(44),
            Color::Orange => Some(43),
            Color::Dark => Some(45),
            Color::None => None,
        }
    }
}

/// Ray direction shared by static arrows and rotors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Rotor rotation order: `w -> x -> s -> a -> w`.
    pub fn clockwise(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    fn arrow_char(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    fn rotor_char(self) -> char {
        match self {
            Direction::Up => 'w',
            Direction::Down => 's',
            Direction::Left => 'a',
            Direction::Right => 'x',
        }
    }
}

/// Behavioral type of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Paintable empty cell ('0').
    Empty,
    /// Inert wall ('X'); never repainted, even by area effects.
    Wall,
    /// Already painted with a color (r|g|b|o|d).
    Painted(Color),
    /// Clickable static arrow (L|R|U|D); shoots a paint ray.
    Arrow(Direction),
    /// Clickable bomb ('B'); paints the 3x3 square around it.
    Bomb,
    /// Clickable flood ('F'); toggles a 4-connected region.
    Flood,
    /// Clickable rotating arrow (w|s|a|x); fires then rotates clockwise.
    Rotor(Direction),
}

impl Modifier {
    pub fn from_char(c: char) -> Result<Self> {
        Ok(match c {
            '0' => Modifier::Empty,
            'X' => Modifier::Wall,
            'r' | 'g' | 'b' | 'o' | 'd' => Modifier::Painted(Color::from_char(c)?),
            'U' => Modifier::Arrow(Direction::Up),
            'D' => Modifier::Arrow(Direction::Down),
            'L' => Modifier::Arrow(Direction::Left),
            'R' => Modifier::Arrow(Direction::Right),
            'B' => Modifier::Bomb,
            'F' => Modifier::Flood,
            'w' => Modifier::Rotor(Direction::Up),
            's' => Modifier::Rotor(Direction::Down),
            'a' => Modifier::Rotor(Direction::Left),
            'x' => Modifier::Rotor(Direction::Right),
            other => return Err(Error::Modifier(other)),
        })
    }

    pub fn to_char(self) -> char {
        match self {
            Modifier::Empty => '0',
            Modifier::Wall => 'X',
            Modifier::Painted(c) => c.to_char(),
            Modifier::Arrow(d) => d.arrow_char(),
            Modifier::Bomb => 'B',
            Modifier::Flood => 'F',
            Modifier::Rotor(d) => d.rotor_char(),
        }
    }

    /// What a click-effect writes for actuator color `color`.
    ///
    /// Uncolored actuators write `Empty`, which reproduces the original
    /// char-comparison semantics: a '0'-colored arrow "repaints" empty
    /// cells with emptiness and still reports the walk as a change.
    pub fn paint(color: Color) -> Self {
        if color.is_playable() {
            Modifier::Painted(color)
        } else {
            Modifier::Empty
        }
    }

    pub fn is_clickable(self) -> bool {
        matches!(
            self,
            Modifier::Arrow(_) | Modifier::Rotor(_) | Modifier::Bomb | Modifier::Flood
        )
    }
}

/// One grid square.
///
/// `bomb_hint` and `target_hint` are optional annotations consumed by the
/// enhanced heuristic; they never influence the rules or the state hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub color: Color,
    pub modifier: Modifier,
    /// When not [`Position::NONE`], the cell may only be clicked at
    /// exactly this position.
    pub only_reachable_from: Position,
    pub bomb_hint: bool,
    /// [`Position::NONE`] means "no target hint".
    pub target_hint: Position,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            color: Color::Green,
            modifier: Modifier::Empty,
            only_reachable_from: Position::NONE,
            bomb_hint: false,
            target_hint: Position::NONE,
        }
    }
}

impl Cell {
    /// Goal predicate for a single cell.
    ///
    /// Colorless cells are always correct. Painted cells must match their
    /// color. Any other non-empty modifier (walls, actuators) counts as
    /// correct; only a bare `Empty` on a colored cell is wrong.
    pub fn is_correct(&self) -> bool {
        if !self.color.is_playable() {
            return true;
        }
        match self.modifier {
            Modifier::Painted(p) => p == self.color,
            Modifier::Empty => false,
            _ => true,
        }
    }

    pub fn is_clickable(&self) -> bool {
        self.modifier.is_clickable()
    }
}

/// Append-only log of clicked positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveSequence(Vec<Position>);

impl MoveSequence {
    pub fn push(&mut self, pos: Position) {
        self.0.push(pos);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.0
    }
}

impl fmt::Display for MoveSequence {
    /// Comma-joined move notation, e.g. `B3,A1,D2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mv) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", mv)?;
        }
        Ok(())
    }
}

/// The puzzle board: a packed row-major grid of cells plus the move log.
///
/// `Clone` is the deep copy: cells are `Copy`, so a clone shares no
/// mutable state with its source.
///
/// # Examples
/// ```
/// use chroma_solver::engine::Board;
///
/// // A right-arrow that paints the cell next to it.
/// let mut board = Board::from_strings("rr", "R0").unwrap();
/// assert!(board.apply_click(0, 0));
/// assert!(board.is_solved());
/// assert_eq!(board.moves().to_string(), "A1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    moves: MoveSequence,
    has_bombs: bool,
}

impl Board {
    /// Creates a board of default cells (green, empty modifier).
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || rows > MAX_DIM || cols > MAX_DIM {
            return Err(Error::Dimensions { rows, cols });
        }
        Ok(Board {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
            moves: MoveSequence::default(),
            has_bombs: false,
        })
    }

    /// Builds a board from the level file's color and modifier grids.
    ///
    /// Both grids are whitespace-separated row strings. Dimensions are
    /// inferred: rows from the larger row count, cols from the longest
    /// row. Whitespace is then stripped and cells indexed row-major; any
    /// index past the end of either stripped string becomes an inert
    /// wall (`color '0'`, `modifier 'X'`).
    pub fn from_strings(color_grid: &str, modifier_grid: &str) -> Result<Self> {
        let color_lines: Vec<&str> = color_grid.split_whitespace().collect();
        let modifier_lines: Vec<&str> = modifier_grid.split_whitespace().collect();

        let rows = color_lines.len().max(modifier_lines.len());
        let cols = color_lines
            .iter()
            .chain(modifier_lines.iter())
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        let mut board = Board::new(rows, cols)?;

        let colors: Vec<char> = color_lines.concat().chars().collect();
        let modifiers: Vec<char> = modifier_lines.concat().chars().collect();

        for r in 0..rows {
            for c in 0..cols {
                let idx = r * cols + c;
                let cell = &mut board.cells[idx];
                if idx >= colors.len() || idx >= modifiers.len() {
                    cell.color = Color::None;
                    cell.modifier = Modifier::Wall;
                } else {
                    cell.color = Color::from_char(colors[idx])?;
                    cell.modifier = Modifier::from_char(modifiers[idx])?;
                }
            }
        }
        board.has_bombs = board.cells.iter().any(|c| c.modifier == Modifier::Bomb);
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn has_bombs(&self) -> bool {
        self.has_bombs
    }

    pub fn moves(&self) -> &MoveSequence {
        &self.moves
    }

    /// Returns the cell at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the grid.
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        assert!(row < self.rows && col < self.cols);
        &self.cells[row * self.cols + col]
    }

    /// Mutable access to a cell, for level setup (reachability
    /// constraints, heuristic hints). Rule effects go through
    /// [`Board::apply_click`] instead.
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        assert!(row < self.rows && col < self.cols);
        &mut self.cells[row * self.cols + col]
    }

    /// True iff every cell satisfies its correctness predicate.
    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(Cell::is_correct)
    }

    /// Count of cells failing their correctness predicate.
    pub fn incorrect_cells(&self) -> u32 {
        self.cells.iter().filter(|c| !c.is_correct()).count() as u32
    }

    /// Enumerates every legal click in row-major order: clickable cells
    /// whose reachability constraint is unset or names the cell itself.
    pub fn legal_clicks(&self) -> Vec<Position> {
        let mut moves = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                let cell = self.get(r, c);
                if !cell.is_clickable() {
                    continue;
                }
                let here = Position::new(r, c);
                if cell.only_reachable_from != Position::NONE
                    && cell.only_reachable_from != here
                {
                    continue;
                }
                moves.push(here);
            }
        }
        moves
    }

    /// Canonical 64-bit identity of the grid state.
    ///
    /// Covers `(color, modifier)` of every cell in row-major order; the
    /// move log is deliberately excluded so that different paths to the
    /// same grid collide.
    pub fn state_hash(&self) -> u64 {
        let mut bytes = Vec::with_capacity(self.cells.len() * 2);
        for cell in &self.cells {
            bytes.push(cell.color.to_char() as u8);
            bytes.push(cell.modifier.to_char() as u8);
        }
        murmur64(&bytes)
    }

    /// Applies a click at `(row, col)` and reports whether the grid
    /// changed.
    ///
    /// In-bounds clicks are appended to the move log regardless of
    /// outcome. Clicks on inert modifiers are logged and ignored; the
    /// engine prefers a degraded no-op over aborting.
    pub fn apply_click(&mut self, row: usize, col: usize) -> bool {
        if row >= self.rows || col >= self.cols {
            tracing::warn!(row, col, "click outside the board ignored");
            return false;
        }
        self.moves.push(Position::new(row, col));

        let clicked = *self.get(row, col);
        match clicked.modifier {
            Modifier::Arrow(dir) => self.fill_ray(dir, row, col, clicked.color),
            Modifier::Flood => self.flood_toggle(row, col, clicked.color),
            Modifier::Bomb => {
                self.detonate(row, col, clicked.color);
                true
            }
            Modifier::Rotor(dir) => {
                self.fill_ray(dir, row, col, clicked.color);
                self.get_mut(row, col).modifier = Modifier::Rotor(dir.clockwise());
                true
            }
            other => {
                tracing::warn!(row, col, modifier = %other.to_char(), "click on inert modifier");
                false
            }
        }
    }

    fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Shoots a paint ray from `(row, col)` in `dir`, not touching the
    /// origin cell. The first cell decides the mode: erase if it carries
    /// the actuator's paint, paint if it is empty, nothing otherwise.
    fn fill_ray(&mut self, dir: Direction, row: usize, col: usize, color: Color) -> bool {
        let (dr, dc) = dir.delta();
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        if !self.in_bounds(r, c) {
            return false;
        }

        let paint = Modifier::paint(color);
        let first = self.get(r as usize, c as usize).modifier;
        let (from, to) = if first == paint {
            (paint, Modifier::Empty)
        } else if first == Modifier::Empty {
            (Modifier::Empty, paint)
        } else {
            return false;
        };

        let mut changed = false;
        while self.in_bounds(r, c) && self.get(r as usize, c as usize).modifier == from {
            self.get_mut(r as usize, c as usize).modifier = to;
            changed = true;
            r += dr;
            c += dc;
        }
        changed
    }

    /// Flood toggle: paint the empty region around the clicked cell, or
    /// if there is none, erase the matching painted region instead. The
    /// clicked cell itself is never repainted.
    fn flood_toggle(&mut self, row: usize, col: usize, color: Color) -> bool {
        let paint = Modifier::paint(color);
        let neighbors = [(1isize, 0isize), (-1, 0), (0, 1), (0, -1)];

        let mut changed = false;
        for (dr, dc) in neighbors {
            changed |= self.flood(row as isize + dr, col as isize + dc, Modifier::Empty, paint);
        }
        if !changed {
            for (dr, dc) in neighbors {
                changed |=
                    self.flood(row as isize + dr, col as isize + dc, paint, Modifier::Empty);
            }
        }
        changed
    }

    /// 4-connected fill rewriting `from` to `to`, blocked by walls and
    /// every other modifier. Iterative BFS; cells are rewritten when
    /// enqueued so each is visited once.
    fn flood(&mut self, row: isize, col: isize, from: Modifier, to: Modifier) -> bool {
        if from == to || !self.in_bounds(row, col) {
            return false;
        }
        let start = (row as usize, col as usize);
        if self.get(start.0, start.1).modifier != from {
            return false;
        }

        let mut queue = VecDeque::new();
        self.get_mut(start.0, start.1).modifier = to;
        queue.push_back(start);

        while let Some((r, c)) = queue.pop_front() {
            for (dr, dc) in [(1isize, 0isize), (-1, 0), (0, 1), (0, -1)] {
                let nr = r as isize + dr;
                let nc = c as isize + dc;
                if self.in_bounds(nr, nc)
                    && self.get(nr as usize, nc as usize).modifier == from
                {
                    self.get_mut(nr as usize, nc as usize).modifier = to;
                    queue.push_back((nr as usize, nc as usize));
                }
            }
        }
        true
    }

    /// Paints the 3x3 square centered on the bomb, walls excepted. The
    /// bomb cell itself is consumed by its own paint.
    fn detonate(&mut self, row: usize, col: usize, color: Color) {
        let paint = Modifier::paint(color);
        for dr in -1isize..=1 {
            for dc in -1isize..=1 {
                let r = row as isize + dr;
                let c = col as isize + dc;
                if self.in_bounds(r, c)
                    && self.get(r as usize, c as usize).modifier != Modifier::Wall
                {
                    self.get_mut(r as usize, c as usize).modifier = paint;
                }
            }
        }
    }
}

impl fmt::Display for Board {
    /// Terminal rendering: column letters, 1-based row numbers, ANSI
    /// background per cell color, modifier character inside the cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for c in 0..self.cols {
            write!(f, "{} ", (b'A' + c as u8) as char)?;
        }
        writeln!(f)?;

        for r in 0..self.rows {
            write!(f, "{:>2} ", r + 1)?;
            for c in 0..self.cols {
                let cell = self.get(r, c);
                let ch = match cell.modifier {
                    Modifier::Empty => ' ',
                    m => m.to_char(),
                };
                match cell.color.ansi_bg() {
                    Some(code) => write!(f, "\x1b[1;{}m{} \x1b[0m", code, ch)?,
                    None => write!(f, "{} ", ch)?,
                }
            }
            if r < self.rows - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(colors: &[&str], modifiers: &[&str]) -> Board {
        Board::from_strings(&colors.join(" "), &modifiers.join(" ")).unwrap()
    }

    fn modifier_row(b: &Board, row: usize) -> String {
        (0..b.cols()).map(|c| b.get(row, c).modifier.to_char()).collect()
    }

    #[test]
    fn from_strings_infers_dimensions() {
        let b = board(&["rrr", "ggg"], &["000", "000"]);
        assert_eq!(b.rows(), 2);
        assert_eq!(b.cols(), 3);
    }

    #[test]
    fn from_strings_pads_short_grids_with_walls() {
        // Modifier grid one char short: the last cell becomes a wall.
        let b = Board::from_strings("rr rr", "00 0").unwrap();
        assert_eq!(b.get(1, 1).modifier, Modifier::Wall);
        assert_eq!(b.get(1, 1).color, Color::None);
        assert_eq!(b.get(1, 0).modifier, Modifier::Empty);
    }

    #[test]
    fn from_strings_rejects_bad_characters() {
        assert!(matches!(
            Board::from_strings("rz", "00"),
            Err(Error::Color('z'))
        ));
        assert!(matches!(
            Board::from_strings("rr", "0Q"),
            Err(Error::Modifier('Q'))
        ));
    }

    #[test]
    fn from_strings_rejects_empty_grid() {
        assert!(matches!(
            Board::from_strings("", ""),
            Err(Error::Dimensions { .. })
        ));
    }

    #[test]
    fn bomb_flag_set_at_parse_time() {
        assert!(board(&["ggg"], &["0B0"]).has_bombs());
        assert!(!board(&["ggg"], &["000"]).has_bombs());
    }

    #[test]
    fn correctness_predicate() {
        let b = board(&["r", "r", "r", "0"], &["r", "g", "0", "0"]);
        assert!(b.get(0, 0).is_correct()); // painted with own color
        assert!(!b.get(1, 0).is_correct()); // painted with wrong color
        assert!(!b.get(2, 0).is_correct()); // still empty
        assert!(b.get(3, 0).is_correct()); // colorless, always correct
    }

    #[test]
    fn click_appends_move_even_when_nothing_changes() {
        let mut b = board(&["rr"], &["R0"]);
        // Clicking the plain empty cell is a no-op but still logged.
        assert!(!b.apply_click(0, 1));
        assert_eq!(b.moves().len(), 1);
        assert_eq!(b.moves().as_slice()[0], Position::new(0, 1));
    }

    #[test]
    fn out_of_bounds_click_is_not_recorded() {
        let mut b = board(&["rr"], &["R0"]);
        assert!(!b.apply_click(5, 5));
        assert!(b.moves().is_empty());
    }

    #[test]
    fn arrow_paints_a_ray_until_blocked() {
        let mut b = board(&["r000r"], &["R000g"]);
        assert!(b.apply_click(0, 0));
        // Ray runs over the three empties and stops at the painted cell.
        assert_eq!(modifier_row(&b, 0), "Rrrrg");
    }

    #[test]
    fn arrow_single_cell_scenario_solves() {
        let mut b = board(&["rr"], &["R0"]);
        assert!(b.apply_click(0, 0));
        assert_eq!(modifier_row(&b, 0), "Rr");
        assert!(b.is_solved());
        assert_eq!(b.moves().to_string(), "A1");
    }

    #[test]
    fn arrow_erases_its_own_color() {
        let mut b = board(&["rrr"], &["Rrr"]);
        assert!(b.apply_click(0, 0));
        assert_eq!(modifier_row(&b, 0), "R00");
    }

    #[test]
    fn arrow_blocked_by_foreign_paint_changes_nothing() {
        let mut b = board(&["rgg"], &["Rgg"]);
        assert!(!b.apply_click(0, 0));
        assert_eq!(modifier_row(&b, 0), "Rgg");
        assert_eq!(b.moves().len(), 1);
    }

    #[test]
    fn arrow_firing_off_board_changes_nothing() {
        let mut b = board(&["rr"], &["L0"]);
        assert!(!b.apply_click(0, 0));

        // The same arrow with room fires into the empty cell.
        let mut inward = board(&["rr"], &["0L"]);
        assert!(inward.apply_click(0, 1));
        assert_eq!(modifier_row(&inward, 0), "rL");
    }

    #[test]
    fn rule_engine_is_deterministic() {
        let base = board(&["rrr", "ggg", "bbb"], &["R00", "0B0", "F00"]);
        let mut first = base.clone();
        let mut second = base.clone();
        assert_eq!(first.apply_click(1, 1), second.apply_click(1, 1));
        assert_eq!(first, second);
        assert_eq!(first.state_hash(), second.state_hash());
    }

    #[test]
    fn bomb_paints_three_by_three() {
        let mut b = board(&["ggg", "ggg", "ggg"], &["000", "0B0", "000"]);
        assert!(b.apply_click(1, 1));
        for r in 0..3 {
            assert_eq!(modifier_row(&b, r), "ggg");
        }
        assert!(b.is_solved());
        assert_eq!(b.moves().to_string(), "B2");
    }

    #[test]
    fn bomb_respects_walls_and_edges() {
        let mut b = board(&["gg", "gg"], &["B0", "0X"]);
        assert!(b.apply_click(0, 0));
        assert_eq!(modifier_row(&b, 0), "gg");
        assert_eq!(modifier_row(&b, 1), "gX");
    }

    #[test]
    fn flood_paints_adjacent_empty_region() {
        // A 2x2 empty block fed by a flood cell below it.
        let mut b = board(&["rr", "rr", "r0"], &["00", "00", "F0"]);
        assert!(b.apply_click(2, 0));
        assert_eq!(modifier_row(&b, 0), "rr");
        assert_eq!(modifier_row(&b, 1), "rr");
        assert!(b.is_solved());
    }

    #[test]
    fn flood_falls_back_to_erase() {
        // The block is already painted; the fallback erases it.
        let mut b = board(&["rr", "rr", "r0"], &["rr", "rr", "FX"]);
        assert!(b.apply_click(2, 0));
        assert_eq!(modifier_row(&b, 0), "00");
        assert_eq!(modifier_row(&b, 1), "00");
        assert!(!b.is_solved());
    }

    #[test]
    fn flood_stops_at_walls_and_foreign_modifiers() {
        let mut b = board(&["rrr", "rrr"], &["0X0", "F0g"]);
        assert!(b.apply_click(1, 0));
        // (0,2) stays empty: the wall and the green cell seal it off.
        assert_eq!(modifier_row(&b, 0), "rX0");
        assert_eq!(modifier_row(&b, 1), "Frg");
    }

    #[test]
    fn rotor_fires_then_rotates() {
        // An up-rotor under a blue target.
        let mut b = board(&["0b", "0b"], &["X0", "Xw"]);
        assert!(b.apply_click(1, 1));
        assert_eq!(b.get(0, 1).modifier, Modifier::Painted(Color::Blue));
        assert_eq!(b.get(1, 1).modifier, Modifier::Rotor(Direction::Right));
        assert!(b.is_solved());

        // The second click fires right, off the board: still a change.
        assert!(b.apply_click(1, 1));
        assert_eq!(b.get(1, 1).modifier, Modifier::Rotor(Direction::Down));
    }

    #[test]
    fn rotor_cycle_returns_after_four_clicks() {
        let mut b = board(&["000", "0b0", "000"], &["XXX", "XwX", "XXX"]);
        for _ in 0..4 {
            assert!(b.apply_click(1, 1));
        }
        assert_eq!(b.get(1, 1).modifier, Modifier::Rotor(Direction::Up));
        assert_eq!(b.moves().len(), 4);
    }

    #[test]
    fn walls_survive_every_effect() {
        let mut b = board(&["ggg", "ggg", "ggg"], &["RX0", "BXF", "0X0"]);
        b.apply_click(0, 0);
        b.apply_click(1, 0);
        b.apply_click(1, 2);
        assert_eq!(b.get(0, 1).modifier, Modifier::Wall);
        assert_eq!(b.get(1, 1).modifier, Modifier::Wall);
        assert_eq!(b.get(2, 1).modifier, Modifier::Wall);
    }

    #[test]
    fn copy_isolation() {
        let original = board(&["ggg", "ggg", "ggg"], &["000", "0B0", "000"]);
        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.apply_click(1, 1);
        assert_ne!(copy, original);
        assert!(original.moves().is_empty());
        assert_eq!(original.get(0, 0).modifier, Modifier::Empty);
    }

    #[test]
    fn hash_ignores_move_log_but_not_cells() {
        let a = board(&["gg"], &["0B"]);
        let mut b = a.clone();
        let mut c = a.clone();

        // A no-op click changes only the log.
        b.apply_click(0, 0);
        assert_eq!(a.state_hash(), b.state_hash());

        c.apply_click(0, 1);
        assert_ne!(a.state_hash(), c.state_hash());
    }

    #[test]
    fn legal_clicks_row_major_order() {
        let b = board(&["ggg", "ggg"], &["0F0", "B0R"]);
        assert_eq!(
            b.legal_clicks(),
            vec![Position::new(0, 1), Position::new(1, 0), Position::new(1, 2)]
        );
    }

    #[test]
    fn reachability_constraint_filters_enumeration() {
        let mut b = board(&["gg"], &["BF"]);
        b.get_mut(0, 1).only_reachable_from = Position::new(0, 0);
        assert_eq!(b.legal_clicks(), vec![Position::new(0, 0)]);

        // Naming the cell itself keeps it clickable.
        b.get_mut(0, 1).only_reachable_from = Position::new(0, 1);
        assert_eq!(
            b.legal_clicks(),
            vec![Position::new(0, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn move_notation() {
        assert_eq!(Position::new(2, 1).to_string(), "B3");
        assert_eq!(Position::new(0, 0).to_string(), "A1");

        let mut seq = MoveSequence::default();
        seq.push(Position::new(2, 1));
        seq.push(Position::new(0, 0));
        seq.push(Position::new(1, 3));
        assert_eq!(seq.to_string(), "B3,A1,D2");
    }

    #[test]
    fn display_contains_headers() {
        let b = board(&["rr"], &["R0"]);
        let rendered = b.to_string();
        assert!(rendered.contains("A B"));
        assert!(rendered.contains(" 1 "));
    }
}
