use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board.
pub const SIZE: usize = 4;
const CELLS: usize = SIZE * SIZE;

/// Tile value that flags a game as won the first time a merge produces it.
pub const WINNING_TILE: u32 = 2048;

/// Largest tile a board may hold. Two of these never merge, so every tile
/// value stays within this cap.
pub const MAX_TILE: u32 = 1 << 30;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

impl Move {
    /// All four directions, in the order strategies break ties.
    pub const ALL: [Move; 4] = [Move::Left, Move::Right, Move::Up, Move::Down];

    /// Rotation that aligns this direction with `Left`, paired with the one that undoes it.
    fn conjugation(self) -> Option<(Rotation, Rotation)> {
        match self {
            Move::Left => None,
            Move::Right => Some((Rotation::Half, Rotation::Half)),
            Move::Up => Some((Rotation::ThreeQuarter, Rotation::Quarter)),
            Move::Down => Some((Rotation::Quarter, Rotation::ThreeQuarter)),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Left => "left",
            Move::Right => "right",
            Move::Up => "up",
            Move::Down => "down",
        };
        f.write_str(name)
    }
}

/// Clockwise quarter-turn rotations of the grid.
///
/// A cell at `(x, y)` lands at `(3 - y, x)` for a quarter turn, `(3 - x, 3 - y)`
/// for a half turn and `(y, 3 - x)` for three quarters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarter => 270,
        }
    }

    /// The rotation that restores the original arrangement.
    pub fn inverse(self) -> Rotation {
        match self {
            Rotation::Quarter => Rotation::ThreeQuarter,
            Rotation::Half => Rotation::Half,
            Rotation::ThreeQuarter => Rotation::Quarter,
        }
    }

    #[inline]
    fn target(self, x: usize, y: usize) -> (usize, usize) {
        let last = SIZE - 1;
        match self {
            Rotation::Quarter => (last - y, x),
            Rotation::Half => (last - x, last - y),
            Rotation::ThreeQuarter => (y, last - x),
        }
    }
}

/// A single cell: empty (0) or a power of two from 2 to [`MAX_TILE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tile(u32);

impl Tile {
    pub const EMPTY: Tile = Tile(0);

    /// Returns `None` unless `value` is 0 or a power of two in `2..=MAX_TILE`.
    pub fn new(value: u32) -> Option<Tile> {
        if value == 0 || (value >= 2 && value <= MAX_TILE && value.is_power_of_two()) {
            Some(Tile(value))
        } else {
            None
        }
    }

    #[inline]
    pub fn value(self) -> u32 { self.0 }

    #[inline]
    pub fn is_empty(self) -> bool { self.0 == 0 }

    /// log2 of the value, with empty cells mapped to 0.
    #[inline]
    pub fn exponent(self) -> u32 {
        if self.is_empty() { 0 } else { self.0.trailing_zeros() }
    }

    #[inline]
    fn doubled(self) -> Tile { Tile(self.0 << 1) }

    /// Equal, non-empty and below [`MAX_TILE`].
    #[inline]
    fn merges_with(self, other: Tile) -> bool { !self.is_empty() && self == other && self.0 < MAX_TILE }
}

/// What a single directional shift did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// Whether any cell changed value or position.
    pub changed: bool,
    /// Points added to the score by merges in this shift.
    pub gained: u64,
    /// Whether a merge in this shift produced [`WINNING_TILE`].
    pub reached_winning_tile: bool,
}

/// Win is reported before loss, matching how the game is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("expected 16 tile values, got {0}")]
    WrongLength(usize),
    #[error("invalid tile value {value} at index {index}: must be 0 or a power of two in 2..=2^30")]
    InvalidTile { index: usize, value: u32 },
}

/// A 4x4 2048 board: sixteen tiles in row-major order plus the running score.
///
/// `Board` is `Copy`; cloning it is how strategies simulate moves without
/// touching the live game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Tile; CELLS],
    score: u64,
    won: bool,
}

impl Board {
    /// A constant empty board with zero score.
    pub const EMPTY: Board = Board { cells: [Tile::EMPTY; CELLS], score: 0, won: false };

    /// Start a fresh game: an empty board with two random tiles.
    ///
    /// ```
    /// use auto_2048::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::new_game(&mut rng);
    /// assert_eq!(b.empty_count(), 14);
    /// assert_eq!(b.score(), 0);
    /// ```
    pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut board = Board::EMPTY;
        board.reset(rng);
        board
    }

    /// Clear score and flags, empty every cell, then spawn two tiles.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Board::EMPTY;
        self.spawn_tile(rng);
        self.spawn_tile(rng);
    }

    /// Build a board from sixteen row-major tile values (score starts at zero).
    ///
    /// ```
    /// use auto_2048::engine::{Board, BoardError};
    /// let b = Board::try_from_values(&[2, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 8]).unwrap();
    /// assert_eq!(b.cell_at(1, 1).value(), 4);
    /// assert!(matches!(Board::try_from_values(&[3; 16]), Err(BoardError::InvalidTile { index: 0, value: 3 })));
    /// ```
    pub fn try_from_values(values: &[u32]) -> Result<Self, BoardError> {
        if values.len() != CELLS {
            return Err(BoardError::WrongLength(values.len()));
        }
        let mut board = Board::EMPTY;
        for (index, (&value, cell)) in values.iter().zip(board.cells.iter_mut()).enumerate() {
            *cell = Tile::new(value).ok_or(BoardError::InvalidTile { index, value })?;
        }
        Ok(board)
    }

    /// Tile at column `x`, row `y` (both in `0..4`, row 0 at the top).
    #[inline]
    pub fn cell_at(&self, x: usize, y: usize) -> Tile { self.cells[x + y * SIZE] }

    /// Borrow all sixteen tiles, row-major.
    #[inline]
    pub fn tiles(&self) -> &[Tile; CELLS] { &self.cells }

    /// Tile values, row-major, 0 for empty cells.
    pub fn values(&self) -> [u32; CELLS] { self.cells.map(Tile::value) }

    /// Cumulative merge score.
    #[inline]
    pub fn score(&self) -> u64 { self.score }

    /// True once any merge has produced [`WINNING_TILE`].
    #[inline]
    pub fn won(&self) -> bool { self.won }

    /// Slide/merge tiles in `direction` without inserting a random tile.
    ///
    /// Every direction runs the same left-move on a rotated copy of the grid
    /// and rotates the result back.
    pub fn shift(&mut self, direction: Move) -> MoveOutcome {
        let conjugation = direction.conjugation();
        let mut aligned = match conjugation {
            Some((into, _)) => self.rotate(into),
            None => *self,
        };
        let outcome = aligned.shift_rows_left();
        *self = match conjugation {
            Some((_, back)) => aligned.rotate(back),
            None => aligned,
        };
        outcome
    }

    /// Copying variant of [`Board::shift`]; `self` is left untouched.
    ///
    /// ```
    /// use auto_2048::engine::{Board, Move};
    /// let b = Board::try_from_values(&[2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    /// let (next, outcome) = b.shifted(Move::Left);
    /// assert_eq!(&next.values()[..4], &[4, 2, 0, 0]);
    /// assert_eq!(outcome.gained, 4);
    /// assert_eq!(b.score(), 0);
    /// ```
    #[inline]
    pub fn shifted(mut self, direction: Move) -> (Board, MoveOutcome) {
        let outcome = self.shift(direction);
        (self, outcome)
    }

    /// Shift in `direction`, then spawn a tile if anything changed.
    pub fn make_move<R: Rng + ?Sized>(&mut self, direction: Move, rng: &mut R) -> MoveOutcome {
        let outcome = self.shift(direction);
        if outcome.changed {
            self.spawn_tile(rng);
        }
        outcome
    }

    pub fn move_left<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.make_move(Move::Left, rng).changed
    }

    pub fn move_right<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.make_move(Move::Right, rng).changed
    }

    pub fn move_up<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.make_move(Move::Up, rng).changed
    }

    pub fn move_down<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.make_move(Move::Down, rng).changed
    }

    /// Insert a 2 (90%) or 4 (10%) into a uniformly chosen empty cell.
    ///
    /// Returns the index filled, or `None` when the board is full.
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let empty = self.empty_count();
        if empty == 0 {
            return None;
        }
        let nth = rng.gen_range(0..empty);
        let (index, cell) = self.cells.iter_mut().enumerate().filter(|(_, t)| t.is_empty()).nth(nth)?;
        *cell = generate_random_tile(rng);
        tracing::trace!(index, value = cell.value(), "spawned tile");
        Some(index)
    }

    /// True if an empty cell exists or two orthogonal neighbours can merge.
    pub fn can_move(&self) -> bool {
        if self.cells.iter().any(|t| t.is_empty()) {
            return true;
        }
        (0..SIZE).any(|y| {
            (0..SIZE).any(|x| {
                let tile = self.cell_at(x, y);
                (x + 1 < SIZE && tile.merges_with(self.cell_at(x + 1, y)))
                    || (y + 1 < SIZE && tile.merges_with(self.cell_at(x, y + 1)))
            })
        })
    }

    /// Derived on demand; never stored.
    #[inline]
    pub fn is_lost(&self) -> bool { !self.can_move() }

    pub fn status(&self) -> GameStatus {
        if self.won {
            GameStatus::Won
        } else if self.is_lost() {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        }
    }

    /// Directions whose shift would change the board, in [`Move::ALL`] order.
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> {
        let board = *self;
        Move::ALL.into_iter().filter(move |&dir| board.shifted(dir).1.changed)
    }

    /// Count the number of empty cells on the board.
    pub fn empty_count(&self) -> usize { self.cells.iter().filter(|t| t.is_empty()).count() }

    /// Return the highest tile value present (0 for an empty board).
    pub fn highest_tile(&self) -> u32 { self.cells.iter().map(|t| t.value()).max().unwrap_or(0) }

    /// Return a rotated copy; score and flags are carried over unchanged.
    ///
    /// ```
    /// use auto_2048::engine::{Board, Rotation};
    /// let b = Board::try_from_values(&[2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    /// assert_eq!(b.rotate(Rotation::Quarter).cell_at(3, 0).value(), 2);
    /// assert_eq!(b.rotate(Rotation::Half).rotate(Rotation::Half), b);
    /// ```
    pub fn rotate(self, rotation: Rotation) -> Board {
        let mut cells = [Tile::EMPTY; CELLS];
        for y in 0..SIZE {
            for x in 0..SIZE {
                let (nx, ny) = rotation.target(x, y);
                cells[nx + ny * SIZE] = self.cells[x + y * SIZE];
            }
        }
        Board { cells, ..self }
    }

    fn shift_rows_left(&mut self) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();
        for start in (0..CELLS).step_by(SIZE) {
            let row = [self.cells[start], self.cells[start + 1], self.cells[start + 2], self.cells[start + 3]];
            let shifted = shift_row_left(row);
            self.cells[start..start + SIZE].copy_from_slice(&shifted.row);
            outcome.changed |= shifted.row != row;
            outcome.gained += shifted.gained;
            outcome.reached_winning_tile |= shifted.reached_winning_tile;
        }
        self.score += outcome.gained;
        self.won |= outcome.reached_winning_tile;
        outcome
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board {{ cells: {:?}, score: {}, won: {} }}", self.values(), self.score, self.won)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nScore: {}", self.score)?;
        for y in 0..SIZE {
            if y > 0 {
                writeln!(f, "-------------------------------")?;
            }
            let row: Vec<String> = (0..SIZE).map(|x| format_val(self.cell_at(x, y))).collect();
            writeln!(f, "{}", row.join("|"))?;
        }
        Ok(())
    }
}

impl TryFrom<[u32; CELLS]> for Board {
    type Error = BoardError;

    fn try_from(values: [u32; CELLS]) -> Result<Self, Self::Error> { Board::try_from_values(&values) }
}

struct RowShift {
    row: [Tile; SIZE],
    gained: u64,
    reached_winning_tile: bool,
}

/// Compact, merge left-to-right (each tile merges at most once), compact again.
fn shift_row_left(row: [Tile; SIZE]) -> RowShift {
    let packed = compact(row);
    let mut out = [Tile::EMPTY; SIZE];
    let mut gained = 0;
    let mut reached_winning_tile = false;
    let mut read = 0;
    let mut write = 0;
    while read < SIZE && !packed[read].is_empty() {
        let tile = packed[read];
        if read + 1 < SIZE && tile.merges_with(packed[read + 1]) {
            let merged = tile.doubled();
            gained += u64::from(merged.value());
            reached_winning_tile |= merged.value() == WINNING_TILE;
            out[write] = merged;
            read += 2;
        } else {
            out[write] = tile;
            read += 1;
        }
        write += 1;
    }
    RowShift { row: out, gained, reached_winning_tile }
}

fn compact(row: [Tile; SIZE]) -> [Tile; SIZE] {
    let mut out = [Tile::EMPTY; SIZE];
    for (slot, tile) in out.iter_mut().zip(row.into_iter().filter(|t| !t.is_empty())) {
        *slot = tile;
    }
    out
}

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile { if rng.gen_range(0..10) < 9 { Tile(2) } else { Tile(4) } }

fn format_val(tile: Tile) -> String {
    if tile.is_empty() {
        String::from("       ")
    } else {
        format!("{:^7}", tile.value())
    }
}
