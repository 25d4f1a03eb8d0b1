use serde::{Deserialize, Serialize};

use crate::engine::{Board, Tile, SIZE};

/// Named weights for each utility term.
///
/// The defaults give
/// `largest + score + 3·corner + 2·adjacency + empty + 2·merges − 2·monoRows − 2·monoCols`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    pub largest_tile: f64,
    pub score: f64,
    pub corner: f64,
    pub adjacency: f64,
    pub empty: f64,
    pub merges: f64,
    /// Subtracted.
    pub monotonicity_rows: f64,
    /// Subtracted.
    pub monotonicity_cols: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            largest_tile: 1.0,
            score: 1.0,
            corner: 3.0,
            adjacency: 2.0,
            empty: 1.0,
            merges: 2.0,
            monotonicity_rows: 2.0,
            monotonicity_cols: 2.0,
        }
    }
}

impl HeuristicWeights {
    /// Every weight set to zero; strategies then fall back to tie-break order.
    pub const ZERO: HeuristicWeights = HeuristicWeights {
        largest_tile: 0.0,
        score: 0.0,
        corner: 0.0,
        adjacency: 0.0,
        empty: 0.0,
        merges: 0.0,
        monotonicity_rows: 0.0,
        monotonicity_cols: 0.0,
    };

    pub fn named(&self) -> [(&'static str, f64); 8] {
        [
            ("largest_tile", self.largest_tile),
            ("score", self.score),
            ("corner", self.corner),
            ("adjacency", self.adjacency),
            ("empty", self.empty),
            ("merges", self.merges),
            ("monotonicity_rows", self.monotonicity_rows),
            ("monotonicity_cols", self.monotonicity_cols),
        ]
    }
}

/// Raw heuristic terms for one board, before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeuristicFeatures {
    pub score: f64,
    pub empty: f64,
    pub merges: f64,
    pub monotonicity_rows: f64,
    pub monotonicity_cols: f64,
    pub largest_tile: f64,
    pub corner_bonus: f64,
    pub adjacency_bonus: f64,
}

impl HeuristicFeatures {
    pub fn utility(&self, w: &HeuristicWeights) -> f64 {
        w.largest_tile * self.largest_tile
            + w.score * self.score
            + w.corner * self.corner_bonus
            + w.adjacency * self.adjacency_bonus
            + w.empty * self.empty
            + w.merges * self.merges
            - w.monotonicity_rows * self.monotonicity_rows
            - w.monotonicity_cols * self.monotonicity_cols
    }
}

/// Extract every heuristic term from `board`.
///
/// `prefer_monotonic_ascending` keeps the larger of the two scan totals per
/// axis instead of the smaller one.
pub fn features(board: &Board, prefer_monotonic_ascending: bool) -> HeuristicFeatures {
    let largest = board.highest_tile();
    HeuristicFeatures {
        score: board.score() as f64,
        empty: board.empty_count() as f64,
        merges: f64::from(merge_count(board)),
        monotonicity_rows: monotonicity(|line, i| board.cell_at(i, line), prefer_monotonic_ascending),
        monotonicity_cols: monotonicity(|line, i| board.cell_at(line, i), prefer_monotonic_ascending),
        largest_tile: f64::from(largest),
        corner_bonus: f64::from(corner_bonus(board, largest)),
        adjacency_bonus: f64::from(adjacency_bonus(board)),
    }
}

/// Weighted utility of `board`.
///
/// ```
/// use auto_2048::engine::Board;
/// use auto_2048::strategy::heuristic::{utility, HeuristicWeights};
/// let b = Board::try_from_values(&[4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
/// // largest 4 + corner 3·4 + 15 empty cells + 2·44 equal neighbour pairs,
/// // monotonicity min-mode is 0
/// assert_eq!(utility(&b, &HeuristicWeights::default(), false), 119.0);
/// ```
#[inline]
pub fn utility(board: &Board, weights: &HeuristicWeights, prefer_monotonic_ascending: bool) -> f64 {
    features(board, prefer_monotonic_ascending).utility(weights)
}

/// Equal orthogonal neighbours, counted once from each side.
///
/// Two neighbouring empty cells count as an equal pair too, so open space
/// raises the term alongside real merge candidates.
fn merge_count(board: &Board) -> u32 {
    let mut count = 0;
    for y in 0..SIZE {
        for x in 0..SIZE {
            let tile = board.cell_at(x, y);
            let neighbours = [
                (x > 0).then(|| board.cell_at(x - 1, y)),
                (x + 1 < SIZE).then(|| board.cell_at(x + 1, y)),
                (y > 0).then(|| board.cell_at(x, y - 1)),
                (y + 1 < SIZE).then(|| board.cell_at(x, y + 1)),
            ];
            count += neighbours.into_iter().flatten().filter(|&n| n == tile).count() as u32;
        }
    }
    count
}

/// Total falling and rising steps (in log2 units) over all four lines of one
/// axis; `tile_at(line, i)` walks position `i` of `line`.
fn monotonicity(tile_at: impl Fn(usize, usize) -> Tile, keep_max: bool) -> f64 {
    let mut falling = 0.0;
    let mut rising = 0.0;
    for line in 0..SIZE {
        for i in 1..SIZE {
            let prev = f64::from(tile_at(line, i - 1).exponent());
            let curr = f64::from(tile_at(line, i).exponent());
            if prev > curr {
                falling += prev - curr;
            } else {
                rising += curr - prev;
            }
        }
    }
    if keep_max { falling.max(rising) } else { falling.min(rising) }
}

fn corner_bonus(board: &Board, largest: u32) -> u32 {
    let last = SIZE - 1;
    let corners = [(0, 0), (last, 0), (0, last), (last, last)];
    if largest > 0 && corners.iter().any(|&(x, y)| board.cell_at(x, y).value() == largest) {
        largest
    } else {
        0
    }
}

/// Second-largest value if it touches the largest tile, plus the third-largest
/// if that one in turn touches the second.
fn adjacency_bonus(board: &Board) -> u32 {
    let mut ranked: Vec<(usize, Tile)> =
        board.tiles().iter().copied().enumerate().filter(|(_, t)| !t.is_empty()).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut bonus = 0;
    for pair in ranked.windows(2).take(2) {
        if !adjacent(pair[0].0, pair[1].0) {
            break;
        }
        bonus += pair[1].1.value();
    }
    bonus
}

#[inline]
fn adjacent(a: usize, b: usize) -> bool {
    let (ax, ay) = (a % SIZE, a / SIZE);
    let (bx, by) = (b % SIZE, b / SIZE);
    ax.abs_diff(bx) + ay.abs_diff(by) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(values: [u32; 16]) -> Board { Board::try_from(values).unwrap() }

    #[test]
    fn empty_board_features() {
        let f = features(&Board::EMPTY, false);
        // 24 neighbouring cell pairs, each counted from both sides
        assert_eq!(f, HeuristicFeatures { empty: 16.0, merges: 48.0, ..Default::default() });
        assert_eq!(features(&Board::EMPTY, true).monotonicity_rows, 0.0);
    }

    #[test]
    fn merge_pairs_count_from_both_sides() {
        // the 2-2 pair plus 20 empty-empty pairs, each seen from both ends
        let b = board([2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(merge_count(&b), 2 + 40);
        let b = board([2, 2, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(merge_count(&b), 4 + 36);
        assert_eq!(merge_count(&Board::EMPTY), 48);
        let full = board([2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]);
        assert_eq!(merge_count(&full), 0);
    }

    #[test]
    fn monotonicity_uses_log2_and_scan_mode() {
        // exponents 1,2,3,4: rising 3, falling 0
        let b = board([2, 4, 8, 16, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(features(&b, false).monotonicity_rows, 0.0);
        assert_eq!(features(&b, true).monotonicity_rows, 3.0);
        // columns: each column falls from its top tile to the empties below
        assert_eq!(features(&b, false).monotonicity_cols, 0.0);
        assert_eq!(features(&b, true).monotonicity_cols, 1.0 + 2.0 + 3.0 + 4.0);
    }

    #[test]
    fn monotonicity_min_penalises_zigzag() {
        // exponents 1,3,1,3: falling 2, rising 4
        let b = board([2, 8, 2, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(features(&b, false).monotonicity_rows, 2.0);
        assert_eq!(features(&b, true).monotonicity_rows, 4.0);
    }

    #[test]
    fn corner_bonus_needs_largest_in_corner() {
        let cornered = board([0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 64]);
        assert_eq!(features(&cornered, false).corner_bonus, 64.0);
        let centred = board([0, 0, 0, 0, 0, 64, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0]);
        assert_eq!(features(&centred, false).corner_bonus, 0.0);
    }

    #[test]
    fn adjacency_bonus_chains() {
        let chain = board([64, 32, 16, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(adjacency_bonus(&chain), 32 + 16);
        let broken = board([64, 32, 0, 16, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(adjacency_bonus(&broken), 32);
        let apart = board([64, 0, 32, 16, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(adjacency_bonus(&apart), 0);
        let vertical = board([64, 0, 0, 0, 32, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]);
        assert_eq!(adjacency_bonus(&vertical), 32);
        // row wrap-around is not adjacency
        let wrapped = board([0, 0, 0, 64, 32, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(adjacency_bonus(&wrapped), 0);
    }

    #[test]
    fn utility_applies_weights() {
        let b = board([64, 32, 16, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let f = features(&b, false);
        assert_eq!(f.largest_tile, 64.0);
        assert_eq!(f.empty, 13.0);
        assert_eq!(f.utility(&HeuristicWeights::ZERO), 0.0);
        let only_empty = HeuristicWeights { empty: 10.0, ..HeuristicWeights::ZERO };
        assert_eq!(f.utility(&only_empty), 130.0);
        let expected = f.largest_tile + f.score + 3.0 * f.corner_bonus + 2.0 * f.adjacency_bonus + f.empty
            + 2.0 * f.merges
            - 2.0 * f.monotonicity_rows
            - 2.0 * f.monotonicity_cols;
        assert_eq!(utility(&b, &HeuristicWeights::default(), false), expected);
    }
}
