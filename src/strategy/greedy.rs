use rand::RngCore;
use rayon::prelude::*;

use crate::engine::{Board, Move};

use super::heuristic::{self, HeuristicWeights};
use super::{BranchEval, MoveStrategy, SearchStats, StrategyConfig};

/// One-ply greedy search: shift a copy of the board in each direction and keep
/// the direction whose result has the highest heuristic utility.
///
/// Directions are evaluated in [`Move::ALL`] order and a later one only
/// replaces the current best on a strictly higher utility, so Left wins ties,
/// then Right, then Up.
pub struct Greedy {
    weights: HeuristicWeights,
    prefer_monotonic_ascending: bool,
    parallel: bool,
    stats: SearchStats,
}

impl Greedy {
    pub fn new() -> Self { Self::with_config(&StrategyConfig::default()) }

    /// Weights are taken as given. Unvalidated non-finite weights cannot make
    /// the search pick an illegal move, but the ranking among legal ones is
    /// then meaningless; [`StrategyConfig::build`] validates first.
    pub fn with_config(cfg: &StrategyConfig) -> Self {
        Self {
            weights: cfg.weights,
            prefer_monotonic_ascending: cfg.prefer_monotonic_ascending,
            parallel: cfg.parallel,
            stats: SearchStats::default(),
        }
    }

    /// Compute the best move for `board`.
    ///
    /// Returns `Move::Left` when no direction changes the board.
    ///
    /// Example
    /// ```
    /// use auto_2048::engine::{Board, Move};
    /// use auto_2048::strategy::Greedy;
    /// let b = Board::try_from_values(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 0, 0]).unwrap();
    /// let mut greedy = Greedy::new();
    /// assert_eq!(greedy.best_move(&b), Move::Left);
    /// ```
    #[inline]
    pub fn best_move(&mut self, board: &Board) -> Move { self.best_move_with_branches(board).0 }

    /// Best move together with all four branch evaluations, from a single pass.
    pub fn best_move_with_branches(&mut self, board: &Board) -> (Move, [BranchEval; 4]) {
        let branches = self.branch_evals(board);
        let best = pick_best(&branches);
        tracing::debug!(
            best = %best,
            left = branches[0].utility,
            right = branches[1].utility,
            up = branches[2].utility,
            down = branches[3].utility,
            "greedy decision"
        );
        (best, branches)
    }

    /// Utility for each direction, in `[Left, Right, Up, Down]` order.
    ///
    /// Illegal moves are marked `legal = false` with a utility of `-inf`.
    /// The parallel path collects into the same fixed positions, so the
    /// outcome never depends on which evaluation finishes first.
    pub fn branch_evals(&mut self, board: &Board) -> [BranchEval; 4] {
        let weights = self.weights;
        let ascending = self.prefer_monotonic_ascending;
        let branches = if self.parallel {
            let evals: Vec<BranchEval> =
                Move::ALL.par_iter().map(|&dir| evaluate(board, dir, &weights, ascending)).collect();
            let mut out = Move::ALL.map(|dir| BranchEval { dir, utility: f64::NEG_INFINITY, legal: false });
            for (slot, eval) in out.iter_mut().zip(evals) {
                *slot = eval;
            }
            out
        } else {
            Move::ALL.map(|dir| evaluate(board, dir, &weights, ascending))
        };
        self.stats.record(Move::ALL.len() as u64);
        branches
    }
}

impl MoveStrategy for Greedy {
    fn select_move(&mut self, board: &Board, _rng: &mut dyn RngCore) -> Move { self.best_move(board) }

    fn name(&self) -> &'static str { "greedy" }

    fn last_stats(&self) -> SearchStats { self.stats }
}

impl Default for Greedy {
    fn default() -> Self { Self::new() }
}

fn evaluate(board: &Board, dir: Move, weights: &HeuristicWeights, ascending: bool) -> BranchEval {
    let (next, outcome) = board.shifted(dir);
    if outcome.changed {
        BranchEval { dir, utility: heuristic::utility(&next, weights, ascending), legal: true }
    } else {
        BranchEval { dir, utility: f64::NEG_INFINITY, legal: false }
    }
}

/// First strictly-greatest utility among legal branches wins; Left when none is legal.
///
/// A NaN utility (from non-finite weights) never beats an earlier legal
/// branch, but is still returned when it is the first legal one.
fn pick_best(branches: &[BranchEval; 4]) -> Move {
    let mut legal = branches.iter().filter(|be| be.legal);
    let Some(mut best) = legal.next() else { return Move::Left };
    for branch in legal {
        if branch.utility > best.utility {
            best = branch;
        }
    }
    best.dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StrategyKind;
    use rand::{rngs::StdRng, SeedableRng};

    fn board(values: [u32; 16]) -> Board { Board::try_from(values).unwrap() }

    fn greedy(parallel: bool, weights: HeuristicWeights) -> Greedy {
        Greedy::with_config(&StrategyConfig { kind: StrategyKind::Greedy, weights, parallel, ..Default::default() })
    }

    #[test]
    fn symmetric_left_right_tie_goes_left() {
        // Left and Right both merge into a corner 4; Up is a no-op and Down scores nothing.
        let b = board([2, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        for parallel in [false, true] {
            let mut g = greedy(parallel, HeuristicWeights::default());
            let (best, branches) = g.best_move_with_branches(&b);
            assert_eq!(branches[0].utility, branches[1].utility);
            assert!(branches[0].utility > branches[3].utility);
            assert!(!branches[2].legal);
            assert_eq!(best, Move::Left);
        }
    }

    #[test]
    fn illegal_directions_are_negative_infinity() {
        let b = board([2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let branches = Greedy::new().branch_evals(&b);
        assert_eq!(branches.map(|be| be.dir), Move::ALL);
        assert!(!branches[0].legal && branches[0].utility == f64::NEG_INFINITY);
        assert!(!branches[2].legal && branches[2].utility == f64::NEG_INFINITY);
        assert!(branches[1].legal && branches[3].legal);
        let best = Greedy::new().best_move(&b);
        assert!(best == Move::Right || best == Move::Down);
    }

    #[test]
    fn zero_weights_pick_first_legal_direction() {
        let b = board([2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let mut g = greedy(true, HeuristicWeights::ZERO);
        assert_eq!(g.best_move(&b), Move::Right);
    }

    #[test]
    fn terminal_board_falls_back_to_left() {
        let b = board([2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]);
        let (best, branches) = Greedy::new().best_move_with_branches(&b);
        assert!(branches.iter().all(|be| !be.legal));
        assert_eq!(best, Move::Left);
    }

    #[test]
    fn non_finite_weights_still_pick_a_legal_move() {
        // Only Right and Down change this board.
        let b = board([2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        for weights in [
            HeuristicWeights { empty: f64::NAN, ..HeuristicWeights::default() },
            HeuristicWeights { score: f64::INFINITY, merges: f64::NEG_INFINITY, ..HeuristicWeights::default() },
        ] {
            for parallel in [false, true] {
                let best = greedy(parallel, weights).best_move(&b);
                assert!(b.shifted(best).1.changed, "{best:?} is a no-op");
            }
        }
    }

    #[test]
    fn prefers_the_merge() {
        let b = board([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 64, 64, 0]);
        let best = Greedy::new().best_move(&b);
        assert!(best == Move::Left || best == Move::Right);
        assert_eq!(best, Move::Left);
    }

    #[test]
    fn parallel_and_sequential_agree_and_leave_board_untouched() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut b = Board::new_game(&mut rng);
        let mut seq = greedy(false, HeuristicWeights::default());
        let mut par = greedy(true, HeuristicWeights::default());
        for _ in 0..60 {
            if !b.can_move() {
                break;
            }
            let before = b;
            let (m_seq, br_seq) = seq.best_move_with_branches(&b);
            let (m_par, br_par) = par.best_move_with_branches(&b);
            assert_eq!(b, before);
            assert_eq!(m_seq, m_par);
            assert_eq!(br_seq, br_par);
            assert!(b.shifted(m_seq).1.changed);
            b.make_move(m_seq, &mut rng);
        }
        assert_eq!(seq.last_stats().nodes, 4);
    }
}
