use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

use crate::engine::{Board, Move};

use super::{MoveStrategy, RolloutConfig, SearchStats, StrategyConfig};

/// Monte-Carlo playouts ranked by cumulative score only.
///
/// Each trial plays a random legal first move and then up to `rollout_depth`
/// further random legal moves, spawning tiles as a real game would. The first
/// move of the highest-scoring trial is returned; the earliest trial wins ties.
pub struct Rollout {
    cfg: RolloutConfig,
    parallel: bool,
    stats: SearchStats,
}

#[derive(Debug, Clone, Copy)]
struct TrialResult {
    first_move: Move,
    score: u64,
    moves: u64,
}

impl Rollout {
    pub fn new() -> Self { Self::with_config(&StrategyConfig::default()) }

    pub fn with_config(cfg: &StrategyConfig) -> Self {
        Self { cfg: cfg.rollout, parallel: cfg.parallel, stats: SearchStats::default() }
    }

    /// Run the trials for `board` and return the winning first move.
    ///
    /// Per-trial seeds are drawn from `rng` up front, so a seeded `rng` gives the
    /// same answer whether trials run on the rayon pool or sequentially.
    ///
    /// ```
    /// use auto_2048::engine::{Board, Move};
    /// use auto_2048::strategy::Rollout;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let b = Board::try_from_values(&[2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    /// let mut rollout = Rollout::new();
    /// let m = rollout.best_move(&b, &mut StdRng::seed_from_u64(5));
    /// assert!(m == Move::Right || m == Move::Down);
    /// ```
    pub fn best_move<R: Rng + ?Sized>(&mut self, board: &Board, rng: &mut R) -> Move {
        let first_moves: Vec<Move> = board.legal_moves().collect();
        if first_moves.is_empty() {
            self.stats.record(0);
            return Move::Left;
        }
        let seeds: Vec<u64> = (0..self.cfg.trials.max(1)).map(|_| rng.gen()).collect();
        let depth = self.cfg.rollout_depth;
        let results: Vec<TrialResult> = if self.parallel {
            seeds.par_iter().map(|&seed| play_trial(*board, &first_moves, depth, seed)).collect()
        } else {
            seeds.iter().map(|&seed| play_trial(*board, &first_moves, depth, seed)).collect()
        };

        let mut best = results[0];
        for trial in &results[1..] {
            if trial.score > best.score {
                best = *trial;
            }
        }
        let simulated: u64 = results.iter().map(|t| t.moves).sum();
        self.stats.record(simulated);
        tracing::debug!(
            best = %best.first_move,
            best_score = best.score,
            trials = results.len(),
            simulated,
            "rollout decision"
        );
        best.first_move
    }
}

impl MoveStrategy for Rollout {
    fn select_move(&mut self, board: &Board, rng: &mut dyn RngCore) -> Move { self.best_move(board, rng) }

    fn name(&self) -> &'static str { "rollout" }

    fn last_stats(&self) -> SearchStats { self.stats }
}

impl Default for Rollout {
    fn default() -> Self { Self::new() }
}

fn play_trial(mut board: Board, first_moves: &[Move], depth: usize, seed: u64) -> TrialResult {
    let mut rng = StdRng::seed_from_u64(seed);
    let first_move = first_moves[rng.gen_range(0..first_moves.len())];
    board.make_move(first_move, &mut rng);
    let mut moves = 1;
    for _ in 0..depth {
        let legal: Vec<Move> = board.legal_moves().collect();
        let Some(&dir) = legal.choose(&mut rng) else { break };
        board.make_move(dir, &mut rng);
        moves += 1;
    }
    TrialResult { first_move, score: board.score(), moves }
}
