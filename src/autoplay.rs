//! Headless game driver: ask a strategy for a move, apply it, spawn, repeat.

use rand::Rng;
use serde::Serialize;

use crate::engine::{Board, GameStatus};
use crate::strategy::MoveStrategy;

/// When to stop a game besides running out of moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayOptions {
    /// Stop after this many moves (no-op moves included).
    pub max_steps: Option<u64>,
    /// Stop as soon as a merge produces 2048.
    pub stop_on_win: bool,
}

impl Default for AutoplayOptions {
    fn default() -> Self { Self { max_steps: None, stop_on_win: true } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub score: u64,
    pub highest_tile: u32,
    /// Moves requested from the strategy.
    pub moves: u64,
    /// Moves that left the board unchanged.
    pub no_op_moves: u64,
    pub status: GameStatus,
}

/// Play a fresh game from two random tiles.
///
/// ```
/// use auto_2048::autoplay::{play_game, AutoplayOptions};
/// use auto_2048::strategy::Greedy;
/// use rand::{rngs::StdRng, SeedableRng};
/// let mut rng = StdRng::seed_from_u64(123);
/// let opts = AutoplayOptions { max_steps: Some(10), ..Default::default() };
/// let summary = play_game(&mut Greedy::new(), &mut rng, opts);
/// assert_eq!(summary.moves, 10);
/// ```
pub fn play_game<R: Rng>(strategy: &mut dyn MoveStrategy, rng: &mut R, options: AutoplayOptions) -> GameSummary {
    let board = Board::new_game(rng);
    play_from(board, strategy, rng, options).1
}

/// Continue a game from `board`, returning the final board and its summary.
pub fn play_from<R: Rng>(
    mut board: Board,
    strategy: &mut dyn MoveStrategy,
    rng: &mut R,
    options: AutoplayOptions,
) -> (Board, GameSummary) {
    let mut moves = 0u64;
    let mut no_op_moves = 0u64;
    loop {
        // An all-empty board can "move" but no direction changes it.
        if board.legal_moves().next().is_none() || (options.stop_on_win && board.won()) {
            break;
        }
        if options.max_steps.is_some_and(|limit| moves >= limit) {
            break;
        }
        let dir = strategy.select_move(&board, rng);
        let outcome = board.make_move(dir, rng);
        moves += 1;
        if !outcome.changed {
            no_op_moves += 1;
        }
        if outcome.reached_winning_tile {
            tracing::info!(strategy = strategy.name(), moves, score = board.score(), "reached 2048");
        }
    }
    let summary = GameSummary {
        score: board.score(),
        highest_tile: board.highest_tile(),
        moves,
        no_op_moves,
        status: board.status(),
    };
    tracing::info!(
        strategy = strategy.name(),
        score = summary.score,
        highest_tile = summary.highest_tile,
        moves,
        status = ?summary.status,
        "game finished"
    );
    (board, summary)
}
