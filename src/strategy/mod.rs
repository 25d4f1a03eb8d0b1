//! One-ply move-selection policies for 2048.
//!
//! Three interchangeable variants implement [`MoveStrategy`]:
//! - [`Greedy`]: simulate each direction once and rank by a weighted heuristic (default).
//! - [`Rollout`]: Monte-Carlo playouts of random legal moves, ranked by final score.
//! - [`RandomMove`]: any direction, uniformly, without a legality check.
//!
//! Notes
//! - No variant mutates the board it is given; simulations run on copies.
//! - Randomness is always injected by the caller, so a seeded RNG makes every
//!   variant reproducible, including when rayon runs the work in parallel.
//!
//! Quick start
//! ```
//! use auto_2048::engine::Board;
//! use auto_2048::strategy::{StrategyConfig, StrategyKind};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let board = Board::new_game(&mut rng);
//!
//! let mut greedy = StrategyConfig::default().build().unwrap();
//! let dir = greedy.select_move(&board, &mut rng);
//! assert!(board.shifted(dir).1.changed);
//!
//! let cfg = StrategyConfig { kind: StrategyKind::Rollout, ..Default::default() };
//! let mut rollout = cfg.build().unwrap();
//! let _ = rollout.select_move(&board, &mut rng);
//! ```

use std::io;
use std::path::Path;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::engine::{Board, Move};

mod greedy;
pub mod heuristic;
mod random;
mod rollout;

pub use greedy::Greedy;
pub use heuristic::{HeuristicFeatures, HeuristicWeights};
pub use random::RandomMove;
pub use rollout::Rollout;

/// A move-selection policy.
///
/// Implementations must leave `board` untouched; only the caller applies the
/// returned direction to the live game.
pub trait MoveStrategy: Send {
    /// Pick the next direction for `board`.
    ///
    /// On a terminal board there is nothing to choose; the result is then
    /// unspecified and callers should check [`Board::can_move`] first.
    fn select_move(&mut self, board: &Board, rng: &mut dyn RngCore) -> Move;

    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Statistics collected from the last call to [`MoveStrategy::select_move`].
    fn last_stats(&self) -> SearchStats;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Greedy,
    Rollout,
    Random,
}

/// Knobs for the Monte-Carlo variant.
///
/// - `trials`: independent playouts per decision.
/// - `rollout_depth`: random moves played after the first move of each trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolloutConfig {
    pub trials: usize,
    pub rollout_depth: usize,
}

impl Default for RolloutConfig {
    fn default() -> Self { Self { trials: 100, rollout_depth: 50 } }
}

/// Strategy selection plus every tunable it reads.
///
/// Loadable from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub kind: StrategyKind,
    /// Greedy utility weights.
    pub weights: HeuristicWeights,
    /// Keep the larger monotonicity scan total instead of the smaller one.
    pub prefer_monotonic_ascending: bool,
    /// Spread per-direction evaluations and rollout trials over the rayon pool.
    pub parallel: bool,
    pub rollout: RolloutConfig,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::Greedy,
            weights: HeuristicWeights::default(),
            prefer_monotonic_ascending: false,
            parallel: true,
            rollout: RolloutConfig::default(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid strategy config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("heuristic weight `{0}` must be finite")]
    NonFiniteWeight(&'static str),
    #[error("rollout needs at least one trial")]
    NoTrials,
}

impl StrategyConfig {
    /// Reject weights that would poison comparisons and rollouts that cannot run.
    ///
    /// All-zero weights are accepted: the greedy variant then picks the first
    /// legal direction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((name, _)) = self.weights.named().into_iter().find(|(_, w)| !w.is_finite()) {
            return Err(ConfigError::NonFiniteWeight(name));
        }
        if self.rollout.trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: StrategyConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validate, then instantiate the configured variant.
    pub fn build(&self) -> Result<Box<dyn MoveStrategy>, ConfigError> {
        self.validate()?;
        Ok(match self.kind {
            StrategyKind::Greedy => Box::new(Greedy::with_config(self)),
            StrategyKind::Rollout => Box::new(Rollout::with_config(self)),
            StrategyKind::Random => Box::new(RandomMove::new()),
        })
    }
}

/// Utility of one candidate direction at the root.
///
/// - `utility` is `-inf` when the move is a no-op for the current board.
/// - `legal` is false exactly in that case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Move,
    pub utility: f64,
    pub legal: bool,
}

/// Basic stats for a single decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Boards produced by simulated moves in the last decision.
    pub nodes: u64,
    /// Largest `nodes` seen since the strategy was created.
    pub peak_nodes: u64,
}

impl SearchStats {
    #[inline]
    pub(crate) fn record(&mut self, nodes: u64) {
        self.nodes = nodes;
        self.peak_nodes = self.peak_nodes.max(nodes);
    }
}
