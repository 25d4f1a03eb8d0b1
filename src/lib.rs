//! auto-2048: a 2048 game engine + one-ply move-selection strategies
//!
//! This crate provides:
//! - A `Board` value type with the four directional moves, merge scoring,
//!   seeded tile spawning and terminal detection (`engine` module)
//! - Interchangeable move strategies behind one trait: greedy heuristic,
//!   Monte-Carlo rollout and pure random (`strategy` module)
//! - A headless driver that plays a strategy to the end of a game (`autoplay` module)
//!
//! Quick start:
//! ```
//! use auto_2048::engine::{Board, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic board initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut b = Board::new_game(&mut rng);
//! let changed = b.move_left(&mut rng);
//! assert!(changed || b.legal_moves().all(|m| m != Move::Left));
//! ```
//!
//! Note: all randomness is injected. Board methods that spawn tiles and the
//! strategies that need dice take the caller's RNG, so a seeded `StdRng`
//! reproduces a whole game.
//!
//! Full loop (simplest possible)
//! ```
//! use auto_2048::engine::Board;
//! use auto_2048::strategy::StrategyConfig;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // 1) Build the default (greedy) policy
//! let mut policy = StrategyConfig::default().build().unwrap();
//! let mut rng = StdRng::seed_from_u64(123);
//!
//! // 2) Start board with two random tiles
//! let mut b = Board::new_game(&mut rng);
//! let mut moves = 0u32;
//!
//! // 3) Loop a few moves to demonstrate flow
//! while b.can_move() && moves < 4 {
//!     let dir = policy.select_move(&b, &mut rng);
//!     b.make_move(dir, &mut rng);
//!     moves += 1;
//! }
//!
//! // 4) Inspect final state
//! assert!(b.highest_tile() >= 2);
//! ```
//!
pub mod autoplay;
pub mod engine;
pub mod logging;
pub mod strategy;
