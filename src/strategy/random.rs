use rand::{Rng, RngCore};

use crate::engine::{Board, Move};

use super::{MoveStrategy, SearchStats};

/// Uniformly random direction with no legality check; callers must tolerate no-op moves.
#[derive(Debug, Default)]
pub struct RandomMove {
    stats: SearchStats,
}

impl RandomMove {
    pub fn new() -> Self { Self::default() }
}

impl MoveStrategy for RandomMove {
    fn select_move(&mut self, _board: &Board, rng: &mut dyn RngCore) -> Move {
        self.stats.record(0);
        Move::ALL[rng.gen_range(0..Move::ALL.len())]
    }

    fn name(&self) -> &'static str { "random" }

    fn last_stats(&self) -> SearchStats { self.stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn covers_every_direction_even_illegal_ones() {
        // Left and Up are no-ops here and must still be drawn.
        let b = Board::try_from_values(&[2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let mut strategy = RandomMove::new();
        let mut counts = [0u32; 4];
        for _ in 0..4_000 {
            let m = strategy.select_move(&b, &mut rng);
            counts[Move::ALL.iter().position(|&d| d == m).unwrap()] += 1;
        }
        assert!(counts.iter().all(|&c| (850..1150).contains(&c)), "{counts:?}");
    }
}
