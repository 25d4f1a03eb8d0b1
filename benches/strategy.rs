use auto_2048::engine::{Board, Move};
use auto_2048::strategy::{heuristic, Greedy, HeuristicWeights, Rollout, RolloutConfig, StrategyConfig, StrategyKind};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use rayon::ThreadPoolBuilder;
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(7777);
    let mut boards = Vec::new();
    let mut b = Board::new_game(&mut rng);
    boards.push(b);
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..64 {
        if !b.can_move() {
            b = Board::new_game(&mut rng);
        }
        b.make_move(seq[i % seq.len()], &mut rng);
        boards.push(b);
    }
    boards
}

fn bench_heuristic(c: &mut Criterion) {
    let boards = corpus();
    let weights = HeuristicWeights::default();
    c.bench_function("heuristic/utility", |bch| {
        bch.iter(|| {
            let mut acc = 0f64;
            for bd in &boards {
                acc += heuristic::utility(bd, &weights, false);
            }
            black_box(acc)
        })
    });
}

fn bench_greedy(c: &mut Criterion) {
    // Pin a small pool for stability
    let pool = ThreadPoolBuilder::new().num_threads(4).build().expect("thread pool");
    let boards = corpus();
    let mut seq = Greedy::with_config(&StrategyConfig { parallel: false, ..Default::default() });
    let mut par = Greedy::with_config(&StrategyConfig { parallel: true, ..Default::default() });

    c.bench_function("greedy/best_move_seq", |bch| {
        bch.iter(|| {
            let mut acc = 0u64;
            for bd in &boards {
                acc ^= seq.best_move(bd) as u64;
            }
            black_box(acc)
        })
    });
    c.bench_function("greedy/best_move_par", |bch| {
        bch.iter(|| pool.install(|| {
            let mut acc = 0u64;
            for bd in &boards {
                acc ^= par.best_move(bd) as u64;
            }
            black_box(acc)
        }))
    });
}

fn bench_rollout(c: &mut Criterion) {
    let pool = ThreadPoolBuilder::new().num_threads(4).build().expect("thread pool");
    let boards: Vec<Board> = corpus().into_iter().step_by(8).collect();
    let cfg = StrategyConfig {
        kind: StrategyKind::Rollout,
        rollout: RolloutConfig { trials: 100, rollout_depth: 50 },
        ..Default::default()
    };
    let mut rollout = Rollout::with_config(&cfg);
    let mut rng = StdRng::seed_from_u64(11);

    let mut group = c.benchmark_group("rollout");
    group.sample_size(20);
    group.bench_function("best_move", |bch| {
        bch.iter(|| pool.install(|| {
            let mut acc = 0u64;
            for bd in &boards {
                acc ^= rollout.best_move(bd, &mut rng) as u64;
            }
            black_box(acc)
        }))
    });
    group.finish();
}

criterion_group!(strategy, bench_heuristic, bench_greedy, bench_rollout);
criterion_main!(strategy);
