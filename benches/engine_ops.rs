use auto_2048::engine::{Board, Move};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(1337);
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

fn bench_shift(c: &mut Criterion) {
    let boards = corpus();
    for dir in Move::ALL {
        c.bench_function(&format!("engine/shift_{dir}"), |bch| {
            bch.iter(|| {
                let mut acc = 0u64;
                for &bd in &boards {
                    let (nb, outcome) = bd.shifted(dir);
                    acc = acc.wrapping_add(nb.score() + outcome.gained);
                }
                black_box(acc)
            })
        });
    }
}

fn bench_make_move(c: &mut Criterion) {
    let boards = corpus();
    let mut rng = StdRng::seed_from_u64(42);
    c.bench_function("engine/make_move", |bch| {
        bch.iter(|| {
            let mut changed = 0u32;
            for &bd in &boards {
                let mut b = bd;
                changed += b.make_move(Move::Left, &mut rng).changed as u32;
            }
            black_box(changed)
        })
    });
}

fn bench_spawn_and_queries(c: &mut Criterion) {
    let boards = corpus();
    let mut rng = StdRng::seed_from_u64(9);
    c.bench_function("engine/spawn_tile", |bch| {
        bch.iter(|| {
            let mut filled = 0usize;
            for &bd in &boards {
                let mut b = bd;
                filled += b.spawn_tile(&mut rng).unwrap_or(0);
            }
            black_box(filled)
        })
    });
    c.bench_function("engine/can_move", |bch| {
        bch.iter(|| black_box(boards.iter().filter(|b| b.can_move()).count()))
    });
}

criterion_group!(engine_ops, bench_shift, bench_make_move, bench_spawn_and_queries);
criterion_main!(engine_ops);
