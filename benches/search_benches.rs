use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use krait::{
    consts::KIWIPETE,
    controller::MoveController,
    evaluation::{Evaluator, MaterialEvaluator},
    search::{Engine, SearchLimits},
    zobrist::ZobristHash,
};
use shakmaty::{CastlingMode, Chess, Position, fen::Fen};

fn kiwipete() -> Chess {
    KIWIPETE
        .parse::<Fen>()
        .unwrap()
        .into_position(CastlingMode::Standard)
        .unwrap()
}

fn bench_hash_from_scratch(c: &mut Criterion) {
    let position = kiwipete();

    c.bench_function("zobrist_initialize", |b| {
        b.iter(|| black_box(ZobristHash::initialize(black_box(&position))));
    });
}

/// Make/unmake every legal move once, with incremental hash updates.
/// This is the inner loop of the search and dominates its cost.
fn bench_make_unmake(c: &mut Criterion) {
    let mut position = kiwipete();
    let moves = position.legal_moves();

    c.bench_function("make_unmake_all_moves", |b| {
        b.iter(|| {
            let mut ctrl = MoveController::new(&mut position);
            for mv in &moves {
                ctrl.make_move(mv);
                ctrl.unmake_move().unwrap();
            }
            black_box(ctrl.hash());
        })
    });
}

fn bench_evaluation(c: &mut Criterion) {
    let position = kiwipete();
    let evaluator = MaterialEvaluator;

    c.bench_function("evaluate_position", |b| {
        b.iter(|| black_box(evaluator.evaluate(black_box(&position))));
    });
}

/// A shallow full search on a complex position. Measures how move
/// generation, make/unmake, ordering, and the table work together.
fn bench_search(c: &mut Criterion) {
    let mut position = kiwipete();
    let depth = 4;
    let limits = SearchLimits::depth(depth);

    c.bench_function(&format!("search_depth_{depth}"), |b| {
        b.iter(|| {
            // Fresh engine per iteration so a warm table does not skew
            // later samples.
            let mut engine = Engine::default();
            black_box(engine.find_best_move(black_box(&mut position), limits).unwrap());
        })
    });
}

criterion_group!(
    benches,
    bench_hash_from_scratch,
    bench_make_unmake,
    bench_evaluation,
    bench_search
);

criterion_main!(benches);
