use criterion::{black_box, criterion_group, criterion_main, Criterion};
use piereview::cache::{normalize, EvalCache};
use piereview::eval::{EvalResult, Score};
use piereview::tree::MoveTree;

const RUY_LOPEZ: [&str; 16] = [
    "e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4", "Nf6",
    "O-O", "Be7", "Re1", "b5", "Bb3", "d6", "c3", "O-O",
];

fn bench_play_sequence(c: &mut Criterion) {
    c.bench_function("play_sequence_16", |b| {
        b.iter(|| {
            let mut tree = MoveTree::new();
            black_box(tree.play_sequence(black_box(RUY_LOPEZ)))
        })
    });
}

fn bench_fork_and_swap(c: &mut Criterion) {
    let mut base = MoveTree::new();
    base.play_sequence(RUY_LOPEZ);
    base.jump_to(8);
    base.play_sequence(["d3", "b5", "Bb3"]);
    c.bench_function("swap_variation", |b| {
        b.iter(|| {
            let mut tree = base.clone();
            black_box(tree.swap_variation(black_box(8), 0))
        })
    });
}

fn bench_cache(c: &mut Criterion) {
    let mut tree = MoveTree::new();
    tree.play_sequence(RUY_LOPEZ);
    let fens: Vec<String> = tree.line().iter().map(|n| n.fen.clone()).collect();
    let result = EvalResult { score: Score::Centipawns(30), depth: 18, best_move: Some("d2d4".into()), text: None, continuation: vec![], variants: vec![] };

    c.bench_function("normalize", |b| b.iter(|| for f in &fens { black_box(normalize(black_box(f))); }));
    c.bench_function("cache_put_evicting", |b| {
        b.iter(|| {
            let mut cache = EvalCache::new(8);
            for f in &fens { cache.put_fen(f, result.clone()); }
            black_box(cache.len())
        })
    });
}

criterion_group!(benches, bench_play_sequence, bench_fork_and_swap, bench_cache);
criterion_main!(benches);
