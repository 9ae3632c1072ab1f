use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use block_core::{BlockId, BlockTree, FixedSurface, GeometryCache, Rect, mutation};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::Value;

/// Build a document with `top` top-level blocks of `per_top` children each.
fn large_doc(top: usize, per_top: usize) -> (BlockTree, GeometryCache, Vec<BlockId>) {
    let mut tree = BlockTree::new(Value::Null);
    let mut cache = GeometryCache::new();
    let root = tree.root().clone();
    let mut leaves = Vec::with_capacity(top * per_top);
    for _ in 0..top {
        let section = mutation::insert_under(&mut tree, &mut cache, &root, None).unwrap();
        for _ in 0..per_top {
            leaves.push(mutation::insert_under(&mut tree, &mut cache, &section, None).unwrap());
        }
    }
    cache.flush(&FixedSurface::new());
    (tree, cache, leaves)
}

fn surface_for(tree: &BlockTree) -> FixedSurface {
    let mut surface = FixedSurface::new();
    for (i, id) in tree.flatten().into_iter().enumerate() {
        surface.insert(id, Rect::new(i as f64 * 40.0, 0.0, 900.0, 40.0));
    }
    surface
}

fn bench_invalidate_random_leaves(c: &mut Criterion) {
    let (tree, _, leaves) = large_doc(100, 100);
    c.bench_function("invalidate/100_random_leaves_10k_blocks", |b| {
        b.iter_batched(
            || (GeometryCache::new(), StdRng::seed_from_u64(7)),
            |(mut cache, mut rng)| {
                for _ in 0..100 {
                    let leaf = &leaves[rng.gen_range(0..leaves.len())];
                    cache.invalidate(&tree, leaf);
                }
                black_box(cache.pending_len());
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_flush_full_document(c: &mut Criterion) {
    let (tree, _, _) = large_doc(100, 100);
    let surface = surface_for(&tree);
    let root = tree.root().clone();

    c.bench_function("flush/10k_blocks", |b| {
        b.iter_batched(
            || {
                let mut cache = GeometryCache::new();
                for child in tree.children_of(&root) {
                    cache.invalidate_under(&tree, child);
                }
                cache
            },
            |mut cache| {
                black_box(cache.flush(&surface).processed());
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_after_hot_anchor(c: &mut Criterion) {
    c.bench_function("insert_after/100_inserts_same_anchor", |b| {
        b.iter_batched(
            || {
                let mut tree = BlockTree::new(Value::Null);
                let mut cache = GeometryCache::new();
                let root = tree.root().clone();
                let anchor = mutation::insert_under(&mut tree, &mut cache, &root, None).unwrap();
                (tree, cache, anchor)
            },
            |(mut tree, mut cache, anchor)| {
                for _ in 0..100 {
                    mutation::insert_after(&mut tree, &mut cache, &anchor).unwrap();
                }
                black_box(tree.len());
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_invalidate_random_leaves,
    bench_flush_full_document,
    bench_insert_after_hot_anchor
);
criterion_main!(benches);
