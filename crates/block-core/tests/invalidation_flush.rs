use block_core::{
    Block, BlockId, BlockKind, BlockTree, FixedSurface, GeometryCache, Mutation, Rect, mutation,
};
use serde_json::Value;

/// root -> [top0, top1, top2], top1 -> [mid0, mid1], mid0 -> [leaf].
fn deep_tree() -> (BlockTree, GeometryCache) {
    let mut tree = BlockTree::with_root(Block::new(
        BlockId::new("root"),
        None,
        BlockKind::Title,
        Value::Null,
    ));
    let mut cache = GeometryCache::new();
    for (parent, id) in [
        ("root", "top0"),
        ("root", "top1"),
        ("root", "top2"),
        ("top1", "mid0"),
        ("top1", "mid1"),
        ("mid0", "leaf"),
    ] {
        mutation::apply(
            &mut tree,
            &mut cache,
            Mutation::InsertUnder {
                parent: BlockId::new(parent),
                position: None,
                id: Some(BlockId::new(id)),
                kind: BlockKind::Text,
                payload: Value::Null,
            },
        )
        .unwrap();
    }
    cache.flush(&FixedSurface::new());
    (tree, cache)
}

#[test]
fn leaf_invalidation_propagates_through_every_ancestor_level() {
    let (tree, mut cache) = deep_tree();
    cache.invalidate(&tree, &BlockId::new("leaf"));

    // mid0's children, top1's children, root's children — and nothing more.
    for id in ["leaf", "mid0", "mid1", "top0", "top1", "top2"] {
        assert!(cache.is_dirty(&BlockId::new(id)), "{id} should be dirty");
    }
    assert!(!cache.is_dirty(&BlockId::new("root")));
    assert_eq!(cache.pending_len(), 6);
}

#[test]
fn sibling_subtrees_are_not_descended_into() {
    let (tree, mut cache) = deep_tree();
    cache.invalidate(&tree, &BlockId::new("top0"));

    // Upward-only: top1 is marked as a sibling, but its children are not.
    assert!(cache.is_dirty(&BlockId::new("top1")));
    assert!(!cache.is_dirty(&BlockId::new("mid0")));
    assert!(!cache.is_dirty(&BlockId::new("mid1")));
    assert!(!cache.is_dirty(&BlockId::new("leaf")));
}

#[test]
fn double_invalidation_equals_single_invalidation() {
    let (tree, mut cache) = deep_tree();
    cache.invalidate(&tree, &BlockId::new("leaf"));
    let snapshot: usize = cache.pending_len();
    cache.invalidate(&tree, &BlockId::new("leaf"));
    assert_eq!(cache.pending_len(), snapshot);
}

#[test]
fn flush_is_a_fixed_point_per_cycle() {
    let (tree, mut cache) = deep_tree();
    cache.invalidate(&tree, &BlockId::new("leaf"));

    let surface = FixedSurface::new();
    let first = cache.flush(&surface);
    assert_eq!(first.processed(), 6);

    // An invalidation arriving after the snapshot (e.g. triggered by
    // measurement side effects) must not join the already-processed set.
    cache.invalidate(&tree, &BlockId::new("top2"));
    assert_eq!(cache.pending_len(), 3); // root's children only

    let second = cache.flush(&surface);
    assert_eq!(second.processed(), 3);
}

#[test]
fn block_removed_before_flush_is_a_harmless_miss() {
    let (mut tree, mut cache) = deep_tree();
    cache.invalidate(&tree, &BlockId::new("mid1"));
    assert!(cache.is_dirty(&BlockId::new("mid1")));

    // Removal drops the pending entry for the subtree outright.
    mutation::remove(&mut tree, &mut cache, &BlockId::new("mid1")).unwrap();
    assert!(!cache.is_dirty(&BlockId::new("mid1")));

    // Even an id that stays pending but is no longer rendered just misses.
    let report = cache.flush(&FixedSurface::new());
    assert!(report.measured.is_empty());
    assert_eq!(cache.rect(&BlockId::new("mid1")), None);
}

#[test]
fn stale_rect_survives_until_remeasured() {
    let (tree, mut cache) = deep_tree();
    let old = Rect::new(100.0, 0.0, 900.0, 40.0);
    cache.seed(BlockId::new("top1"), old);

    // Virtualized out: measurement misses, the stale rect is kept.
    cache.invalidate(&tree, &BlockId::new("top1"));
    cache.flush(&FixedSurface::new());
    assert_eq!(cache.rect(&BlockId::new("top1")), Some(old));

    // Materialized again: re-invalidation picks up the fresh rect.
    let fresh = Rect::new(140.0, 0.0, 900.0, 64.0);
    let mut surface = FixedSurface::new();
    surface.insert(BlockId::new("top1"), fresh);
    cache.invalidate(&tree, &BlockId::new("top1"));
    cache.flush(&surface);
    assert_eq!(cache.rect(&BlockId::new("top1")), Some(fresh));
}
