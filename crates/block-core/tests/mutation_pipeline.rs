use block_core::{BlockId, BlockTree, FixedSurface, GeometryCache, mutation};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn doc_with_anchor() -> (BlockTree, GeometryCache, BlockId) {
    let mut tree = BlockTree::new(Value::Null);
    let mut cache = GeometryCache::new();
    let root = tree.root().clone();
    let anchor = mutation::insert_under(&mut tree, &mut cache, &root, None).unwrap();
    cache.flush(&FixedSurface::new());
    (tree, cache, anchor)
}

#[test]
fn inserted_block_is_direct_successor_of_anchor_and_siblings_are_dirty() {
    let (mut tree, mut cache, anchor) = doc_with_anchor();
    let new_id = mutation::insert_after(&mut tree, &mut cache, &anchor).unwrap();

    let children = tree.children_of(tree.root());
    let anchor_pos = children.iter().position(|c| c == &anchor).unwrap();
    assert_eq!(children.get(anchor_pos + 1), Some(&new_id));

    for child in children {
        assert!(cache.is_dirty(child), "{child} should be pending remeasure");
    }
}

#[test]
fn repeated_insert_after_same_anchor_stacks_newest_first() {
    let (mut tree, mut cache, anchor) = doc_with_anchor();
    let new1 = mutation::insert_after(&mut tree, &mut cache, &anchor).unwrap();
    let new2 = mutation::insert_after(&mut tree, &mut cache, &anchor).unwrap();
    let new3 = mutation::insert_after(&mut tree, &mut cache, &anchor).unwrap();

    // Each insertion lands immediately after the anchor, pushing the
    // previous insertions down.
    assert_eq!(
        tree.children_of(tree.root()),
        &[anchor, new3, new2, new1]
    );
}

#[test]
fn new_blocks_are_empty_text_blocks() {
    let (mut tree, mut cache, anchor) = doc_with_anchor();
    let new_id = mutation::insert_after(&mut tree, &mut cache, &anchor).unwrap();

    let block = tree.get(&new_id).unwrap();
    assert_eq!(block.kind, block_core::BlockKind::Text);
    assert_eq!(block.payload, Value::Null);
    assert!(block.children.is_empty());
}

#[test]
fn every_mutation_checks_preconditions_before_writing() {
    let (mut tree, mut cache, anchor) = doc_with_anchor();
    let before = tree.clone();
    let ghost = BlockId::new("ghost");

    assert!(mutation::insert_after(&mut tree, &mut cache, &ghost).is_err());
    assert!(mutation::insert_under(&mut tree, &mut cache, &ghost, None).is_err());
    assert!(mutation::remove(&mut tree, &mut cache, &ghost).is_err());
    assert!(mutation::move_block(&mut tree, &mut cache, &ghost, &anchor, 0).is_err());
    assert!(mutation::move_block(&mut tree, &mut cache, &anchor, &ghost, 0).is_err());

    assert_eq!(tree, before);
    assert_eq!(cache.pending_len(), 0);
    assert!(!cache.is_flush_scheduled());
}
