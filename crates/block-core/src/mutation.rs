//! Transactional tree mutation pipeline.
//!
//! [`apply`] is the single structural write path: it turns one logical edit
//! intent ([`Mutation`]) into tree operations, applies them to the
//! [`BlockTree`], and — as the last step, after the tree change is committed —
//! notifies the [`GeometryCache`] of the structurally affected blocks.
//! Ordering matters: invalidation walks the ancestor chain, so it must never
//! run against the pre-mutation tree shape.
//!
//! Every precondition is checked before the first write. A rejected mutation
//! performs no tree change and no invalidation; partial application cannot
//! be observed.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::block::{Block, BlockId, BlockKind};
use crate::cache::GeometryCache;
use crate::tree::BlockTree;

/// Invalid structural mutation request, rejected before any tree write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// The referenced block does not exist.
    #[error("unknown block: {0}")]
    UnknownBlock(BlockId),
    /// The operation needs a parented block, but the block is the root.
    #[error("block has no parent: {0}")]
    MissingParent(BlockId),
    /// An explicitly supplied id is already present in the tree.
    #[error("duplicate block id: {0}")]
    DuplicateBlock(BlockId),
    /// Moving a block under itself or one of its descendants.
    #[error("cyclic move: {id} into {target}")]
    CyclicMove {
        /// The block being moved.
        id: BlockId,
        /// The requested new parent.
        target: BlockId,
    },
}

/// One logical edit intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Insert a new block immediately after `anchor`, under the same parent.
    ///
    /// The anchor must exist and have a parent: the root/title block cannot
    /// anchor an "after" insertion.
    InsertAfter {
        /// Existing block the new block follows.
        anchor: BlockId,
        /// Explicit id for the new block; `None` mints a fresh one.
        id: Option<BlockId>,
        /// Type tag of the new block.
        kind: BlockKind,
        /// Opaque content payload of the new block.
        payload: Value,
    },
    /// Insert a new block under `parent` at `position` (append when `None`).
    ///
    /// This is how a parent's first child is created; `InsertAfter` needs an
    /// existing sibling to anchor on.
    InsertUnder {
        /// Existing parent block.
        parent: BlockId,
        /// Index in the parent's child list, clamped; append when `None`.
        position: Option<usize>,
        /// Explicit id for the new block; `None` mints a fresh one.
        id: Option<BlockId>,
        /// Type tag of the new block.
        kind: BlockKind,
        /// Opaque content payload of the new block.
        payload: Value,
    },
    /// Remove a block and its whole subtree. The root is not removable.
    Remove {
        /// Block to remove.
        id: BlockId,
    },
    /// Re-parent a block to `new_parent` at `position` (clamped).
    Move {
        /// Block to move; must not be the root.
        id: BlockId,
        /// New parent; must not be the block itself or one of its
        /// descendants.
        new_parent: BlockId,
        /// Index in the new parent's child list, clamped.
        position: usize,
    },
}

/// What a committed mutation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// A block was inserted; carries its id.
    Inserted(BlockId),
    /// A block was removed; carries the detached block (children list intact,
    /// descendants gone from the arena).
    Removed(Block),
    /// A block was re-parented.
    Moved,
}

/// Apply one mutation atomically and invalidate affected geometry.
pub fn apply(
    tree: &mut BlockTree,
    cache: &mut GeometryCache,
    mutation: Mutation,
) -> Result<MutationOutcome, StructuralError> {
    match mutation {
        Mutation::InsertAfter {
            anchor,
            id,
            kind,
            payload,
        } => {
            let anchor_block = tree
                .get(&anchor)
                .ok_or_else(|| StructuralError::UnknownBlock(anchor.clone()))?;
            let parent = anchor_block
                .parent
                .clone()
                .ok_or_else(|| StructuralError::MissingParent(anchor.clone()))?;
            let new_id = validate_new_id(tree, id)?;

            let position = tree
                .children_of(&parent)
                .iter()
                .position(|c| c == &anchor)
                .map(|i| i + 1)
                .unwrap_or_else(|| tree.children_of(&parent).len());
            let block = Block::new(new_id.clone(), Some(parent), kind, payload);
            tree.attach(block, position);

            debug!(anchor = %anchor, new = %new_id, "inserted block after anchor");
            cache.invalidate(tree, &anchor);
            Ok(MutationOutcome::Inserted(new_id))
        }

        Mutation::InsertUnder {
            parent,
            position,
            id,
            kind,
            payload,
        } => {
            if !tree.contains(&parent) {
                return Err(StructuralError::UnknownBlock(parent));
            }
            let new_id = validate_new_id(tree, id)?;

            let len = tree.children_of(&parent).len();
            let position = position.unwrap_or(len).min(len);
            let block = Block::new(new_id.clone(), Some(parent), kind, payload);
            tree.attach(block, position);

            debug!(new = %new_id, "inserted block under parent");
            cache.invalidate(tree, &new_id);
            Ok(MutationOutcome::Inserted(new_id))
        }

        Mutation::Remove { id } => {
            let block = tree
                .get(&id)
                .cloned()
                .ok_or_else(|| StructuralError::UnknownBlock(id.clone()))?;
            let parent = block
                .parent
                .clone()
                .ok_or_else(|| StructuralError::MissingParent(id.clone()))?;

            tree.detach(&id);
            let removed = tree.remove_subtree(&id);
            for gone in &removed {
                cache.remove(gone);
            }

            debug!(removed = %id, subtree = removed.len(), "removed block subtree");
            // The removed id no longer resolves, so the walk starts one level
            // up, from the former parent.
            cache.invalidate_under(tree, &parent);
            Ok(MutationOutcome::Removed(block))
        }

        Mutation::Move {
            id,
            new_parent,
            position,
        } => {
            let old_parent = tree
                .get(&id)
                .ok_or_else(|| StructuralError::UnknownBlock(id.clone()))?
                .parent
                .clone()
                .ok_or_else(|| StructuralError::MissingParent(id.clone()))?;
            if !tree.contains(&new_parent) {
                return Err(StructuralError::UnknownBlock(new_parent));
            }
            if id == new_parent || tree.is_ancestor(&id, &new_parent) {
                return Err(StructuralError::CyclicMove {
                    id,
                    target: new_parent,
                });
            }

            tree.detach(&id);
            tree.reattach(&id, &new_parent, position);

            debug!(moved = %id, to = %new_parent, position, "moved block");
            cache.invalidate_under(tree, &old_parent);
            cache.invalidate(tree, &id);
            Ok(MutationOutcome::Moved)
        }
    }
}

/// Insert an empty text block immediately after `anchor`; returns the new id.
pub fn insert_after(
    tree: &mut BlockTree,
    cache: &mut GeometryCache,
    anchor: &BlockId,
) -> Result<BlockId, StructuralError> {
    match apply(
        tree,
        cache,
        Mutation::InsertAfter {
            anchor: anchor.clone(),
            id: None,
            kind: BlockKind::Text,
            payload: Value::Null,
        },
    )? {
        MutationOutcome::Inserted(id) => Ok(id),
        _ => unreachable!("InsertAfter yields Inserted"),
    }
}

/// Insert an empty text block under `parent` (append when `position` is
/// `None`); returns the new id.
pub fn insert_under(
    tree: &mut BlockTree,
    cache: &mut GeometryCache,
    parent: &BlockId,
    position: Option<usize>,
) -> Result<BlockId, StructuralError> {
    match apply(
        tree,
        cache,
        Mutation::InsertUnder {
            parent: parent.clone(),
            position,
            id: None,
            kind: BlockKind::Text,
            payload: Value::Null,
        },
    )? {
        MutationOutcome::Inserted(id) => Ok(id),
        _ => unreachable!("InsertUnder yields Inserted"),
    }
}

/// Remove a block and its subtree; returns the detached block.
pub fn remove(
    tree: &mut BlockTree,
    cache: &mut GeometryCache,
    id: &BlockId,
) -> Result<Block, StructuralError> {
    match apply(tree, cache, Mutation::Remove { id: id.clone() })? {
        MutationOutcome::Removed(block) => Ok(block),
        _ => unreachable!("Remove yields Removed"),
    }
}

/// Re-parent a block to `new_parent` at `position`.
pub fn move_block(
    tree: &mut BlockTree,
    cache: &mut GeometryCache,
    id: &BlockId,
    new_parent: &BlockId,
    position: usize,
) -> Result<(), StructuralError> {
    apply(
        tree,
        cache,
        Mutation::Move {
            id: id.clone(),
            new_parent: new_parent.clone(),
            position,
        },
    )
    .map(|_| ())
}

fn validate_new_id(tree: &BlockTree, id: Option<BlockId>) -> Result<BlockId, StructuralError> {
    match id {
        Some(id) if tree.contains(&id) => Err(StructuralError::DuplicateBlock(id)),
        Some(id) => Ok(id),
        None => Ok(BlockId::generate()),
    }
}
