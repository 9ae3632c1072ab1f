//! Block tree arena.
//!
//! [`BlockTree`] is the single source of truth for document structure. It is
//! an arena of [`Block`]s indexed by identifier, with parent/child relations
//! stored as id references. The public surface is read-only (the Tree Index
//! collaborator); all structural writes flow through the mutation pipeline in
//! [`crate::mutation`], which keeps the parent/children relation mutually
//! consistent and cycle-free.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block::{Block, BlockId, BlockKind};

/// Arena of blocks plus the root id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTree {
    blocks: HashMap<BlockId, Block>,
    root: BlockId,
}

impl BlockTree {
    /// Create a tree containing only a root/title block with the given payload.
    pub fn new(title_payload: Value) -> Self {
        let root = Block::new(BlockId::generate(), None, BlockKind::Title, title_payload);
        Self::with_root(root)
    }

    /// Create a tree from an explicit root block. The root's parent reference
    /// is discarded and its child list cleared; children are added through the
    /// mutation pipeline.
    pub fn with_root(mut root: Block) -> Self {
        root.parent = None;
        root.children.clear();
        let root_id = root.id.clone();
        let mut blocks = HashMap::new();
        blocks.insert(root_id.clone(), root);
        Self {
            blocks,
            root: root_id,
        }
    }

    /// The root/title block's id.
    pub fn root(&self) -> &BlockId {
        &self.root
    }

    /// Look up a block by id.
    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// Whether a block with this id exists.
    pub fn contains(&self, id: &BlockId) -> bool {
        self.blocks.contains_key(id)
    }

    /// Total number of blocks, root included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the tree is empty. Always `false` for a constructed tree (the
    /// root is never removed), but kept for completeness of the read API.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Parent id of a block, if the block exists and is not the root.
    pub fn parent_of(&self, id: &BlockId) -> Option<&BlockId> {
        self.blocks.get(id).and_then(|b| b.parent.as_ref())
    }

    /// Ordered child ids of a block. Unknown ids yield an empty slice.
    pub fn children_of(&self, id: &BlockId) -> &[BlockId] {
        self.blocks
            .get(id)
            .map(|b| b.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `ancestor` lies on `id`'s parent chain (a block is not its own
    /// ancestor). Used by the mutation pipeline to reject cyclic moves.
    pub fn is_ancestor(&self, ancestor: &BlockId, id: &BlockId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// Depth-first flattening of the tree, root first, children in order.
    /// This is the document's visible block order.
    pub fn flatten(&self) -> Vec<BlockId> {
        let mut out = Vec::with_capacity(self.blocks.len());
        let mut stack = vec![self.root.clone()];
        while let Some(id) = stack.pop() {
            for child in self.children_of(&id).iter().rev() {
                stack.push(child.clone());
            }
            out.push(id);
        }
        out
    }

    // ---- crate-private write path (used only by `mutation`) ----

    /// Insert a new block into the arena and splice its id into the parent's
    /// child list at `position`. The caller has already validated the parent
    /// and clamped the position.
    pub(crate) fn attach(&mut self, block: Block, position: usize) {
        let Some(parent) = block.parent.clone() else {
            return;
        };
        let id = block.id.clone();
        self.blocks.insert(id.clone(), block);
        if let Some(parent_block) = self.blocks.get_mut(&parent) {
            let position = position.min(parent_block.children.len());
            parent_block.children.insert(position, id);
        }
    }

    /// Remove `id` from its parent's child list without touching the arena.
    pub(crate) fn detach(&mut self, id: &BlockId) {
        let Some(parent) = self.parent_of(id).cloned() else {
            return;
        };
        if let Some(parent_block) = self.blocks.get_mut(&parent) {
            parent_block.children.retain(|c| c != id);
        }
    }

    /// Point a detached block at a new parent and splice it into that
    /// parent's child list at `position` (clamped). The caller has already
    /// validated both ends and ruled out cycles.
    pub(crate) fn reattach(&mut self, id: &BlockId, new_parent: &BlockId, position: usize) {
        if let Some(block) = self.blocks.get_mut(id) {
            block.parent = Some(new_parent.clone());
        }
        if let Some(parent_block) = self.blocks.get_mut(new_parent) {
            let position = position.min(parent_block.children.len());
            parent_block.children.insert(position, id.clone());
        }
    }

    /// Remove a detached block and its whole subtree from the arena,
    /// returning every removed id (subtree root first).
    pub(crate) fn remove_subtree(&mut self, id: &BlockId) -> Vec<BlockId> {
        let mut removed = Vec::new();
        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            if let Some(block) = self.blocks.remove(&current) {
                stack.extend(block.children.iter().cloned());
                removed.push(current);
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree_with_children(n: usize) -> (BlockTree, Vec<BlockId>) {
        let mut tree = BlockTree::new(Value::Null);
        let root = tree.root().clone();
        let mut ids = Vec::new();
        for i in 0..n {
            let id = BlockId::new(format!("c{i}"));
            let block = Block::new(id.clone(), Some(root.clone()), BlockKind::Text, Value::Null);
            tree.attach(block, i);
            ids.push(id);
        }
        (tree, ids)
    }

    #[test]
    fn new_tree_has_only_root() {
        let tree = BlockTree::new(Value::Null);
        assert_eq!(tree.len(), 1);
        assert!(tree.get(tree.root()).unwrap().is_root());
        assert!(tree.children_of(tree.root()).is_empty());
    }

    #[test]
    fn children_of_unknown_id_is_empty() {
        let tree = BlockTree::new(Value::Null);
        assert!(tree.children_of(&BlockId::new("nope")).is_empty());
    }

    #[test]
    fn flatten_is_depth_first_in_child_order() {
        let (mut tree, ids) = tree_with_children(2);
        let grandchild = BlockId::new("g0");
        let block = Block::new(
            grandchild.clone(),
            Some(ids[0].clone()),
            BlockKind::Text,
            Value::Null,
        );
        tree.attach(block, 0);

        let order = tree.flatten();
        let expected = vec![
            tree.root().clone(),
            ids[0].clone(),
            grandchild,
            ids[1].clone(),
        ];
        assert_eq!(order, expected);
    }

    #[test]
    fn is_ancestor_walks_parent_chain() {
        let (mut tree, ids) = tree_with_children(1);
        let grandchild = BlockId::new("g0");
        let block = Block::new(
            grandchild.clone(),
            Some(ids[0].clone()),
            BlockKind::Text,
            Value::Null,
        );
        tree.attach(block, 0);

        let root = tree.root().clone();
        assert!(tree.is_ancestor(&root, &grandchild));
        assert!(tree.is_ancestor(&ids[0], &grandchild));
        assert!(!tree.is_ancestor(&grandchild, &ids[0]));
        assert!(!tree.is_ancestor(&grandchild, &grandchild));
    }

    #[test]
    fn remove_subtree_removes_descendants() {
        let (mut tree, ids) = tree_with_children(2);
        let grandchild = BlockId::new("g0");
        let block = Block::new(
            grandchild.clone(),
            Some(ids[0].clone()),
            BlockKind::Text,
            Value::Null,
        );
        tree.attach(block, 0);

        tree.detach(&ids[0]);
        let removed = tree.remove_subtree(&ids[0]);
        assert_eq!(removed.len(), 2);
        assert!(!tree.contains(&ids[0]));
        assert!(!tree.contains(&grandchild));
        assert_eq!(tree.children_of(tree.root()), &[ids[1].clone()]);
    }
}
