//! Block data model.
//!
//! A block is one node in a document's content tree (paragraph, heading, list
//! item, ...). The kernel treats block content as opaque: the payload is
//! carried, serialized, and handed back to the host, never interpreted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Opaque, globally unique block identifier.
///
/// Identifiers are plain strings so that host-generated ids (e.g. ids minted
/// by a document store) can be adopted as-is. Fresh ids come from
/// [`BlockId::generate`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh globally unique identifier (UUID v4, simple form).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Coarse block type tag.
///
/// The kernel only distinguishes the title/root block; every other kind is
/// data carried for the host renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// The document title (root of the tree, at most one per document).
    Title,
    /// Plain text paragraph.
    Text,
    /// Heading (level is part of the payload).
    Heading,
    /// Bulleted list item.
    BulletedList,
    /// Numbered list item.
    NumberedList,
    /// Quote block.
    Quote,
    /// Code block.
    Code,
    /// A host-defined kind not known to the kernel.
    Other(String),
}

/// One node in the block tree.
///
/// Parent/child relations are stored as identifier references, never as
/// ownership pointers; the [`BlockTree`](crate::tree::BlockTree) arena owns
/// all blocks. Invariant (maintained by the mutation pipeline, the only
/// write path): a non-root block's id appears exactly once in its parent's
/// `children`, and `parent` is `None` only for the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// This block's identifier.
    pub id: BlockId,
    /// Parent identifier; `None` only for the root/title block.
    pub parent: Option<BlockId>,
    /// Ordered child identifiers.
    pub children: Vec<BlockId>,
    /// Type tag.
    pub kind: BlockKind,
    /// Opaque content payload (e.g. a rich-text delta); never interpreted here.
    pub payload: Value,
}

impl Block {
    /// Create a childless block.
    pub fn new(id: BlockId, parent: Option<BlockId>, kind: BlockKind, payload: Value) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            kind,
            payload,
        }
    }

    /// Whether this block is the document root (title block).
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
