#![warn(missing_docs)]
//! Block View - View Composition Layer for `block-core`
//!
//! # Overview
//!
//! `block-view` sits between the headless kernel and the host renderer. It
//! decides which blocks are materialized (virtualized rendering of only the
//! visible subset of a large tree), feeds post-render measurements back into
//! the kernel's geometry cache, and positions floating UI against cached
//! geometry.
//!
//! # Core Features
//!
//! - **Virtualization window**: contiguous slot ranges with estimated-then-
//!   measured heights, overscan margins, and scroll anchoring across
//!   re-measurement
//! - **Toolbar positioning**: a pure consumer of cached rectangles,
//!   tolerant of absence by construction
//! - **Document view**: one owner per document wiring mutation →
//!   invalidation → flush → re-measure, with explicit teardown
//!
//! # Quick Start
//!
//! ```rust
//! use block_core::{BlockTree, FixedSurface, Rect};
//! use block_view::{DocumentView, ViewConfig};
//!
//! let tree = BlockTree::new(serde_json::Value::Null);
//! let mut view = DocumentView::new(tree, ViewConfig {
//!     viewport_height: 600.0,
//!     ..ViewConfig::default()
//! });
//!
//! let root = view.tree().root().clone();
//! let first = view.insert_under(&root, None).unwrap();
//!
//! // Paint: measure what materialized, cache the rectangles.
//! let mut surface = FixedSurface::new();
//! surface.insert(first.clone(), Rect::new(64.0, 0.0, 900.0, 48.0));
//! view.on_frame(&surface);
//! assert_eq!(view.cache().rect(&first).map(|r| r.height), Some(48.0));
//! ```
//!
//! # Module Description
//!
//! - [`virtual_window`] - slot-based virtualization window
//! - [`toolbar`] - floating-toolbar positioning
//! - [`view`] - per-document composition and teardown

pub mod toolbar;
pub mod view;
pub mod virtual_window;

pub use toolbar::{SelectionSnapshot, toolbar_position};
pub use view::{DocumentView, ViewConfig};
pub use virtual_window::{VirtualItem, VirtualWindow};
