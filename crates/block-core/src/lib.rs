#![warn(missing_docs)]
//! Block Core - Headless Block-Document Rendering-Synchronization Kernel
//!
//! # Overview
//!
//! `block-core` keeps an in-memory tree of content blocks consistent with
//! (a) the measured on-screen positions of those blocks and (b) a stream of
//! structural mutations (insert/delete/move) applied to the tree. It does
//! not render anything itself: the host supplies identifier-addressable
//! measurement (the [`MeasureSurface`] port) and a "run before next paint"
//! scheduling hook, and consumes cached rectangles that are allowed to lag
//! the true surface state by at most one paint cycle.
//!
//! # Core Features
//!
//! - **Block tree arena**: id-indexed blocks with parent/child relations as
//!   references, never ownership pointers
//! - **Single write path**: one [`Mutation`] intent becomes an atomic set of
//!   tree operations; rejected requests touch nothing
//! - **Geometry cache**: stale-read rectangle map with upward-propagating,
//!   deliberately coarse invalidation and batched per-paint flushes
//! - **Snapshot flushes**: invalidations requested during a flush cycle are
//!   queued for the next one, never processed in the current one
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Mutation Pipeline (single write path)      │  ← Edit intents
//! ├─────────────────────────────────────────────┤
//! │  Block Tree Arena (structure of record)     │  ← Parent/child lookup
//! ├─────────────────────────────────────────────┤
//! │  Geometry Cache (rects + dirty set)         │  ← Derived, disposable
//! ├─────────────────────────────────────────────┤
//! │  Ports: MeasureSurface + FrameHook          │  ← Host integration
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use block_core::{BlockTree, FixedSurface, GeometryCache, Rect, mutation};
//!
//! let mut tree = BlockTree::new(serde_json::Value::Null);
//! let mut cache = GeometryCache::new();
//! let root = tree.root().clone();
//!
//! // Build structure through the pipeline.
//! let first = mutation::insert_under(&mut tree, &mut cache, &root, None).unwrap();
//! let second = mutation::insert_after(&mut tree, &mut cache, &first).unwrap();
//! assert_eq!(tree.children_of(&root), &[first.clone(), second.clone()]);
//!
//! // The insert dirtied the sibling level; flush re-measures it.
//! let mut surface = FixedSurface::new();
//! surface.insert(first.clone(), Rect::new(0.0, 0.0, 900.0, 40.0));
//! let report = cache.flush(&surface);
//! assert_eq!(report.measured, vec![first.clone()]);
//! assert_eq!(cache.rect(&first), Some(Rect::new(0.0, 0.0, 900.0, 40.0)));
//! // `second` was never rendered: a miss, kept absent rather than an error.
//! assert_eq!(cache.rect(&second), None);
//! ```
//!
//! # Module Description
//!
//! - [`block`] - `BlockId` / `BlockKind` / `Block` data model
//! - [`tree`] - the block arena and its read-only index API
//! - [`mutation`] - the transactional mutation pipeline
//! - [`cache`] - the geometry cache and invalidation walk
//! - [`geometry`] - `Rect` / `Point` / `Size` / `FlushReport`
//! - [`surface`] - the measurement port and a map-backed test double
//!
//! # Concurrency
//!
//! Single-threaded cooperative scheduling: the host interleaves input
//! handlers, the paint-flush callback, and scroll handlers between `&mut`
//! calls. There is no interior mutability and no blocking I/O; a flush
//! always observes a consistent tree because mutation and flushing cannot
//! overlap.

pub mod block;
pub mod cache;
pub mod geometry;
pub mod mutation;
pub mod surface;
pub mod tree;

pub use block::{Block, BlockId, BlockKind};
pub use cache::{FrameHook, GeometryCache};
pub use geometry::{FlushReport, Point, Rect, Size};
pub use mutation::{Mutation, MutationOutcome, StructuralError};
pub use surface::{FixedSurface, MeasureSurface};
pub use tree::BlockTree;
