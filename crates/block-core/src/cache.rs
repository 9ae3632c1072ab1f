//! Block geometry cache with dependency-aware invalidation.
//!
//! The cache owns a mapping from block id to its last-measured rectangle plus
//! a dirty set of ids awaiting re-measurement. Reads are deliberately stale
//! (bounded by one paint cycle); freshness arrives through batched flushes
//! scheduled on the host's "before next paint" hook.
//!
//! # Invalidation propagation
//!
//! A change to one block shifts the layout position of every sibling after it
//! and potentially the bounding box of every ancestor, so invalidation walks
//! the ancestor chain upward: at each level, *all* direct children of the
//! parent are marked dirty, then the walk continues from the parent, stopping
//! at the root. This is deliberately coarse — re-measuring a rectangle is far
//! cheaper than computing a minimal invalidation set, and over-invalidation
//! is safe where under-invalidation produces visibly wrong toolbar geometry.
//! Propagation is upward only; a block's own subtree is assumed unaffected
//! unless its size actually changes (in which case its children get
//! invalidated through their own edits).
//!
//! # Flush semantics
//!
//! [`GeometryCache::flush`] drains the dirty set into a fixed snapshot before
//! measuring, so invalidations requested while a flush cycle is in flight are
//! queued for the next cycle. (The borrow checker additionally rules out
//! re-entrant mutation: the measure surface is borrowed immutably while the
//! cache is borrowed mutably.) Measurement misses leave the previous
//! rectangle cached stale; the id becomes eligible again the next time it is
//! materialized and re-invalidated.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::block::BlockId;
use crate::geometry::{FlushReport, Rect};
use crate::surface::MeasureSurface;
use crate::tree::BlockTree;

/// "Run before next paint" callback registration, teardown-safe.
///
/// The hook fires at most once per pending flush: repeated invalidations
/// between two flushes are coalesced into a single request.
pub type FrameHook = Box<dyn FnMut() + Send>;

/// Cache of measured block rectangles plus the pending dirty set.
///
/// One instance per document view; no cross-document sharing. The cache holds
/// only derived data and can be dropped and rebuilt from the rendering
/// surface without loss of correctness.
#[derive(Default)]
pub struct GeometryCache {
    rects: HashMap<BlockId, Rect>,
    dirty: HashSet<BlockId>,
    frame_hook: Option<FrameHook>,
    flush_scheduled: bool,
}

impl GeometryCache {
    /// Create an empty cache with no frame hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the scheduling hook used to request a flush before the next
    /// paint. Replaces any previous hook.
    pub fn set_frame_hook(&mut self, hook: FrameHook) {
        self.frame_hook = Some(hook);
    }

    /// Last known rectangle for a block. Never measures synchronously; the
    /// value may lag the true surface state by up to one paint cycle.
    pub fn rect(&self, id: &BlockId) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    /// Number of ids awaiting re-measurement.
    pub fn pending_len(&self) -> usize {
        self.dirty.len()
    }

    /// Whether an id is currently marked dirty.
    pub fn is_dirty(&self, id: &BlockId) -> bool {
        self.dirty.contains(id)
    }

    /// Whether a flush has been requested and not yet run.
    pub fn is_flush_scheduled(&self) -> bool {
        self.flush_scheduled
    }

    /// Mark a block's geometry (and that of every layout-dependent block) for
    /// re-measurement on the next flush.
    ///
    /// Walks the ancestor chain per the module docs. Invalidating the root
    /// marks the root's own children and nothing else; an unknown id is a
    /// no-op. Marking is idempotent.
    pub fn invalidate(&mut self, tree: &BlockTree, id: &BlockId) {
        let Some(block) = tree.get(id) else {
            trace!(block = %id, "invalidate on unknown block ignored");
            return;
        };
        let start = block.parent.as_ref().unwrap_or(id);
        self.invalidate_under(tree, start);
    }

    /// Mark all direct children of `parent` dirty, then every ancestor
    /// level's children up to the root.
    ///
    /// This is the invalidation walk entered one level up; the mutation
    /// pipeline uses it directly when the changed block no longer resolves
    /// (e.g. after a removal, starting from the removed block's parent).
    pub fn invalidate_under(&mut self, tree: &BlockTree, parent: &BlockId) {
        let mut current = Some(parent.clone());
        while let Some(id) = current {
            for child in tree.children_of(&id) {
                self.dirty.insert(child.clone());
            }
            current = tree.parent_of(&id).cloned();
        }
        if !self.dirty.is_empty() {
            self.request_frame();
        }
    }

    /// Store a rectangle directly, bypassing the dirty set. Used by the
    /// virtualization window to feed back post-render measurements.
    pub fn seed(&mut self, id: BlockId, rect: Rect) {
        self.rects.insert(id, rect);
    }

    /// Drop a block's cached rectangle and any pending invalidation for it.
    pub fn remove(&mut self, id: &BlockId) {
        self.rects.remove(id);
        self.dirty.remove(id);
    }

    /// Re-measure every pending id against the surface.
    ///
    /// The dirty set is drained into a fixed snapshot first: ids invalidated
    /// after this point land in the next flush. Hits are stored; misses keep
    /// their previous rectangle (stale) and are reported.
    pub fn flush<S: MeasureSurface + ?Sized>(&mut self, surface: &S) -> FlushReport {
        self.flush_scheduled = false;
        if self.dirty.is_empty() {
            return FlushReport::default();
        }
        let pending: Vec<BlockId> = self.dirty.drain().collect();
        debug!(count = pending.len(), "flushing block rect cache");

        let mut report = FlushReport::default();
        for id in pending {
            match surface.measure(&id) {
                Some(rect) => {
                    self.rects.insert(id.clone(), rect);
                    report.measured.push(id);
                }
                None => report.missed.push(id),
            }
        }
        report
    }

    /// Teardown: clear rectangles and the dirty set, cancel any scheduled
    /// flush, and release the frame hook.
    pub fn clear(&mut self) {
        self.rects.clear();
        self.dirty.clear();
        self.flush_scheduled = false;
        self.frame_hook = None;
    }

    fn request_frame(&mut self) {
        if self.flush_scheduled {
            return;
        }
        self.flush_scheduled = true;
        if let Some(hook) = self.frame_hook.as_mut() {
            hook();
        }
    }
}

impl std::fmt::Debug for GeometryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryCache")
            .field("rects", &self.rects.len())
            .field("dirty", &self.dirty.len())
            .field("flush_scheduled", &self.flush_scheduled)
            .finish()
    }
}
