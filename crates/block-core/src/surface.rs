//! Rendering-surface measurement port.

use std::collections::HashMap;

use crate::block::BlockId;
use crate::geometry::Rect;

/// Identifier-addressable measurement of rendered blocks.
///
/// The host implements this over its rendering surface (e.g. a DOM lookup by
/// block id attribute). Absence is a valid, expected outcome: the block may
/// be virtualized out of the render window, or already removed from the
/// document. Callers treat `None` as "skip", never as an error.
pub trait MeasureSurface {
    /// Measure the current on-screen rectangle of a block's rendered element,
    /// in the scroll container's content space.
    fn measure(&self, id: &BlockId) -> Option<Rect>;
}

/// A map-backed surface for tests, benches, and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct FixedSurface {
    rects: HashMap<BlockId, Rect>,
}

impl FixedSurface {
    /// Create an empty surface (every measurement misses).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rectangle reported for `id`.
    pub fn insert(&mut self, id: BlockId, rect: Rect) {
        self.rects.insert(id, rect);
    }

    /// Stop reporting a rectangle for `id` (simulates virtualizing out).
    pub fn remove(&mut self, id: &BlockId) {
        self.rects.remove(id);
    }
}

impl MeasureSurface for FixedSurface {
    fn measure(&self, id: &BlockId) -> Option<Rect> {
        self.rects.get(id).copied()
    }
}
