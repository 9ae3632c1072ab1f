//! Geometry primitives and flush reporting.
//!
//! All coordinates live in one consistent space: the scroll container's
//! content space, in `f64` pixels. Rectangles are derived, disposable data —
//! they can always be rebuilt by re-measuring the rendering surface.

use serde::{Deserialize, Serialize};

use crate::block::BlockId;

/// A measured block rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top edge, content space.
    pub top: f64,
    /// Left edge, content space.
    pub left: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge (`top + height`).
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Right edge (`left + width`).
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// A 2D offset/position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Vertical offset.
    pub top: f64,
    /// Horizontal offset.
    pub left: f64,
}

impl Point {
    /// Create a point.
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// A measured element size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Create a size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Outcome of one geometry flush cycle.
///
/// `missed` ids had no rendered element (virtualized out or removed); their
/// previous rectangles, if any, stay cached stale rather than being erased.
#[derive(Debug, Clone, Default)]
pub struct FlushReport {
    /// Ids measured and stored this cycle.
    pub measured: Vec<BlockId>,
    /// Ids whose measurement found no element.
    pub missed: Vec<BlockId>,
}

impl FlushReport {
    /// Total number of ids processed this cycle.
    pub fn processed(&self) -> usize {
        self.measured.len() + self.missed.len()
    }

    /// Whether the flush had nothing to do.
    pub fn is_empty(&self) -> bool {
        self.measured.is_empty() && self.missed.is_empty()
    }
}
