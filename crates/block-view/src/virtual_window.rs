//! Virtualized render window.
//!
//! Renders only the subset of slots intersecting (or near) the visible
//! viewport. Each slot is bound to one block id in the flattened visible
//! order; one synthetic leading slot carries the document title. Slots start
//! with an estimated height; the host measures a slot after it first
//! materializes and feeds the real height back, which refines the total
//! content height without moving content the user has already scrolled past.
//!
//! Heights belong to block ids, not slot positions: when the order changes
//! (insert, removal, move), a surviving block carries its measurement to its
//! new slot, and a freshly inserted block starts from the estimate and gets
//! measured after its first render.

use std::collections::HashMap;
use std::ops::Range;

use block_core::BlockId;

/// One materialized slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualItem {
    /// Slot index in the flattened order (0 is the title slot).
    pub index: usize,
    /// Vertical offset of the slot's top edge, content space.
    pub start: f64,
    /// Slot height: measured if available, the estimate otherwise.
    pub height: f64,
    /// Whether `height` is a real measurement.
    pub measured: bool,
}

impl VirtualItem {
    /// Bottom edge of the slot (`start + height`).
    pub fn end(&self) -> f64 {
        self.start + self.height
    }
}

/// Window over an ordered sequence of block slots with estimated-then-
/// measured heights.
#[derive(Debug, Clone)]
pub struct VirtualWindow {
    /// Block id per slot, in render order.
    slots: Vec<BlockId>,
    /// Measured heights, keyed by block id.
    measured: HashMap<BlockId, f64>,
    estimated_height: f64,
    overscan: usize,
    viewport_height: f64,
    scroll_top: f64,
}

impl VirtualWindow {
    /// Create a window over `slots`, all at the estimated height.
    pub fn new(
        slots: Vec<BlockId>,
        estimated_height: f64,
        viewport_height: f64,
        overscan: usize,
    ) -> Self {
        Self {
            slots,
            measured: HashMap::new(),
            estimated_height,
            overscan,
            viewport_height,
            scroll_top: 0.0,
        }
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Block id bound to a slot.
    pub fn slot(&self, index: usize) -> Option<&BlockId> {
        self.slots.get(index)
    }

    /// Current scroll offset.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Rebind the window to a new slot order.
    ///
    /// Measurements follow block ids: a block that survives the change keeps
    /// its measured height at whatever slot it now occupies, a new block
    /// starts from the estimate, and measurements of vanished blocks are
    /// dropped — no slot can stay materialized, or stay "measured", for a
    /// block no longer present.
    pub fn set_slots(&mut self, slots: Vec<BlockId>) {
        self.slots = slots;
        self.measured.retain(|id, _| self.slots.contains(id));
    }

    /// Set the scroll offset (clamped to non-negative).
    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top.max(0.0);
    }

    /// Set the viewport height.
    pub fn set_viewport_height(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height.max(0.0);
    }

    /// Height of one slot: the slot's block's measurement when known, the
    /// estimate otherwise.
    pub fn height_of(&self, index: usize) -> f64 {
        self.slots
            .get(index)
            .and_then(|id| self.measured.get(id))
            .copied()
            .unwrap_or(self.estimated_height)
    }

    /// Whether a slot's block has been measured.
    pub fn is_measured(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .is_some_and(|id| self.measured.contains_key(id))
    }

    /// Top offset of one slot (running sum of preceding slot heights).
    pub fn start_of(&self, index: usize) -> f64 {
        (0..index.min(self.slots.len()))
            .map(|i| self.height_of(i))
            .sum()
    }

    /// Total content height: running sum of all slot heights.
    pub fn total_size(&self) -> f64 {
        self.start_of(self.slots.len())
    }

    /// The contiguous index range to materialize: every slot whose extent
    /// intersects the viewport, widened by the overscan margin on both ends
    /// and clamped to the slot count.
    pub fn range(&self) -> Range<usize> {
        let count = self.slots.len();
        if count == 0 || self.viewport_height <= 0.0 {
            return 0..0;
        }

        let viewport_bottom = self.scroll_top + self.viewport_height;
        let mut first = None;
        let mut last = 0;
        let mut offset = 0.0;
        for index in 0..count {
            let end = offset + self.height_of(index);
            if end > self.scroll_top && offset < viewport_bottom {
                first.get_or_insert(index);
                last = index;
            }
            if offset >= viewport_bottom {
                break;
            }
            offset = end;
        }

        let Some(first) = first else {
            // Scrolled past the end: keep the last slot materialized so the
            // window never goes empty while content exists.
            let start = count.saturating_sub(1 + self.overscan);
            return start..count;
        };
        let start = first.saturating_sub(self.overscan);
        let end = (last + 1 + self.overscan).min(count);
        start..end
    }

    /// Materialize the current range as positioned items.
    pub fn visible_items(&self) -> Vec<VirtualItem> {
        let range = self.range();
        let mut items = Vec::with_capacity(range.len());
        let mut start = self.start_of(range.start);
        for index in range {
            let height = self.height_of(index);
            items.push(VirtualItem {
                index,
                start,
                height,
                measured: self.is_measured(index),
            });
            start += height;
        }
        items
    }

    /// Replace a slot's estimate with a post-render measurement, recorded
    /// against the slot's block id.
    ///
    /// If the slot lies entirely above the viewport top, the scroll offset is
    /// shifted by the height delta so that slots already scrolled past do not
    /// visibly jump.
    pub fn record_measured(&mut self, index: usize, height: f64) {
        let Some(id) = self.slots.get(index).cloned() else {
            return;
        };
        let old = self.height_of(index);
        let start = self.start_of(index);
        self.measured.insert(id, height);

        if start + old <= self.scroll_top {
            self.scroll_top = (self.scroll_top + height - old).max(0.0);
        }
    }

    /// Teardown: drop all slots and measurements and reset the scroll offset.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.measured.clear();
        self.scroll_top = 0.0;
    }
}
