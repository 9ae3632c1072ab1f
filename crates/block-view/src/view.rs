//! Per-document view composition.
//!
//! [`DocumentView`] owns one document's tree, geometry cache, and
//! virtualization window, and wires the control flow of the core:
//!
//! ```text
//! edit intent → mutation pipeline → cache invalidation
//!            → next-paint flush   → window re-measure → fresh rectangles
//! ```
//!
//! One instance per hosted document; nothing is shared across documents.

use block_core::{
    Block, BlockId, BlockTree, FlushReport, FrameHook, GeometryCache, MeasureSurface, Point, Size,
    StructuralError, mutation,
};
use tracing::debug;

use crate::toolbar::{SelectionSnapshot, toolbar_position};
use crate::virtual_window::{VirtualItem, VirtualWindow};

/// Tuning knobs for a document view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    /// Height assumed for a slot before its first measurement.
    pub estimated_block_height: f64,
    /// Extra slots materialized above and below the viewport.
    pub overscan: usize,
    /// Viewport height; the host updates it on resize.
    pub viewport_height: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            estimated_block_height: 40.0,
            overscan: 5,
            viewport_height: 0.0,
        }
    }
}

/// One document's tree + cache + render window.
pub struct DocumentView {
    tree: BlockTree,
    cache: GeometryCache,
    window: VirtualWindow,
}

impl DocumentView {
    /// Wrap an existing tree. The window starts with one slot per top-level
    /// block plus the synthetic title slot.
    pub fn new(tree: BlockTree, config: ViewConfig) -> Self {
        let window = VirtualWindow::new(
            Vec::new(),
            config.estimated_block_height,
            config.viewport_height,
            config.overscan,
        );
        let mut view = Self {
            tree,
            cache: GeometryCache::new(),
            window,
        };
        view.sync_slots();
        view
    }

    /// Register the "run before next paint" hook on the underlying cache.
    pub fn with_frame_hook(mut self, hook: FrameHook) -> Self {
        self.cache.set_frame_hook(hook);
        self
    }

    /// Read access to the document structure.
    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    /// Read access to cached geometry.
    pub fn cache(&self) -> &GeometryCache {
        &self.cache
    }

    /// Read access to the virtualization window.
    pub fn window(&self) -> &VirtualWindow {
        &self.window
    }

    /// Block id bound to a slot: slot 0 is the title/root, slot `i` (> 0)
    /// is the root's `i - 1`-th child.
    pub fn slot_block(&self, index: usize) -> Option<&BlockId> {
        if index == 0 {
            Some(self.tree.root())
        } else {
            self.tree.children_of(self.tree.root()).get(index - 1)
        }
    }

    /// Insert an empty text block immediately after `anchor`.
    pub fn insert_after(&mut self, anchor: &BlockId) -> Result<BlockId, StructuralError> {
        let id = mutation::insert_after(&mut self.tree, &mut self.cache, anchor)?;
        self.sync_slots();
        Ok(id)
    }

    /// Insert an empty text block under `parent` (append when `position` is
    /// `None`).
    pub fn insert_under(
        &mut self,
        parent: &BlockId,
        position: Option<usize>,
    ) -> Result<BlockId, StructuralError> {
        let id = mutation::insert_under(&mut self.tree, &mut self.cache, parent, position)?;
        self.sync_slots();
        Ok(id)
    }

    /// Remove a block and its subtree; returns the detached block.
    pub fn remove_block(&mut self, id: &BlockId) -> Result<Block, StructuralError> {
        let block = mutation::remove(&mut self.tree, &mut self.cache, id)?;
        self.sync_slots();
        Ok(block)
    }

    /// Re-parent a block to `new_parent` at `position`.
    pub fn move_block(
        &mut self,
        id: &BlockId,
        new_parent: &BlockId,
        position: usize,
    ) -> Result<(), StructuralError> {
        mutation::move_block(&mut self.tree, &mut self.cache, id, new_parent, position)?;
        self.sync_slots();
        Ok(())
    }

    /// Scroll the window to `offset`.
    pub fn scroll_to(&mut self, offset: f64) {
        self.window.set_scroll_top(offset);
    }

    /// Update the viewport height (host resize handler).
    pub fn set_viewport_height(&mut self, height: f64) {
        self.window.set_viewport_height(height);
    }

    /// The slots to render right now.
    pub fn visible_items(&self) -> Vec<VirtualItem> {
        self.window.visible_items()
    }

    /// The scheduled paint callback body.
    ///
    /// Flushes pending geometry, then measures newly materialized slots:
    /// each measured height replaces the slot's estimate and the rectangle
    /// is fed back into the cache, so toolbar reads right after the paint
    /// see post-mutation coordinates.
    pub fn on_frame<S: MeasureSurface>(&mut self, surface: &S) -> FlushReport {
        let report = self.cache.flush(surface);

        for item in self.window.visible_items() {
            if item.measured {
                continue;
            }
            let Some(id) = self.slot_block(item.index).cloned() else {
                continue;
            };
            if let Some(rect) = surface.measure(&id) {
                self.window.record_measured(item.index, rect.height);
                self.cache.seed(id, rect);
            }
        }
        report
    }

    /// Toolbar offset for a selection inside `block_id`, from cached
    /// geometry and the current scroll offset. `None` means render nothing.
    pub fn toolbar_for(
        &self,
        block_id: &BlockId,
        selection: &SelectionSnapshot,
        toolbar: Size,
    ) -> Option<Point> {
        toolbar_position(
            selection,
            self.cache.rect(block_id),
            toolbar,
            self.window.scroll_top(),
        )
    }

    /// Teardown: clear cached geometry, the dirty set, and the window, and
    /// stop any pending scheduled flush. The tree itself is left intact.
    pub fn teardown(&mut self) {
        debug!("tearing down document view");
        self.cache.clear();
        self.window.reset();
    }

    /// Rebind the window's slots to the current top-level child order, title
    /// slot first. Measurements follow block ids across the rebind, so a
    /// structural shift never misattributes a displaced block's height to a
    /// newly inserted one.
    fn sync_slots(&mut self) {
        let root = self.tree.root();
        let mut slots = Vec::with_capacity(self.tree.children_of(root).len() + 1);
        slots.push(root.clone());
        slots.extend(self.tree.children_of(root).iter().cloned());
        self.window.set_slots(slots);
    }
}
