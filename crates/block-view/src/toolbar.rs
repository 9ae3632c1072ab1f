//! Floating-toolbar positioning.
//!
//! A pure consumer of the geometry cache: given the active text selection
//! (from the external editing surface) and the containing block's cached
//! rectangle, compute where the floating toolbar goes. Correctness rests
//! entirely on the cache's freshness guarantee — values may lag the true
//! surface by one paint cycle, which is accepted, bounded imprecision.

use block_core::{Point, Rect, Size};

/// Read-only snapshot of the editing surface's current selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionSnapshot {
    /// Whether the selection is collapsed (a caret, no range).
    pub collapsed: bool,
    /// Plain text covered by the selection.
    pub text: String,
    /// Bounding rectangle of the selection's rendered range, content space;
    /// `None` when the surface has no live range.
    pub rect: Option<Rect>,
}

impl SelectionSnapshot {
    /// A non-collapsed selection with text and a bounding rectangle.
    pub fn new(text: impl Into<String>, rect: Rect) -> Self {
        Self {
            collapsed: false,
            text: text.into(),
            rect: Some(rect),
        }
    }

    /// A collapsed (caret) selection.
    pub fn collapsed() -> Self {
        Self {
            collapsed: true,
            text: String::new(),
            rect: None,
        }
    }
}

/// Toolbar offset relative to the containing block's rendered element.
///
/// Anchors the toolbar directly above the selection with a 5px gap,
/// horizontally centered on it. Returns `None` (render nothing) when the
/// selection is collapsed, its text is empty, the selection range has no
/// rectangle, or the block's rectangle is absent from the cache — absence is
/// never an error.
pub fn toolbar_position(
    selection: &SelectionSnapshot,
    block_rect: Option<Rect>,
    toolbar: Size,
    scroll_top: f64,
) -> Option<Point> {
    if selection.collapsed || selection.text.is_empty() {
        return None;
    }
    let rect = selection.rect?;
    let block = block_rect?;

    Some(Point {
        top: -toolbar.height - 5.0 + (rect.top + scroll_top - block.top),
        left: rect.left - block.left - toolbar.width / 2.0 + rect.width / 2.0,
    })
}
