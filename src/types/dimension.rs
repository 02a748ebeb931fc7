//! Per-axis scroll state.

use serde::{Deserialize, Serialize};

use super::Axis;

/// Scrollbar model for one axis, expressed in leaf-item units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollbarState {
    /// First visible item (the scroll offset).
    pub view_min: f64,
    pub min: f64,
    /// Total number of leaf items.
    pub max: f64,
    /// Thumb size: how many items fit in the scrollable area.
    pub view_size: f64,
    pub visible: bool,
}

/// Logical extent and scroll position of one axis.
///
/// The integer part of the scroll offset is the index of the first (at least
/// partially) visible leaf; the fractional part is the hidden fraction of
/// that leaf. The offset is always kept within `0..=item_count - 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    axis: Axis,
    item_count: usize,
    scroll_offset: f64,
    depth: usize,
    scrollbar: ScrollbarState,
}

impl Dimension {
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            item_count: 0,
            scroll_offset: 0.0,
            depth: 0,
            scrollbar: ScrollbarState::default(),
        }
    }

    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Number of leaf items along this axis.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Number of header levels along this axis.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub const fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    #[must_use]
    pub const fn scrollbar(&self) -> &ScrollbarState {
        &self.scrollbar
    }

    /// Update the item count, re-clamping the current offset.
    pub fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
        self.scroll_offset = self.clamp_offset(self.scroll_offset);
    }

    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    /// Set the scroll offset, clamped to the valid range. Returns the stored value.
    pub fn set_scroll_offset(&mut self, offset: f64) -> f64 {
        self.scroll_offset = self.clamp_offset(offset);
        self.scroll_offset
    }

    /// Scroll by `delta` items. Returns the stored value.
    pub fn scroll_by(&mut self, delta: f64) -> f64 {
        self.set_scroll_offset(self.scroll_offset + delta)
    }

    /// Largest allowed scroll offset.
    #[must_use]
    pub fn max_scroll_offset(&self) -> f64 {
        self.item_count.saturating_sub(1) as f64
    }

    /// Index of the first (partially) visible leaf.
    #[must_use]
    pub fn integer_offset(&self) -> usize {
        floor_index(self.scroll_offset)
    }

    /// Hidden fraction of the first visible leaf.
    #[must_use]
    pub fn fractional_offset(&self) -> f64 {
        self.scroll_offset - self.scroll_offset.floor()
    }

    /// Visible fraction of the first visible leaf.
    #[must_use]
    pub fn first_visible_ratio(&self) -> f64 {
        1.0 - self.fractional_offset()
    }

    pub(crate) fn set_scrollbar(&mut self, scrollbar: ScrollbarState) {
        self.scrollbar = scrollbar;
    }

    fn clamp_offset(&self, offset: f64) -> f64 {
        if offset.is_finite() {
            offset.clamp(0.0, self.max_scroll_offset())
        } else {
            0.0
        }
    }
}

/// Floor a non-negative real to an index. Negative and NaN inputs map to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn floor_index(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        // Saturating cast: huge values become usize::MAX.
        value.floor() as usize
    }
}
