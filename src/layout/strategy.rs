//! Per-axis layout strategies.
//!
//! The convergence algorithm in [`DimensionLayoutManager`] is written once;
//! everything that differs between columns and rows, or between measured
//! (canvas) and tiled (dashboard) layouts, is answered by a
//! [`LayoutStrategy`]. [`AxisStrategy`] implements it for any combination of
//! an [`AxisSpec`] and a [`SizingMode`].
//!
//! [`DimensionLayoutManager`]: super::DimensionLayoutManager

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::config::LayoutConfig;
use crate::sizing::SizeComputationManager;
use crate::types::{Axis, Dimension, PageShift, RealizedItem, RealizedItems, Viewport};

use super::grid::{AxisView, TablixGrid};

/// Inputs to the scrollability decision at the end of an iteration.
#[derive(Debug, Clone, Copy)]
pub struct ScrollProbe {
    /// Committed scroll offset.
    pub offset: f64,
    /// The window holds every leaf of the axis.
    pub all_realized: bool,
    /// Realized extent (device px).
    pub grid: f64,
    /// Budget (device px).
    pub to_fill: f64,
    pub tolerance: f64,
}

/// Hooks the shared convergence algorithm needs from one axis.
pub trait LayoutStrategy {
    fn axis(&self) -> Axis;

    /// Logical-to-device pixel ratio for this axis.
    fn scale(&self, viewport: &Viewport) -> f64;

    /// Effective size of an item (logical px).
    fn item_size(&self, item: &RealizedItem) -> f64;

    /// Device-pixel extent of an item.
    fn item_extent(&self, item: &RealizedItem, scale: f64) -> f64;

    /// Device-pixel extent of the realized window, header slots included,
    /// with the first leaf counted at `first_ratio`.
    fn grid_contextual_width(&self, items: &RealizedItems, first_ratio: f64, scale: f64) -> f64;

    fn realized_items<'g>(&self, grid: &'g TablixGrid) -> &'g RealizedItems;

    fn axis_view<'g>(&self, grid: &'g mut TablixGrid) -> AxisView<'g>;

    /// Logical px taken from this axis by the orthogonal axis' scrollbar.
    fn orthogonal_scrollbar_width(&self, orthogonal: &Dimension) -> f64;

    /// Device px reserved for a pinned footer.
    fn footer_width(&self, items: &RealizedItems, scale: f64) -> f64;

    fn is_auto_sized(&self) -> bool;

    fn can_scroll(&self, probe: &ScrollProbe) -> bool;

    /// Relocate the leaf window for a scroll within the current page.
    fn move_leaves(&self, items: &mut RealizedItems, shift: PageShift, item_count: usize);

    fn begin_session(&mut self, sizing: &SizeComputationManager);

    /// Remember measured sizes for when auto-sizing is switched off.
    fn persist(&mut self, items: &RealizedItems);

    fn set_size_override(&mut self, index: usize, size: f64);
}

/// Static description of an axis.
pub trait AxisSpec {
    const AXIS: Axis;
    /// The axis reserves room for the pinned totals footer.
    const HAS_FOOTER: bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnAxis;

#[derive(Debug, Clone, Copy, Default)]
pub struct RowAxis;

impl AxisSpec for ColumnAxis {
    const AXIS: Axis = Axis::Column;
    const HAS_FOOTER: bool = false;
}

impl AxisSpec for RowAxis {
    const AXIS: Axis = Axis::Row;
    const HAS_FOOTER: bool = true;
}

/// How item sizes are obtained along one axis.
pub trait SizingMode {
    fn for_axis(axis: Axis, config: &LayoutConfig) -> Self;

    fn item_size(&self, item: &RealizedItem) -> f64;

    fn is_auto_sized(&self) -> bool;

    fn is_scrollable(&self, probe: &ScrollProbe) -> bool;

    fn begin_session(&mut self, axis: Axis, sizing: &SizeComputationManager);

    fn persist(&mut self, items: &RealizedItems);

    fn set_size_override(&mut self, index: usize, size: f64);

    fn set_auto_size(&mut self, auto_size: bool);
}

/// Sizes measured from realized content.
///
/// With auto-sizing off, leaves keep the sizes persisted by the last
/// auto-sized session. User overrides (from resize gestures) win over both;
/// an aligning size from header reconciliation wins over everything.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    auto_size: bool,
    persisted: HashMap<usize, f64>,
    overrides: HashMap<usize, f64>,
}

impl Canvas {
    #[must_use]
    pub fn new(auto_size: bool) -> Self {
        Self {
            auto_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn persisted_size(&self, index: usize) -> Option<f64> {
        self.persisted.get(&index).copied()
    }

    #[must_use]
    pub fn size_override(&self, index: usize) -> Option<f64> {
        self.overrides.get(&index).copied()
    }
}

impl SizingMode for Canvas {
    fn for_axis(axis: Axis, config: &LayoutConfig) -> Self {
        Self::new(match axis {
            Axis::Column => config.auto_size_columns,
            Axis::Row => config.auto_size_rows,
        })
    }

    fn item_size(&self, item: &RealizedItem) -> f64 {
        if let Some(aligning) = item.aligning_size {
            return aligning;
        }
        if !item.is_leaf() {
            return item.contextual_size;
        }
        if let Some(size) = self.size_override(item.index) {
            return size;
        }
        if !self.auto_size {
            if let Some(size) = self.persisted_size(item.index) {
                return size;
            }
        }
        item.contextual_size
    }

    fn is_auto_sized(&self) -> bool {
        self.auto_size
    }

    fn is_scrollable(&self, probe: &ScrollProbe) -> bool {
        probe.offset > 0.0 || !probe.all_realized || probe.grid > probe.to_fill + probe.tolerance
    }

    fn begin_session(&mut self, _axis: Axis, _sizing: &SizeComputationManager) {}

    fn persist(&mut self, items: &RealizedItems) {
        for leaf in items.leaves() {
            self.persisted.insert(leaf.index, leaf.contextual_size);
        }
    }

    fn set_size_override(&mut self, index: usize, size: f64) {
        self.overrides.insert(index, size);
    }

    fn set_auto_size(&mut self, auto_size: bool) {
        self.auto_size = auto_size;
    }
}

/// Fixed tiles from [`SizeComputationManager`]. Never scrolls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dashboard {
    cell_size: f64,
}

impl SizingMode for Dashboard {
    fn for_axis(_axis: Axis, _config: &LayoutConfig) -> Self {
        Self::default()
    }

    fn item_size(&self, _item: &RealizedItem) -> f64 {
        self.cell_size
    }

    fn is_auto_sized(&self) -> bool {
        false
    }

    fn is_scrollable(&self, _probe: &ScrollProbe) -> bool {
        false
    }

    fn begin_session(&mut self, axis: Axis, sizing: &SizeComputationManager) {
        self.cell_size = sizing.cell_size(axis);
    }

    fn persist(&mut self, _items: &RealizedItems) {}

    fn set_size_override(&mut self, _index: usize, _size: f64) {}

    fn set_auto_size(&mut self, _auto_size: bool) {}
}

/// Device extent of a logical size, optionally snapped to whole device pixels.
#[must_use]
pub fn device_extent(size: f64, scale: f64, snap: bool) -> f64 {
    let extent = size * scale;
    if snap {
        extent.round()
    } else {
        extent
    }
}

/// [`LayoutStrategy`] for axis `A` sized by `M`.
#[derive(Debug, Clone)]
pub struct AxisStrategy<A, M> {
    mode: M,
    scrollbar_size: f64,
    snap: bool,
    axis: PhantomData<A>,
}

impl<A: AxisSpec, M: SizingMode> AxisStrategy<A, M> {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            mode: M::for_axis(A::AXIS, config),
            scrollbar_size: config.scrollbar_size,
            snap: config.snap_to_device_pixels,
            axis: PhantomData,
        }
    }

    pub fn mode(&self) -> &M {
        &self.mode
    }

    pub fn mode_mut(&mut self) -> &mut M {
        &mut self.mode
    }
}

impl<A: AxisSpec, M: SizingMode> LayoutStrategy for AxisStrategy<A, M> {
    fn axis(&self) -> Axis {
        A::AXIS
    }

    fn scale(&self, viewport: &Viewport) -> f64 {
        viewport.scale(A::AXIS)
    }

    fn item_size(&self, item: &RealizedItem) -> f64 {
        self.mode.item_size(item)
    }

    fn item_extent(&self, item: &RealizedItem, scale: f64) -> f64 {
        device_extent(self.item_size(item), scale, self.snap)
    }

    fn grid_contextual_width(&self, items: &RealizedItems, first_ratio: f64, scale: f64) -> f64 {
        let headers: f64 = items
            .header_slots()
            .iter()
            .map(|item| self.item_extent(item, scale))
            .sum();
        let leaves: f64 = items
            .leaves()
            .iter()
            .enumerate()
            .map(|(position, item)| {
                let ratio = if position == 0 { first_ratio } else { 1.0 };
                ratio * self.item_extent(item, scale)
            })
            .sum();
        headers + leaves
    }

    fn realized_items<'g>(&self, grid: &'g TablixGrid) -> &'g RealizedItems {
        grid.items(A::AXIS)
    }

    fn axis_view<'g>(&self, grid: &'g mut TablixGrid) -> AxisView<'g> {
        grid.axis_mut(A::AXIS)
    }

    fn orthogonal_scrollbar_width(&self, orthogonal: &Dimension) -> f64 {
        if orthogonal.scrollbar().visible {
            self.scrollbar_size
        } else {
            0.0
        }
    }

    fn footer_width(&self, items: &RealizedItems, scale: f64) -> f64 {
        if A::HAS_FOOTER {
            device_extent(items.footer_size(), scale, self.snap)
        } else {
            0.0
        }
    }

    fn is_auto_sized(&self) -> bool {
        self.mode.is_auto_sized()
    }

    fn can_scroll(&self, probe: &ScrollProbe) -> bool {
        self.mode.is_scrollable(probe)
    }

    fn move_leaves(&self, items: &mut RealizedItems, shift: PageShift, item_count: usize) {
        items.shift(shift, item_count);
    }

    fn begin_session(&mut self, sizing: &SizeComputationManager) {
        self.mode.begin_session(A::AXIS, sizing);
    }

    fn persist(&mut self, items: &RealizedItems) {
        self.mode.persist(items);
    }

    fn set_size_override(&mut self, index: usize, size: f64) {
        self.mode.set_size_override(index, size);
    }
}

pub type CanvasColumns = AxisStrategy<ColumnAxis, Canvas>;
pub type CanvasRows = AxisStrategy<RowAxis, Canvas>;
pub type DashboardColumns = AxisStrategy<ColumnAxis, Dashboard>;
pub type DashboardRows = AxisStrategy<RowAxis, Dashboard>;
