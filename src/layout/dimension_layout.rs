//! The per-axis fit/convergence algorithm.
//!
//! A [`DimensionLayoutManager`] decides how many leaves of its axis must be
//! realized to cover the pixel budget and at which scroll offset. No single
//! iteration sees the final measurements (the orthogonal axis changes what
//! gets measured), so each iteration ends with a convergence check and the
//! orchestrator keeps iterating until both axes report done.
//!
//! Scrolling to the end is done in two steps: an approximate backward scroll
//! using the average realized leaf size, then an exact end alignment in the
//! next iteration once the real sizes of the revealed leaves are known.

use log::{debug, trace};

use crate::config::LayoutConfig;
use crate::realization::{RealizationRequest, Realizer};
use crate::sizing::SizeComputationManager;
use crate::types::{floor_index, PageShift, RealizedItem, RealizedItems, ScrollbarState, Viewport};

use super::grid::TablixGrid;
use super::strategy::{LayoutStrategy, ScrollProbe};

/// What changed since the previous session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Content changed: forget the remembered offset and re-realize.
    pub clear: bool,
    pub scrolling: bool,
    pub resizing: bool,
}

/// Runs the convergence algorithm for one axis.
#[derive(Debug, Clone)]
pub struct DimensionLayoutManager<S> {
    strategy: S,
    pixel_tolerance: f64,
    offset_tolerance: f64,
    /// Device pixels to cover, header slots included.
    to_fill: f64,
    scale: f64,
    grid_offset: usize,
    last_offset: Option<f64>,
    align_to_end: bool,
    done: bool,
    measure_enabled: bool,
    has_measured: bool,
    /// Orthogonal scrollbar visibility `to_fill` was computed with.
    budget_scrollbar: bool,
    /// Footer extent (device px) `to_fill` was computed with.
    budget_footer: f64,
}

impl<S: LayoutStrategy> DimensionLayoutManager<S> {
    pub fn new(strategy: S, config: &LayoutConfig) -> Self {
        Self {
            strategy,
            pixel_tolerance: config.pixel_tolerance,
            offset_tolerance: config.offset_tolerance,
            to_fill: 0.0,
            scale: 1.0,
            grid_offset: 0,
            last_offset: None,
            align_to_end: false,
            done: false,
            measure_enabled: false,
            has_measured: false,
            budget_scrollbar: false,
            budget_footer: 0.0,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    #[must_use]
    pub const fn measure_enabled(&self) -> bool {
        self.measure_enabled
    }

    /// Reset per-session state.
    pub fn begin_session(
        &mut self,
        grid: &TablixGrid,
        options: SessionOptions,
        sizing: &SizeComputationManager,
    ) {
        let axis = self.strategy.axis();
        self.done = false;
        self.align_to_end = false;
        self.measure_enabled =
            options.clear || options.scrolling || options.resizing || !self.has_measured;
        self.grid_offset = grid.dimension(axis.orthogonal()).depth();
        if options.clear {
            self.last_offset = None;
        }
        self.strategy.begin_session(sizing);
        if !self.measure_enabled {
            self.done = true;
        }
        debug!(
            "{axis:?} session: measure={} clear={} scrolling={} resizing={}",
            self.measure_enabled, options.clear, options.scrolling, options.resizing
        );
    }

    /// Compute the budget and bring the realized window to the current offset.
    pub fn begin_iteration(&mut self, grid: &mut TablixGrid, viewport: &Viewport, clear: bool) {
        if !self.measure_enabled {
            return;
        }
        let view = self.strategy.axis_view(grid);
        let orthogonal_visible = view.orthogonal.scrollbar().visible;
        if self.done {
            if orthogonal_visible == self.budget_scrollbar {
                return;
            }
            trace!("{:?} reopened: orthogonal scrollbar toggled", self.strategy.axis());
            self.done = false;
        }

        let axis = self.strategy.axis();
        self.scale = self.strategy.scale(viewport);
        let available =
            viewport.available(axis) - self.strategy.orthogonal_scrollbar_width(view.orthogonal);
        self.budget_footer = self.strategy.footer_width(view.items, self.scale);
        self.to_fill = (available * self.scale - self.budget_footer).max(0.0);
        self.budget_scrollbar = orthogonal_visible;

        let offset = view.dimension.scroll_offset();
        if clear {
            view.items.clear_leaves();
        } else if let Some(last) = self.last_offset {
            if let Some(shift) = PageShift::between(floor_index(last), floor_index(offset)) {
                if shift.distance() < view.items.leaf_count() {
                    self.strategy
                        .move_leaves(view.items, shift, view.dimension.item_count());
                } else {
                    view.items.clear_leaves();
                }
            }
        }
        self.last_offset = Some(offset);
        trace!(
            "{axis:?} iteration start: offset={offset:.3} to_fill={:.1}",
            self.to_fill
        );
    }

    /// Ask `realizer` to materialize the window for the current offset.
    pub fn realize<R: Realizer + ?Sized>(&self, grid: &mut TablixGrid, realizer: &R) {
        if !self.measure_enabled {
            return;
        }
        let view = self.strategy.axis_view(grid);
        let scale = self.scale;
        let extent = |item: &RealizedItem| self.strategy.item_extent(item, scale);
        let request = RealizationRequest {
            axis: self.strategy.axis(),
            first_leaf: view.dimension.integer_offset(),
            first_visible_ratio: view.dimension.first_visible_ratio(),
            budget: self.to_fill,
            realize_to_end: self.align_to_end,
            item_count: view.dimension.item_count(),
            grid_offset: self.grid_offset,
            extent: &extent,
        };
        realizer.realize(&request, view.items, view.orthogonal_items);
    }

    /// Measure the realized window against the orthogonal one.
    pub fn measure<R: Realizer + ?Sized>(&self, grid: &mut TablixGrid, realizer: &R) {
        if !self.measure_enabled {
            return;
        }
        let view = self.strategy.axis_view(grid);
        realizer.measure(self.strategy.axis(), view.items, view.orthogonal_items);
    }

    /// Decide whether and how to scroll, update the scrollbar and run the
    /// convergence check.
    pub fn end_iteration(&mut self, grid: &mut TablixGrid) {
        if !self.measure_enabled {
            return;
        }
        // The footer is measured after the budget was computed.
        let footer_stale = self.footer_changed(grid);
        if self.done {
            if footer_stale {
                trace!("{:?} reopened: footer changed", self.strategy.axis());
                self.done = false;
            }
            return;
        }
        let view = self.strategy.axis_view(grid);
        let dimension = view.dimension;
        let items: &RealizedItems = view.items;

        let old = dimension.scroll_offset();
        let item_count = dimension.item_count();
        let ratio = dimension.first_visible_ratio();
        let grid_width = self
            .strategy
            .grid_contextual_width(items, ratio, self.scale);
        let filled = grid_width >= self.to_fill - self.pixel_tolerance;
        let first = items
            .first_leaf_index()
            .unwrap_or_else(|| dimension.integer_offset());
        let reached_end = first + items.leaf_count() >= item_count;
        let all_realized = reached_end && first == 0;

        let mut probe = ScrollProbe {
            offset: old,
            all_realized,
            grid: grid_width,
            to_fill: self.to_fill,
            tolerance: self.pixel_tolerance,
        };
        let mut new = old;
        if filled {
            if self.align_to_end && reached_end {
                new = self.end_aligned_offset(items, old, ratio, grid_width);
            }
        } else if reached_end && item_count > 0 && self.strategy.can_scroll(&probe) {
            new = self.fill_backward_offset(items, old, grid_width);
            if new < old {
                self.align_to_end = true;
            }
        }

        new = dimension.set_scroll_offset(new);
        probe.offset = new;
        let visible = self.strategy.can_scroll(&probe);
        if !visible {
            new = dimension.set_scroll_offset(0.0);
        }
        let was_visible = dimension.scrollbar().visible;
        dimension.set_scrollbar(ScrollbarState {
            view_min: new,
            min: 0.0,
            max: item_count as f64,
            view_size: self.view_size(items, ratio, grid_width),
            visible,
        });

        self.done = (filled || all_realized)
            && visible == was_visible
            && (new - old).abs() < self.offset_tolerance
            && !footer_stale;
        trace!(
            "{:?} iteration end: grid={grid_width:.1}/{:.1} filled={filled} end={reached_end} offset {old:.3}->{new:.3} visible={visible} done={}",
            self.strategy.axis(),
            self.to_fill,
            self.done
        );
    }

    /// Remember measured sizes after an auto-sized session.
    pub fn end_session(&mut self, grid: &TablixGrid) {
        if !self.measure_enabled {
            return;
        }
        if self.strategy.is_auto_sized() {
            let items = self.strategy.realized_items(grid);
            self.strategy.persist(items);
        }
        self.has_measured = true;
    }

    fn footer_changed(&self, grid: &TablixGrid) -> bool {
        let items = self.strategy.realized_items(grid);
        (self.strategy.footer_width(items, self.scale) - self.budget_footer).abs() > f64::EPSILON
    }

    /// `grid / Σ measured`: corrects for device-pixel snapping.
    fn measurement_error(&self, items: &RealizedItems, first_ratio: f64, grid_width: f64) -> f64 {
        let headers: f64 = items
            .header_slots()
            .iter()
            .map(|item| self.strategy.item_size(item) * self.scale)
            .sum();
        let leaves: f64 = items
            .leaves()
            .iter()
            .enumerate()
            .map(|(position, item)| {
                let ratio = if position == 0 { first_ratio } else { 1.0 };
                ratio * self.strategy.item_size(item) * self.scale
            })
            .sum();
        let measured = headers + leaves;
        if measured > 0.0 && grid_width > 0.0 {
            grid_width / measured
        } else {
            1.0
        }
    }

    /// Offset at which the last leaf's trailing edge lands on the budget edge.
    fn end_aligned_offset(
        &self,
        items: &RealizedItems,
        old: f64,
        first_ratio: f64,
        grid_width: f64,
    ) -> f64 {
        let err = self.measurement_error(items, first_ratio, grid_width);
        let mut remaining = (grid_width - self.to_fill).max(0.0);
        let mut offset = old;
        for (position, item) in items.leaves().iter().enumerate() {
            let ratio = if position == 0 { first_ratio } else { 1.0 };
            let extent = self.strategy.item_size(item) * self.scale * err;
            if extent <= 0.0 {
                offset += ratio;
                continue;
            }
            let visible = ratio * extent;
            if remaining < visible {
                offset += remaining / extent;
                break;
            }
            remaining -= visible;
            offset += ratio;
        }
        offset
    }

    /// Approximate offset that would fill the budget, moving back at least
    /// one leaf so every step reveals new content.
    fn fill_backward_offset(&self, items: &RealizedItems, old: f64, grid_width: f64) -> f64 {
        let leaves = items.leaves();
        if leaves.is_empty() {
            return old;
        }
        let total: f64 = leaves
            .iter()
            .map(|item| self.strategy.item_size(item) * self.scale)
            .sum();
        let average = total / leaves.len() as f64;
        if average <= 0.0 {
            return old;
        }
        let ratio = 1.0 - (old - old.floor());
        let err = self.measurement_error(items, ratio, grid_width);
        let shortfall = self.to_fill - grid_width;
        let steps = shortfall / err / average;
        (old - steps).min(old.ceil() - 1.0).max(0.0)
    }

    /// Scrollbar thumb size in leaves: how many leaves, counted from the
    /// window start, fit in the scrollable part of the budget.
    fn view_size(&self, items: &RealizedItems, first_ratio: f64, grid_width: f64) -> f64 {
        let err = self.measurement_error(items, first_ratio, grid_width);
        let headers: f64 = items
            .header_slots()
            .iter()
            .map(|item| self.strategy.item_extent(item, self.scale))
            .sum();
        let area = (self.to_fill - headers).max(0.0);
        let mut used = 0.0;
        let mut count = 0.0;
        for (position, item) in items.leaves().iter().enumerate() {
            let ratio = if position == 0 { first_ratio } else { 1.0 };
            let extent = self.strategy.item_size(item) * self.scale * err;
            let visible = ratio * extent;
            if used + visible > area {
                if extent > 0.0 {
                    count += (area - used) / extent;
                }
                return count;
            }
            used += visible;
            count += ratio;
        }
        count
    }

    /// Total logical size of the header slots at the start of the window.
    #[must_use]
    pub fn header_extent(&self, grid: &TablixGrid) -> f64 {
        self.strategy
            .realized_items(grid)
            .header_slots()
            .iter()
            .map(|item| self.strategy.item_size(item))
            .sum()
    }

    /// Logical size of the visible body, capped at the available area.
    #[must_use]
    pub fn body_extent(&self, grid: &TablixGrid) -> f64 {
        let ratio = grid
            .dimension(self.strategy.axis())
            .first_visible_ratio();
        let body: f64 = self
            .strategy
            .realized_items(grid)
            .leaves()
            .iter()
            .enumerate()
            .map(|(position, item)| {
                let r = if position == 0 { ratio } else { 1.0 };
                r * self.strategy.item_size(item)
            })
            .sum();
        let area = (self.to_fill / self.scale - self.header_extent(grid)).max(0.0);
        body.min(area)
    }

    /// Effective size of a realized leaf.
    #[must_use]
    pub fn leaf_size(&self, grid: &TablixGrid, index: usize) -> Option<f64> {
        self.strategy
            .realized_items(grid)
            .leaf(index)
            .map(|item| self.strategy.item_size(item))
    }
}
