//! The hosting control.
//!
//! [`TablixControl`] is what a host holds on to: it owns the content, the
//! grid state, the layout managers and the resize gesture, and turns host
//! events (scrolls, viewport changes, pointer drags, display refreshes) into
//! layout sessions.

use log::debug;
use serde::Serialize;

use crate::config::LayoutConfig;
use crate::content::GridContent;
use crate::error::{Result, TablixError};
use crate::layout::{
    LayoutGeometry, LayoutOutcome, SessionOptions, SizingMode, TablixGrid, TablixLayoutManager,
};
use crate::realization::{ContentRealizer, Realizer};
use crate::resize::{ColumnResizer, FrameScheduler};
use crate::types::{Axis, RealizationStats, ScrollbarState, Viewport};

/// Snapshot of one axis after a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisReport {
    pub item_count: usize,
    pub scroll_offset: f64,
    pub scrollbar: ScrollbarState,
    pub first_leaf: Option<usize>,
    /// Effective sizes of the realized leaves (logical px).
    pub leaf_sizes: Vec<f64>,
    pub stats: RealizationStats,
}

/// Outcome of the last session plus the realized state of both axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    #[serde(flatten)]
    pub outcome: LayoutOutcome,
    pub columns: AxisReport,
    pub rows: AxisReport,
}

/// A virtualized tablix bound to its content and the host's frame scheduler.
pub struct TablixControl<C, M, F> {
    realizer: ContentRealizer<C>,
    grid: TablixGrid,
    layout: TablixLayoutManager<M>,
    resizer: ColumnResizer,
    scheduler: F,
    viewport: Viewport,
    pending: SessionOptions,
    outcome: LayoutOutcome,
    passes: usize,
}

impl<C: GridContent, M: SizingMode, F: FrameScheduler> TablixControl<C, M, F> {
    /// Create a control. Nothing is laid out until [`Self::render`].
    ///
    /// # Errors
    /// Returns an error if the configuration or viewport is invalid.
    pub fn new(content: C, config: &LayoutConfig, viewport: Viewport, scheduler: F) -> Result<Self> {
        config.validate()?;
        viewport.validate()?;
        let mut control = Self {
            realizer: ContentRealizer::new(content),
            grid: TablixGrid::new(),
            layout: TablixLayoutManager::new(config),
            resizer: ColumnResizer::new(config.min_column_width),
            scheduler,
            viewport,
            pending: SessionOptions {
                clear: true,
                ..SessionOptions::default()
            },
            outcome: LayoutOutcome::default(),
            passes: 0,
        };
        control.sync_item_counts();
        Ok(control)
    }

    /// Run a layout session for everything that changed since the last one.
    pub fn render(&mut self) -> LayoutOutcome {
        let options = std::mem::take(&mut self.pending);
        self.outcome = self.layout.run_session(
            &mut self.grid,
            &self.realizer,
            &self.viewport,
            options,
            self.resizer.state_mut(),
        );
        self.passes += 1;
        if self.resizer.is_detached() {
            debug!("resize target scrolled out of the window, abandoning the gesture");
            self.resizer.on_reset(&mut self.scheduler);
        }
        self.outcome
    }

    /// Replace the content. The next session re-realizes from scratch.
    pub fn set_content(&mut self, content: C) {
        self.realizer.set_content(content);
        self.resizer.on_reset(&mut self.scheduler);
        self.pending.clear = true;
        self.sync_item_counts();
    }

    /// # Errors
    /// Returns an error if the viewport has a negative or non-finite extent or scale.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        viewport.validate()?;
        if viewport != self.viewport {
            self.viewport = viewport;
            self.pending.resizing = true;
        }
        Ok(())
    }

    /// Switch between measuring `axis` from content and restoring the sizes
    /// measured by the last auto-sized session.
    pub fn set_auto_size(&mut self, axis: Axis, auto_size: bool) {
        self.layout.set_auto_size(axis, auto_size);
        self.pending.resizing = true;
    }

    /// Request a scroll offset (in leaves). Returns the clamped offset.
    pub fn scroll_to(&mut self, axis: Axis, offset: f64) -> f64 {
        self.pending.scrolling = true;
        self.grid.dimension_mut(axis).set_scroll_offset(offset)
    }

    /// Scroll by `delta` leaves. Returns the clamped offset.
    pub fn scroll_by(&mut self, axis: Axis, delta: f64) -> f64 {
        self.pending.scrolling = true;
        self.grid.dimension_mut(axis).scroll_by(delta)
    }

    /// Begin dragging the trailing edge of a realized column.
    ///
    /// # Errors
    /// Returns [`TablixError::UnrealizedColumn`] if the column is not realized.
    pub fn on_start_resize(&mut self, column: usize) -> Result<()> {
        let width = self
            .layout
            .leaf_size(&self.grid, Axis::Column, column)
            .ok_or(TablixError::UnrealizedColumn(column))?;
        self.resizer.on_start_resize(
            &mut self.scheduler,
            &self.grid.column_items,
            column,
            width,
            self.viewport.scale(Axis::Column),
        )
    }

    /// Pointer moved `delta` device px from where the gesture started.
    ///
    /// # Errors
    /// Returns [`TablixError::NoActiveResize`] if no gesture is in progress.
    pub fn on_resize(&mut self, delta: f64) -> Result<()> {
        if self.resizer.on_resize(&mut self.scheduler, delta)? {
            if let Some((column, width)) = self.resizer.current() {
                self.apply_resize(column, width);
            }
        }
        Ok(())
    }

    /// The frame scheduled by a resize move has arrived.
    pub fn on_frame(&mut self) -> Option<LayoutOutcome> {
        let (column, width) = self.resizer.take_pending()?;
        Some(self.apply_resize(column, width))
    }

    /// Finish the gesture, running any pending pass right away.
    pub fn on_end_resize(&mut self) -> Option<LayoutOutcome> {
        let (column, width) = self.resizer.on_end_resize(&mut self.scheduler)?;
        Some(self.apply_resize(column, width))
    }

    /// Abandon the gesture without applying its pending pass.
    pub fn on_reset(&mut self) {
        self.resizer.on_reset(&mut self.scheduler);
    }

    fn apply_resize(&mut self, column: usize, width: f64) -> LayoutOutcome {
        debug!("resize pass: column {column} -> {width:.1}px");
        self.layout.set_size_override(Axis::Column, column, width);
        self.pending.resizing = true;
        self.render()
    }

    fn sync_item_counts(&mut self) {
        for axis in [Axis::Column, Axis::Row] {
            let count = self.realizer.leaf_count(axis);
            self.grid.dimension_mut(axis).set_item_count(count);
        }
    }

    /// Effective size of a realized leaf (logical px).
    #[must_use]
    pub fn leaf_size(&self, axis: Axis, index: usize) -> Option<f64> {
        self.layout.leaf_size(&self.grid, axis, index)
    }

    /// Number of layout sessions run so far.
    #[must_use]
    pub const fn layout_passes(&self) -> usize {
        self.passes
    }

    #[must_use]
    pub const fn outcome(&self) -> &LayoutOutcome {
        &self.outcome
    }

    /// Geometry of the current realized state.
    #[must_use]
    pub fn geometry(&self) -> LayoutGeometry {
        self.layout.geometry(&self.grid)
    }

    #[must_use]
    pub const fn grid(&self) -> &TablixGrid {
        &self.grid
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub const fn resizer(&self) -> &ColumnResizer {
        &self.resizer
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    pub fn content(&self) -> &C {
        self.realizer.content()
    }

    #[must_use]
    pub fn report(&self) -> LayoutReport {
        LayoutReport {
            outcome: self.outcome,
            columns: self.axis_report(Axis::Column),
            rows: self.axis_report(Axis::Row),
        }
    }

    fn axis_report(&self, axis: Axis) -> AxisReport {
        let dimension = self.grid.dimension(axis);
        let items = self.grid.items(axis);
        AxisReport {
            item_count: dimension.item_count(),
            scroll_offset: dimension.scroll_offset(),
            scrollbar: *dimension.scrollbar(),
            first_leaf: items.first_leaf_index(),
            leaf_sizes: items
                .leaves()
                .iter()
                .filter_map(|item| self.leaf_size(axis, item.index))
                .collect(),
            stats: items.stats(),
        }
    }
}
