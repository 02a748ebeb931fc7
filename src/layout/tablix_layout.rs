//! Session orchestration for both axes.
//!
//! [`TablixLayoutManager`] owns one column manager and one row manager and
//! fixes the order in which they run inside an iteration: realize columns,
//! realize rows, measure columns, measure rows, re-attach the resize target,
//! then let both managers scroll and check convergence. Rows depend on which
//! columns are realized and vice versa, so neither manager drives the other.

use log::{debug, warn};
use serde::Serialize;

use crate::config::LayoutConfig;
use crate::realization::Realizer;
use crate::resize::ResizeState;
use crate::sizing::SizeComputationManager;
use crate::types::{Axis, Viewport};

use super::dimension_layout::{DimensionLayoutManager, SessionOptions};
use super::grid::TablixGrid;
use super::spanning::reconcile;
use super::strategy::{AxisStrategy, ColumnAxis, LayoutStrategy, RowAxis, SizingMode};

/// Final column geometry of a session (logical px).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGeometry {
    pub header_height: f64,
    pub body_width: f64,
    pub view_size: f64,
}

/// Final row geometry of a session (logical px).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowGeometry {
    pub header_width: f64,
    pub body_height: f64,
    pub grid_height: f64,
    pub view_size: f64,
    pub footer_height: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutGeometry {
    pub columns: ColumnGeometry,
    pub rows: RowGeometry,
}

/// Result of one rendering session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOutcome {
    pub geometry: LayoutGeometry,
    pub iterations: usize,
    pub converged: bool,
}

/// Drives the column and row managers through a session.
#[derive(Debug, Clone)]
pub struct TablixLayoutManager<M> {
    columns: DimensionLayoutManager<AxisStrategy<ColumnAxis, M>>,
    rows: DimensionLayoutManager<AxisStrategy<RowAxis, M>>,
    sizing: SizeComputationManager,
    max_iterations: usize,
}

impl<M: SizingMode> TablixLayoutManager<M> {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            columns: DimensionLayoutManager::new(AxisStrategy::new(config), config),
            rows: DimensionLayoutManager::new(AxisStrategy::new(config), config),
            sizing: SizeComputationManager::new(config.dashboard.clone()),
            max_iterations: config.max_iterations,
        }
    }

    #[must_use]
    pub const fn sizing(&self) -> &SizeComputationManager {
        &self.sizing
    }

    /// Fix the size of a leaf, as a finished resize gesture does.
    pub fn set_size_override(&mut self, axis: Axis, index: usize, size: f64) {
        match axis {
            Axis::Column => self.columns.strategy_mut().set_size_override(index, size),
            Axis::Row => self.rows.strategy_mut().set_size_override(index, size),
        }
    }

    pub fn set_auto_size(&mut self, axis: Axis, auto_size: bool) {
        match axis {
            Axis::Column => self.columns.strategy_mut().mode_mut().set_auto_size(auto_size),
            Axis::Row => self.rows.strategy_mut().mode_mut().set_auto_size(auto_size),
        }
    }

    /// Effective size of a realized leaf (logical px).
    #[must_use]
    pub fn leaf_size(&self, grid: &TablixGrid, axis: Axis, index: usize) -> Option<f64> {
        match axis {
            Axis::Column => self.columns.leaf_size(grid, index),
            Axis::Row => self.rows.leaf_size(grid, index),
        }
    }

    /// Run one rendering session to convergence (or `max_iterations`).
    pub fn run_session<R: Realizer + ?Sized>(
        &mut self,
        grid: &mut TablixGrid,
        realizer: &R,
        viewport: &Viewport,
        options: SessionOptions,
        mut resize: Option<&mut ResizeState>,
    ) -> LayoutOutcome {
        for axis in [Axis::Column, Axis::Row] {
            let dimension = grid.dimension_mut(axis);
            dimension.set_item_count(realizer.leaf_count(axis));
            dimension.set_depth(realizer.depth(axis));
        }
        self.sizing.update(viewport, grid.columns.item_count());
        self.columns.begin_session(grid, options, &self.sizing);
        self.rows.begin_session(grid, options, &self.sizing);

        let mut iterations = 0;
        while !(self.columns.is_done() && self.rows.is_done()) {
            if iterations >= self.max_iterations {
                warn!(
                    "layout did not converge after {iterations} iterations (columns done: {}, rows done: {})",
                    self.columns.is_done(),
                    self.rows.is_done()
                );
                break;
            }
            let clear = options.clear && iterations == 0;
            self.columns.begin_iteration(grid, viewport, clear);
            self.rows.begin_iteration(grid, viewport, clear);
            self.columns.realize(grid, realizer);
            self.rows.realize(grid, realizer);
            self.columns.measure(grid, realizer);
            self.rows.measure(grid, realizer);
            if let Some(state) = resize.as_deref_mut() {
                state.reattach(&grid.column_items);
            }
            self.columns.end_iteration(grid);
            self.rows.end_iteration(grid);
            iterations += 1;
        }
        let converged = self.columns.is_done() && self.rows.is_done();

        if self.columns.measure_enabled() {
            let ratio = grid.columns.first_visible_ratio();
            reconcile(self.columns.strategy(), &mut grid.column_items, ratio);
        }
        if self.rows.measure_enabled() {
            let ratio = grid.rows.first_visible_ratio();
            reconcile(self.rows.strategy(), &mut grid.row_items, ratio);
        }
        self.columns.end_session(grid);
        self.rows.end_session(grid);

        let geometry = self.geometry(grid);
        debug!(
            "session finished after {iterations} iterations (converged: {converged}): {geometry:?}"
        );
        LayoutOutcome {
            geometry,
            iterations,
            converged,
        }
    }

    /// Geometry of the current realized state.
    #[must_use]
    pub fn geometry(&self, grid: &TablixGrid) -> LayoutGeometry {
        // Column header levels are the leading slots of the row arena and
        // row header levels those of the column arena.
        let header_height = self.rows.header_extent(grid);
        let header_width = self.columns.header_extent(grid);
        let body_height = self.rows.body_extent(grid);
        let footer_height = grid.row_items.footer_size();
        LayoutGeometry {
            columns: ColumnGeometry {
                header_height,
                body_width: self.columns.body_extent(grid),
                view_size: grid.columns.scrollbar().view_size,
            },
            rows: RowGeometry {
                header_width,
                body_height,
                grid_height: header_height + body_height + footer_height,
                view_size: grid.rows.scrollbar().view_size,
                footer_height,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::content::{StaticAxis, StaticContent, StaticHeader};
    use crate::layout::strategy::{Canvas, Dashboard};
    use crate::realization::ContentRealizer;

    fn clear() -> SessionOptions {
        SessionOptions {
            clear: true,
            ..SessionOptions::default()
        }
    }

    #[test]
    fn test_scenario_with_row_headers_and_footer() {
        let rows = StaticAxis::uniform(50, 20.0).with_level(120.0, Vec::new());
        let columns = StaticAxis::uniform(10, 80.0).with_level(24.0, Vec::new());
        let realizer = ContentRealizer::new(StaticContent::new(columns, rows).with_footer(22.0));
        let mut grid = TablixGrid::new();
        let mut layout = TablixLayoutManager::<Canvas>::new(&LayoutConfig::default());

        let outcome = layout.run_session(&mut grid, &realizer, &Viewport::new(500.0, 300.0), clear(), None);

        assert!(outcome.converged);
        let geometry = outcome.geometry;
        assert_eq!(geometry.rows.header_width, 120.0);
        assert_eq!(geometry.columns.header_height, 24.0);
        assert_eq!(geometry.rows.footer_height, 22.0);
        // Row scrollbar takes 9px of width: 491 - 120 = 371px of columns.
        assert_eq!(geometry.columns.body_width, 371.0);
        // Column scrollbar takes 9px of height: 291 - 22 - 24 = 245px of rows.
        assert_eq!(geometry.rows.body_height, 245.0);
        assert_eq!(geometry.rows.grid_height, 24.0 + 245.0 + 22.0);
        assert!(grid.columns.scrollbar().visible);
        assert!(grid.rows.scrollbar().visible);
        assert_eq!(grid.column_items.header_slots().len(), 1);
        assert_eq!(grid.row_items.header_slots().len(), 1);
    }

    #[test]
    fn test_spanning_header_reconciled_after_convergence() {
        let columns = StaticAxis::uniform(3, 60.0)
            .with_level(20.0, vec![StaticHeader { span: 3, size: 200.0 }])
            .with_level(20.0, Vec::new());
        let realizer = ContentRealizer::new(StaticContent::new(columns, StaticAxis::uniform(4, 20.0)));
        let mut grid = TablixGrid::new();
        let mut layout = TablixLayoutManager::<Canvas>::new(&LayoutConfig::default());

        layout.run_session(&mut grid, &realizer, &Viewport::new(500.0, 300.0), clear(), None);

        assert_eq!(grid.column_items.leaf(2).unwrap().aligning_size, Some(80.0));
        assert_eq!(layout.leaf_size(&grid, Axis::Column, 2), Some(80.0));
        assert_eq!(layout.leaf_size(&grid, Axis::Column, 1), Some(60.0));
        assert_eq!(layout.geometry(&grid).columns.header_height, 40.0);
    }

    #[test]
    fn test_dashboard_tiles_fill_width_without_scrolling() {
        let realizer = ContentRealizer::new(StaticContent::new(
            StaticAxis::uniform(20, 300.0),
            StaticAxis::uniform(100, 55.0),
        ));
        let mut grid = TablixGrid::new();
        let mut layout = TablixLayoutManager::<Dashboard>::new(&LayoutConfig::default());

        let outcome = layout.run_session(&mut grid, &realizer, &Viewport::new(600.0, 100.0), clear(), None);

        assert!(outcome.converged);
        assert_eq!(layout.sizing().visible_columns(), 8);
        assert_eq!(grid.column_items.leaf_count(), 8);
        assert_eq!(layout.leaf_size(&grid, Axis::Column, 0), Some(75.0));
        assert_eq!(layout.leaf_size(&grid, Axis::Row, 0), Some(20.0));
        assert!(!grid.columns.scrollbar().visible);
        assert!(!grid.rows.scrollbar().visible);
        assert_eq!(grid.rows.scroll_offset(), 0.0);
    }

    #[test]
    fn test_iteration_limit_reports_non_convergence() {
        let config = LayoutConfig {
            max_iterations: 1,
            ..LayoutConfig::default()
        };
        let realizer = ContentRealizer::new(StaticContent::new(
            StaticAxis::uniform(10, 80.0),
            StaticAxis::uniform(1, 20.0),
        ));
        let mut grid = TablixGrid::new();
        let mut layout = TablixLayoutManager::<Canvas>::new(&config);

        let outcome = layout.run_session(&mut grid, &realizer, &Viewport::new(500.0, 300.0), clear(), None);

        assert_eq!(outcome.iterations, 1);
        assert!(!outcome.converged);
    }
}
