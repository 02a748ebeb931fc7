//! Fixed tile sizing for dashboard layouts.

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::types::{floor_index, Axis, Viewport};

/// Computes uniform cell sizes for layouts that never measure content.
///
/// As many columns as fit at the configured minimum width share the viewport
/// width equally; rows get a fixed height.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeComputationManager {
    #[serde(skip)]
    config: DashboardConfig,
    visible_columns: usize,
    cell_width: f64,
    cell_height: f64,
}

impl SizeComputationManager {
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        let cell_height = config.row_height;
        Self {
            config,
            visible_columns: 0,
            cell_width: 0.0,
            cell_height,
        }
    }

    /// Recompute tile sizes for a viewport and column count.
    pub fn update(&mut self, viewport: &Viewport, column_count: usize) {
        let fitting = floor_index(viewport.width / self.config.min_column_width);
        self.visible_columns = column_count.min(fitting).max(1);
        self.cell_width = viewport.width / self.visible_columns as f64;
        self.cell_height = self.config.row_height;
    }

    #[must_use]
    pub const fn visible_columns(&self) -> usize {
        self.visible_columns
    }

    #[must_use]
    pub const fn cell_width(&self) -> f64 {
        self.cell_width
    }

    /// Tile size along `axis`.
    #[must_use]
    pub const fn cell_size(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Column => self.cell_width,
            Axis::Row => self.cell_height,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(600.0, 20, 8, 75.0 ; "columns limited by width")]
    #[test_case(600.0, 4, 4, 150.0 ; "few columns stretch")]
    #[test_case(50.0, 20, 1, 50.0 ; "narrow viewport keeps one column")]
    #[test_case(600.0, 0, 1, 600.0 ; "empty content keeps one tile")]
    fn test_tile_width(width: f64, columns: usize, visible: usize, cell_width: f64) {
        let mut sizing = SizeComputationManager::new(DashboardConfig::default());
        sizing.update(&Viewport::new(width, 400.0), columns);
        assert_eq!(sizing.visible_columns(), visible);
        assert_eq!(sizing.cell_width(), cell_width);
        assert_eq!(sizing.cell_size(Axis::Row), 20.0);
    }
}
