//! Layout configuration.
//!
//! Every field has a default, so hosts only spell out what they change:
//!
//! ```
//! let config = tablix::LayoutConfig::from_json(r#"{"maxIterations": 16}"#).unwrap();
//! assert_eq!(config.max_iterations, 16);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, TablixError};

/// Pixel tolerance used when deciding whether a window is filled.
pub const DEFAULT_PIXEL_TOLERANCE: f64 = 1.0001;

/// Scroll-offset tolerance (in items) for the convergence check.
pub const DEFAULT_OFFSET_TOLERANCE: f64 = 0.01;

/// Upper bound on iterations per rendering session.
pub const DEFAULT_MAX_ITERATIONS: usize = 64;

/// Scrollbar thickness in logical pixels.
pub const DEFAULT_SCROLLBAR_SIZE: f64 = 9.0;

/// Smallest width a column can be dragged to.
pub const DEFAULT_MIN_COLUMN_WIDTH: f64 = 10.0;

/// Engine configuration shared by both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Tolerance (device px) for "window is filled" and "extent exceeds budget".
    pub pixel_tolerance: f64,
    /// Tolerance (items) for the scroll offset convergence check.
    pub offset_tolerance: f64,
    /// Maximum number of iterations the orchestrator runs per session.
    pub max_iterations: usize,
    /// Scrollbar thickness (logical px) subtracted from the orthogonal budget.
    pub scrollbar_size: f64,
    /// Round each item's device extent to whole device pixels.
    pub snap_to_device_pixels: bool,
    /// Minimum width for interactive column resizing (logical px).
    pub min_column_width: f64,
    /// Measure column widths from content instead of restoring persisted ones.
    pub auto_size_columns: bool,
    /// Measure row heights from content instead of restoring persisted ones.
    pub auto_size_rows: bool,
    /// Fixed tile sizing for dashboard layouts.
    pub dashboard: DashboardConfig,
}

/// Settings for [`SizeComputationManager`](crate::sizing::SizeComputationManager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Columns narrower than this are dropped from the visible tile set.
    pub min_column_width: f64,
    /// Fixed row height (logical px).
    pub row_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pixel_tolerance: DEFAULT_PIXEL_TOLERANCE,
            offset_tolerance: DEFAULT_OFFSET_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            scrollbar_size: DEFAULT_SCROLLBAR_SIZE,
            snap_to_device_pixels: true,
            min_column_width: DEFAULT_MIN_COLUMN_WIDTH,
            auto_size_columns: true,
            auto_size_rows: true,
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            min_column_width: 75.0,
            row_height: 20.0,
        }
    }
}

impl LayoutConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the values fail validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that tolerances and sizes are usable.
    ///
    /// # Errors
    /// Returns [`TablixError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        positive("pixelTolerance", self.pixel_tolerance)?;
        positive("offsetTolerance", self.offset_tolerance)?;
        non_negative("scrollbarSize", self.scrollbar_size)?;
        non_negative("minColumnWidth", self.min_column_width)?;
        positive("dashboard.minColumnWidth", self.dashboard.min_column_width)?;
        positive("dashboard.rowHeight", self.dashboard.row_height)?;
        if self.max_iterations == 0 {
            return Err(TablixError::InvalidConfig(
                "maxIterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TablixError::InvalidConfig(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TablixError::InvalidConfig(format!(
            "{name} must not be negative, got {value}"
        )))
    }
}
