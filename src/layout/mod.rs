//! Layout engine for the virtualized tablix.
//!
//! This module handles:
//! - The per-axis fit/convergence algorithm (`DimensionLayoutManager`)
//! - Column/row and canvas/dashboard strategies
//! - Spanning-header reconciliation
//! - Session orchestration across both axes (`TablixLayoutManager`)

mod dimension_layout;
mod grid;
mod spanning;
mod strategy;
mod tablix_layout;

pub use dimension_layout::{DimensionLayoutManager, SessionOptions};
pub use grid::{AxisView, TablixGrid};
pub use spanning::reconcile;
pub use strategy::{
    device_extent, AxisSpec, AxisStrategy, Canvas, CanvasColumns, CanvasRows, ColumnAxis,
    Dashboard, DashboardColumns, DashboardRows, LayoutStrategy, RowAxis, ScrollProbe, SizingMode,
};
pub use tablix_layout::{ColumnGeometry, LayoutGeometry, LayoutOutcome, RowGeometry, TablixLayoutManager};
