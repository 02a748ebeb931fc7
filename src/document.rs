//! One-shot layout of a JSON document.
//!
//! A document bundles content, configuration, viewport and scroll position:
//!
//! ```
//! let json = r#"{
//!     "content": {"columns": {"leafSizes": [80, 80, 80]}, "rows": {"leafSizes": [20]}},
//!     "viewport": {"width": 500, "height": 300}
//! }"#;
//! let report = tablix::compute_layout_json(json).unwrap();
//! assert!(report.contains("\"converged\":true"));
//! ```

use serde::Deserialize;

use crate::config::LayoutConfig;
use crate::content::StaticContent;
use crate::control::{LayoutReport, TablixControl};
use crate::error::Result;
use crate::layout::{Canvas, Dashboard, SizingMode};
use crate::resize::ManualFrameScheduler;
use crate::types::{Axis, Viewport};

/// How leaf sizes are obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// Measured from content; scrolls.
    #[default]
    Canvas,
    /// Fixed tiles; never scrolls.
    Dashboard,
}

/// Requested scroll offsets, in leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollPosition {
    pub columns: f64,
    pub rows: f64,
}

/// Input of [`compute_layout`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutDocument {
    pub config: LayoutConfig,
    pub mode: LayoutMode,
    pub content: StaticContent,
    pub viewport: Viewport,
    pub scroll: ScrollPosition,
}

impl LayoutDocument {
    /// # Errors
    /// Returns an error if the JSON is malformed or the content is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Lay out a document in a single session.
///
/// # Errors
/// Returns an error if the configuration or viewport is invalid.
pub fn compute_layout(document: LayoutDocument) -> Result<LayoutReport> {
    match document.mode {
        LayoutMode::Canvas => run::<Canvas>(document),
        LayoutMode::Dashboard => run::<Dashboard>(document),
    }
}

/// [`compute_layout`] from and to JSON.
///
/// # Errors
/// Returns an error for malformed input or invalid configuration.
pub fn compute_layout_json(json: &str) -> Result<String> {
    let report = compute_layout(LayoutDocument::from_json(json)?)?;
    Ok(serde_json::to_string(&report)?)
}

fn run<M: SizingMode>(document: LayoutDocument) -> Result<LayoutReport> {
    let LayoutDocument {
        config,
        content,
        viewport,
        scroll,
        ..
    } = document;
    let mut control: TablixControl<StaticContent, M, ManualFrameScheduler> =
        TablixControl::new(content, &config, viewport, ManualFrameScheduler::new())?;
    control.scroll_to(Axis::Column, scroll.columns);
    control.scroll_to(Axis::Row, scroll.rows);
    control.render();
    Ok(control.report())
}
