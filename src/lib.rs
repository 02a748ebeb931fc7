//! tablix - virtualized layout engine for pivot tables
//!
//! Lays out large, hierarchically grouped grids inside a bounded viewport:
//! - Only the visible rows and columns are realized
//! - Fractional scroll offsets with exact end alignment
//! - Row and column layouts converge together across iterations
//! - Spanning headers always cover their leaves
//! - Coalesced interactive column resizing
//!
//! # Usage (Rust)
//!
//! ```
//! use tablix::{Axis, LayoutConfig, ManualFrameScheduler, StaticAxis, StaticContent, TablixControl, Viewport};
//! use tablix::layout::Canvas;
//!
//! let content = StaticContent::new(StaticAxis::uniform(10, 80.0), StaticAxis::uniform(1, 20.0));
//! let mut control: TablixControl<_, Canvas, _> = TablixControl::new(
//!     content,
//!     &LayoutConfig::default(),
//!     Viewport::new(500.0, 300.0),
//!     ManualFrameScheduler::new(),
//! )
//! .unwrap();
//! control.scroll_to(Axis::Column, 9.0);
//! let outcome = control.render();
//! assert!(outcome.converged);
//! assert!((control.grid().columns.scroll_offset() - 3.75).abs() < 1e-9);
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { compute_layout } from 'tablix';
//! await init();
//! const report = JSON.parse(compute_layout(JSON.stringify(doc)));
//! ```

pub mod config;
pub mod content;
pub mod control;
pub mod document;
pub mod error;
pub mod layout;
pub mod realization;
pub mod resize;
pub mod sizing;
pub mod types;
#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use config::LayoutConfig;
pub use content::{GridContent, StaticAxis, StaticContent, StaticHeader, StaticLevel};
pub use control::{AxisReport, LayoutReport, TablixControl};
pub use document::{compute_layout_json, LayoutDocument, LayoutMode};
pub use error::TablixError;
pub use layout::{LayoutGeometry, LayoutOutcome, TablixLayoutManager};
pub use resize::{FrameScheduler, ManualFrameScheduler};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use web::TablixView;

/// Lay out a JSON layout document and return the report as JSON
///
/// # Errors
/// Returns an error if the document is malformed or its configuration invalid.
#[wasm_bindgen]
pub fn compute_layout(json: &str) -> Result<String, JsValue> {
    compute_layout_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
