//! Common test utilities.
//!
//! Builders for content and controls, plus helpers for reading back the
//! realized window.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use tablix::layout::Canvas;
use tablix::{
    Axis, LayoutConfig, ManualFrameScheduler, RealizedItems, StaticAxis, StaticContent,
    StaticHeader, TablixControl, Viewport,
};

pub type Control = TablixControl<StaticContent, Canvas, ManualFrameScheduler>;

/// Content with uniform leaves and no header levels.
#[must_use]
pub fn uniform(columns: usize, width: f64, rows: usize, height: f64) -> StaticContent {
    StaticContent::new(
        StaticAxis::uniform(columns, width),
        StaticAxis::uniform(rows, height),
    )
}

/// Columns of the given widths under one grouping level.
#[must_use]
pub fn grouped_columns(widths: Vec<f64>, groups: Vec<StaticHeader>) -> StaticAxis {
    StaticAxis::new(widths, Vec::new())
        .with_level(20.0, groups)
        .with_level(20.0, Vec::new())
}

#[must_use]
pub fn header(span: usize, size: f64) -> StaticHeader {
    StaticHeader { span, size }
}

/// Canvas control with the default configuration.
#[must_use]
pub fn control(content: StaticContent, viewport: Viewport) -> Control {
    control_with(content, &LayoutConfig::default(), viewport)
}

#[must_use]
pub fn control_with(content: StaticContent, config: &LayoutConfig, viewport: Viewport) -> Control {
    Control::new(content, config, viewport, ManualFrameScheduler::new())
        .expect("valid control")
}

/// Logical indices of the realized leaves, in window order.
#[must_use]
pub fn realized_indices(items: &RealizedItems) -> Vec<usize> {
    items.leaves().iter().map(|item| item.index).collect()
}

/// Logical extent of the realized leaves with the first one counted at its
/// visible fraction: where the last leaf's trailing edge lands.
#[must_use]
pub fn trailing_edge(control: &Control, axis: Axis) -> f64 {
    let ratio = control.grid().dimension(axis).first_visible_ratio();
    control
        .grid()
        .items(axis)
        .leaves()
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let r = if position == 0 { ratio } else { 1.0 };
            r * control.leaf_size(axis, item.index).unwrap()
        })
        .sum()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
