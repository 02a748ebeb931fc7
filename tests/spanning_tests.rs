//! Spanning header tests
//!
//! Headers that need more room than their leaves were measured at widen the
//! last leaf they cover, so no header overhangs its leaves.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_close, control, control_with, grouped_columns, header};
use proptest::prelude::*;
use tablix::{Axis, LayoutConfig, StaticAxis, StaticContent, StaticHeader, Viewport};

fn rows() -> StaticAxis {
    StaticAxis::uniform(4, 20.0)
}

#[test]
fn test_header_deficit_goes_to_last_leaf() {
    let columns = grouped_columns(vec![60.0; 3], vec![header(3, 200.0)]);
    let mut control = control(StaticContent::new(columns, rows()), Viewport::new(500.0, 300.0));
    control.render();

    assert_eq!(control.leaf_size(Axis::Column, 0), Some(60.0));
    assert_eq!(control.leaf_size(Axis::Column, 1), Some(60.0));
    assert_eq!(control.leaf_size(Axis::Column, 2), Some(80.0));
    let items = &control.grid().column_items;
    assert_eq!(items.leaf(0).unwrap().aligning_size, None);
    assert_eq!(items.leaf(2).unwrap().aligning_size, Some(80.0));
    assert_eq!(control.geometry().columns.header_height, 40.0);
}

#[test]
fn test_wide_enough_leaves_are_untouched() {
    let columns = grouped_columns(vec![80.0; 3], vec![header(3, 200.0)]);
    let mut control = control(StaticContent::new(columns, rows()), Viewport::new(500.0, 300.0));
    control.render();

    assert!(control
        .grid()
        .column_items
        .leaves()
        .iter()
        .all(|leaf| leaf.aligning_size.is_none()));
}

#[test]
fn test_nested_headers_reconcile_deepest_first() {
    let columns = StaticAxis::new(vec![50.0; 4], Vec::new())
        .with_level(20.0, vec![header(4, 300.0)])
        .with_level(20.0, vec![header(2, 150.0), header(2, 150.0)])
        .with_level(20.0, Vec::new());
    let mut control = control(StaticContent::new(columns, rows()), Viewport::new(500.0, 300.0));
    control.render();

    // The inner headers widen leaves 1 and 3, which already covers the outer one.
    assert_eq!(control.leaf_size(Axis::Column, 0), Some(50.0));
    assert_eq!(control.leaf_size(Axis::Column, 1), Some(100.0));
    assert_eq!(control.leaf_size(Axis::Column, 2), Some(50.0));
    assert_eq!(control.leaf_size(Axis::Column, 3), Some(100.0));
    assert_eq!(control.geometry().columns.header_height, 60.0);
}

#[test]
fn test_header_with_unrealized_last_leaf_is_skipped() {
    let columns = grouped_columns(vec![60.0; 20], vec![header(10, 700.0), header(10, 700.0)]);
    let mut control = control(StaticContent::new(columns, rows()), Viewport::new(500.0, 300.0));
    control.render();

    let items = &control.grid().column_items;
    assert_eq!(items.last_leaf_index(), Some(8));
    assert!(items.leaves().iter().all(|leaf| leaf.aligning_size.is_none()));
    assert_eq!(control.leaf_size(Axis::Column, 8), Some(60.0));
}

#[test]
fn test_partially_scrolled_header_counts_visible_part() {
    let columns = grouped_columns(
        vec![60.0; 12],
        vec![header(3, 200.0), header(3, 100.0), header(3, 100.0), header(3, 100.0)],
    );
    let mut control = control(StaticContent::new(columns, rows()), Viewport::new(500.0, 300.0));
    control.scroll_to(Axis::Column, 1.5);
    control.render();

    // Half of leaf 1 plus leaf 2 show 90px of the first header's 200px.
    assert_close(control.leaf_size(Axis::Column, 2).unwrap(), 170.0);
    assert_eq!(control.leaf_size(Axis::Column, 1), Some(60.0));
}

#[test]
fn test_fixed_columns_are_not_widened() {
    let config = LayoutConfig {
        auto_size_columns: false,
        ..LayoutConfig::default()
    };
    let columns = grouped_columns(vec![60.0; 3], vec![header(3, 200.0)]);
    let mut control = control_with(
        StaticContent::new(columns, rows()),
        &config,
        Viewport::new(500.0, 300.0),
    );
    control.render();

    assert_eq!(control.leaf_size(Axis::Column, 2), Some(60.0));
    assert_eq!(control.grid().column_items.leaf(2).unwrap().aligning_size, None);
}

#[test]
fn test_aligning_sizes_are_recomputed_each_session() {
    let columns = grouped_columns(vec![60.0; 3], vec![header(3, 200.0)]);
    let mut control = control(StaticContent::new(columns, rows()), Viewport::new(500.0, 300.0));
    control.render();
    control.set_viewport(Viewport::new(520.0, 300.0)).unwrap();
    control.render();

    assert_eq!(control.leaf_size(Axis::Column, 2), Some(80.0));
}

/// Columns partitioned into groups, with the last group cut to fit.
fn grouped(widths: &[u32], groups: &[(usize, u32)]) -> StaticAxis {
    let mut remaining = widths.len();
    let mut headers = Vec::new();
    for (span, size) in groups {
        if remaining == 0 {
            break;
        }
        let span = (*span).min(remaining);
        remaining -= span;
        headers.push(StaticHeader {
            span,
            size: f64::from(*size),
        });
    }
    grouped_columns(widths.iter().copied().map(f64::from).collect(), headers)
}

proptest! {
    #[test]
    fn prop_no_header_overhangs_its_leaves(
        widths in prop::collection::vec(20u32..120, 1..30),
        groups in prop::collection::vec((1usize..5, 20u32..400), 30),
        offset in 0.0f64..30.0,
        viewport in 200u32..900,
    ) {
        let content = StaticContent::new(grouped(&widths, &groups), rows());
        let mut control = control(content, Viewport::new(f64::from(viewport), 300.0));
        control.scroll_to(Axis::Column, offset);
        control.render();

        let ratio = control.grid().columns.first_visible_ratio();
        let items = &control.grid().column_items;
        for spanning in items.headers() {
            if items.position_of_leaf(spanning.last_leaf()).is_none() {
                continue;
            }
            let covered: f64 = items
                .leaves()
                .iter()
                .enumerate()
                .filter(|(_, leaf)| spanning.covers(leaf.index))
                .map(|(position, leaf)| {
                    let r = if position == 0 { ratio } else { 1.0 };
                    r * control.leaf_size(Axis::Column, leaf.index).unwrap()
                })
                .sum();
            prop_assert!(
                covered >= spanning.content_size - 1e-6,
                "header at {} covers {} of {}",
                spanning.first_leaf,
                covered,
                spanning.content_size
            );
        }
    }
}
