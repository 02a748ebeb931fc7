//! Column resize tests
//!
//! Pointer moves between two display frames coalesce into a single layout
//! pass that applies the latest delta.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{control, uniform, Control};
use tablix::layout::Canvas;
use tablix::resize::FrameHandle;
use tablix::{
    Axis, FrameScheduler, LayoutConfig, StaticContent, TablixControl, TablixError, Viewport,
};

fn rendered(viewport: Viewport) -> Control {
    let mut control = control(uniform(10, 80.0, 5, 20.0), viewport);
    control.render();
    control
}

/// Host frame loop: deliver the scheduled frame, if any.
fn deliver_frame(control: &mut Control) -> bool {
    control.scheduler_mut().take_frame().is_some() && control.on_frame().is_some()
}

#[test]
fn test_moves_coalesce_into_one_pass() {
    let mut control = rendered(Viewport::new(500.0, 300.0));
    let passes = control.layout_passes();
    control.on_start_resize(2).unwrap();

    for delta in [5.0, 10.0, 15.0, 20.0] {
        control.on_resize(delta).unwrap();
    }
    assert_eq!(control.scheduler().requested(), 1);
    assert_eq!(control.layout_passes(), passes);
    assert_eq!(control.leaf_size(Axis::Column, 2), Some(80.0));

    assert!(deliver_frame(&mut control));
    assert_eq!(control.layout_passes(), passes + 1);
    assert_eq!(control.leaf_size(Axis::Column, 2), Some(100.0));
    assert!(control.on_frame().is_none());
}

#[test]
fn test_each_frame_schedules_again() {
    let mut control = rendered(Viewport::new(500.0, 300.0));
    control.on_start_resize(2).unwrap();

    control.on_resize(10.0).unwrap();
    assert!(deliver_frame(&mut control));
    control.on_resize(30.0).unwrap();
    assert!(deliver_frame(&mut control));

    assert_eq!(control.scheduler().requested(), 2);
    assert_eq!(control.leaf_size(Axis::Column, 2), Some(110.0));
}

#[test]
fn test_end_flushes_pending_pass() {
    let mut control = rendered(Viewport::new(500.0, 300.0));
    let passes = control.layout_passes();
    control.on_start_resize(2).unwrap();
    control.on_resize(30.0).unwrap();

    assert!(control.on_end_resize().is_some());

    assert_eq!(control.scheduler().cancelled(), 1);
    assert_eq!(control.scheduler().pending(), None);
    assert_eq!(control.layout_passes(), passes + 1);
    assert_eq!(control.leaf_size(Axis::Column, 2), Some(110.0));
    assert!(!control.resizer().is_resizing());
    assert!(control.on_frame().is_none());
}

#[test]
fn test_end_after_frame_runs_nothing() {
    let mut control = rendered(Viewport::new(500.0, 300.0));
    control.on_start_resize(2).unwrap();
    control.on_resize(20.0).unwrap();
    assert!(deliver_frame(&mut control));
    let passes = control.layout_passes();

    assert!(control.on_end_resize().is_none());
    assert_eq!(control.layout_passes(), passes);
    assert_eq!(control.scheduler().cancelled(), 0);
}

#[test]
fn test_width_clamped_to_minimum() {
    let mut control = rendered(Viewport::new(500.0, 300.0));
    control.on_start_resize(2).unwrap();
    control.on_resize(-500.0).unwrap();
    control.on_end_resize();

    assert_eq!(
        control.leaf_size(Axis::Column, 2),
        Some(LayoutConfig::default().min_column_width)
    );
}

#[test]
fn test_device_delta_is_scaled() {
    let mut control = rendered(Viewport::new(500.0, 300.0).with_scale(2.0));
    control.on_start_resize(2).unwrap();
    control.on_resize(40.0).unwrap();
    control.on_end_resize();

    assert_eq!(control.leaf_size(Axis::Column, 2), Some(100.0));
}

#[test]
fn test_reset_discards_pending_pass() {
    let mut control = rendered(Viewport::new(500.0, 300.0));
    let passes = control.layout_passes();
    control.on_start_resize(2).unwrap();
    control.on_resize(20.0).unwrap();

    control.on_reset();

    assert_eq!(control.scheduler().cancelled(), 1);
    assert_eq!(control.scheduler().pending(), None);
    assert!(control.on_frame().is_none());
    assert_eq!(control.layout_passes(), passes);
    assert_eq!(control.leaf_size(Axis::Column, 2), Some(80.0));
}

#[test]
fn test_widened_column_narrows_window() {
    let mut control = rendered(Viewport::new(500.0, 300.0));
    assert_eq!(control.grid().column_items.last_leaf_index(), Some(6));
    control.on_start_resize(2).unwrap();
    control.on_resize(100.0).unwrap();
    control.on_end_resize();

    // 80 + 80 + 180 + 80 + 80 fills the 500px exactly.
    assert_eq!(control.grid().column_items.last_leaf_index(), Some(4));
}

#[test]
fn test_resized_width_survives_scrolling() {
    let mut control = rendered(Viewport::new(500.0, 300.0));
    control.on_start_resize(2).unwrap();
    control.on_resize(20.0).unwrap();
    control.on_end_resize();

    control.scroll_to(Axis::Column, 1.0);
    control.render();

    assert_eq!(control.leaf_size(Axis::Column, 2), Some(100.0));
}

#[test]
fn test_target_is_followed_through_scrolls() {
    let mut control = rendered(Viewport::new(500.0, 300.0));
    control.on_start_resize(2).unwrap();
    assert_eq!(control.resizer().state().unwrap().realized_slot, Some(2));

    control.scroll_to(Axis::Column, 1.0);
    control.render();

    assert_eq!(control.resizer().state().unwrap().realized_slot, Some(1));
}

#[test]
fn test_gesture_abandoned_when_target_scrolls_away() {
    let mut control = rendered(Viewport::new(500.0, 300.0));
    control.on_start_resize(2).unwrap();
    control.on_resize(20.0).unwrap();

    control.scroll_to(Axis::Column, 3.0);
    control.render();

    assert!(!control.resizer().is_resizing());
    assert_eq!(control.scheduler().cancelled(), 1);
    assert!(control.on_frame().is_none());
    assert_eq!(control.leaf_size(Axis::Column, 3), Some(80.0));
}

#[test]
fn test_errors_outside_gesture() {
    let mut control = rendered(Viewport::new(500.0, 300.0));
    assert!(matches!(control.on_resize(5.0), Err(TablixError::NoActiveResize)));
    assert!(matches!(
        control.on_start_resize(9),
        Err(TablixError::UnrealizedColumn(9))
    ));
    assert!(control.on_end_resize().is_none());
}

/// A host without a frame loop: every request fails.
#[derive(Default)]
struct NoFrames;

impl FrameScheduler for NoFrames {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        None
    }

    fn cancel_frame(&mut self, _handle: FrameHandle) {}
}

#[test]
fn test_moves_apply_immediately_without_frames() {
    let mut control: TablixControl<StaticContent, Canvas, NoFrames> = TablixControl::new(
        uniform(10, 80.0, 5, 20.0),
        &LayoutConfig::default(),
        Viewport::new(500.0, 300.0),
        NoFrames,
    )
    .unwrap();
    control.render();
    control.on_start_resize(2).unwrap();

    control.on_resize(10.0).unwrap();
    control.on_resize(20.0).unwrap();

    assert_eq!(control.layout_passes(), 3);
    assert_eq!(control.leaf_size(Axis::Column, 2), Some(100.0));
    assert!(control.on_end_resize().is_none());
}
