//! Interactive column resizing.
//!
//! Pointer moves arrive much faster than the display refreshes. Each move
//! only records the cumulative delta; a single layout pass is scheduled on
//! the next frame and applies whatever delta is current when it runs.

use log::debug;

use crate::error::{Result, TablixError};
use crate::types::RealizedItems;

/// Handle returned by a [`FrameScheduler`].
pub type FrameHandle = u64;

/// The host's "run this on the next display refresh" primitive.
pub trait FrameScheduler {
    /// Schedule a callback for the next frame. `None` if scheduling failed.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler for hosts that drive frames themselves (native hosts and tests).
#[derive(Debug, Clone, Default)]
pub struct ManualFrameScheduler {
    next: FrameHandle,
    pending: Option<FrameHandle>,
    requested: usize,
    cancelled: usize,
}

impl ManualFrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame waiting to be delivered, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Take the pending frame, as the host does when the refresh arrives.
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    #[must_use]
    pub const fn requested(&self) -> usize {
        self.requested
    }

    #[must_use]
    pub const fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.next += 1;
        self.requested += 1;
        self.pending = Some(self.next);
        Some(self.next)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled += 1;
    }
}

/// State of one resize gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    /// Logical index of the column being resized.
    pub target: usize,
    /// Width (logical px) when the gesture started.
    pub original_width: f64,
    /// Cumulative pointer delta since the gesture started (device px).
    pub pending_delta: f64,
    pub pending_frame: Option<FrameHandle>,
    pub scale: f64,
    /// Position of the target among the realized leaves after the last pass.
    pub realized_slot: Option<usize>,
}

impl ResizeState {
    /// Width the column should have for the current delta.
    #[must_use]
    pub fn width(&self, min_width: f64) -> f64 {
        (self.original_width + self.pending_delta / self.scale).max(min_width)
    }

    /// Find the target again after realization may have relocated it.
    pub fn reattach(&mut self, columns: &RealizedItems) {
        self.realized_slot = columns.position_of_leaf(self.target);
    }
}

/// Resize gesture state machine: idle, or resizing one column.
#[derive(Debug, Clone)]
pub struct ColumnResizer {
    state: Option<ResizeState>,
    min_width: f64,
}

impl ColumnResizer {
    #[must_use]
    pub const fn new(min_width: f64) -> Self {
        Self {
            state: None,
            min_width,
        }
    }

    #[must_use]
    pub const fn state(&self) -> Option<&ResizeState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut ResizeState> {
        self.state.as_mut()
    }

    #[must_use]
    pub const fn is_resizing(&self) -> bool {
        self.state.is_some()
    }

    /// The target column is no longer among the realized leaves.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.realized_slot.is_none())
    }

    #[must_use]
    pub const fn min_width(&self) -> f64 {
        self.min_width
    }

    /// Start a gesture on the realized column `target`.
    ///
    /// # Errors
    /// Returns [`TablixError::UnrealizedColumn`] if `target` is not realized.
    pub fn on_start_resize<F: FrameScheduler>(
        &mut self,
        scheduler: &mut F,
        columns: &RealizedItems,
        target: usize,
        original_width: f64,
        scale: f64,
    ) -> Result<()> {
        let slot = columns
            .position_of_leaf(target)
            .ok_or(TablixError::UnrealizedColumn(target))?;
        self.on_reset(scheduler);
        debug!("resize start: column {target} at {original_width:.1}px");
        self.state = Some(ResizeState {
            target,
            original_width,
            pending_delta: 0.0,
            pending_frame: None,
            scale,
            realized_slot: Some(slot),
        });
        Ok(())
    }

    /// Record the cumulative pointer delta. Returns `true` when no frame
    /// could be scheduled and the caller must run the pass immediately.
    ///
    /// # Errors
    /// Returns [`TablixError::NoActiveResize`] outside a gesture.
    pub fn on_resize<F: FrameScheduler>(&mut self, scheduler: &mut F, delta: f64) -> Result<bool> {
        let state = self.state.as_mut().ok_or(TablixError::NoActiveResize)?;
        state.pending_delta = if delta.is_finite() { delta } else { 0.0 };
        if state.pending_frame.is_some() {
            return Ok(false);
        }
        state.pending_frame = scheduler.request_frame();
        Ok(state.pending_frame.is_none())
    }

    /// Consume the scheduled frame. Returns the target and its new width if
    /// a pass is due.
    pub fn take_pending(&mut self) -> Option<(usize, f64)> {
        let min_width = self.min_width;
        let state = self.state.as_mut()?;
        state.pending_frame.take()?;
        Some((state.target, state.width(min_width)))
    }

    /// Width for an immediate pass, without a scheduled frame.
    #[must_use]
    pub fn current(&self) -> Option<(usize, f64)> {
        self.state
            .as_ref()
            .map(|state| (state.target, state.width(self.min_width)))
    }

    /// Finish the gesture. A scheduled frame is cancelled and its pass
    /// returned for the caller to run synchronously.
    pub fn on_end_resize<F: FrameScheduler>(&mut self, scheduler: &mut F) -> Option<(usize, f64)> {
        let state = self.state.take()?;
        debug!("resize end: column {}", state.target);
        let handle = state.pending_frame?;
        scheduler.cancel_frame(handle);
        Some((state.target, state.width(self.min_width)))
    }

    /// Abandon the gesture without applying pending work.
    pub fn on_reset<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        if let Some(handle) = self.state.take().and_then(|state| state.pending_frame) {
            scheduler.cancel_frame(handle);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn columns() -> RealizedItems {
        let mut items = RealizedItems::new();
        for index in 0..4 {
            items.push_leaf(index, 80.0);
        }
        items
    }

    #[test]
    fn test_moves_coalesce_into_one_frame() {
        let mut scheduler = ManualFrameScheduler::new();
        let mut resizer = ColumnResizer::new(10.0);
        resizer
            .on_start_resize(&mut scheduler, &columns(), 2, 80.0, 1.0)
            .unwrap();
        for delta in [5.0, 10.0, 15.0, 20.0] {
            assert!(!resizer.on_resize(&mut scheduler, delta).unwrap());
        }
        assert_eq!(scheduler.requested(), 1);
        assert_eq!(resizer.take_pending(), Some((2, 100.0)));
        assert_eq!(resizer.take_pending(), None);
    }

    #[test]
    fn test_delta_is_scaled_and_clamped() {
        let mut scheduler = ManualFrameScheduler::new();
        let mut resizer = ColumnResizer::new(10.0);
        resizer
            .on_start_resize(&mut scheduler, &columns(), 0, 80.0, 2.0)
            .unwrap();
        resizer.on_resize(&mut scheduler, 40.0).unwrap();
        assert_eq!(resizer.current(), Some((0, 100.0)));
        resizer.on_resize(&mut scheduler, -400.0).unwrap();
        assert_eq!(resizer.current(), Some((0, 10.0)));
    }

    #[test]
    fn test_end_flushes_and_cancels() {
        let mut scheduler = ManualFrameScheduler::new();
        let mut resizer = ColumnResizer::new(10.0);
        resizer
            .on_start_resize(&mut scheduler, &columns(), 1, 80.0, 1.0)
            .unwrap();
        resizer.on_resize(&mut scheduler, -30.0).unwrap();
        assert_eq!(resizer.on_end_resize(&mut scheduler), Some((1, 50.0)));
        assert_eq!(scheduler.cancelled(), 1);
        assert_eq!(scheduler.pending(), None);
        assert!(!resizer.is_resizing());
    }

    #[test]
    fn test_reset_discards_pending_pass() {
        let mut scheduler = ManualFrameScheduler::new();
        let mut resizer = ColumnResizer::new(10.0);
        resizer
            .on_start_resize(&mut scheduler, &columns(), 1, 80.0, 1.0)
            .unwrap();
        resizer.on_resize(&mut scheduler, 30.0).unwrap();
        resizer.on_reset(&mut scheduler);
        assert!(!resizer.is_resizing());
        assert_eq!(resizer.on_end_resize(&mut scheduler), None);
    }

    #[test]
    fn test_errors_without_gesture_or_realized_target() {
        let mut scheduler = ManualFrameScheduler::new();
        let mut resizer = ColumnResizer::new(10.0);
        assert!(matches!(
            resizer.on_resize(&mut scheduler, 1.0),
            Err(TablixError::NoActiveResize)
        ));
        assert!(matches!(
            resizer.on_start_resize(&mut scheduler, &columns(), 9, 80.0, 1.0),
            Err(TablixError::UnrealizedColumn(9))
        ));
    }

    #[test]
    fn test_reattach_follows_logical_index() {
        let mut state = ResizeState {
            target: 3,
            original_width: 80.0,
            pending_delta: 0.0,
            pending_frame: None,
            scale: 1.0,
            realized_slot: Some(3),
        };
        let mut items = columns();
        items.shift(crate::types::PageShift::Forward(2), 10);
        state.reattach(&items);
        assert_eq!(state.realized_slot, Some(1));
    }
}
