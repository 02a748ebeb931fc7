//! Axis, size and viewport primitives.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TablixError};

/// One of the two grid axes.
///
/// Columns are laid out horizontally (their contextual size is a width), rows
/// vertically (a height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    Column,
    Row,
}

impl Axis {
    /// The other axis.
    #[must_use]
    pub const fn orthogonal(self) -> Self {
        match self {
            Self::Column => Self::Row,
            Self::Row => Self::Column,
        }
    }

    /// Size along this axis.
    #[must_use]
    pub const fn extent(self, size: Size) -> f64 {
        match self {
            Self::Column => size.width,
            Self::Row => size.height,
        }
    }

    /// Parse the names used by host bindings (`"column"`/`"row"`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "column" | "columns" | "col" => Some(Self::Column),
            "row" | "rows" => Some(Self::Row),
            _ => None,
        }
    }
}

/// Measured content size in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The area available to the grid, in logical pixels, plus the per-axis
/// logical-to-device pixel ratio of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    /// Create a viewport at 100% scale.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Apply the same device pixel ratio to both axes.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale_x = scale;
        self.scale_y = scale;
        self
    }

    /// Space available along `axis`.
    #[must_use]
    pub const fn available(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Column => self.width,
            Axis::Row => self.height,
        }
    }

    /// Device pixel ratio along `axis`.
    #[must_use]
    pub const fn scale(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Column => self.scale_x,
            Axis::Row => self.scale_y,
        }
    }

    /// Reject negative or non-finite extents and non-positive scales.
    ///
    /// # Errors
    /// Returns [`TablixError::InvalidViewport`] or [`TablixError::InvalidScale`].
    pub fn validate(&self) -> Result<()> {
        let extent_ok = |v: f64| v.is_finite() && v >= 0.0;
        if !extent_ok(self.width) || !extent_ok(self.height) {
            return Err(TablixError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        for scale in [self.scale_x, self.scale_y] {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(TablixError::InvalidScale(scale));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_extent() {
        let size = Size::new(30.0, 12.0);
        assert_eq!(Axis::Column.extent(size), 30.0);
        assert_eq!(Axis::Row.extent(size), 12.0);
        assert_eq!(Axis::Row.orthogonal(), Axis::Column);
    }

    #[test]
    fn test_viewport_validation() {
        assert!(Viewport::new(500.0, 300.0).validate().is_ok());
        assert!(Viewport::new(-1.0, 300.0).validate().is_err());
        assert!(Viewport::new(500.0, f64::NAN).validate().is_err());
        assert!(Viewport::new(500.0, 300.0)
            .with_scale(0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_viewport_json_defaults_scale() {
        let viewport: Viewport = serde_json::from_str(r#"{"width": 10, "height": 20}"#).unwrap();
        assert_eq!(viewport.scale(Axis::Column), 1.0);
        assert_eq!(viewport.available(Axis::Row), 20.0);
    }
}
