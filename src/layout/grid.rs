//! Shared state of one tablix: both dimensions and both realized arenas.

use serde::Serialize;

use crate::types::{Axis, Dimension, RealizedItems};

/// Everything the two layout managers read and write during a session.
///
/// Each manager borrows its own axis mutably and the orthogonal axis
/// immutably through [`TablixGrid::axis_mut`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablixGrid {
    pub columns: Dimension,
    pub rows: Dimension,
    pub column_items: RealizedItems,
    pub row_items: RealizedItems,
}

/// Split borrow of a [`TablixGrid`] from one axis' point of view.
pub struct AxisView<'g> {
    pub dimension: &'g mut Dimension,
    pub items: &'g mut RealizedItems,
    pub orthogonal: &'g Dimension,
    pub orthogonal_items: &'g RealizedItems,
}

impl Default for TablixGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl TablixGrid {
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: Dimension::new(Axis::Column),
            rows: Dimension::new(Axis::Row),
            column_items: RealizedItems::new(),
            row_items: RealizedItems::new(),
        }
    }

    #[must_use]
    pub const fn dimension(&self, axis: Axis) -> &Dimension {
        match axis {
            Axis::Column => &self.columns,
            Axis::Row => &self.rows,
        }
    }

    pub fn dimension_mut(&mut self, axis: Axis) -> &mut Dimension {
        match axis {
            Axis::Column => &mut self.columns,
            Axis::Row => &mut self.rows,
        }
    }

    #[must_use]
    pub const fn items(&self, axis: Axis) -> &RealizedItems {
        match axis {
            Axis::Column => &self.column_items,
            Axis::Row => &self.row_items,
        }
    }

    /// Borrow `axis` mutably alongside read access to the orthogonal axis.
    pub fn axis_mut(&mut self, axis: Axis) -> AxisView<'_> {
        match axis {
            Axis::Column => AxisView {
                dimension: &mut self.columns,
                items: &mut self.column_items,
                orthogonal: &self.rows,
                orthogonal_items: &self.row_items,
            },
            Axis::Row => AxisView {
                dimension: &mut self.rows,
                items: &mut self.row_items,
                orthogonal: &self.columns,
                orthogonal_items: &self.column_items,
            },
        }
    }
}
