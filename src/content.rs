//! Grid content sources.
//!
//! The layout engine never looks at cell values; it only asks a
//! [`GridContent`] how many leaves each axis has, how the header levels group
//! them, and how much room each header, corner, body and footer cell needs.
//! [`StaticContent`] answers those questions from precomputed sizes and is
//! what the JSON entry points and the CLI use.

use std::collections::HashMap;
use std::ops::Range;

use serde::Deserialize;

use crate::error::TablixError;
use crate::types::{Axis, Size};

/// Source of structure and measurements for a tablix.
///
/// Header levels are numbered from the outermost (`0`) to the leaf level
/// (`depth - 1`). Leaf-level headers always span exactly one leaf.
pub trait GridContent {
    /// Number of leaf rows or columns.
    fn leaf_count(&self, axis: Axis) -> usize;

    /// Number of header levels along `axis`.
    fn depth(&self, axis: Axis) -> usize;

    /// Leaves covered by the header at `level` that contains `leaf`.
    fn header_span(&self, axis: Axis, level: usize, leaf: usize) -> Range<usize>;

    /// Size the header at `level` starting at `first_leaf` needs.
    fn measure_header(&self, axis: Axis, level: usize, first_leaf: usize) -> Size;

    /// Size the body cell at (`row`, `column`) needs.
    fn measure_cell(&self, row: usize, column: usize) -> Size;

    /// Size of the corner cell where a column header level meets a row header level.
    fn measure_corner(&self, _column_level: usize, _row_level: usize) -> Size {
        Size::ZERO
    }

    /// Size of the pinned footer (totals) cell under `column`, if there is a footer.
    fn measure_footer(&self, _column: usize) -> Option<Size> {
        None
    }
}

/// A grouping header at a non-leaf level.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticHeader {
    pub span: usize,
    /// Size the header content needs along the axis.
    pub size: f64,
}

/// One header level: its thickness across the axis plus, for grouping
/// levels, the headers that partition the leaves.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaticLevel {
    pub thickness: f64,
    pub headers: Vec<StaticHeader>,
}

/// Precomputed structure of one axis.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaticAxis {
    /// Size each leaf needs along the axis.
    pub leaf_sizes: Vec<f64>,
    /// Header levels, outermost first. The last level holds the leaf headers.
    pub levels: Vec<StaticLevel>,
    #[serde(skip)]
    starts: Vec<Vec<usize>>,
}

impl StaticAxis {
    /// Axis with uniform leaf sizes and no header levels.
    #[must_use]
    pub fn uniform(count: usize, size: f64) -> Self {
        Self::new(vec![size; count], Vec::new())
    }

    #[must_use]
    pub fn new(leaf_sizes: Vec<f64>, levels: Vec<StaticLevel>) -> Self {
        let mut axis = Self {
            leaf_sizes,
            levels,
            starts: Vec::new(),
        };
        axis.index_levels();
        axis
    }

    /// Add a header level. Grouping levels go before the leaf level.
    #[must_use]
    pub fn with_level(mut self, thickness: f64, headers: Vec<StaticHeader>) -> Self {
        self.levels.push(StaticLevel { thickness, headers });
        self.index_levels();
        self
    }

    fn index_levels(&mut self) {
        self.starts = self
            .levels
            .iter()
            .map(|level| {
                let mut start = 0;
                level
                    .headers
                    .iter()
                    .map(|header| {
                        let first = start;
                        start += header.span;
                        first
                    })
                    .collect()
            })
            .collect();
    }

    fn validate(&self, name: &str) -> Result<(), TablixError> {
        for (leaf, size) in self.leaf_sizes.iter().enumerate() {
            check_size(&format!("{name}.leafSizes[{leaf}]"), *size)?;
        }
        for (level, data) in self.levels.iter().enumerate() {
            check_size(&format!("{name}.levels[{level}].thickness"), data.thickness)?;
            for (position, header) in data.headers.iter().enumerate() {
                if header.span == 0 {
                    return Err(TablixError::InvalidConfig(format!(
                        "{name}.levels[{level}] has a header with span 0"
                    )));
                }
                check_size(
                    &format!("{name}.levels[{level}].headers[{position}].size"),
                    header.size,
                )?;
            }
        }
        Ok(())
    }

    fn leaf_size(&self, leaf: usize) -> f64 {
        self.leaf_sizes.get(leaf).copied().unwrap_or(0.0)
    }

    fn depth(&self) -> usize {
        self.levels.len()
    }

    fn is_leaf_level(&self, level: usize) -> bool {
        level + 1 >= self.depth()
    }

    fn thickness(&self, level: usize) -> f64 {
        self.levels.get(level).map_or(0.0, |l| l.thickness)
    }

    /// Grouping header at `level` containing `leaf`, with its first leaf.
    fn group(&self, level: usize, leaf: usize) -> Option<(usize, &StaticHeader)> {
        let starts = self.starts.get(level)?;
        let headers = &self.levels.get(level)?.headers;
        let position = starts.partition_point(|start| *start <= leaf).checked_sub(1)?;
        let first = *starts.get(position)?;
        let header = headers.get(position)?;
        (leaf < first + header.span).then_some((first, header))
    }

    fn span(&self, level: usize, leaf: usize) -> Range<usize> {
        if self.is_leaf_level(level) {
            return leaf..leaf + 1;
        }
        self.group(level, leaf)
            .map_or(leaf..leaf + 1, |(first, header)| first..first + header.span)
    }

    /// (along, across) size of the header at `level` starting at `first_leaf`.
    fn header_extent(&self, level: usize, first_leaf: usize) -> (f64, f64) {
        let along = if self.is_leaf_level(level) {
            self.leaf_size(first_leaf)
        } else {
            self.group(level, first_leaf)
                .map_or(0.0, |(_, header)| header.size)
        };
        (along, self.thickness(level))
    }
}

/// Sizes must be finite and non-negative.
fn check_size(field: &str, size: f64) -> Result<(), TablixError> {
    if size.is_finite() && size >= 0.0 {
        Ok(())
    } else {
        Err(TablixError::InvalidConfig(format!(
            "{field} has an invalid size {size}"
        )))
    }
}

/// Size override for a single body cell.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticCell {
    pub row: usize,
    pub column: usize,
    pub width: f64,
    pub height: f64,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StaticContentDef {
    columns: StaticAxis,
    rows: StaticAxis,
    cells: Vec<StaticCell>,
    corner: Option<Size>,
    footer: Option<f64>,
}

/// [`GridContent`] backed by precomputed sizes.
///
/// Body cell (r, c) needs `columns.leafSizes[c]` by `rows.leafSizes[r]`
/// unless an explicit cell entry overrides it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "StaticContentDef")]
pub struct StaticContent {
    columns: StaticAxis,
    rows: StaticAxis,
    cells: HashMap<(usize, usize), Size>,
    corner: Size,
    footer: Option<f64>,
}

impl TryFrom<StaticContentDef> for StaticContent {
    type Error = TablixError;

    fn try_from(def: StaticContentDef) -> Result<Self, Self::Error> {
        def.columns.validate("columns")?;
        def.rows.validate("rows")?;
        for cell in &def.cells {
            let field = format!("cells[{},{}]", cell.row, cell.column);
            check_size(&format!("{field}.width"), cell.width)?;
            check_size(&format!("{field}.height"), cell.height)?;
        }
        if let Some(corner) = def.corner {
            check_size("corner.width", corner.width)?;
            check_size("corner.height", corner.height)?;
        }
        if let Some(footer) = def.footer {
            check_size("footer", footer)?;
        }
        let mut content = Self::new(
            StaticAxis::new(def.columns.leaf_sizes, def.columns.levels),
            StaticAxis::new(def.rows.leaf_sizes, def.rows.levels),
        );
        for cell in def.cells {
            content = content.with_cell(cell.row, cell.column, Size::new(cell.width, cell.height));
        }
        content.corner = def.corner.unwrap_or(Size::ZERO);
        content.footer = def.footer;
        Ok(content)
    }
}

impl StaticContent {
    #[must_use]
    pub fn new(columns: StaticAxis, rows: StaticAxis) -> Self {
        Self {
            columns,
            rows,
            cells: HashMap::new(),
            corner: Size::ZERO,
            footer: None,
        }
    }

    /// Parse content from JSON.
    ///
    /// # Errors
    /// Returns an error for malformed JSON, invalid sizes or zero spans.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_cell(mut self, row: usize, column: usize, size: Size) -> Self {
        self.cells.insert((row, column), size);
        self
    }

    #[must_use]
    pub fn with_corner(mut self, corner: Size) -> Self {
        self.corner = corner;
        self
    }

    /// Pin a totals footer of the given height under the body.
    #[must_use]
    pub fn with_footer(mut self, height: f64) -> Self {
        self.footer = Some(height);
        self
    }

    #[must_use]
    pub fn axis(&self, axis: Axis) -> &StaticAxis {
        match axis {
            Axis::Column => &self.columns,
            Axis::Row => &self.rows,
        }
    }
}

impl GridContent for StaticContent {
    fn leaf_count(&self, axis: Axis) -> usize {
        self.axis(axis).leaf_sizes.len()
    }

    fn depth(&self, axis: Axis) -> usize {
        self.axis(axis).depth()
    }

    fn header_span(&self, axis: Axis, level: usize, leaf: usize) -> Range<usize> {
        self.axis(axis).span(level, leaf)
    }

    fn measure_header(&self, axis: Axis, level: usize, first_leaf: usize) -> Size {
        let (along, across) = self.axis(axis).header_extent(level, first_leaf);
        match axis {
            Axis::Column => Size::new(along, across),
            Axis::Row => Size::new(across, along),
        }
    }

    fn measure_cell(&self, row: usize, column: usize) -> Size {
        self.cells.get(&(row, column)).copied().unwrap_or_else(|| {
            Size::new(self.columns.leaf_size(column), self.rows.leaf_size(row))
        })
    }

    fn measure_corner(&self, _column_level: usize, _row_level: usize) -> Size {
        self.corner
    }

    fn measure_footer(&self, column: usize) -> Option<Size> {
        self.footer
            .map(|height| Size::new(self.columns.leaf_size(column), height))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn grouped() -> StaticContent {
        let columns = StaticAxis::new(vec![60.0; 5], Vec::new())
            .with_level(
                24.0,
                vec![
                    StaticHeader { span: 3, size: 200.0 },
                    StaticHeader { span: 2, size: 50.0 },
                ],
            )
            .with_level(20.0, Vec::new());
        StaticContent::new(columns, StaticAxis::uniform(4, 18.0))
    }

    #[test]
    fn test_group_spans() {
        let content = grouped();
        assert_eq!(content.depth(Axis::Column), 2);
        assert_eq!(content.header_span(Axis::Column, 0, 0), 0..3);
        assert_eq!(content.header_span(Axis::Column, 0, 2), 0..3);
        assert_eq!(content.header_span(Axis::Column, 0, 4), 3..5);
        assert_eq!(content.header_span(Axis::Column, 1, 4), 4..5);
    }

    #[test]
    fn test_leaves_outside_groups_span_themselves() {
        let content = grouped();
        assert_eq!(content.header_span(Axis::Column, 0, 9), 9..10);
        assert_eq!(content.measure_header(Axis::Column, 0, 9).width, 0.0);
    }

    #[test]
    fn test_header_sizes_follow_axis() {
        let content = grouped();
        assert_eq!(
            content.measure_header(Axis::Column, 0, 0),
            Size::new(200.0, 24.0)
        );
        assert_eq!(
            content.measure_header(Axis::Column, 1, 3),
            Size::new(60.0, 20.0)
        );
    }

    #[test]
    fn test_cell_override() {
        let content = grouped().with_cell(1, 2, Size::new(90.0, 40.0));
        assert_eq!(content.measure_cell(1, 2), Size::new(90.0, 40.0));
        assert_eq!(content.measure_cell(0, 2), Size::new(60.0, 18.0));
    }

    #[test]
    fn test_json_content() {
        let json = r#"{
            "columns": {
                "leafSizes": [60, 60, 60],
                "levels": [
                    {"thickness": 20, "headers": [{"span": 3, "size": 200}]},
                    {"thickness": 20}
                ]
            },
            "rows": {"leafSizes": [20, 20]},
            "cells": [{"row": 1, "column": 0, "width": 70, "height": 30}],
            "footer": 22
        }"#;
        let content = StaticContent::from_json(json).unwrap();
        assert_eq!(content.leaf_count(Axis::Column), 3);
        assert_eq!(content.leaf_count(Axis::Row), 2);
        assert_eq!(content.header_span(Axis::Column, 0, 1), 0..3);
        assert_eq!(content.measure_cell(1, 0).width, 70.0);
        assert_eq!(content.measure_footer(2), Some(Size::new(60.0, 22.0)));
    }

    #[test]
    fn test_json_rejects_zero_span() {
        let json = r#"{"columns": {"leafSizes": [1], "levels": [{"headers": [{"span": 0, "size": 1}]}, {}]}}"#;
        assert!(StaticContent::from_json(json).is_err());
    }

    #[test]
    fn test_json_rejects_negative_sizes() {
        for json in [
            r#"{"columns": {"leafSizes": [1], "levels": [{"thickness": -1}]}}"#,
            r#"{"columns": {"leafSizes": [1, 1], "levels": [{"headers": [{"span": 2, "size": -5}]}, {}]}}"#,
            r#"{"cells": [{"row": 0, "column": 0, "width": -3, "height": 1}]}"#,
            r#"{"corner": {"width": 10, "height": -1}}"#,
            r#"{"footer": -22}"#,
        ] {
            let err = StaticContent::from_json(json).unwrap_err();
            assert!(err.to_string().contains("invalid size"), "{json}: {err}");
        }
    }
}
