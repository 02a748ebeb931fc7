//! Realization: materializing the visible window of one axis.
//!
//! The layout managers decide *where* the window starts and how many device
//! pixels it must cover; a [`Realizer`] creates, reuses and drops the
//! [`RealizedItems`] for that window and measures them.

use crate::content::GridContent;
use crate::types::{Axis, RealizedItem, RealizedItems, Size, SpanningHeader};

/// What a manager asks the realizer to materialize for one iteration.
pub struct RealizationRequest<'a> {
    pub axis: Axis,
    /// Logical index of the first (partially) visible leaf.
    pub first_leaf: usize,
    /// Visible fraction of the first leaf.
    pub first_visible_ratio: f64,
    /// Device pixels the window must cover, header slots included.
    pub budget: f64,
    /// Keep realizing past the budget up to the last leaf.
    pub realize_to_end: bool,
    pub item_count: usize,
    /// Number of leading slots reserved for the orthogonal header levels.
    pub grid_offset: usize,
    /// Device-pixel extent of an item as the layout strategy sees it.
    pub extent: &'a dyn Fn(&RealizedItem) -> f64,
}

/// Materializes and measures realized items.
pub trait Realizer {
    fn leaf_count(&self, axis: Axis) -> usize;

    fn depth(&self, axis: Axis) -> usize;

    /// Bring `items` in line with `request`, creating, reusing or dropping
    /// leaves until the budget is covered or the axis is exhausted.
    fn realize(
        &self,
        request: &RealizationRequest<'_>,
        items: &mut RealizedItems,
        orthogonal: &RealizedItems,
    );

    /// Measure every realized slot of `items` against the realized items of
    /// the orthogonal axis, and collect the spanning headers of the window.
    fn measure(&self, axis: Axis, items: &mut RealizedItems, orthogonal: &RealizedItems);
}

/// [`Realizer`] that measures a [`GridContent`].
#[derive(Debug, Clone)]
pub struct ContentRealizer<C> {
    content: C,
}

impl<C: GridContent> ContentRealizer<C> {
    pub fn new(content: C) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn set_content(&mut self, content: C) {
        self.content = content;
    }

    /// Leaves of the orthogonal axis to measure against. Falls back to the
    /// first orthogonal leaf before anything there has been realized.
    fn orthogonal_leaves(&self, axis: Axis, orthogonal: &RealizedItems) -> Vec<usize> {
        let leaves: Vec<usize> = orthogonal.leaves().iter().map(|item| item.index).collect();
        if leaves.is_empty() && self.content.leaf_count(axis.orthogonal()) > 0 {
            vec![0]
        } else {
            leaves
        }
    }

    fn cell(&self, axis: Axis, leaf: usize, other: usize) -> Size {
        match axis {
            Axis::Column => self.content.measure_cell(other, leaf),
            Axis::Row => self.content.measure_cell(leaf, other),
        }
    }

    fn leaf_size(&self, axis: Axis, leaf: usize, others: &[usize]) -> f64 {
        let depth = self.content.depth(axis);
        let mut size = if depth > 0 {
            axis.extent(self.content.measure_header(axis, depth - 1, leaf))
        } else {
            0.0
        };
        for other in others {
            size = size.max(axis.extent(self.cell(axis, leaf, *other)));
        }
        if axis == Axis::Column {
            if let Some(footer) = self.content.measure_footer(leaf) {
                size = size.max(footer.width);
            }
        }
        size
    }

    /// Size along `axis` of the slot holding orthogonal header `level`.
    ///
    /// A slot in the column arena is a row-header column: it is as wide as the
    /// widest realized row header at that level, or the corner cells above it.
    fn header_slot_size(&self, axis: Axis, level: usize, orthogonal: &RealizedItems) -> f64 {
        let other_axis = axis.orthogonal();
        let mut size: f64 = 0.0;
        let mut last_start = None;
        for item in orthogonal.leaves() {
            let span = self.content.header_span(other_axis, level, item.index);
            if last_start == Some(span.start) {
                continue;
            }
            last_start = Some(span.start);
            let header = self.content.measure_header(other_axis, level, span.start);
            size = size.max(axis.extent(header));
        }
        for own_level in 0..self.content.depth(axis) {
            let corner = match axis {
                Axis::Column => self.content.measure_corner(own_level, level),
                Axis::Row => self.content.measure_corner(level, own_level),
            };
            size = size.max(axis.extent(corner));
        }
        size
    }

    fn measure_header_slots(&self, axis: Axis, items: &mut RealizedItems, orthogonal: &RealizedItems) {
        for (level, slot) in items.header_slots_mut().iter_mut().enumerate() {
            slot.contextual_size = self.header_slot_size(axis, level, orthogonal);
            slot.aligning_size = None;
        }
    }

    fn collect_headers(&self, axis: Axis, items: &RealizedItems) -> Vec<SpanningHeader> {
        let depth = self.content.depth(axis);
        let mut headers = Vec::new();
        for level in 0..depth.saturating_sub(1) {
            let mut last_start = None;
            for item in items.leaves() {
                let span = self.content.header_span(axis, level, item.index);
                if last_start == Some(span.start) {
                    continue;
                }
                last_start = Some(span.start);
                let size = self.content.measure_header(axis, level, span.start);
                headers.push(SpanningHeader {
                    level,
                    first_leaf: span.start,
                    span: span.len(),
                    content_size: axis.extent(size),
                });
            }
        }
        headers
    }
}

impl<C: GridContent> Realizer for ContentRealizer<C> {
    fn leaf_count(&self, axis: Axis) -> usize {
        self.content.leaf_count(axis)
    }

    fn depth(&self, axis: Axis) -> usize {
        self.content.depth(axis)
    }

    fn realize(
        &self,
        request: &RealizationRequest<'_>,
        items: &mut RealizedItems,
        orthogonal: &RealizedItems,
    ) {
        let axis = request.axis;
        items.set_grid_offset(request.grid_offset);
        self.measure_header_slots(axis, items, orthogonal);

        if items
            .first_leaf_index()
            .is_some_and(|first| first != request.first_leaf)
        {
            items.clear_leaves();
        }

        let others = self.orthogonal_leaves(axis, orthogonal);
        let mut used: f64 = items.header_slots().iter().map(request.extent).sum();
        let mut position = 0;
        let mut index = request.first_leaf;
        while index < request.item_count {
            if !request.realize_to_end && used >= request.budget {
                break;
            }
            let size = self.leaf_size(axis, index, &others);
            let reused = match items.leaves_mut().get_mut(position) {
                Some(item) if item.index == index => {
                    item.contextual_size = size;
                    item.aligning_size = None;
                    true
                }
                _ => false,
            };
            if !reused {
                items.truncate_leaves(position);
                items.push_leaf(index, size);
            }
            let extent = items
                .leaves()
                .get(position)
                .map_or(0.0, |item| (request.extent)(item));
            let ratio = if position == 0 {
                request.first_visible_ratio
            } else {
                1.0
            };
            used += ratio * extent;
            position += 1;
            index += 1;
        }
        items.truncate_leaves(position);
        log::trace!(
            "realized {:?} leaves {}..{} ({used:.1} of {:.1} device px)",
            axis,
            request.first_leaf,
            index,
            request.budget
        );
    }

    fn measure(&self, axis: Axis, items: &mut RealizedItems, orthogonal: &RealizedItems) {
        self.measure_header_slots(axis, items, orthogonal);
        let others = self.orthogonal_leaves(axis, orthogonal);
        for item in items.leaves_mut() {
            item.contextual_size = self.leaf_size(axis, item.index, &others);
            item.aligning_size = None;
        }
        let headers = self.collect_headers(axis, items);
        items.set_headers(headers);

        if axis == Axis::Row {
            let footer = orthogonal
                .leaves()
                .iter()
                .filter_map(|item| self.content.measure_footer(item.index))
                .map(|size| size.height)
                .fold(0.0, f64::max);
            items.set_footer_size(footer);
        }
    }
}
