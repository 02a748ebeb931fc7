//! Realized (materialized) items for one axis.
//!
//! A [`RealizedItems`] arena holds the slots a layout pass currently has on
//! screen along one axis. The first `grid_offset` slots belong to the header
//! levels of the orthogonal axis (row-header columns in the column arena,
//! column-header rows in the row arena); the rest are contiguous leaves
//! starting at the first visible leaf.

use serde::Serialize;

/// Stable identity of a realized item. Survives page-scroll relocation.
pub type ItemId = u64;

/// What a realized slot represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemRole {
    /// A leading slot occupied by one header level of the orthogonal axis.
    OrthogonalHeader { level: usize },
    /// A leaf row or column.
    Leaf,
}

/// A materialized row or column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizedItem {
    pub id: ItemId,
    pub role: ItemRole,
    /// Logical leaf index, or the header level for orthogonal header slots.
    pub index: usize,
    pub span: usize,
    /// Measured content size along the axis (logical px).
    pub contextual_size: f64,
    /// Size override written by spanning-header reconciliation.
    pub aligning_size: Option<f64>,
}

impl RealizedItem {
    fn new(id: ItemId, role: ItemRole, index: usize) -> Self {
        Self {
            id,
            role,
            index,
            span: 1,
            contextual_size: 0.0,
            aligning_size: None,
        }
    }

    /// Measured size with the aligning override applied.
    #[must_use]
    pub fn size(&self) -> f64 {
        self.aligning_size.unwrap_or(self.contextual_size)
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.role, ItemRole::Leaf)
    }

    /// Forget measurements so the item is measured afresh.
    pub fn reset_measurement(&mut self) {
        self.contextual_size = 0.0;
        self.aligning_size = None;
    }
}

/// A realized header that groups one or more leaves of the same axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanningHeader {
    pub level: usize,
    pub first_leaf: usize,
    pub span: usize,
    /// Size the header content needs along the axis (logical px).
    pub content_size: f64,
}

impl SpanningHeader {
    #[must_use]
    pub fn last_leaf(&self) -> usize {
        self.first_leaf + self.span.saturating_sub(1)
    }

    #[must_use]
    pub fn covers(&self, leaf: usize) -> bool {
        leaf >= self.first_leaf && leaf <= self.last_leaf()
    }
}

/// Counters for item churn, useful for checking window reuse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizationStats {
    pub created: u64,
    pub destroyed: u64,
    pub relocated: u64,
}

/// Direction and distance of a within-page scroll, in whole leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageShift {
    Forward(usize),
    Backward(usize),
}

impl PageShift {
    /// Shift needed to move a window starting at `from` to start at `to`.
    #[must_use]
    pub fn between(from: usize, to: usize) -> Option<Self> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Self::Forward(to - from)),
            std::cmp::Ordering::Less => Some(Self::Backward(from - to)),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[must_use]
    pub const fn distance(self) -> usize {
        match self {
            Self::Forward(n) | Self::Backward(n) => n,
        }
    }
}

/// Index-addressed arena of realized items for one axis.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizedItems {
    slots: Vec<RealizedItem>,
    headers: Vec<SpanningHeader>,
    grid_offset: usize,
    footer_size: f64,
    next_id: ItemId,
    stats: RealizationStats,
}

impl RealizedItems {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All slots: orthogonal header slots first, then leaves.
    #[must_use]
    pub fn items(&self) -> &[RealizedItem] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub const fn grid_offset(&self) -> usize {
        self.grid_offset
    }

    /// Slots holding the orthogonal axis' header levels.
    #[must_use]
    pub fn header_slots(&self) -> &[RealizedItem] {
        self.slots.get(..self.grid_offset).unwrap_or(&[])
    }

    pub fn header_slots_mut(&mut self) -> &mut [RealizedItem] {
        let end = self.grid_offset.min(self.slots.len());
        self.slots.split_at_mut(end).0
    }

    #[must_use]
    pub fn leaves(&self) -> &[RealizedItem] {
        self.slots.get(self.grid_offset..).unwrap_or(&[])
    }

    pub fn leaves_mut(&mut self) -> &mut [RealizedItem] {
        let start = self.grid_offset.min(self.slots.len());
        self.slots.split_at_mut(start).1
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.slots.len().saturating_sub(self.grid_offset)
    }

    /// Logical index of the first realized leaf.
    #[must_use]
    pub fn first_leaf_index(&self) -> Option<usize> {
        self.leaves().first().map(|item| item.index)
    }

    /// Logical index of the last realized leaf.
    #[must_use]
    pub fn last_leaf_index(&self) -> Option<usize> {
        self.leaves().last().map(|item| item.index)
    }

    /// Position (within [`Self::leaves`]) of the leaf with logical index `index`.
    #[must_use]
    pub fn position_of_leaf(&self, index: usize) -> Option<usize> {
        let first = self.first_leaf_index()?;
        let position = index.checked_sub(first)?;
        let item = self.leaves().get(position)?;
        (item.index == index).then_some(position)
    }

    /// Leaf with logical index `index`, if realized.
    #[must_use]
    pub fn leaf(&self, index: usize) -> Option<&RealizedItem> {
        self.position_of_leaf(index)
            .and_then(|position| self.leaves().get(position))
    }

    pub fn leaf_mut(&mut self, index: usize) -> Option<&mut RealizedItem> {
        let position = self.position_of_leaf(index)?;
        self.leaves_mut().get_mut(position)
    }

    /// Spanning headers collected by the last measurement pass.
    #[must_use]
    pub fn headers(&self) -> &[SpanningHeader] {
        &self.headers
    }

    pub fn set_headers(&mut self, headers: Vec<SpanningHeader>) {
        self.headers = headers;
    }

    /// Footer extent along this axis (logical px); only rows carry one.
    #[must_use]
    pub const fn footer_size(&self) -> f64 {
        self.footer_size
    }

    pub fn set_footer_size(&mut self, size: f64) {
        self.footer_size = size;
    }

    #[must_use]
    pub const fn stats(&self) -> RealizationStats {
        self.stats
    }

    /// Resize the leading header-slot block to `grid_offset` slots.
    pub fn set_grid_offset(&mut self, grid_offset: usize) {
        if self.grid_offset == grid_offset {
            return;
        }
        let current = self.grid_offset.min(self.slots.len());
        let leaves = self.slots.split_off(current);
        self.stats.destroyed += current.saturating_sub(grid_offset) as u64;
        self.slots.truncate(grid_offset);
        for level in self.slots.len()..grid_offset {
            let item = self.create(ItemRole::OrthogonalHeader { level }, level);
            self.slots.push(item);
        }
        self.slots.extend(leaves);
        self.grid_offset = grid_offset;
    }

    /// Materialize a new leaf after the current last one.
    pub fn push_leaf(&mut self, index: usize, contextual_size: f64) -> ItemId {
        let mut item = self.create(ItemRole::Leaf, index);
        item.contextual_size = contextual_size;
        let id = item.id;
        self.slots.push(item);
        id
    }

    /// Keep only the first `count` leaves.
    pub fn truncate_leaves(&mut self, count: usize) {
        let keep = self.grid_offset.saturating_add(count);
        if keep < self.slots.len() {
            self.stats.destroyed += (self.slots.len() - keep) as u64;
            self.slots.truncate(keep);
        }
    }

    /// Destroy every realized leaf.
    pub fn clear_leaves(&mut self) {
        self.truncate_leaves(0);
        self.headers.clear();
    }

    /// Move the leaf window by `shift` leaves, recycling the items that scroll
    /// out of one edge as the new items on the opposite edge.
    ///
    /// Relocated items keep their [`ItemId`] and lose their measurements.
    /// Items relocated past `item_count` are destroyed. A shift at least as
    /// large as the window clears it instead.
    pub fn shift(&mut self, shift: PageShift, item_count: usize) {
        let window = self.leaf_count();
        let distance = shift.distance();
        if distance == 0 {
            return;
        }
        if distance >= window {
            self.clear_leaves();
            return;
        }
        let (Some(first), Some(last)) = (self.first_leaf_index(), self.last_leaf_index()) else {
            return;
        };
        let mut relocated = 0u64;
        match shift {
            PageShift::Forward(n) => {
                let leaves = self.leaves_mut();
                leaves.rotate_left(n);
                let moved_from = leaves.len() - n;
                for (offset, item) in leaves.iter_mut().skip(moved_from).enumerate() {
                    item.index = last + 1 + offset;
                    item.reset_measurement();
                    relocated += 1;
                }
                let in_range = self
                    .leaves()
                    .iter()
                    .take_while(|item| item.index < item_count)
                    .count();
                self.truncate_leaves(in_range);
            }
            PageShift::Backward(n) => {
                let Some(new_first) = first.checked_sub(n) else {
                    self.clear_leaves();
                    return;
                };
                let leaves = self.leaves_mut();
                leaves.rotate_right(n);
                for (offset, item) in leaves.iter_mut().take(n).enumerate() {
                    item.index = new_first + offset;
                    item.reset_measurement();
                    relocated += 1;
                }
            }
        }
        self.stats.relocated += relocated;
        self.headers.clear();
    }

    fn create(&mut self, role: ItemRole, index: usize) -> RealizedItem {
        let id = self.next_id;
        self.next_id += 1;
        self.stats.created += 1;
        RealizedItem::new(id, role, index)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    fn window(grid_offset: usize, first: usize, count: usize) -> RealizedItems {
        let mut items = RealizedItems::new();
        items.set_grid_offset(grid_offset);
        for index in first..first + count {
            items.push_leaf(index, 10.0);
        }
        items
    }

    fn indices(items: &RealizedItems) -> Vec<usize> {
        items.leaves().iter().map(|item| item.index).collect()
    }

    #[test]
    fn test_header_slots_precede_leaves() {
        let items = window(2, 5, 3);
        assert_eq!(items.len(), 5);
        assert_eq!(items.header_slots().len(), 2);
        assert_eq!(
            items.header_slots()[1].role,
            ItemRole::OrthogonalHeader { level: 1 }
        );
        assert_eq!(indices(&items), vec![5, 6, 7]);
        assert_eq!(items.position_of_leaf(6), Some(1));
        assert_eq!(items.position_of_leaf(4), None);
        assert_eq!(items.position_of_leaf(8), None);
    }

    #[test]
    fn test_grid_offset_change_keeps_leaves() {
        let mut items = window(1, 0, 3);
        let ids: Vec<_> = items.leaves().iter().map(|i| i.id).collect();
        items.set_grid_offset(3);
        assert_eq!(items.header_slots().len(), 3);
        assert_eq!(items.leaves().iter().map(|i| i.id).collect::<Vec<_>>(), ids);
        items.set_grid_offset(0);
        assert!(items.header_slots().is_empty());
        assert_eq!(indices(&items), vec![0, 1, 2]);
    }

    #[test]
    fn test_forward_shift_recycles_leading_items() {
        let mut items = window(1, 0, 4);
        let first_ids: Vec<_> = items.leaves().iter().map(|i| i.id).collect();
        items.shift(PageShift::Forward(2), 100);
        assert_eq!(indices(&items), vec![2, 3, 4, 5]);
        let ids: Vec<_> = items.leaves().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![first_ids[2], first_ids[3], first_ids[0], first_ids[1]]);
        assert_eq!(items.leaf(4).unwrap().contextual_size, 0.0);
        assert_eq!(items.leaf(3).unwrap().contextual_size, 10.0);
        assert_eq!(items.stats().relocated, 2);
    }

    #[test]
    fn test_forward_shift_drops_items_past_the_end() {
        let mut items = window(0, 5, 4);
        items.shift(PageShift::Forward(3), 10);
        assert_eq!(indices(&items), vec![8, 9]);
        assert_eq!(items.stats().destroyed, 2);
    }

    #[test]
    fn test_backward_shift_recycles_trailing_items() {
        let mut items = window(0, 6, 4);
        items.shift(PageShift::Backward(3), 100);
        assert_eq!(indices(&items), vec![3, 4, 5, 6]);
        assert_eq!(items.stats().created, 4);
    }

    #[test]
    fn test_shift_beyond_window_clears() {
        let mut items = window(2, 0, 4);
        items.shift(PageShift::Forward(4), 100);
        assert_eq!(items.leaf_count(), 0);
        assert_eq!(items.header_slots().len(), 2);
    }

    #[test]
    fn test_page_shift_between() {
        assert_eq!(PageShift::between(3, 7), Some(PageShift::Forward(4)));
        assert_eq!(PageShift::between(7, 3), Some(PageShift::Backward(4)));
        assert_eq!(PageShift::between(3, 3), None);
    }

    #[test]
    fn test_aligning_size_overrides_measurement() {
        let mut items = window(0, 0, 1);
        let leaf = items.leaf_mut(0).unwrap();
        leaf.aligning_size = Some(25.0);
        assert_eq!(leaf.size(), 25.0);
        leaf.reset_measurement();
        assert_eq!(leaf.size(), 0.0);
    }
}
