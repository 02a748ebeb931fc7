//! Spanning-header reconciliation.
//!
//! A header that spans several leaves may need more room than those leaves
//! were measured at. After both axes converge, any deficit is added to the
//! aligning size of the last covered leaf, deepest levels first, so nested
//! headers see the widened leaves of the levels below them.

use crate::types::RealizedItems;

use super::strategy::LayoutStrategy;

/// Deficits below this are measurement noise.
const DEFICIT_EPSILON: f64 = 1e-9;

/// Widen leaves so every realized spanning header fits over its leaves.
///
/// `first_ratio` is the visible fraction of the first realized leaf. Headers
/// whose last leaf is outside the window are skipped. Axes that are not
/// auto-sized only get their previous aligning sizes cleared.
pub fn reconcile<S: LayoutStrategy>(strategy: &S, items: &mut RealizedItems, first_ratio: f64) {
    for leaf in items.leaves_mut() {
        leaf.aligning_size = None;
    }
    if !strategy.is_auto_sized() {
        return;
    }

    let mut headers = items.headers().to_vec();
    headers.sort_by(|a, b| b.level.cmp(&a.level));

    let ratio_at = |position: usize| if position == 0 { first_ratio } else { 1.0 };
    for header in headers {
        let Some(last_position) = items.position_of_leaf(header.last_leaf()) else {
            continue;
        };
        let covered: f64 = items
            .leaves()
            .iter()
            .enumerate()
            .filter(|(_, leaf)| header.covers(leaf.index))
            .map(|(position, leaf)| ratio_at(position) * strategy.item_size(leaf))
            .sum();
        let deficit = header.content_size - covered;
        if deficit <= DEFICIT_EPSILON {
            continue;
        }
        let ratio = ratio_at(last_position);
        if let Some(leaf) = items.leaves_mut().get_mut(last_position) {
            let size = strategy.item_size(leaf);
            leaf.aligning_size = Some(size + deficit / ratio);
            log::trace!(
                "header level {} at leaf {} short by {deficit:.2}px, widened leaf {}",
                header.level,
                header.first_leaf,
                leaf.index
            );
        }
    }
}
