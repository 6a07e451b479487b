// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sequence-shift reordering.
//!
//! When the dragged item at index `from` meets a neighbor at index `to`, every
//! item strictly after `from` up to and including `to` moves one slot toward
//! `from`, and the dragged item ends up at `to`. Items keep their own identity;
//! only their positions change. This is the only relocation policy: exchanging
//! two elements' content would break identity tracking across commits.
//!
//! [`ShiftPlan`] lists which snapshot indices move and in what order.
//! Moving forward walks outward from the dragged item (`from + 1..=to`), each
//! item being placed before the dragged item. Moving backward walks the range in
//! reverse (`from - 1` down to `to`), each item being placed after the dragged
//! item. Either way the nearest item moves first and relative order survives.
//!
//! [`reorder_slice`] applies the same commit to a caller-owned model, which is
//! handy for keeping application data in sync with the displayed order.
//!
//! ```
//! use understory_reorder::reorder::{ShiftPlan, reorder_slice};
//! use understory_reorder::Direction;
//!
//! let plan = ShiftPlan::new(3, 0);
//! assert_eq!(plan.direction, Direction::Before);
//! assert_eq!(plan.indices().collect::<Vec<_>>(), vec![2, 1, 0]);
//!
//! let mut model = ['a', 'b', 'c', 'd'];
//! reorder_slice(&mut model, 3, 0);
//! assert_eq!(model, ['d', 'a', 'b', 'c']);
//! ```

use alloc::vec::Vec;
use core::ops::Range;

use crate::config::ReorderConfig;
use crate::flip::relocate_with_flip;
use crate::geometry::rect_mid;
use crate::host::ListHost;
use crate::session::{Direction, DragSession};

/// Which snapshot indices shift during one commit, and in what order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftPlan {
    /// Direction the dragged item travels.
    pub direction: Direction,
    range: Range<usize>,
}

impl ShiftPlan {
    /// Plans moving the item at `from` into slot `to`.
    ///
    /// `from == to` yields an empty plan.
    #[must_use]
    pub fn new(from: usize, to: usize) -> Self {
        if to > from {
            Self {
                direction: Direction::After,
                range: from + 1..to + 1,
            }
        } else {
            Self {
                direction: Direction::Before,
                range: to..from,
            }
        }
    }

    /// Indices to relocate, nearest to the dragged item first.
    pub fn indices(&self) -> impl Iterator<Item = usize> + use<> {
        let Range { start, end } = self.range;
        let forward = self.direction == Direction::After;
        (0..end - start).map(move |k| if forward { start + k } else { end - 1 - k })
    }

    /// Number of items that move.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Whether nothing moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Moves `items[from]` to `items[to]`, shifting everything in between by one.
///
/// # Panics
///
/// Panics if `from` or `to` is out of bounds.
pub fn reorder_slice<T>(items: &mut [T], from: usize, to: usize) {
    if from < to {
        items[from..=to].rotate_left(1);
    } else if to < from {
        items[to..=from].rotate_right(1);
    }
}

/// Outcome of one reorder commit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CommitReport {
    /// Dragged index before the commit.
    pub from_index: usize,
    /// Dragged index after the commit (the former target slot).
    pub to_index: usize,
    /// Direction of travel.
    pub direction: Direction,
    /// How many neighbors were relocated.
    pub shifted: usize,
}

/// Commits the session's current intersection.
///
/// Returns `None` when there is nothing to commit.
pub(crate) fn commit<H: ListHost>(
    host: &mut H,
    session: &mut DragSession<H::Item, H::Node>,
    config: &ReorderConfig,
) -> Option<CommitReport> {
    let target = session.intersecting.take()?;
    let from = session.dragged_index;
    let dragged = session.dragged_item;
    let plan = ShiftPlan::new(from, target.index);

    let mut shifted = 0;
    for index in plan.indices() {
        let Some(&item) = session.ordered_items.get(index) else {
            break;
        };
        relocate_with_flip(host, item, config.flip, |host| match plan.direction {
            Direction::After => host.move_before(item, dragged),
            Direction::Before => host.move_after(item, dragged),
        });
        shifted += 1;
    }

    resync(host, session, target.index);
    debug_assert_eq!(
        session.ordered_items.get(session.dragged_index),
        Some(&dragged),
        "snapshot lost track of the dragged item"
    );

    let offset = rect_mid(host.layout_rect(session.reference))
        .map(|mid| session.track.reanchor(mid));
    match offset {
        Some(offset) => {
            session.current_offset = offset;
            host.set_drag_offset(dragged, Some(config.axes.mask(offset)), config.axes);
        }
        None => tracing::warn!(
            reference = ?session.reference,
            "drag reference has no geometry after a commit, keeping the previous anchor"
        ),
    }

    session.last_target = Some(target.item);
    tracing::debug!(
        from,
        to = session.dragged_index,
        shifted,
        "committed reorder"
    );
    Some(CommitReport {
        from_index: from,
        to_index: session.dragged_index,
        direction: plan.direction,
        shifted,
    })
}

/// Refreshes the snapshot from the host after relocations.
fn resync<H: ListHost>(host: &H, session: &mut DragSession<H::Item, H::Node>, expected: usize) {
    let fresh: Vec<H::Item> = host.items(&session.selectors.item);
    if fresh.len() != session.ordered_items.len() {
        tracing::warn!(
            before = session.ordered_items.len(),
            after = fresh.len(),
            "list membership changed during a drag"
        );
    }
    match fresh.iter().position(|&i| i == session.dragged_item) {
        Some(index) => {
            if index != expected {
                tracing::debug!(index, expected, "dragged item landed off its target slot");
            }
            session.ordered_items = fresh;
            session.dragged_index = index;
        }
        None => tracing::warn!(
            item = ?session.dragged_item,
            "dragged item vanished from the list, keeping the previous snapshot"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn forward_plan_walks_outward() {
        let plan = ShiftPlan::new(1, 4);
        assert_eq!(plan.direction, Direction::After);
        assert_eq!(plan.indices().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn backward_plan_reverses_nearest_first() {
        let plan = ShiftPlan::new(4, 1);
        assert_eq!(plan.direction, Direction::Before);
        assert_eq!(plan.indices().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn single_slot_plans() {
        assert_eq!(ShiftPlan::new(0, 1).indices().collect::<Vec<_>>(), vec![1]);
        assert_eq!(ShiftPlan::new(1, 0).indices().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn same_slot_plan_is_empty() {
        let plan = ShiftPlan::new(2, 2);
        assert!(plan.is_empty());
        assert_eq!(plan.indices().count(), 0);
    }

    #[test]
    fn reorder_slice_matches_splice_semantics() {
        let mut items = [1, 2, 3, 4, 5];
        reorder_slice(&mut items, 0, 2);
        assert_eq!(items, [2, 3, 1, 4, 5]);
        reorder_slice(&mut items, 4, 1);
        assert_eq!(items, [2, 5, 3, 1, 4]);
        reorder_slice(&mut items, 3, 3);
        assert_eq!(items, [2, 5, 3, 1, 4]);
    }
}
