// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag session: the machine's context while a drag is active.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::config::Selectors;
use crate::pointer::PointerTrack;

/// Where an intersected neighbor sits relative to the dragged item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The neighbor precedes the dragged item; committing moves the item backward.
    Before,
    /// The neighbor follows the dragged item; committing moves the item forward.
    After,
}

/// A neighbor currently under the hit point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Intersection<I> {
    /// The neighbor.
    pub item: I,
    /// Its index in the session snapshot.
    pub index: usize,
    /// Its side relative to the dragged item.
    pub direction: Direction,
}

/// Context of one drag, from `DRAG` to `DROP`.
///
/// Exists exactly while the machine is dragging. Invariant:
/// `ordered_items()[dragged_index()] == dragged_item()`.
#[derive(Clone, Debug)]
pub struct DragSession<I, N> {
    pub(crate) dragged_item: I,
    pub(crate) reference: N,
    pub(crate) track: PointerTrack,
    pub(crate) current_offset: Vec2,
    pub(crate) ordered_items: Vec<I>,
    pub(crate) dragged_index: usize,
    pub(crate) intersecting: Option<Intersection<I>>,
    pub(crate) last_target: Option<I>,
    pub(crate) selectors: Selectors,
}

impl<I: Copy + Eq, N: Copy> DragSession<I, N> {
    /// The item being dragged.
    #[must_use]
    pub fn dragged_item(&self) -> I {
        self.dragged_item
    }

    /// The node whose geometry anchors the drag (handle or item).
    #[must_use]
    pub fn reference(&self) -> N {
        self.reference
    }

    /// List order as of drag start or the latest commit.
    #[must_use]
    pub fn ordered_items(&self) -> &[I] {
        &self.ordered_items
    }

    /// Position of the dragged item in [`Self::ordered_items`].
    #[must_use]
    pub fn dragged_index(&self) -> usize {
        self.dragged_index
    }

    /// Pointer position that renders with a zero offset.
    #[must_use]
    pub fn anchor(&self) -> Point {
        self.track.anchor
    }

    /// Last pointer position.
    #[must_use]
    pub fn pointer(&self) -> Point {
        self.track.pointer
    }

    /// Offset most recently pushed to the dragged item (before axis masking).
    #[must_use]
    pub fn current_offset(&self) -> Vec2 {
        self.current_offset
    }

    /// Neighbor found by the latest move, if any.
    #[must_use]
    pub fn intersecting(&self) -> Option<Intersection<I>> {
        self.intersecting
    }

    /// Target of the previous commit while it is still excluded from hit tests.
    #[must_use]
    pub fn last_target(&self) -> Option<I> {
        self.last_target
    }

    /// Selectors the session re-queries with.
    #[must_use]
    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    pub(crate) fn index_of(&self, item: I) -> Option<usize> {
        self.ordered_items.iter().position(|&i| i == item)
    }

    /// Turns raw hit-test results into the guard input.
    ///
    /// The dragged item never intersects itself. The previous commit target is
    /// skipped for as long as it is the first foreign hit; any other outcome
    /// lifts that exclusion.
    pub(crate) fn observe_hits(&mut self, hits: &[I]) -> Option<Intersection<I>> {
        let foreign = hits.iter().copied().find(|&h| h != self.dragged_item);
        self.intersecting = match foreign {
            Some(hit) if Some(hit) == self.last_target => None,
            other => {
                self.last_target = None;
                other.and_then(|item| {
                    let index = self.index_of(item)?;
                    let direction = if index > self.dragged_index {
                        Direction::After
                    } else {
                        Direction::Before
                    };
                    Some(Intersection {
                        item,
                        index,
                        direction,
                    })
                })
            }
        };
        self.intersecting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnchorPolicy;
    use alloc::string::String;
    use alloc::vec;

    fn session(order: &[u32], dragged: u32) -> DragSession<u32, u32> {
        let dragged_index = order.iter().position(|&i| i == dragged).unwrap();
        DragSession {
            dragged_item: dragged,
            reference: dragged,
            track: PointerTrack::start(Point::ZERO, Point::ZERO, AnchorPolicy::KeepGrabPoint),
            current_offset: Vec2::ZERO,
            ordered_items: order.to_vec(),
            dragged_index,
            intersecting: None,
            last_target: None,
            selectors: Selectors {
                item: String::from(".item"),
                handle: None,
            },
        }
    }

    #[test]
    fn dragged_item_never_intersects_itself() {
        let mut s = session(&[1, 2, 3], 2);
        assert_eq!(s.observe_hits(&[2]), None);
        assert_eq!(s.intersecting(), None);
    }

    #[test]
    fn first_foreign_hit_wins_and_gets_a_direction() {
        let mut s = session(&[1, 2, 3], 2);
        let hit = s.observe_hits(&[2, 3, 1]).unwrap();
        assert_eq!(hit.item, 3);
        assert_eq!(hit.index, 2);
        assert_eq!(hit.direction, Direction::After);

        let hit = s.observe_hits(&[1]).unwrap();
        assert_eq!(hit.direction, Direction::Before);
    }

    #[test]
    fn last_target_is_excluded_until_something_else_is_hit() {
        let mut s = session(&[1, 2, 3], 2);
        s.last_target = Some(3);

        assert_eq!(s.observe_hits(&[2, 3]), None);
        assert_eq!(s.last_target(), Some(3));

        // Hitting only the dragged item lifts the exclusion.
        assert_eq!(s.observe_hits(&[2]), None);
        assert_eq!(s.last_target(), None);

        assert_eq!(s.observe_hits(&[3]).map(|h| h.item), Some(3));
    }

    #[test]
    fn hits_outside_the_snapshot_are_ignored() {
        let mut s = session(&[1, 2, 3], 1);
        assert_eq!(s.observe_hits(&[9]), None);
        assert_eq!(s.ordered_items(), &vec![1, 2, 3][..]);
    }
}
