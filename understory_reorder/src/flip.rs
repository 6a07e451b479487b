// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! FLIP (first, last, invert, play) compensation for relocated items.
//!
//! A relocation is a discrete jump in the element tree. To make it read as
//! motion, the item's displayed bounds are captured *first*, the item is
//! moved, its new layout bounds are measured *last*, and the difference is
//! applied as an *inverted* translation that the host *plays* back to identity
//! on the next frame.
//!
//! `first` is a visual rectangle so that a neighbor that is still animating
//! from a previous commit continues from where it is displayed. `last` is a
//! layout rectangle, which excludes the transform that is about to be replaced.

use kurbo::{Rect, Vec2};

use crate::host::ListHost;

/// Bounds captured around one relocation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Flip {
    /// Displayed bounds before the move.
    pub first: Rect,
    /// Layout bounds after the move.
    pub last: Rect,
}

impl Flip {
    /// Translation that puts the item back where it was displayed.
    #[must_use]
    pub fn invert(&self) -> Vec2 {
        self.first.origin() - self.last.origin()
    }

    /// Whether the move produced no visible displacement.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.invert() == Vec2::ZERO
    }
}

/// Runs `relocate` on `item`, wrapping it in FLIP compensation when `enabled`.
///
/// Missing geometry skips the compensation; the relocation always happens.
pub(crate) fn relocate_with_flip<H: ListHost>(
    host: &mut H,
    item: H::Item,
    enabled: bool,
    relocate: impl FnOnce(&mut H),
) -> Option<Flip> {
    let first = if enabled { host.visual_rect(item) } else { None };
    relocate(host);
    let first = first?;
    let last = host.layout_rect(host.item_node(item))?;
    let flip = Flip { first, last };
    if !flip.is_noop() {
        host.play_flip(item, flip.invert());
    }
    Some(flip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_points_back_to_first() {
        let flip = Flip {
            first: Rect::new(0.0, 20.0, 100.0, 30.0),
            last: Rect::new(0.0, 10.0, 100.0, 20.0),
        };
        assert_eq!(flip.invert(), Vec2::new(0.0, 10.0));
        assert!(!flip.is_noop());
    }

    #[test]
    fn unchanged_bounds_are_a_noop() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert!(Flip { first: r, last: r }.is_noop());
    }
}
