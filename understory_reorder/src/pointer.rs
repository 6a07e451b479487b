// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer region of the drag machine: anchor and live offset bookkeeping.
//!
//! ## Usage
//!
//! 1) Start tracking with [`PointerTrack::start`], passing the pointer and the
//!    layout midpoint of the drag reference (handle or item).
//! 2) On each move, call [`PointerTrack::update`] to get the offset to render.
//! 3) After the item has been relocated, call [`PointerTrack::reanchor`] with the
//!    reference's new midpoint so the rendered offset stays continuous.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_reorder::AnchorPolicy;
//! use understory_reorder::pointer::PointerTrack;
//!
//! // Grab an item centered at (50, 5) at (10, 5).
//! let mut track = PointerTrack::start(
//!     Point::new(10.0, 5.0),
//!     Point::new(50.0, 5.0),
//!     AnchorPolicy::KeepGrabPoint,
//! );
//! assert_eq!(track.offset(), Vec2::ZERO);
//!
//! // Drag 12px down.
//! assert_eq!(track.update(Point::new(10.0, 17.0)), Vec2::new(0.0, 12.0));
//!
//! // The list moved the item one 10px slot down: the offset shrinks accordingly.
//! assert_eq!(track.reanchor(Point::new(50.0, 15.0)), Vec2::new(0.0, 2.0));
//! ```

use kurbo::{Point, Vec2};

use crate::config::AnchorPolicy;

/// Tracks the pointer against a movable anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerTrack {
    /// Last pointer position.
    pub pointer: Point,
    /// Pointer position that renders with a zero offset.
    pub anchor: Point,
    /// Fixed vector from the reference midpoint to the anchor.
    pub grab: Vec2,
}

impl PointerTrack {
    /// Starts tracking at `pointer` with the reference centered at `reference_mid`.
    #[must_use]
    pub fn start(pointer: Point, reference_mid: Point, policy: AnchorPolicy) -> Self {
        let grab = match policy {
            AnchorPolicy::KeepGrabPoint => pointer - reference_mid,
            AnchorPolicy::CenterReference => Vec2::ZERO,
        };
        Self {
            pointer,
            anchor: reference_mid + grab,
            grab,
        }
    }

    /// Records a new pointer position and returns the offset to render.
    pub fn update(&mut self, pointer: Point) -> Vec2 {
        self.pointer = pointer;
        self.offset()
    }

    /// Offset from the anchor to the last pointer position.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.pointer - self.anchor
    }

    /// Moves the anchor after the reference was relocated and returns the
    /// corrected offset.
    pub fn reanchor(&mut self, reference_mid: Point) -> Vec2 {
        self.anchor = reference_mid + self.grab;
        self.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_grab_point_starts_without_offset() {
        let track = PointerTrack::start(
            Point::new(10.0, 20.0),
            Point::new(40.0, 25.0),
            AnchorPolicy::KeepGrabPoint,
        );
        assert_eq!(track.offset(), Vec2::ZERO);
        assert_eq!(track.grab, Vec2::new(-30.0, -5.0));
    }

    #[test]
    fn center_reference_snaps_to_pointer() {
        let track = PointerTrack::start(
            Point::new(10.0, 20.0),
            Point::new(40.0, 25.0),
            AnchorPolicy::CenterReference,
        );
        assert_eq!(track.anchor, Point::new(40.0, 25.0));
        assert_eq!(track.offset(), Vec2::new(-30.0, -5.0));
    }

    #[test]
    fn update_follows_pointer() {
        let mut track = PointerTrack::start(
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            AnchorPolicy::KeepGrabPoint,
        );
        assert_eq!(track.update(Point::new(5.0, 3.0)), Vec2::new(5.0, 3.0));
        assert_eq!(track.update(Point::new(8.0, 7.0)), Vec2::new(8.0, 7.0));
        assert_eq!(track.update(Point::new(-2.0, -1.0)), Vec2::new(-2.0, -1.0));
    }

    #[test]
    fn reanchor_keeps_visual_position() {
        let mut track = PointerTrack::start(
            Point::new(10.0, 5.0),
            Point::new(50.0, 5.0),
            AnchorPolicy::KeepGrabPoint,
        );
        track.update(Point::new(10.0, 33.0));
        // Displayed reference center before relocation: layout 5 + offset 28.
        let before = Point::new(50.0, 5.0) + track.offset();
        let offset = track.reanchor(Point::new(50.0, 25.0));
        let after = Point::new(50.0, 25.0) + offset;
        assert_eq!(before, after);
    }

    #[test]
    fn reanchor_without_movement_is_zero() {
        let mut track = PointerTrack::start(
            Point::new(1.5, 2.5),
            Point::new(4.0, 4.0),
            AnchorPolicy::KeepGrabPoint,
        );
        assert_eq!(track.reanchor(Point::new(4.0, 4.0)), Vec2::ZERO);
    }
}
