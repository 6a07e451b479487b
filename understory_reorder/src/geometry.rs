// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry helpers: element midpoints and offset-chain positions.
//!
//! Two coordinate flavors are used while dragging:
//!
//! - **Visual** bounds, as reported by the host after transforms are applied.
//!   [`rect_mid`] turns them into a viewport midpoint for hit testing.
//! - **Offset** bounds, accumulated over the offset-parent chain with
//!   [`offset_position`]. These ignore transforms, so they stay stable while the
//!   dragged item carries a live offset and while neighbors play FLIP
//!   compensation.
//!
//! Every helper is a pure function. Absent input produces absent output, and
//! callers treat `None` as "cannot proceed this tick", never as zero.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Size, Vec2};
//! use understory_reorder::geometry::{OffsetFrame, offset_box};
//!
//! // An item 40px into a list that sits 100px down the page, page scrolled by 30px.
//! let chain = [
//!     OffsetFrame::new(Vec2::new(0.0, 40.0)),
//!     OffsetFrame::new(Vec2::new(10.0, 100.0)),
//!     OffsetFrame::body(),
//! ];
//! let bounds = offset_box(chain, Vec2::new(0.0, 30.0), Size::new(200.0, 20.0));
//! assert_eq!(bounds.position, Point::new(10.0, 110.0));
//! assert_eq!(bounds.mid(), Point::new(110.0, 120.0));
//! ```

use kurbo::{Point, Rect, Size, Vec2};

/// Midpoint of a visual rectangle, or `None` when there is no rectangle.
#[must_use]
pub fn rect_mid(rect: Option<Rect>) -> Option<Point> {
    rect.map(|r| r.center())
}

/// One step of an offset-parent chain.
///
/// Mirrors the per-element quantities a layout engine exposes: the offset
/// relative to the offset parent, the element's own scroll position, and the
/// width of its top/left border (`client`).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OffsetFrame {
    /// Offset relative to the next frame in the chain.
    pub offset: Vec2,
    /// Scroll position of this element's content.
    pub scroll: Vec2,
    /// Top/left border thickness.
    pub client: Vec2,
    /// Whether this frame is the document body.
    ///
    /// The body's own scroll is often reported as zero while the page is
    /// scrolled; such frames fall back to the page scroll per axis.
    pub is_body: bool,
}

impl OffsetFrame {
    /// A non-scrolled, borderless frame at `offset`.
    #[must_use]
    pub const fn new(offset: Vec2) -> Self {
        Self {
            offset,
            scroll: Vec2::ZERO,
            client: Vec2::ZERO,
            is_body: false,
        }
    }

    /// The body frame at the origin.
    #[must_use]
    pub const fn body() -> Self {
        Self {
            offset: Vec2::ZERO,
            scroll: Vec2::ZERO,
            client: Vec2::ZERO,
            is_body: true,
        }
    }

    /// Sets the element's own scroll position.
    #[must_use]
    pub const fn with_scroll(mut self, scroll: Vec2) -> Self {
        self.scroll = scroll;
        self
    }

    /// Sets the border thickness.
    #[must_use]
    pub const fn with_client(mut self, client: Vec2) -> Self {
        self.client = client;
        self
    }

    fn effective_scroll(&self, page_scroll: Vec2) -> Vec2 {
        if !self.is_body {
            return self.scroll;
        }
        Vec2::new(
            if self.scroll.x != 0.0 {
                self.scroll.x
            } else {
                page_scroll.x
            },
            if self.scroll.y != 0.0 {
                self.scroll.y
            } else {
                page_scroll.y
            },
        )
    }
}

/// Accumulates an offset-parent chain, element first, into a viewport position.
///
/// Each frame contributes `offset - scroll + client`. Body frames substitute
/// `page_scroll` on any axis where their own scroll is zero.
pub fn offset_position(chain: impl IntoIterator<Item = OffsetFrame>, page_scroll: Vec2) -> Point {
    let mut pos = Point::ZERO;
    for frame in chain {
        pos += frame.offset - frame.effective_scroll(page_scroll) + frame.client;
    }
    pos
}

/// Untransformed element bounds derived from an offset chain.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OffsetBox {
    /// Top-left corner in viewport coordinates.
    pub position: Point,
    /// Layout size of the element.
    pub size: Size,
}

impl OffsetBox {
    /// Midpoint of the box.
    #[must_use]
    pub fn mid(&self) -> Point {
        self.position + Vec2::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.position.y
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.height
    }

    /// Left edge.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.position.x
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.position.x + self.size.width
    }

    /// The box as a rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

/// Builds an [`OffsetBox`] from an offset chain and the element's layout size.
pub fn offset_box(
    chain: impl IntoIterator<Item = OffsetFrame>,
    page_scroll: Vec2,
    size: Size,
) -> OffsetBox {
    OffsetBox {
        position: offset_position(chain, page_scroll),
        size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_mid_of_absent_rect_is_absent() {
        assert_eq!(rect_mid(None), None);
    }

    #[test]
    fn rect_mid_is_center() {
        let mid = rect_mid(Some(Rect::new(10.0, 20.0, 30.0, 60.0)));
        assert_eq!(mid, Some(Point::new(20.0, 40.0)));
    }

    #[test]
    fn empty_chain_is_origin() {
        assert_eq!(offset_position([], Vec2::new(5.0, 5.0)), Point::ZERO);
    }

    #[test]
    fn chain_accumulates_offsets_scroll_and_borders() {
        let chain = [
            OffsetFrame::new(Vec2::new(0.0, 50.0)),
            OffsetFrame::new(Vec2::new(20.0, 100.0))
                .with_scroll(Vec2::new(0.0, 15.0))
                .with_client(Vec2::new(1.0, 1.0)),
        ];
        // x: 0 + 20 + 1, y: 50 + 100 - 15 + 1
        assert_eq!(offset_position(chain, Vec2::ZERO), Point::new(21.0, 136.0));
    }

    #[test]
    fn body_falls_back_to_page_scroll_per_axis() {
        let body = OffsetFrame::body().with_scroll(Vec2::new(7.0, 0.0));
        let pos = offset_position([body], Vec2::new(100.0, 40.0));
        // Own x scroll wins, y falls back to the page.
        assert_eq!(pos, Point::new(-7.0, -40.0));
    }

    #[test]
    fn non_body_frames_ignore_page_scroll() {
        let pos = offset_position([OffsetFrame::new(Vec2::new(3.0, 4.0))], Vec2::new(9.0, 9.0));
        assert_eq!(pos, Point::new(3.0, 4.0));
    }

    #[test]
    fn offset_box_edges() {
        let b = OffsetBox {
            position: Point::new(10.0, 20.0),
            size: Size::new(100.0, 30.0),
        };
        assert_eq!(b.top(), 20.0);
        assert_eq!(b.bottom(), 50.0);
        assert_eq!(b.left(), 10.0);
        assert_eq!(b.right(), 110.0);
        assert_eq!(b.mid(), Point::new(60.0, 35.0));
        assert_eq!(b.rect(), Rect::new(10.0, 20.0, 110.0, 50.0));
    }
}
