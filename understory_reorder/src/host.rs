// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability interface between the drag machine and the element tree.
//!
//! [`ListHost`] is everything the machine and controller need from a document:
//! resolving items by selector, hit testing, measuring, relocating and writing
//! the visual contract (state markers and offset properties). It is bound to a
//! single list root, so "the list" is implied by the host instance.
//!
//! Two implementations ship with the workspace:
//! - [`MemoryList`](crate::memory::MemoryList): an in-memory vertical stack,
//!   used by tests, benches and headless demos.
//! - `understory_reorder_web::WebList`: the DOM, through `web-sys`.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::config::OffsetAxes;

/// Items under a point, topmost first.
pub type HitItems<I> = SmallVec<[I; 4]>;

/// Element tree operations for one reorderable list.
pub trait ListHost {
    /// Identity of an item. Stable across relocations.
    type Item: Copy + Eq + Debug;
    /// Identity of any element that can receive input (items and handles).
    type Node: Copy + Eq + Hash + Debug;

    /// All items under the list root matching `item_selector`, in live order.
    fn items(&self, item_selector: &str) -> Vec<Self::Item>;

    /// Items matching `item_selector` whose bounds contain `point`, topmost first.
    ///
    /// The dragged item may be among the results; the machine filters it.
    fn items_at(&self, point: Point, item_selector: &str) -> HitItems<Self::Item>;

    /// The closest ancestor-or-self of `node` matching `item_selector`.
    fn closest_item(&self, node: Self::Node, item_selector: &str) -> Option<Self::Item>;

    /// The first descendant of `item` matching `handle_selector`.
    fn find_handle(&self, item: Self::Item, handle_selector: &str) -> Option<Self::Node>;

    /// Nodes that start drags: every handle if any exists, otherwise every item.
    fn start_targets(&self, item_selector: &str, handle_selector: Option<&str>)
    -> Vec<Self::Node>;

    /// The node for an item.
    fn item_node(&self, item: Self::Item) -> Self::Node;

    /// Untransformed bounds of `node` in viewport coordinates.
    ///
    /// Ignores the live drag offset and FLIP compensation.
    fn layout_rect(&self, node: Self::Node) -> Option<Rect>;

    /// Bounds of `item` as currently displayed, transforms included.
    fn visual_rect(&self, item: Self::Item) -> Option<Rect>;

    /// Relocates `item` to be the previous sibling of `reference`.
    fn move_before(&mut self, item: Self::Item, reference: Self::Item);

    /// Relocates `item` to be the next sibling of `reference`.
    fn move_after(&mut self, item: Self::Item, reference: Self::Item);

    /// Sets or clears the per-item "dragging" marker.
    fn set_drag_marker(&mut self, item: Self::Item, dragging: bool);

    /// Writes the live offset custom properties, or removes them with `None`.
    ///
    /// Only the components exposed by `axes` are written; hidden components
    /// arrive as zero.
    fn set_drag_offset(&mut self, item: Self::Item, offset: Option<Vec2>, axes: OffsetAxes);

    /// Writes the machine state path onto the list root.
    fn set_list_state(&mut self, state: &str);

    /// Applies `invert` as a zero-duration translation on `item` and releases
    /// it to identity on the next frame.
    ///
    /// The release is fire-and-forget; the machine never waits for it.
    fn play_flip(&mut self, item: Self::Item, invert: Vec2);
}
