// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory [`ListHost`]: a vertical stack of rows.
//!
//! `MemoryList` stands in for a document when there is none: tests, benches,
//! headless demos, or hosts that render the list themselves and only want the
//! reorder logic. Rows are laid out top to bottom inside a list container that
//! sits at `origin` on the page. Positions go through the same offset-chain
//! math a browser host uses, so list and page scroll behave the same way.
//!
//! Selectors are single class names (`".row"` matches class `row`).
//! Each row may carry one handle: a strip on the row's leading edge.
//!
//! Visual state is recorded rather than rendered: the list state marker, the
//! per-item dragging marker, the offset custom properties and FLIP transforms.
//! FLIP releases wait for [`MemoryList::run_frame`], standing in for the next
//! animation frame.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_reorder::ListHost;
//! use understory_reorder::memory::MemoryList;
//!
//! let mut list = MemoryList::new(120.0);
//! let a = list.push(".row", 20.0);
//! let b = list.push_with_handle(".row", 30.0, ".grip");
//!
//! assert_eq!(list.items(".row"), vec![a, b]);
//! assert_eq!(list.layout_rect(list.node(b)), Some(Rect::new(0.0, 20.0, 120.0, 50.0)));
//! assert_eq!(list.items_at(Point::new(5.0, 25.0), ".row").as_slice(), &[b]);
//! assert_eq!(list.closest_item(list.handle(b), ".row"), Some(b));
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect, Size, Vec2};

use crate::config::OffsetAxes;
use crate::geometry::{OffsetFrame, offset_box};
use crate::host::{HitItems, ListHost};
use crate::id::{ItemId, ItemIdGen};

/// Width of the handle strip on a row's leading edge.
pub const HANDLE_WIDTH: f64 = 24.0;

/// A node of a [`MemoryList`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemoryNode {
    /// A row.
    Item(ItemId),
    /// The handle inside a row.
    Handle(ItemId),
    /// A node outside any row.
    Detached(u32),
}

/// Offset custom properties as written by the machine.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OffsetProps {
    /// `--x`, when exposed.
    pub x: Option<f64>,
    /// `--y`, when exposed.
    pub y: Option<f64>,
}

impl OffsetProps {
    /// The translation these properties produce.
    #[must_use]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }
}

#[derive(Clone, Debug)]
struct Row {
    id: ItemId,
    class: String,
    extent: f64,
    handle: Option<String>,
}

/// An in-memory list of rows.
#[derive(Clone, Debug)]
pub struct MemoryList {
    rows: Vec<Row>,
    width: f64,
    gap: f64,
    origin: Vec2,
    list_scroll: Vec2,
    page_scroll: Vec2,
    ids: ItemIdGen,
    detached: u32,
    state: String,
    markers: HashSet<ItemId>,
    offsets: HashMap<ItemId, OffsetProps>,
    flips: HashMap<ItemId, Vec2>,
    pending_release: Vec<ItemId>,
    relocations: usize,
}

fn class_matches(selector: &str, class: &str) -> bool {
    selector.strip_prefix('.').unwrap_or(selector) == class.strip_prefix('.').unwrap_or(class)
}

impl MemoryList {
    /// An empty list whose rows are `width` wide.
    #[must_use]
    pub fn new(width: f64) -> Self {
        Self {
            rows: Vec::new(),
            width,
            gap: 0.0,
            origin: Vec2::ZERO,
            list_scroll: Vec2::ZERO,
            page_scroll: Vec2::ZERO,
            ids: ItemIdGen::new(),
            detached: 0,
            state: String::new(),
            markers: HashSet::new(),
            offsets: HashMap::new(),
            flips: HashMap::new(),
            pending_release: Vec::new(),
            relocations: 0,
        }
    }

    /// Sets the spacing between rows.
    #[must_use]
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Places the list container at `origin` on the page.
    #[must_use]
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Scrolls the list container.
    pub fn set_list_scroll(&mut self, scroll: Vec2) {
        self.list_scroll = scroll;
    }

    /// Scrolls the page.
    pub fn set_page_scroll(&mut self, scroll: Vec2) {
        self.page_scroll = scroll;
    }

    /// Appends a row with class `class` and height `extent`.
    pub fn push(&mut self, class: &str, extent: f64) -> ItemId {
        self.push_row(class, extent, None)
    }

    /// Appends a row carrying a handle with class `handle_class`.
    pub fn push_with_handle(&mut self, class: &str, extent: f64, handle_class: &str) -> ItemId {
        self.push_row(class, extent, Some(handle_class.into()))
    }

    fn push_row(&mut self, class: &str, extent: f64, handle: Option<String>) -> ItemId {
        let id = self.ids.next_id();
        self.rows.push(Row {
            id,
            class: class.into(),
            extent,
            handle,
        });
        id
    }

    /// Removes a row.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.rows.remove(index);
        self.markers.remove(&id);
        self.offsets.remove(&id);
        self.flips.remove(&id);
        true
    }

    /// A fresh node outside every row.
    pub fn detached_node(&mut self) -> MemoryNode {
        self.detached += 1;
        MemoryNode::Detached(self.detached)
    }

    /// The node of row `id`.
    #[must_use]
    pub fn node(&self, id: ItemId) -> MemoryNode {
        MemoryNode::Item(id)
    }

    /// The handle node of row `id`.
    #[must_use]
    pub fn handle(&self, id: ItemId) -> MemoryNode {
        MemoryNode::Handle(id)
    }

    /// Row ids in display order.
    #[must_use]
    pub fn order(&self) -> Vec<ItemId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    /// State path last written onto the list root.
    #[must_use]
    pub fn list_state(&self) -> &str {
        &self.state
    }

    /// Whether row `id` carries the dragging marker.
    #[must_use]
    pub fn is_marked(&self, id: ItemId) -> bool {
        self.markers.contains(&id)
    }

    /// Offset properties on row `id`, if any are set.
    #[must_use]
    pub fn offset_props(&self, id: ItemId) -> Option<OffsetProps> {
        self.offsets.get(&id).copied()
    }

    /// FLIP translation currently applied to row `id`.
    #[must_use]
    pub fn flip(&self, id: ItemId) -> Option<Vec2> {
        self.flips.get(&id).copied()
    }

    /// Number of FLIP transforms waiting for the next frame.
    #[must_use]
    pub fn pending_frame(&self) -> usize {
        self.pending_release.len()
    }

    /// Runs one animation frame: releases pending FLIP transforms to identity.
    ///
    /// Returns how many transforms were released.
    pub fn run_frame(&mut self) -> usize {
        let released = self.pending_release.len();
        for id in self.pending_release.drain(..) {
            self.flips.remove(&id);
        }
        released
    }

    /// Number of single-row relocations performed so far.
    #[must_use]
    pub fn relocations(&self) -> usize {
        self.relocations
    }

    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    fn row_rect(&self, index: usize) -> Rect {
        let y: f64 = self.rows[..index]
            .iter()
            .map(|r| r.extent + self.gap)
            .sum();
        let chain = [
            OffsetFrame::new(Vec2::new(0.0, y)),
            OffsetFrame::new(self.origin).with_scroll(self.list_scroll),
            OffsetFrame::body(),
        ];
        offset_box(
            chain,
            self.page_scroll,
            Size::new(self.width, self.rows[index].extent),
        )
        .rect()
    }

    fn visual_offset(&self, id: ItemId) -> Vec2 {
        let drag = self.offsets.get(&id).map_or(Vec2::ZERO, OffsetProps::as_vec2);
        let flip = self.flips.get(&id).copied().unwrap_or(Vec2::ZERO);
        drag + flip
    }

    fn relocate(&mut self, item: ItemId, reference: ItemId, after: bool) {
        if item == reference {
            return;
        }
        let Some(from) = self.index_of(item) else {
            return;
        };
        let row = self.rows.remove(from);
        let Some(at) = self.index_of(reference) else {
            self.rows.insert(from, row);
            return;
        };
        self.rows.insert(if after { at + 1 } else { at }, row);
        self.relocations += 1;
    }
}

impl ListHost for MemoryList {
    type Item = ItemId;
    type Node = MemoryNode;

    fn items(&self, item_selector: &str) -> Vec<ItemId> {
        self.rows
            .iter()
            .filter(|r| class_matches(item_selector, &r.class))
            .map(|r| r.id)
            .collect()
    }

    fn items_at(&self, point: Point, item_selector: &str) -> HitItems<ItemId> {
        let mut hits = HitItems::new();
        // Offset rows paint on top of the static stack.
        for (index, row) in self.rows.iter().enumerate() {
            if !class_matches(item_selector, &row.class) || !self.offsets.contains_key(&row.id) {
                continue;
            }
            if (self.row_rect(index) + self.visual_offset(row.id)).contains(point) {
                hits.push(row.id);
            }
        }
        for (index, row) in self.rows.iter().enumerate() {
            if class_matches(item_selector, &row.class)
                && !hits.contains(&row.id)
                && self.row_rect(index).contains(point)
            {
                hits.push(row.id);
            }
        }
        hits
    }

    fn closest_item(&self, node: MemoryNode, item_selector: &str) -> Option<ItemId> {
        let id = match node {
            MemoryNode::Item(id) | MemoryNode::Handle(id) => id,
            MemoryNode::Detached(_) => return None,
        };
        let row = &self.rows[self.index_of(id)?];
        if let MemoryNode::Handle(_) = node {
            row.handle.as_ref()?;
        }
        class_matches(item_selector, &row.class).then_some(id)
    }

    fn find_handle(&self, item: ItemId, handle_selector: &str) -> Option<MemoryNode> {
        let row = &self.rows[self.index_of(item)?];
        let handle = row.handle.as_deref()?;
        class_matches(handle_selector, handle).then_some(MemoryNode::Handle(item))
    }

    fn start_targets(&self, item_selector: &str, handle_selector: Option<&str>) -> Vec<MemoryNode> {
        let items = || {
            self.rows
                .iter()
                .filter(|r| class_matches(item_selector, &r.class))
        };
        let handles: Vec<MemoryNode> = match handle_selector {
            Some(sel) => items()
                .filter(|r| r.handle.as_deref().is_some_and(|h| class_matches(sel, h)))
                .map(|r| MemoryNode::Handle(r.id))
                .collect(),
            None => Vec::new(),
        };
        if handles.is_empty() {
            items().map(|r| MemoryNode::Item(r.id)).collect()
        } else {
            handles
        }
    }

    fn item_node(&self, item: ItemId) -> MemoryNode {
        MemoryNode::Item(item)
    }

    fn layout_rect(&self, node: MemoryNode) -> Option<Rect> {
        match node {
            MemoryNode::Item(id) => Some(self.row_rect(self.index_of(id)?)),
            MemoryNode::Handle(id) => {
                let index = self.index_of(id)?;
                self.rows[index].handle.as_ref()?;
                let row = self.row_rect(index);
                Some(Rect::new(
                    row.x0,
                    row.y0,
                    row.x0 + HANDLE_WIDTH.min(row.width()),
                    row.y1,
                ))
            }
            MemoryNode::Detached(_) => None,
        }
    }

    fn visual_rect(&self, item: ItemId) -> Option<Rect> {
        let index = self.index_of(item)?;
        Some(self.row_rect(index) + self.visual_offset(item))
    }

    fn move_before(&mut self, item: ItemId, reference: ItemId) {
        self.relocate(item, reference, false);
    }

    fn move_after(&mut self, item: ItemId, reference: ItemId) {
        self.relocate(item, reference, true);
    }

    fn set_drag_marker(&mut self, item: ItemId, dragging: bool) {
        if dragging {
            self.markers.insert(item);
        } else {
            self.markers.remove(&item);
        }
    }

    fn set_drag_offset(&mut self, item: ItemId, offset: Option<Vec2>, axes: OffsetAxes) {
        match offset {
            Some(offset) => {
                let props = OffsetProps {
                    x: axes.has_x().then_some(offset.x),
                    y: axes.has_y().then_some(offset.y),
                };
                self.offsets.insert(item, props);
            }
            None => {
                self.offsets.remove(&item);
            }
        }
    }

    fn set_list_state(&mut self, state: &str) {
        self.state.clear();
        self.state.push_str(state);
    }

    fn play_flip(&mut self, item: ItemId, invert: Vec2) {
        self.flips.insert(item, invert);
        if !self.pending_release.contains(&item) {
            self.pending_release.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn three_rows() -> (MemoryList, [ItemId; 3]) {
        let mut list = MemoryList::new(100.0);
        let a = list.push(".row", 10.0);
        let b = list.push(".row", 20.0);
        let c = list.push(".row", 10.0);
        (list, [a, b, c])
    }

    #[test]
    fn rows_stack_with_gaps_and_origin() {
        let mut list = MemoryList::new(50.0)
            .with_gap(2.0)
            .with_origin(Vec2::new(5.0, 100.0));
        let a = list.push("row", 10.0);
        let b = list.push("row", 10.0);
        assert_eq!(
            list.layout_rect(list.node(a)),
            Some(Rect::new(5.0, 100.0, 55.0, 110.0))
        );
        assert_eq!(
            list.layout_rect(list.node(b)),
            Some(Rect::new(5.0, 112.0, 55.0, 122.0))
        );
    }

    #[test]
    fn scrolling_shifts_viewport_positions() {
        let (mut list, [a, ..]) = three_rows();
        list.set_page_scroll(Vec2::new(0.0, 30.0));
        list.set_list_scroll(Vec2::new(0.0, 5.0));
        assert_eq!(
            list.layout_rect(list.node(a)),
            Some(Rect::new(0.0, -35.0, 100.0, -25.0))
        );
    }

    #[test]
    fn move_before_and_after() {
        let (mut list, [a, b, c]) = three_rows();
        list.move_before(c, a);
        assert_eq!(list.order(), vec![c, a, b]);
        list.move_after(c, b);
        assert_eq!(list.order(), vec![a, b, c]);
        assert_eq!(list.relocations(), 2);

        // Moving relative to itself is not a relocation.
        list.move_after(a, a);
        assert_eq!(list.relocations(), 2);
    }

    #[test]
    fn offset_rows_are_hit_first() {
        let (mut list, [a, b, _]) = three_rows();
        list.set_drag_offset(a, Some(Vec2::new(0.0, 12.0)), OffsetAxes::Both);
        let hits = list.items_at(Point::new(1.0, 15.0), ".row");
        assert_eq!(hits.as_slice(), &[a, b]);
    }

    #[test]
    fn hidden_axes_are_not_written() {
        let (mut list, [a, ..]) = three_rows();
        list.set_drag_offset(a, Some(Vec2::new(0.0, 4.0)), OffsetAxes::Vertical);
        assert_eq!(
            list.offset_props(a),
            Some(OffsetProps {
                x: None,
                y: Some(4.0)
            })
        );
        list.set_drag_offset(a, None, OffsetAxes::Vertical);
        assert_eq!(list.offset_props(a), None);
    }

    #[test]
    fn flips_release_on_next_frame() {
        let (mut list, [a, b, _]) = three_rows();
        list.play_flip(b, Vec2::new(0.0, 10.0));
        assert_eq!(list.visual_rect(b), Some(Rect::new(0.0, 20.0, 100.0, 40.0)));
        assert_eq!(list.pending_frame(), 1);
        assert_eq!(list.run_frame(), 1);
        assert_eq!(list.flip(b), None);
        assert_eq!(list.visual_rect(a), list.layout_rect(list.node(a)));
    }

    #[test]
    fn handles_and_start_targets() {
        let mut list = MemoryList::new(100.0);
        let a = list.push_with_handle(".row", 10.0, ".grip");
        let b = list.push(".row", 10.0);
        assert_eq!(list.find_handle(a, ".grip"), Some(MemoryNode::Handle(a)));
        assert_eq!(list.find_handle(b, ".grip"), None);
        assert_eq!(
            list.start_targets(".row", Some(".grip")),
            vec![MemoryNode::Handle(a)]
        );
        assert_eq!(
            list.start_targets(".row", None),
            vec![MemoryNode::Item(a), MemoryNode::Item(b)]
        );
        assert_eq!(
            list.layout_rect(list.handle(a)),
            Some(Rect::new(0.0, 0.0, HANDLE_WIDTH, 10.0))
        );
    }

    #[test]
    fn detached_nodes_resolve_to_nothing() {
        let (mut list, _) = three_rows();
        let loose = list.detached_node();
        assert_eq!(list.closest_item(loose, ".row"), None);
        assert_eq!(list.layout_rect(loose), None);
    }

    #[test]
    fn selectors_filter_rows() {
        let mut list = MemoryList::new(100.0);
        let a = list.push(".row", 10.0);
        let _footer = list.push(".footer", 10.0);
        assert_eq!(list.items(".row"), vec![a]);
        assert!(list.items_at(Point::new(1.0, 15.0), ".row").is_empty());
    }
}
