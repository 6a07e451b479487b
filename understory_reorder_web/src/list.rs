// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`ListHost`] over a DOM subtree.

use alloc::string::ToString;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};
use understory_reorder::geometry::{OffsetFrame, offset_box};
use understory_reorder::{HitItems, ItemId, ItemIdGen, ListHost, OffsetAxes, SetupError};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, HtmlElement, Node, NodeList};

use crate::style::{
    DRAGGING, ID_ATTRIBUTE, InlineStyle, STATE_ATTRIBUTE, cleared_offset_style, flip_style,
    offset_style, parse_id, released_flip_style,
};

/// Elements known to the list, keyed by the id written on them.
#[derive(Default)]
struct Registry {
    ids: ItemIdGen,
    elements: HashMap<ItemId, Element>,
}

impl Registry {
    /// The id of `element`, assigning one on first sight.
    fn adopt(&mut self, element: &Element) -> ItemId {
        if let Some(id) = element.get_attribute(ID_ATTRIBUTE).as_deref().and_then(parse_id) {
            match self.elements.get(&id) {
                Some(known) if known == element => return id,
                // Cloned elements carry their source's id.
                Some(_) => {}
                None => {
                    self.ids.observe(id);
                    self.elements.insert(id, element.clone());
                    return id;
                }
            }
        }
        let id = self.ids.next_id();
        if element.set_attribute(ID_ATTRIBUTE, &id.to_string()).is_err() {
            tracing::warn!(%id, "failed to tag list element");
        }
        self.elements.insert(id, element.clone());
        id
    }

    /// Forgets elements that are no longer inside `root`.
    fn prune(&mut self, root: &Node) -> usize {
        let before = self.elements.len();
        self.elements.retain(|_, el| {
            let node: &Node = el;
            root.contains(Some(node))
        });
        before - self.elements.len()
    }
}

/// A reorderable list rooted at one DOM element.
///
/// Items and handles are both addressed by [`ItemId`]; ids are written to
/// the `data-reorder-id` attribute the first time an element is seen.
pub struct WebList {
    document: Document,
    root: Element,
    registry: RefCell<Registry>,
}

impl fmt::Debug for WebList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebList")
            .field("root", &self.root.tag_name())
            .field("elements", &self.registry.borrow().elements.len())
            .finish_non_exhaustive()
    }
}

impl WebList {
    /// Resolves `selector` to the list root.
    ///
    /// # Errors
    ///
    /// [`SetupError::RootNotFound`] when nothing matches (or there is no
    /// document), [`SetupError::AmbiguousRoot`] when more than one element does.
    pub fn from_selector(selector: &str) -> Result<Self, SetupError> {
        let not_found = || SetupError::RootNotFound {
            selector: selector.into(),
        };
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(not_found)?;
        let matches = document
            .query_selector_all(selector)
            .map_err(|_| not_found())?;
        match matches.length() {
            0 => Err(not_found()),
            1 => {
                let root = element_at(&matches, 0).ok_or_else(not_found)?;
                Ok(Self::with_document(document, root))
            }
            n => Err(SetupError::AmbiguousRoot {
                selector: selector.into(),
                matches: usize::try_from(n).unwrap_or(usize::MAX),
            }),
        }
    }

    /// Uses `root` as the list root.
    ///
    /// Returns `None` when `root` is not attached to a document.
    #[must_use]
    pub fn new(root: Element) -> Option<Self> {
        let document = root.owner_document()?;
        Some(Self::with_document(document, root))
    }

    fn with_document(document: Document, root: Element) -> Self {
        Self {
            document,
            root,
            registry: RefCell::new(Registry::default()),
        }
    }

    /// The list root.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The document the list lives in.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The element behind `id`.
    #[must_use]
    pub fn element(&self, id: ItemId) -> Option<Element> {
        self.registry.borrow().elements.get(&id).cloned()
    }

    /// Drops elements that have been removed from the list.
    pub(crate) fn prune(&self) {
        let pruned = self.registry.borrow_mut().prune(&self.root);
        if pruned > 0 {
            tracing::debug!(pruned, "forgot detached list elements");
        }
    }

    fn adopt(&self, element: &Element) -> ItemId {
        self.registry.borrow_mut().adopt(element)
    }

    fn html(&self, id: ItemId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn owns(&self, element: &Element) -> bool {
        let node: &Node = element;
        self.root.contains(Some(node))
    }

    fn query(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.root.query_selector_all(selector) else {
            tracing::warn!(selector, "invalid selector");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| element_at(&list, i))
            .collect()
    }

    /// Offset-parent chain of `element`, element first.
    fn offset_chain(element: &HtmlElement) -> Vec<OffsetFrame> {
        let mut chain = Vec::new();
        let mut current = Some(element.clone());
        while let Some(el) = current {
            let frame = OffsetFrame::new(Vec2::new(
                f64::from(el.offset_left()),
                f64::from(el.offset_top()),
            ))
            .with_scroll(Vec2::new(
                f64::from(el.scroll_left()),
                f64::from(el.scroll_top()),
            ))
            .with_client(Vec2::new(
                f64::from(el.client_left()),
                f64::from(el.client_top()),
            ));
            chain.push(if el.tag_name() == "BODY" {
                OffsetFrame {
                    is_body: true,
                    ..frame
                }
            } else {
                frame
            });
            current = el
                .offset_parent()
                .and_then(|p| p.dyn_into::<HtmlElement>().ok());
        }
        chain
    }

    fn page_scroll(&self) -> Vec2 {
        self.document
            .document_element()
            .map_or(Vec2::ZERO, |root| {
                Vec2::new(f64::from(root.scroll_left()), f64::from(root.scroll_top()))
            })
    }

    fn apply_offset_style(&self, item: ItemId, style: &InlineStyle) {
        if let Some(el) = self.html(item) {
            apply_style(&el, style);
        }
    }

    fn relocate(&self, item: ItemId, reference: ItemId, after: bool) {
        if item == reference {
            return;
        }
        let (Some(el), Some(anchor)) = (self.element(item), self.element(reference)) else {
            tracing::warn!(%item, %reference, "relocation between unknown elements");
            return;
        };
        let Some(parent) = anchor.parent_node() else {
            return;
        };
        let before: Option<Node> = if after {
            anchor.next_sibling()
        } else {
            Some(anchor.into())
        };
        if parent.insert_before(&el, before.as_ref()).is_err() {
            tracing::warn!(%item, %reference, "failed to relocate list item");
        }
    }
}

fn apply_style(el: &HtmlElement, style: &InlineStyle) {
    let declarations = el.style();
    for (name, value) in &style.set {
        if declarations.set_property(name, value).is_err() {
            tracing::warn!(name, "failed to set inline style");
        }
    }
    for name in &style.remove {
        let _ = declarations.remove_property(name);
    }
}

fn element_at(list: &NodeList, index: u32) -> Option<Element> {
    list.get(index)?.dyn_into::<Element>().ok()
}

impl ListHost for WebList {
    type Item = ItemId;
    type Node = ItemId;

    fn items(&self, item_selector: &str) -> Vec<ItemId> {
        self.query(item_selector)
            .iter()
            .map(|el| self.adopt(el))
            .collect()
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "elementsFromPoint takes single-precision viewport coordinates"
    )]
    fn items_at(&self, point: Point, item_selector: &str) -> HitItems<ItemId> {
        let stack = self
            .document
            .elements_from_point(point.x as f32, point.y as f32);
        let mut hits = HitItems::new();
        for value in stack.iter() {
            let Ok(el) = value.dyn_into::<Element>() else {
                continue;
            };
            if el.matches(item_selector).unwrap_or(false) && self.owns(&el) {
                let id = self.adopt(&el);
                if !hits.contains(&id) {
                    hits.push(id);
                }
            }
        }
        hits
    }

    fn closest_item(&self, node: ItemId, item_selector: &str) -> Option<ItemId> {
        let item = self.element(node)?.closest(item_selector).ok()??;
        self.owns(&item).then(|| self.adopt(&item))
    }

    fn find_handle(&self, item: ItemId, handle_selector: &str) -> Option<ItemId> {
        let handle = self.element(item)?.query_selector(handle_selector).ok()??;
        Some(self.adopt(&handle))
    }

    fn start_targets(&self, item_selector: &str, handle_selector: Option<&str>) -> Vec<ItemId> {
        if let Some(selector) = handle_selector {
            let handles: Vec<ItemId> = self
                .query(selector)
                .iter()
                .filter(|h| matches!(h.closest(item_selector), Ok(Some(_))))
                .map(|h| self.adopt(h))
                .collect();
            if !handles.is_empty() {
                return handles;
            }
        }
        self.items(item_selector)
    }

    fn item_node(&self, item: ItemId) -> ItemId {
        item
    }

    fn layout_rect(&self, node: ItemId) -> Option<Rect> {
        let el = self.html(node)?;
        let size = Size::new(
            f64::from(el.offset_width()),
            f64::from(el.offset_height()),
        );
        Some(offset_box(Self::offset_chain(&el), self.page_scroll(), size).rect())
    }

    fn visual_rect(&self, item: ItemId) -> Option<Rect> {
        let bounds = self.element(item)?.get_bounding_client_rect();
        Some(Rect::from_origin_size(
            (bounds.x(), bounds.y()),
            (bounds.width(), bounds.height()),
        ))
    }

    fn move_before(&mut self, item: ItemId, reference: ItemId) {
        self.relocate(item, reference, false);
    }

    fn move_after(&mut self, item: ItemId, reference: ItemId) {
        self.relocate(item, reference, true);
    }

    fn set_drag_marker(&mut self, item: ItemId, dragging: bool) {
        let Some(el) = self.element(item) else {
            return;
        };
        let result = if dragging {
            el.set_attribute(STATE_ATTRIBUTE, DRAGGING)
        } else {
            el.remove_attribute(STATE_ATTRIBUTE)
        };
        if result.is_err() {
            tracing::warn!(%item, "failed to update drag marker");
        }
    }

    fn set_drag_offset(&mut self, item: ItemId, offset: Option<Vec2>, axes: OffsetAxes) {
        let style = match offset {
            Some(offset) => offset_style(offset, axes),
            None => cleared_offset_style(),
        };
        self.apply_offset_style(item, &style);
    }

    fn set_list_state(&mut self, state: &str) {
        if self.root.set_attribute(STATE_ATTRIBUTE, state).is_err() {
            tracing::warn!(state, "failed to write list state");
        }
    }

    fn play_flip(&mut self, item: ItemId, invert: Vec2) {
        let Some(el) = self.html(item) else {
            return;
        };
        apply_style(&el, &flip_style(invert));
        // Flush layout so the inverted position is painted before the release.
        let _ = el.offset_height();

        let target = el.clone();
        let callback = Closure::once(move |_timestamp: f64| {
            apply_style(&target, &released_flip_style());
        });
        let frame: &js_sys::Function = callback.as_ref().unchecked_ref();
        let scheduled = web_sys::window().map(|w| w.request_animation_frame(frame).is_ok());
        if scheduled == Some(true) {
            callback.forget();
        } else {
            apply_style(&el, &released_flip_style());
        }
    }
}
