// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute names and style values written into the document.

use alloc::format;
use alloc::string::String;

use kurbo::Vec2;
use smallvec::SmallVec;
use understory_reorder::{ItemId, OffsetAxes};

/// Attribute carrying an element's [`ItemId`].
pub const ID_ATTRIBUTE: &str = "data-reorder-id";

/// Attribute carrying the state path on the list root and the dragging
/// marker on the dragged item.
pub const STATE_ATTRIBUTE: &str = "data-state";

/// Value of [`STATE_ATTRIBUTE`] on the dragged item.
pub const DRAGGING: &str = "dragging";

/// Custom property for the horizontal drag offset.
pub const OFFSET_X: &str = "--x";

/// Custom property for the vertical drag offset.
pub const OFFSET_Y: &str = "--y";

const TRANSITION: &str = "transition";
const TRANSFORM: &str = "transform";

/// Parses the value of [`ID_ATTRIBUTE`].
#[must_use]
pub fn parse_id(value: &str) -> Option<ItemId> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|&raw| raw != 0)
        .map(ItemId::from_raw)
}

/// A CSS pixel length.
#[must_use]
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// A CSS `translate()` transform.
#[must_use]
pub fn translate(by: Vec2) -> String {
    format!("translate({}px, {}px)", by.x, by.y)
}

/// Inline style changes for one update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InlineStyle {
    /// Properties to set, with their values.
    pub set: SmallVec<[(&'static str, String); 2]>,
    /// Properties to remove.
    pub remove: SmallVec<[&'static str; 2]>,
}

/// Offset custom properties for `offset`.
///
/// Hidden axes are listed for removal so a stale value never lingers after
/// the configuration changes.
#[must_use]
pub fn offset_style(offset: Vec2, axes: OffsetAxes) -> InlineStyle {
    let mut style = InlineStyle::default();
    for (name, shown, value) in [
        (OFFSET_X, axes.has_x(), offset.x),
        (OFFSET_Y, axes.has_y(), offset.y),
    ] {
        if shown {
            style.set.push((name, px(value)));
        } else {
            style.remove.push(name);
        }
    }
    style
}

/// Removes both offset custom properties.
#[must_use]
pub fn cleared_offset_style() -> InlineStyle {
    InlineStyle {
        set: SmallVec::new(),
        remove: SmallVec::from_slice(&[OFFSET_X, OFFSET_Y]),
    }
}

/// Snaps an element to `invert` with transitions disabled.
#[must_use]
pub fn flip_style(invert: Vec2) -> InlineStyle {
    InlineStyle {
        set: SmallVec::from_iter([
            (TRANSITION, String::from("none")),
            (TRANSFORM, translate(invert)),
        ]),
        remove: SmallVec::new(),
    }
}

/// Hands a flipped element back to its stylesheet transition.
#[must_use]
pub fn released_flip_style() -> InlineStyle {
    InlineStyle {
        set: SmallVec::new(),
        remove: SmallVec::from_slice(&[TRANSITION, TRANSFORM]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_attributes() {
        let id = ItemId::from_raw(17);
        assert_eq!(parse_id(&format!("{id}")), Some(id));
        assert_eq!(parse_id(" 3 "), Some(ItemId::from_raw(3)));
    }

    #[test]
    fn malformed_ids_are_rejected() {
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("0"), None);
    }

    #[test]
    fn lengths_and_transforms() {
        assert_eq!(px(-3.5), "-3.5px");
        assert_eq!(translate(Vec2::new(0.0, -10.0)), "translate(0px, -10px)");
    }

    #[test]
    fn vertical_offsets_drop_x() {
        let style = offset_style(Vec2::new(4.0, 12.0), OffsetAxes::Vertical);
        assert_eq!(style.set.as_slice(), &[(OFFSET_Y, String::from("12px"))]);
        assert_eq!(style.remove.as_slice(), &[OFFSET_X]);

        let style = offset_style(Vec2::new(4.0, 12.0), OffsetAxes::Both);
        assert_eq!(style.set.len(), 2);
        assert!(style.remove.is_empty());
    }

    #[test]
    fn clearing_removes_both_axes() {
        let style = cleared_offset_style();
        assert!(style.set.is_empty());
        assert_eq!(style.remove.as_slice(), &[OFFSET_X, OFFSET_Y]);
    }

    #[test]
    fn flips_snap_then_release_the_same_properties() {
        let snap = flip_style(Vec2::new(0.0, -10.0));
        assert_eq!(
            snap.set.as_slice(),
            &[
                ("transition", String::from("none")),
                ("transform", String::from("translate(0px, -10px)")),
            ]
        );
        assert!(snap.remove.is_empty());

        let release = released_flip_style();
        assert!(release.set.is_empty());
        let snapped: SmallVec<[&str; 2]> = snap.set.iter().map(|(name, _)| *name).collect();
        assert_eq!(release.remove, snapped);
    }
}
