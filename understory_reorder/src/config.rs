// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-list configuration.

use alloc::string::String;

use kurbo::Vec2;

use crate::error::SetupError;

/// Which components of the live drag offset are exposed to styling.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OffsetAxes {
    /// Both `--x` and `--y`.
    #[default]
    Both,
    /// Only `--y`; the item stays in its column.
    Vertical,
    /// Only `--x`; the item stays in its row.
    Horizontal,
}

impl OffsetAxes {
    /// Zeroes the components this mode does not expose.
    #[must_use]
    pub fn mask(self, offset: Vec2) -> Vec2 {
        match self {
            Self::Both => offset,
            Self::Vertical => Vec2::new(0.0, offset.y),
            Self::Horizontal => Vec2::new(offset.x, 0.0),
        }
    }

    /// Whether the `x` component is exposed.
    #[must_use]
    pub fn has_x(self) -> bool {
        !matches!(self, Self::Vertical)
    }

    /// Whether the `y` component is exposed.
    #[must_use]
    pub fn has_y(self) -> bool {
        !matches!(self, Self::Horizontal)
    }
}

/// The point used to look for a neighbor on every move.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HitPoint {
    /// Hit-test at the pointer position.
    #[default]
    Pointer,
    /// Hit-test at the center of the dragged item as it is currently displayed.
    ItemCenter,
}

/// How the dragged item is positioned relative to the pointer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnchorPolicy {
    /// Keep the spot that was grabbed under the pointer; the item does not jump.
    #[default]
    KeepGrabPoint,
    /// Snap the reference (handle or item) center under the pointer.
    CenterReference,
}

/// Selectors identifying items and optional handles inside a list root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selectors {
    /// Matches every reorderable item.
    pub item: String,
    /// Matches the drag handle inside an item. Items without one drag by their body.
    pub handle: Option<String>,
}

/// Configuration for one reorderable list.
///
/// ```rust
/// use understory_reorder::{OffsetAxes, ReorderConfig};
///
/// let config = ReorderConfig::new(".js-dnd-list-el")
///     .with_handle(".js-dnd-handle")
///     .with_axes(OffsetAxes::Vertical);
/// assert!(config.validate().is_ok());
/// assert!(ReorderConfig::new("").validate().is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ReorderConfig {
    /// Item and handle selectors.
    pub selectors: Selectors,
    /// Offset components exposed as custom properties.
    pub axes: OffsetAxes,
    /// Where neighbors are hit-tested.
    pub hit_point: HitPoint,
    /// How the item follows the pointer.
    pub anchor: AnchorPolicy,
    /// Whether relocated neighbors play FLIP compensation.
    pub flip: bool,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self::new(".dnd-item")
    }
}

impl ReorderConfig {
    /// Configuration for items matching `item_selector`, without handles.
    pub fn new(item_selector: impl Into<String>) -> Self {
        Self {
            selectors: Selectors {
                item: item_selector.into(),
                handle: None,
            },
            axes: OffsetAxes::default(),
            hit_point: HitPoint::default(),
            anchor: AnchorPolicy::default(),
            flip: true,
        }
    }

    /// Requires drags to start on an element matching `handle_selector`.
    #[must_use]
    pub fn with_handle(mut self, handle_selector: impl Into<String>) -> Self {
        self.selectors.handle = Some(handle_selector.into());
        self
    }

    /// Sets the exposed offset axes.
    #[must_use]
    pub fn with_axes(mut self, axes: OffsetAxes) -> Self {
        self.axes = axes;
        self
    }

    /// Sets the hit-test point.
    #[must_use]
    pub fn with_hit_point(mut self, hit_point: HitPoint) -> Self {
        self.hit_point = hit_point;
        self
    }

    /// Sets the anchor policy.
    #[must_use]
    pub fn with_anchor(mut self, anchor: AnchorPolicy) -> Self {
        self.anchor = anchor;
        self
    }

    /// Enables or disables FLIP compensation.
    #[must_use]
    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    /// Checks the selectors.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::EmptyItemSelector`] or
    /// [`SetupError::EmptyHandleSelector`] for blank selectors.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.selectors.item.trim().is_empty() {
            return Err(SetupError::EmptyItemSelector);
        }
        if self
            .selectors
            .handle
            .as_deref()
            .is_some_and(|h| h.trim().is_empty())
        {
            return Err(SetupError::EmptyHandleSelector);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_drops_hidden_axes() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(OffsetAxes::Both.mask(v), v);
        assert_eq!(OffsetAxes::Vertical.mask(v), Vec2::new(0.0, 4.0));
        assert_eq!(OffsetAxes::Horizontal.mask(v), Vec2::new(3.0, 0.0));
        assert!(!OffsetAxes::Vertical.has_x());
        assert!(OffsetAxes::Vertical.has_y());
    }

    #[test]
    fn blank_handle_selector_is_rejected() {
        let config = ReorderConfig::new(".item").with_handle("  ");
        assert_eq!(config.validate(), Err(SetupError::EmptyHandleSelector));
    }

    #[test]
    fn default_targets_dnd_items_without_handles() {
        let config = ReorderConfig::default();
        assert_eq!(config.selectors.item, ".dnd-item");
        assert_eq!(config.selectors.handle, None);
        assert!(config.flip);
    }
}
