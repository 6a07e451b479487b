// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque item identifiers.
//!
//! Hosts tag every item (and handle) with an [`ItemId`] so it can be resolved
//! again after the list has been mutated. Ids come from an [`ItemIdGen`], which
//! is monotonic: an id is never handed out twice by the same generator, so ids
//! are unique within one list and stable for the lifetime of the item.

use core::fmt;

/// An opaque identifier for an item or handle within one list.
///
/// # Example
///
/// ```rust
/// use understory_reorder::ItemIdGen;
///
/// let mut ids = ItemIdGen::new();
/// let a = ids.next_id();
/// let b = ids.next_id();
/// assert_ne!(a, b);
/// assert_eq!(a.to_string().parse::<u64>().ok(), Some(a.get()));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    /// Wraps a raw value, for example one read back from a host attribute.
    #[must_use]
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ItemId").field(&self.0).finish()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic [`ItemId`] source.
#[derive(Clone, Debug, Default)]
pub struct ItemIdGen {
    next: u64,
}

impl ItemIdGen {
    /// Creates a generator whose first id is `1`.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns a fresh id.
    pub fn next_id(&mut self) -> ItemId {
        self.next += 1;
        ItemId(self.next)
    }

    /// Makes sure future ids never collide with `seen`.
    ///
    /// Hosts call this when they adopt ids that were written by an earlier
    /// generator (for example ids already present on DOM attributes).
    pub fn observe(&mut self, seen: ItemId) {
        self.next = self.next.max(seen.0);
    }
}
