// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor identity types.

use core::fmt;

use super::AnchorCategory;

/// A slot handle within one category of an [`AnchorStore`](super::AnchorStore).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after an anchor is removed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId {
    /// Slot index into the category's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the store's generation for this slot.
    pub(crate) generation: u32,
}

impl AnchorId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnchorId({}@gen{})", self.idx, self.generation)
    }
}

/// Fully qualified anchor handle: category plus slot id.
///
/// An anchor's category is fixed when it is inserted, so the key alone
/// locates it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorKey {
    category: AnchorCategory,
    id: AnchorId,
}

impl AnchorKey {
    pub(crate) const fn new(category: AnchorCategory, id: AnchorId) -> Self {
        Self { category, id }
    }

    /// The anchor's category.
    #[inline]
    #[must_use]
    pub const fn category(self) -> AnchorCategory {
        self.category
    }

    /// The anchor's id within its category.
    #[inline]
    #[must_use]
    pub const fn id(self) -> AnchorId {
        self.id
    }
}

impl fmt::Debug for AnchorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnchorKey({}:{}@gen{})",
            self.category.name(),
            self.id.idx,
            self.id.generation
        )
    }
}

impl fmt::Display for AnchorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.category.name(), self.id.idx)
    }
}
