// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Categorized anchor storage.
//!
//! Anchors are partitioned into the four [`AnchorCategory`] values and
//! addressed by [`AnchorKey`] handles. Each handle carries a generation so
//! that a key kept after its anchor was removed never aliases a newer anchor
//! in the same slot.

mod category;
mod id;
mod store;

pub use category::{AnchorCategory, Rgba};
pub use id::{AnchorId, AnchorKey};
pub use store::AnchorStore;

/// An anchor handle plus the color its overlay is drawn with.
#[derive(Clone, Debug, PartialEq)]
pub struct ColoredAnchor<A> {
    anchor: A,
    color: Rgba,
}

impl<A> ColoredAnchor<A> {
    /// Pairs an anchor with a color.
    #[inline]
    #[must_use]
    pub const fn new(anchor: A, color: Rgba) -> Self {
        Self { anchor, color }
    }

    /// The runtime anchor.
    #[inline]
    #[must_use]
    pub const fn anchor(&self) -> &A {
        &self.anchor
    }

    /// Overlay color.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> Rgba {
        self.color
    }

    /// Unwraps the anchor, handing ownership (and release) to the caller.
    #[inline]
    #[must_use]
    pub fn into_anchor(self) -> A {
        self.anchor
    }
}
