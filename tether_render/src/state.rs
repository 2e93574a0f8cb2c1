// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer lifecycle.

/// Whether a renderer's GPU resources exist.
///
/// Resources are created once per surface and released when the surface goes
/// away; the `Ready` payload owns every handle, so there is no way to reach a
/// stale handle from an uninitialized renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum RendererState<R> {
    /// No GPU resources.
    Uninitialized,
    /// GPU resources are live.
    Ready(R),
}

impl<R> Default for RendererState<R> {
    fn default() -> Self {
        Self::Uninitialized
    }
}

impl<R> RendererState<R> {
    /// Returns `true` when resources are live.
    #[inline]
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The live resources, if any.
    #[inline]
    #[must_use]
    pub const fn resources(&self) -> Option<&R> {
        match self {
            Self::Ready(r) => Some(r),
            Self::Uninitialized => None,
        }
    }

    /// Moves the resources out, leaving the state uninitialized.
    #[inline]
    pub fn take(&mut self) -> Option<R> {
        match core::mem::take(self) {
            Self::Ready(r) => Some(r),
            Self::Uninitialized => None,
        }
    }
}
