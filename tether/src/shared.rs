// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor storage shared between the render thread and the host.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tether_core::anchor::AnchorStore;

/// A cloneable handle to the orchestrator's [`AnchorStore`].
///
/// The render thread locks the store once per tick (to drain touches, sweep
/// stopped anchors and draw); other threads may lock it in between to
/// inspect or remove anchors. A panic while the lock is held does not make
/// the store unusable: the poison flag is ignored.
pub struct SharedAnchors<A> {
    inner: Arc<Mutex<AnchorStore<A>>>,
}

impl<A> Clone for SharedAnchors<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> Default for SharedAnchors<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for SharedAnchors<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedAnchors").field(&*self.lock()).finish()
    }
}

impl<A> SharedAnchors<A> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(AnchorStore::new())),
        }
    }

    /// Locks the store.
    pub fn lock(&self) -> MutexGuard<'_, AnchorStore<A>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with the store locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut AnchorStore<A>) -> R) -> R {
        f(&mut self.lock())
    }
}
