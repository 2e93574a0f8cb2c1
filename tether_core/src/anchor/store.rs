// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-category anchor storage with slot reuse and stale-handle detection.

use alloc::vec::Vec;
use core::fmt;

use crate::tracking::{TrackedAnchor, TrackingState};
use crate::transform::Mat4;

use super::id::{AnchorId, AnchorKey};
use super::{AnchorCategory, ColoredAnchor, Rgba};

/// Slot storage for one category.
struct Partition<A> {
    slots: Vec<Option<ColoredAnchor<A>>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    /// Live slot indices in insertion order.
    order: Vec<u32>,
}

impl<A> Partition<A> {
    const fn new() -> Self {
        Self {
            slots: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            order: Vec::new(),
        }
    }

    fn insert(&mut self, entry: ColoredAnchor<A>) -> AnchorId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; its generation was bumped on removal.
            self.slots[idx as usize] = Some(entry);
            idx
        } else {
            let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Some(entry));
            self.generation.push(0);
            idx
        };
        self.order.push(idx);
        AnchorId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    fn is_alive(&self, id: AnchorId) -> bool {
        let i = id.idx as usize;
        i < self.slots.len() && self.generation[i] == id.generation && self.slots[i].is_some()
    }

    fn get(&self, id: AnchorId) -> Option<&ColoredAnchor<A>> {
        if !self.is_alive(id) {
            return None;
        }
        self.slots[id.idx as usize].as_ref()
    }

    fn remove(&mut self, id: AnchorId) -> Option<ColoredAnchor<A>> {
        if !self.is_alive(id) {
            return None;
        }
        let i = id.idx as usize;
        let entry = self.slots[i].take();
        // Bump generation so old handles immediately fail validation.
        self.generation[i] = self.generation[i].wrapping_add(1);
        self.free_list.push(id.idx);
        self.order.retain(|&idx| idx != id.idx);
        entry
    }

    fn id_at(&self, idx: u32) -> AnchorId {
        AnchorId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    fn iter(&self) -> impl Iterator<Item = (AnchorId, &ColoredAnchor<A>)> {
        self.order.iter().filter_map(move |&idx| {
            self.slots[idx as usize]
                .as_ref()
                .map(|entry| (self.id_at(idx), entry))
        })
    }

    fn clear(&mut self) -> usize {
        let n = self.order.len();
        for idx in core::mem::take(&mut self.order) {
            let i = idx as usize;
            self.slots[i] = None;
            self.generation[i] = self.generation[i].wrapping_add(1);
            self.free_list.push(idx);
        }
        n
    }
}

/// Anchors partitioned by [`AnchorCategory`].
///
/// Identifiers are generational slot handles: removing an anchor frees its
/// slot for reuse, and the bumped generation guarantees a new anchor in that
/// slot gets a key distinct from every key previously returned for the
/// category. Iteration within a category follows insertion order.
///
/// Dropping an entry (via [`remove`](Self::remove),
/// [`sweep_stopped`](Self::sweep_stopped) or [`clear`](Self::clear))
/// releases the runtime anchor it owns.
pub struct AnchorStore<A> {
    partitions: [Partition<A>; AnchorCategory::COUNT],
}

impl<A> fmt::Debug for AnchorStore<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("AnchorStore");
        for category in AnchorCategory::ALL {
            s.field(category.name(), &self.len(category));
        }
        s.finish()
    }
}

impl<A> Default for AnchorStore<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> AnchorStore<A> {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            partitions: [
                Partition::new(),
                Partition::new(),
                Partition::new(),
                Partition::new(),
            ],
        }
    }

    fn partition(&self, category: AnchorCategory) -> &Partition<A> {
        &self.partitions[category.index()]
    }

    fn partition_mut(&mut self, category: AnchorCategory) -> &mut Partition<A> {
        &mut self.partitions[category.index()]
    }

    /// Inserts an anchor and returns its key.
    pub fn insert(&mut self, category: AnchorCategory, anchor: A, color: Rgba) -> AnchorKey {
        let id = self
            .partition_mut(category)
            .insert(ColoredAnchor::new(anchor, color));
        let key = AnchorKey::new(category, id);
        log::debug!(target: "tether::anchor", "inserted {key:?}");
        key
    }

    /// Removes an anchor, handing it back to the caller.
    ///
    /// Removing an unknown or already removed key is a no-op that logs a
    /// warning and returns `None`.
    pub fn remove(&mut self, key: AnchorKey) -> Option<ColoredAnchor<A>> {
        let removed = self.partition_mut(key.category()).remove(key.id());
        if removed.is_none() {
            log::warn!(target: "tether::anchor", "remove of unknown anchor {key:?} ignored");
        }
        removed
    }

    /// Returns whether the key refers to a live anchor.
    #[must_use]
    pub fn contains(&self, key: AnchorKey) -> bool {
        self.partition(key.category()).is_alive(key.id())
    }

    /// Looks up a live anchor.
    #[must_use]
    pub fn get(&self, key: AnchorKey) -> Option<&ColoredAnchor<A>> {
        self.partition(key.category()).get(key.id())
    }

    /// Number of anchors in a category.
    #[must_use]
    pub fn len(&self, category: AnchorCategory) -> usize {
        self.partition(category).order.len()
    }

    /// Number of anchors across all categories.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.partitions.iter().map(|p| p.order.len()).sum()
    }

    /// Returns `true` if no category holds an anchor.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Iterates a category in insertion order.
    pub fn iter(
        &self,
        category: AnchorCategory,
    ) -> impl Iterator<Item = (AnchorKey, &ColoredAnchor<A>)> {
        self.partition(category)
            .iter()
            .map(move |(id, entry)| (AnchorKey::new(category, id), entry))
    }

    /// Calls `f` for every anchor in a category, in insertion order.
    pub fn for_each(
        &self,
        category: AnchorCategory,
        mut f: impl FnMut(AnchorKey, &ColoredAnchor<A>),
    ) {
        for (key, entry) in self.iter(category) {
            f(key, entry);
        }
    }

    /// Keys of every anchor in a category, in insertion order.
    #[must_use]
    pub fn keys(&self, category: AnchorCategory) -> Vec<AnchorKey> {
        self.iter(category).map(|(key, _)| key).collect()
    }

    /// Removes (and releases) every anchor. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        self.partitions.iter_mut().map(Partition::clear).sum()
    }
}

impl<A: TrackedAnchor> AnchorStore<A> {
    /// Removes every anchor whose tracking state is
    /// [`Stopped`](TrackingState::Stopped), across all categories.
    ///
    /// Returns the keys that were removed.
    pub fn sweep_stopped(&mut self) -> Vec<AnchorKey> {
        let mut swept = Vec::new();
        for category in AnchorCategory::ALL {
            let partition = self.partition_mut(category);
            let stopped: Vec<AnchorId> = partition
                .iter()
                .filter(|(_, entry)| entry.anchor().tracking_state() == TrackingState::Stopped)
                .map(|(id, _)| id)
                .collect();
            for id in stopped {
                drop(partition.remove(id));
                swept.push(AnchorKey::new(category, id));
            }
        }
        if !swept.is_empty() {
            log::debug!(target: "tether::anchor", "swept {} stopped anchor(s)", swept.len());
        }
        swept
    }

    /// Pose of a live, tracking anchor.
    ///
    /// Returns `None` for unknown keys and for anchors that are not
    /// currently tracking.
    #[must_use]
    pub fn model_matrix(&self, key: AnchorKey) -> Option<Mat4> {
        let entry = self.get(key)?;
        (entry.anchor().tracking_state() == TrackingState::Tracking)
            .then(|| entry.anchor().pose())
    }
}
