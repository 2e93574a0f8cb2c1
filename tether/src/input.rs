// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touches queued from outside the render thread.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kurbo::Point;

/// Bounded FIFO queue with a `drop_oldest` overflow policy.
///
/// Once full, new pushes remove the oldest item before inserting the newest.
#[derive(Debug, Clone)]
pub(crate) struct BoundedQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
    dropped_count: u64,
}

impl<T> BoundedQueue<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            dropped_count: 0,
        }
    }

    /// Pushes `item`, returning `true` if the oldest item was dropped.
    pub(crate) fn push(&mut self, item: T) -> bool {
        let dropped = self.items.len() == self.capacity;
        if dropped {
            let _ = self.items.pop_front();
            self.dropped_count += 1;
        }
        self.items.push_back(item);
        dropped
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.items.drain(..)
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn dropped_count(&self) -> u64 {
        self.dropped_count
    }
}

/// Queues screen-space touches for the next tick.
///
/// Cloneable and `Send`; obtained from
/// [`FrameOrchestrator::input_handle`](crate::FrameOrchestrator::input_handle).
/// Queued touches are resolved to anchors against the next tick's frame.
/// When more touches arrive between two ticks than the queue holds, the
/// oldest are dropped.
#[derive(Clone)]
pub struct InputHandle {
    queue: Arc<Mutex<BoundedQueue<Point>>>,
}

impl fmt::Debug for InputHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.lock();
        f.debug_struct("InputHandle")
            .field("pending", &queue.len())
            .field("dropped", &queue.dropped_count())
            .finish()
    }
}

impl InputHandle {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: Arc::new(Mutex::new(BoundedQueue::with_capacity(capacity))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoundedQueue<Point>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a touch at `(x, y)` in surface pixels.
    pub fn touch(&self, x: f64, y: f64) {
        if self.lock().push(Point::new(x, y)) {
            log::warn!(target: "tether::input", "touch queue full; dropped the oldest touch");
        }
    }

    /// Touches waiting for the next tick.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Touches dropped on overflow since creation.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.lock().dropped_count()
    }

    /// Takes every queued touch, oldest first.
    pub(crate) fn take_all(&self) -> Vec<Point> {
        self.lock().drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_promoted_to_one() {
        let mut queue = BoundedQueue::with_capacity(0);
        queue.push(10_u32);
        assert!(queue.push(11_u32), "second push overflows");

        assert_eq!(queue.len(), 1, "one slot");
        assert_eq!(queue.drain().collect::<Vec<_>>(), [11], "newest kept");
        assert_eq!(queue.dropped_count(), 1, "one dropped");
    }

    #[test]
    fn push_over_capacity_drops_oldest() {
        let mut queue = BoundedQueue::with_capacity(2);
        queue.push(1_u32);
        queue.push(2_u32);
        queue.push(3_u32);

        assert_eq!(queue.drain().collect::<Vec<_>>(), [2, 3], "oldest dropped");
        assert_eq!(queue.len(), 0, "drained");
        assert_eq!(queue.dropped_count(), 1, "dropped count");
    }

    #[test]
    fn handle_clones_share_the_queue() {
        let input = InputHandle::with_capacity(16);
        let remote = input.clone();
        std::thread::spawn(move || {
            remote.touch(500.0, 800.0);
            remote.touch(10.0, 20.0);
        })
        .join()
        .unwrap();
        assert_eq!(input.pending(), 2, "both queued");
        assert_eq!(
            input.take_all(),
            [Point::new(500.0, 800.0), Point::new(10.0, 20.0)],
            "fifo order"
        );
        assert_eq!(input.pending(), 0, "taken");
    }

    #[test]
    fn overflow_keeps_the_newest_touches() {
        let input = InputHandle::with_capacity(16);
        for i in 0..20 {
            input.touch(f64::from(i), 0.0);
        }
        assert_eq!(input.dropped_count(), 4, "four dropped");
        let touches = input.take_all();
        assert_eq!(touches.len(), 16, "capacity kept");
        assert_eq!(touches[0], Point::new(4.0, 0.0), "oldest survivor");
    }
}
