use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Result, WindowError};
use crate::metric::Metric;

/// Capacity used whenever a window is asked for zero slots.
pub const DEFAULT_WINDOW_CAP: usize = 25;

/// Fixed-capacity ring of the most recent metrics for one peer/metric pair.
///
/// One writer and any number of readers may share a window behind an `Arc`.
/// `add` takes the write lock, `latest` and `all` take the read lock, so a
/// reader never sees a slot mid-update.
pub struct Window {
    ring: RwLock<Ring>,
}

struct Ring {
    slots: Box<[Option<Arc<Metric>>]>,
    /// Next slot to write.
    cursor: usize,
}

impl Window {
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_WINDOW_CAP
        } else {
            capacity
        };

        Self {
            ring: RwLock::new(Ring {
                slots: vec![None; capacity].into_boxed_slice(),
                cursor: 0,
            }),
        }
    }

    /// Store `metric` at the cursor, evicting the oldest entry once the
    /// ring has wrapped.
    pub fn add(&self, metric: Arc<Metric>) {
        let mut ring = self.ring.write();
        let cap = ring.slots.len();
        let cursor = ring.cursor;

        if let Some(old) = ring.slots[cursor].replace(metric) {
            tracing::trace!(metric = %old.name, peer = %old.peer, slot = cursor, "evicted oldest metric");
        }
        ring.cursor = (cursor + 1) % cap;
    }

    /// The metric passed to the most recent `add`.
    pub fn latest(&self) -> Result<Arc<Metric>> {
        let ring = self.ring.read();
        let prev = ring.prev(ring.cursor);
        ring.slots[prev].clone().ok_or(WindowError::NoMetrics)
    }

    /// Every retained metric, newest first. The returned `Vec` is a copy;
    /// later `add` calls do not change it.
    pub fn all(&self) -> Vec<Arc<Metric>> {
        let ring = self.ring.read();
        let cap = ring.slots.len();

        let mut out = Vec::with_capacity(cap);
        let mut idx = ring.cursor;
        for _ in 0..cap {
            idx = ring.prev(idx);
            match &ring.slots[idx] {
                Some(m) => out.push(Arc::clone(m)),
                // Only reachable before the ring first fills
                None => break,
            }
        }
        out
    }

    pub fn capacity(&self) -> usize {
        self.ring.read().slots.len()
    }

    /// Number of retained metrics: `min(insertions, capacity)`.
    pub fn len(&self) -> usize {
        let ring = self.ring.read();
        // Slots fill in order, so once the cursor's slot is taken the ring is full.
        if ring.slots[ring.cursor].is_some() {
            ring.slots.len()
        } else {
            ring.cursor
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAP)
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ring = self.ring.read();
        f.debug_struct("Window")
            .field("capacity", &ring.slots.len())
            .field("cursor", &ring.cursor)
            .finish_non_exhaustive()
    }
}

impl Ring {
    fn prev(&self, idx: usize) -> usize {
        let cap = self.slots.len();
        (idx + cap - 1) % cap
    }
}
