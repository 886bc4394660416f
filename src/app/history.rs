use std::collections::VecDeque;

use crate::snapshot::Snapshot;

/// The most recent snapshots of a run, oldest dropped first once full.
pub struct SnapshotHistory {
    /// Oldest at the front
    snapshots: VecDeque<Snapshot>,
    /// 0 keeps nothing
    capacity: usize,
}

impl SnapshotHistory {
    pub fn new(capacity: usize) -> Self {
        SnapshotHistory {
            snapshots: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn add(&mut self, snapshot: Snapshot) {
        if self.capacity == 0 {
            return;
        }
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }

    /// Kept snapshots in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
