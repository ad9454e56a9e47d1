//! Snapshot-based undo.

use ct_core::DeviceSeriesMap;

/// Full copy of every cached device series at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySnapshot {
    pub series: DeviceSeriesMap,
}

impl HistorySnapshot {
    pub fn capture(series: &DeviceSeriesMap) -> Self {
        Self {
            series: series.clone(),
        }
    }
}

/// Bounded stack of snapshots with a cursor.
///
/// Snapshots are pushed after an edit settles; the entry under the cursor
/// always mirrors the current state. Undo moves the cursor back and hands
/// the older snapshot to the caller. While that restore is being applied
/// the manager ignores saves, until the host calls
/// [`HistoryManager::finish_restore`].
#[derive(Debug, Clone)]
pub struct HistoryManager {
    snapshots: Vec<HistorySnapshot>,
    index: usize,
    cap: usize,
    restoring: bool,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(10)
    }
}

impl HistoryManager {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            snapshots: Vec::with_capacity(cap),
            index: 0,
            cap,
            restoring: false,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty() && self.index > 0
    }

    pub fn current(&self) -> Option<&HistorySnapshot> {
        self.snapshots.get(self.index)
    }

    /// Record `series` as the newest state. Anything after the cursor is
    /// discarded; the oldest entry is evicted past the cap.
    pub fn save_history(&mut self, series: &DeviceSeriesMap) {
        if self.restoring {
            tracing::debug!("history save skipped during restore");
            return;
        }
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.index + 1);
        }
        self.snapshots.push(HistorySnapshot::capture(series));
        if self.snapshots.len() > self.cap {
            let evicted = self.snapshots.len() - self.cap;
            self.snapshots.drain(..evicted);
            tracing::debug!(evicted, "history cap reached");
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Step back one snapshot and pass it to `restore`.
    ///
    /// Returns `false` without calling `restore` when there is nothing older.
    /// Recording stays off until [`finish_restore`](Self::finish_restore).
    pub fn undo(&mut self, restore: impl FnOnce(&HistorySnapshot)) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.index -= 1;
        self.restoring = true;
        restore(&self.snapshots[self.index]);
        tracing::debug!(index = self.index, "undo");
        true
    }

    /// The restored state has been applied; saves are recorded again.
    pub fn finish_restore(&mut self) {
        self.restoring = false;
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.index = 0;
        self.restoring = false;
    }
}
