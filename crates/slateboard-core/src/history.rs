//! Linear undo/redo history over whole-board snapshots.

use crate::board::BoardSnapshot;
use log::debug;

/// Snapshot history with a cursor.
///
/// Invariants: slot 0 is always the empty board; `cursor` stays within
/// `[0, len-1]`. Committing while the cursor sits before the end discards
/// the redo branch. No operation panics; out-of-range undo/redo requests
/// are absorbed as no-ops.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<BoardSnapshot>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self {
            snapshots: vec![BoardSnapshot::new()],
            cursor: 0,
        }
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &BoardSnapshot {
        &self.snapshots[self.cursor]
    }

    /// Append `snapshot` as the new head, discarding any redo branch.
    /// The only way new undo points are created.
    pub fn commit(&mut self, snapshot: BoardSnapshot) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
        debug!(
            "history: committed snapshot #{} ({} actions)",
            self.cursor,
            self.current().len()
        );
    }

    /// Overwrite the snapshot at the cursor in place.
    ///
    /// The sole exception to snapshot immutability, used so live-drag frames
    /// update the board without growing the history.
    pub fn replace_top(&mut self, snapshot: BoardSnapshot) {
        self.snapshots[self.cursor] = snapshot;
    }

    /// Step the cursor back one snapshot. Returns whether it moved.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        debug!("history: undo to snapshot #{}", self.cursor);
        true
    }

    /// Step the cursor forward one snapshot. Returns whether it moved.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 >= self.snapshots.len() {
            return false;
        }
        self.cursor += 1;
        debug!("history: redo to snapshot #{}", self.cursor);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of stored snapshots (always at least one).
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
