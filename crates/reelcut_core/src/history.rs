use crate::types::*;
use serde::{Deserialize, Serialize};

/// One immutable point in edit history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditSnapshot {
    pub overlays: Vec<TextOverlay>,
    pub trim: TrimWindow,
}

/// The discrete user intent that produced a snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EditKind {
    Initial,
    Trim,
    AddOverlay,
    SaveOverlay,
    DeleteOverlay,
    MoveOverlay,
}

impl EditKind {
    pub fn description(&self) -> &'static str {
        match self {
            EditKind::Initial => "Open clip",
            EditKind::Trim => "Trim clip",
            EditKind::AddOverlay => "Add text",
            EditKind::SaveOverlay => "Edit text",
            EditKind::DeleteOverlay => "Delete text",
            EditKind::MoveOverlay => "Move text",
        }
    }
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    kind: EditKind,
    snapshot: EditSnapshot,
}

/// Linear undo/redo over snapshots.
///
/// Entries are kept in one `Vec` with a cursor pointing at the current state.
/// Recording after an undo drops every entry past the cursor, so there is only
/// ever one redo branch. Unbounded unless a cap is given. The history is never
/// empty.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    max_size: Option<usize>,
}

impl History {
    pub fn new(initial: EditSnapshot, max_size: Option<usize>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                kind: EditKind::Initial,
                snapshot: initial,
            }],
            cursor: 0,
            max_size: max_size.map(|n| n.max(1)),
        }
    }

    /// Drop everything after the cursor, append, and move the cursor to it.
    pub fn record(&mut self, kind: EditKind, snapshot: EditSnapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry { kind, snapshot });
        if let Some(max) = self.max_size {
            if self.entries.len() > max {
                self.entries.remove(0);
            }
        }
        self.cursor = self.entries.len() - 1;
        tracing::debug!(
            edit = kind.description(),
            depth = self.entries.len(),
            "History entry recorded"
        );
    }

    /// Step back one entry and return the snapshot to restore.
    pub fn undo(&mut self) -> Option<&EditSnapshot> {
        if !self.can_undo() {
            return None;
        }
        tracing::debug!(edit = self.entries[self.cursor].kind.description(), "Undo");
        self.cursor -= 1;
        Some(&self.entries[self.cursor].snapshot)
    }

    /// Step forward one entry and return the snapshot to restore.
    pub fn redo(&mut self) -> Option<&EditSnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        tracing::debug!(edit = self.entries[self.cursor].kind.description(), "Redo");
        Some(&self.entries[self.cursor].snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn current(&self) -> &EditSnapshot {
        &self.entries[self.cursor].snapshot
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn undo_description(&self) -> Option<&'static str> {
        self.can_undo()
            .then(|| self.entries[self.cursor].kind.description())
    }

    pub fn redo_description(&self) -> Option<&'static str> {
        self.can_redo()
            .then(|| self.entries[self.cursor + 1].kind.description())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
