//! Undo/redo timeline of deck snapshots.
//!
//! The history is a flat list of deep copies with a cursor pointing at the
//! state currently shown by the editor. Committing after an undo discards
//! the redo branch.

use crate::deck::Deck;
use serde::{Deserialize, Serialize};

/// A frozen copy of the deck and the slide being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub deck: Deck,
    pub active_slide: usize,
}

impl Snapshot {
    pub fn new(deck: &Deck, active_slide: usize) -> Self {
        Self {
            deck: deck.clone(),
            active_slide,
        }
    }
}

/// Linear undo/redo history.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl History {
    /// Start a history whose first entry is the given state.
    pub fn new(deck: &Deck, active_slide: usize) -> Self {
        Self {
            snapshots: vec![Snapshot::new(deck, active_slide)],
            cursor: 0,
        }
    }

    /// Record a new state, dropping anything after the cursor.
    pub fn commit(&mut self, deck: &Deck, active_slide: usize) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(Snapshot::new(deck, active_slide));
        self.cursor = self.snapshots.len() - 1;
        log::debug!("history commit, {} entries", self.snapshots.len());
    }

    /// Step back one entry. Returns None at the start of the timeline.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        log::debug!("undo to entry {}", self.cursor);
        self.snapshots.get(self.cursor)
    }

    /// Step forward one entry. Returns None at the end of the timeline.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        log::debug!("redo to entry {}", self.cursor);
        self.snapshots.get(self.cursor)
    }

    /// The entry under the cursor.
    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of recorded entries, including the initial one.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; a history starts with one entry.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
