//! Periodic saving of the deck being edited.

use super::{DeckStore, Storage, StorageResult};
use crate::deck::Deck;
use std::time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Saves the deck to a store when it is dirty and the interval has passed.
pub struct AutoSaveManager {
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
}

impl Default for AutoSaveManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS))
    }
}

impl AutoSaveManager {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_save: None,
            dirty: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mark the deck as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check if the deck is dirty and the interval has passed since the last save.
    pub fn should_save(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_save {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Save if needed. Returns true if a save was performed.
    pub async fn maybe_save<S: Storage>(&mut self, store: &DeckStore<S>, deck: &Deck, now: Instant) -> StorageResult<bool> {
        if !self.should_save(now) {
            return Ok(false);
        }
        self.save(store, deck, now).await?;
        Ok(true)
    }

    /// Save immediately. The dirty flag stays set if the save fails.
    pub async fn save<S: Storage>(&mut self, store: &DeckStore<S>, deck: &Deck, now: Instant) -> StorageResult<()> {
        store.save(deck).await?;
        self.last_save = Some(now);
        self.dirty = false;
        log::debug!("Auto-saved deck ({} slides)", deck.len());
        Ok(())
    }
}
