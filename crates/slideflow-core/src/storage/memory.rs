//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::deck::Deck;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    decks: RwLock<HashMap<String, Deck>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, deck: &Deck) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let deck = deck.clone();
        Box::pin(async move {
            let mut decks = self.decks.write().map_err(lock_error)?;
            decks.insert(id, deck);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Deck>> {
        let id = id.to_string();
        Box::pin(async move {
            let decks = self.decks.read().map_err(lock_error)?;
            decks.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut decks = self.decks.write().map_err(lock_error)?;
            decks.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let decks = self.decks.read().map_err(lock_error)?;
            Ok(decks.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let decks = self.decks.read().map_err(lock_error)?;
            Ok(decks.contains_key(&id))
        })
    }
}
