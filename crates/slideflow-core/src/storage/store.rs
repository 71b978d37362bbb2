//! Shared deck store used by both the editor and the display.
//!
//! The editor saves under `LAST_DECK_KEY`; displays load from it and are
//! told about every save through subscriptions, so a screen picks up edits
//! without waiting for its next poll.

use super::{FileStorage, Storage, StorageError, StorageResult};
use crate::deck::Deck;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Key for the deck shared between editor and display.
pub const LAST_DECK_KEY: &str = "slideflow_slides";

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&Deck) + Send + Sync>;

/// Load/save/subscribe facade over a storage backend.
pub struct DeckStore<S: Storage> {
    storage: Arc<S>,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl<S: Storage> DeckStore<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            listeners: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Load the shared deck. Returns None if nothing has been saved yet.
    pub async fn load(&self) -> StorageResult<Option<Deck>> {
        self.load_key(LAST_DECK_KEY).await
    }

    /// Load the shared deck, falling back to the default deck when it is
    /// missing or unreadable.
    pub async fn load_or_default(&self) -> Deck {
        match self.load().await {
            Ok(Some(deck)) => deck,
            Ok(None) => Deck::new(),
            Err(e) => {
                log::warn!("Failed to load deck, using default: {}", e);
                Deck::new()
            }
        }
    }

    /// Load a deck saved under its own key.
    pub async fn load_key(&self, id: &str) -> StorageResult<Option<Deck>> {
        match self.storage.load(id).await {
            Ok(deck) => Ok(Some(deck)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Replace the shared deck and notify subscribers. Last writer wins.
    pub async fn save(&self, deck: &Deck) -> StorageResult<()> {
        self.storage.save(LAST_DECK_KEY, deck).await?;
        self.notify(deck);
        Ok(())
    }

    /// Save a deck under its own key as well as the shared key.
    pub async fn save_as(&self, id: &str, deck: &Deck) -> StorageResult<()> {
        self.storage.save(id, deck).await?;
        self.save(deck).await
    }

    /// Keys of decks saved with `save_as`.
    pub async fn list(&self) -> StorageResult<Vec<String>> {
        let mut ids = self.storage.list().await?;
        ids.retain(|id| id != LAST_DECK_KEY);
        ids.sort();
        Ok(ids)
    }

    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.storage.delete(id).await
    }

    /// Call `listener` with the new deck after every successful save.
    pub fn subscribe(&self, listener: impl Fn(&Deck) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        match self.listeners.write() {
            Ok(mut listeners) => listeners.push((id, Box::new(listener))),
            Err(e) => log::warn!("Deck store listeners poisoned: {}", e),
        }
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut listeners) = self.listeners.write() else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        listeners.len() != before
    }

    fn notify(&self, deck: &Deck) {
        if let Ok(listeners) = self.listeners.read() {
            for (_, listener) in listeners.iter() {
                listener(deck);
            }
        }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Create a deck store backed by files in the default location.
pub fn create_default_store() -> StorageResult<DeckStore<FileStorage>> {
    Ok(DeckStore::new(Arc::new(FileStorage::default_location()?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Slide;
    use crate::storage::{MemoryStorage, block_on};
    use std::sync::Mutex;

    fn store() -> DeckStore<MemoryStorage> {
        DeckStore::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_load_before_save_is_none() {
        let store = store();
        assert!(block_on(store.load()).unwrap().is_none());
        assert_eq!(block_on(store.load_or_default()).len(), 1);
    }

    #[test]
    fn test_save_then_load() {
        let store = store();
        let mut deck = Deck::new();
        deck.push(Slide::new("Specials"));

        block_on(store.save(&deck)).unwrap();
        assert_eq!(block_on(store.load()).unwrap(), Some(deck));
    }

    #[test]
    fn test_subscribers_see_saves() {
        let store = store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = store.subscribe(move |deck| sink.lock().unwrap().push(deck.len()));

        let mut deck = Deck::new();
        block_on(store.save(&deck)).unwrap();
        deck.push(Slide::new("Slide 2"));
        block_on(store.save(&deck)).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        block_on(store.save(&deck)).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_list_excludes_shared_key() {
        let store = store();
        let deck = Deck::new();
        block_on(store.save_as("lobby", &deck)).unwrap();

        assert_eq!(block_on(store.list()).unwrap(), vec!["lobby".to_string()]);
        assert!(block_on(store.load_key("lobby")).unwrap().is_some());
        assert!(block_on(store.load()).unwrap().is_some());
    }
}
