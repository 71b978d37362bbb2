//! Storage abstraction for locally cached decks.

mod autosave;
mod file;
mod memory;
mod store;

pub use autosave::{AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL_SECS};
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use store::{DeckStore, LAST_DECK_KEY, SubscriptionId, create_default_store};

use crate::deck::Deck;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Deck not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for deck storage backends.
///
/// Keys are opaque strings; `LAST_DECK_KEY` holds the deck shared between
/// the editor and the display.
pub trait Storage: Send + Sync {
    /// Save a deck.
    fn save(&self, id: &str, deck: &Deck) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a deck.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Deck>>;

    /// Delete a deck.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored keys.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a deck exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Minimal executor for driving storage futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
