//! Pulls a show from the show service into the local deck store.

use crate::PlayerError;
use slideflow_core::remote::{ShowReference, ShowService};
use slideflow_core::storage::{DeckStore, Storage};

/// Keeps the local deck in step with one remote show.
pub struct ShowSync<T: ShowService> {
    service: T,
    reference: ShowReference,
}

impl<T: ShowService> ShowSync<T> {
    pub fn new(service: T, reference: ShowReference) -> Self {
        Self { service, reference }
    }

    pub fn reference(&self) -> &ShowReference {
        &self.reference
    }

    /// Fetch the show and save its deck as the shared deck, which notifies
    /// store subscribers. Returns false when the show does not exist.
    pub fn pull<S: Storage>(&self, store: &DeckStore<S>) -> Result<bool, PlayerError> {
        match self.service.load_deck(&self.reference)? {
            Some(record) => {
                log::info!("Pulled show {} ({} slides)", record.id, record.slides_data.len());
                pollster::block_on(store.save(&record.slides_data))?;
                Ok(true)
            }
            None => {
                log::warn!("Show {:?} not found on server", self.reference);
                Ok(false)
            }
        }
    }
}
