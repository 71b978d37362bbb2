//! In-process show service for tests and offline editing.

use super::{
    RemoteError, RemoteResult, STOCK_RESULTS_PER_PAGE, SaveShowRequest, ScheduleWindow, ShowRecord, ShowReference,
    ShowService, ShowSummary, StockImage, UploadedMedia, sort_by_schedule, unix_millis,
};
use crate::deck::Deck;
use crate::elements::new_id;
use std::collections::HashMap;
use std::sync::RwLock;

/// Media kept by `MemoryShowService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Keeps shows and uploads in memory.
#[derive(Default)]
pub struct MemoryShowService {
    shows: RwLock<HashMap<String, ShowRecord>>,
    media: RwLock<HashMap<String, StoredMedia>>,
    stock: Vec<StockImage>,
}

fn lock_error(e: impl std::fmt::Display) -> RemoteError {
    RemoteError::Http(format!("Lock error: {}", e))
}

impl MemoryShowService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these images from `search_stock_images`.
    pub fn with_stock_images(mut self, images: Vec<StockImage>) -> Self {
        self.stock = images;
        self
    }

    /// Look up an uploaded file by the URL `upload_media` returned.
    pub fn media(&self, url: &str) -> Option<StoredMedia> {
        self.media.read().ok()?.get(url).cloned()
    }

    pub fn show_count(&self) -> usize {
        self.shows.read().map(|shows| shows.len()).unwrap_or_default()
    }
}

impl ShowService for MemoryShowService {
    fn load_deck(&self, reference: &ShowReference) -> RemoteResult<Option<ShowRecord>> {
        let shows = self.shows.read().map_err(lock_error)?;
        Ok(match reference {
            ShowReference::Id(id) => shows.get(id).cloned(),
            ShowReference::Content(content) => shows
                .values()
                .filter(|show| show.content_id.as_deref() == Some(content.as_str()))
                .max_by_key(|show| show.updated_at)
                .cloned(),
        })
    }

    fn save_deck(
        &self,
        reference: Option<&ShowReference>,
        deck: &Deck,
        name: &str,
        window: Option<&ScheduleWindow>,
    ) -> RemoteResult<ShowRecord> {
        let request = SaveShowRequest::new(reference, deck, name, window);
        let mut shows = self.shows.write().map_err(lock_error)?;
        let now = unix_millis();

        if let Some(id) = request.id.clone() {
            let record = shows.get_mut(&id).ok_or_else(|| RemoteError::Status {
                status: 404,
                message: format!("show {} not found", id),
            })?;
            request.apply_to(record, now)?;
            return Ok(record.clone());
        }

        let record = request.into_record(new_id(), now)?;
        shows.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn list_saved_decks(&self, scheduled_only: bool) -> RemoteResult<Vec<ShowSummary>> {
        let shows = self.shows.read().map_err(lock_error)?;
        let mut records: Vec<ShowRecord> = shows
            .values()
            .filter(|show| !scheduled_only || show.is_scheduled())
            .cloned()
            .collect();
        sort_by_schedule(&mut records);
        Ok(records.iter().map(ShowSummary::from).collect())
    }

    fn delete_deck(&self, id: &str) -> RemoteResult<()> {
        self.shows.write().map_err(lock_error)?.remove(id);
        Ok(())
    }

    fn upload_media(&self, bytes: &[u8], mime: &str) -> RemoteResult<UploadedMedia> {
        let url = format!("memory://media/{}", new_id());
        self.media.write().map_err(lock_error)?.insert(
            url.clone(),
            StoredMedia {
                mime: mime.to_string(),
                bytes: bytes.to_vec(),
            },
        );
        Ok(UploadedMedia {
            public_url: url,
            size_bytes: bytes.len() as u64,
        })
    }

    fn search_stock_images(&self, _query: &str) -> RemoteResult<Vec<StockImage>> {
        Ok(self.stock.iter().take(STOCK_RESULTS_PER_PAGE).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_show_is_none() {
        let service = MemoryShowService::new();
        assert!(service.load_deck(&ShowReference::Id("nope".to_string())).unwrap().is_none());
    }

    #[test]
    fn test_create_then_update() {
        let service = MemoryShowService::new();
        let deck = Deck::new();
        let created = service
            .save_deck(Some(&ShowReference::Content("9".to_string())), &deck, "Lobby", None)
            .unwrap();
        assert_eq!(created.content_id.as_deref(), Some("9"));

        let window = ScheduleWindow::new("2026-05-01T08:00", "2026-05-01T18:00").unwrap();
        let updated = service
            .save_deck(Some(&ShowReference::Id(created.id.clone())), &deck, "Lobby v2", Some(&window))
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Lobby v2");
        assert_eq!(service.show_count(), 1);

        let by_content = service.load_deck(&ShowReference::Content("9".to_string())).unwrap().unwrap();
        assert_eq!(by_content.window(), Some(window));
    }

    #[test]
    fn test_scheduled_listing() {
        let service = MemoryShowService::new();
        let deck = Deck::new();
        let window = ScheduleWindow::new("2026-05-01T08:00", "2026-05-01T18:00").unwrap();
        service.save_deck(None, &deck, "Always", None).unwrap();
        service.save_deck(None, &deck, "Morning", Some(&window)).unwrap();

        let all = service.list_saved_decks(false).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Morning");

        let scheduled = service.list_saved_decks(true).unwrap();
        assert_eq!(scheduled.len(), 1);
    }

    #[test]
    fn test_upload_keeps_bytes() {
        let service = MemoryShowService::new();
        let uploaded = service.upload_media(b"\x89PNG", "image/png").unwrap();
        assert_eq!(uploaded.size_bytes, 4);
        assert_eq!(service.media(&uploaded.public_url).unwrap().mime, "image/png");
    }

    #[test]
    fn test_stock_results_capped() {
        let images = (0..30)
            .map(|i| StockImage {
                preview_url: format!("s{i}"),
                full_url: format!("m{i}"),
            })
            .collect();
        let service = MemoryShowService::new().with_stock_images(images);
        assert_eq!(service.search_stock_images("").unwrap().len(), STOCK_RESULTS_PER_PAGE);
    }
}
