//! Client side of the show and media service.
//!
//! Shows are server-side records that carry a deck plus an optional
//! schedule window. Records come back from the server with snake_case
//! column names; save requests are sent camelCase.

mod http;
mod memory;

pub use http::HttpShowService;
pub use memory::MemoryShowService;

use crate::deck::Deck;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query used when a stock image search is blank.
pub const DEFAULT_STOCK_QUERY: &str = "nature";
/// Upper bound on stock image results.
pub const STOCK_RESULTS_PER_PAGE: usize = 20;

/// Invalid input rejected before it reaches the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Schedule needs both a start and a finish time")]
    IncompleteWindow,
    #[error("Schedule finishes ({finish}) before it starts ({start})")]
    InvertedWindow { start: String, finish: String },
}

/// Errors talking to the show service.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Http(String),
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// How a show is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowReference {
    /// The show's own id.
    Id(String),
    /// The content item the show was created from; resolves to the most
    /// recently updated show for it.
    Content(String),
}

/// When a show is allowed to play.
///
/// Times are ISO-8601 strings in one consistent format (as produced by the
/// schedule form), so ordering them as strings orders them in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    start: String,
    finish: String,
}

impl ScheduleWindow {
    /// Build a window, rejecting finish times before the start.
    pub fn new(start: impl Into<String>, finish: impl Into<String>) -> Result<Self, ValidationError> {
        let start = start.into();
        let finish = finish.into();
        if start.trim().is_empty() || finish.trim().is_empty() {
            return Err(ValidationError::IncompleteWindow);
        }
        if finish < start {
            return Err(ValidationError::InvertedWindow { start, finish });
        }
        Ok(Self { start, finish })
    }

    /// Build a window from optional form fields: both empty is no window,
    /// exactly one present is an error.
    pub fn from_parts(start: Option<&str>, finish: Option<&str>) -> Result<Option<Self>, ValidationError> {
        let start = start.filter(|s| !s.trim().is_empty());
        let finish = finish.filter(|s| !s.trim().is_empty());
        match (start, finish) {
            (None, None) => Ok(None),
            (Some(start), Some(finish)) => Self::new(start, finish).map(Some),
            _ => Err(ValidationError::IncompleteWindow),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn finish(&self) -> &str {
        &self.finish
    }

    /// Check whether a timestamp in the same format falls inside the window.
    pub fn contains(&self, at: &str) -> bool {
        self.start.as_str() <= at && at <= self.finish.as_str()
    }
}

/// A stored show as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content_id: Option<String>,
    #[serde(default)]
    pub slides_data: Deck,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub finish_time: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub updated_at: u64,
}

impl ShowRecord {
    /// The schedule window, if both ends are set.
    pub fn window(&self) -> Option<ScheduleWindow> {
        match (&self.start_time, &self.finish_time) {
            (Some(start), Some(finish)) => ScheduleWindow::new(start.clone(), finish.clone()).ok(),
            _ => None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.start_time.is_some()
    }
}

/// Listing entry for saved shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowSummary {
    pub id: String,
    pub name: String,
    pub window: Option<ScheduleWindow>,
    pub slide_count: usize,
}

impl From<&ShowRecord> for ShowSummary {
    fn from(record: &ShowRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            window: record.window(),
            slide_count: record.slides_data.len(),
        }
    }
}

/// Body of a create-or-update request. Updates when `id` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveShowRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slides_data: Option<Deck>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub finish_time: Option<String>,
}

impl SaveShowRequest {
    pub fn new(reference: Option<&ShowReference>, deck: &Deck, name: &str, window: Option<&ScheduleWindow>) -> Self {
        let (id, content_id) = match reference {
            Some(ShowReference::Id(id)) => (Some(id.clone()), None),
            Some(ShowReference::Content(content)) => (None, Some(content.clone())),
            None => (None, None),
        };
        Self {
            id,
            content_id,
            name: Some(name.to_string()),
            slides_data: Some(deck.clone()),
            start_time: window.map(|w| w.start.clone()),
            finish_time: window.map(|w| w.finish.clone()),
        }
    }

    /// Check the schedule fields: both or neither, finish not before start.
    pub fn window(&self) -> Result<Option<ScheduleWindow>, ValidationError> {
        ScheduleWindow::from_parts(self.start_time.as_deref(), self.finish_time.as_deref())
    }

    /// Build a new record from a create request.
    pub fn into_record(self, id: String, now: u64) -> Result<ShowRecord, ValidationError> {
        let window = self.window()?;
        Ok(ShowRecord {
            id,
            name: self.name.filter(|n| !n.is_empty()).unwrap_or_else(|| "Untitled".to_string()),
            content_id: self.content_id,
            slides_data: self.slides_data.unwrap_or_default(),
            start_time: window.as_ref().map(|w| w.start.clone()),
            finish_time: window.map(|w| w.finish),
            updated_at: now,
        })
    }

    /// Apply an update request to an existing record.
    ///
    /// Name and deck are kept when absent; the schedule window is always
    /// replaced, so an update without times clears it.
    pub fn apply_to(self, record: &mut ShowRecord, now: u64) -> Result<(), ValidationError> {
        let window = self.window()?;
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(deck) = self.slides_data {
            record.slides_data = deck;
        }
        record.start_time = window.as_ref().map(|w| w.start.clone());
        record.finish_time = window.map(|w| w.finish);
        record.updated_at = now;
        Ok(())
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Result of a media upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedMedia {
    #[serde(rename = "url")]
    pub public_url: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
}

/// A stock photo search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockImage {
    /// Small rendition for the picker grid.
    pub preview_url: String,
    /// Rendition inserted into the slide.
    pub full_url: String,
}

/// Normalize a stock search query.
pub fn stock_query(query: &str) -> &str {
    let trimmed = query.trim();
    if trimmed.is_empty() { DEFAULT_STOCK_QUERY } else { trimmed }
}

/// Remote persistence and media for shows.
pub trait ShowService {
    /// Fetch a show. Unknown references yield `Ok(None)`.
    fn load_deck(&self, reference: &ShowReference) -> RemoteResult<Option<ShowRecord>>;

    /// Create or update a show and return the stored record.
    fn save_deck(
        &self,
        reference: Option<&ShowReference>,
        deck: &Deck,
        name: &str,
        window: Option<&ScheduleWindow>,
    ) -> RemoteResult<ShowRecord>;

    /// Saved shows ordered by start time, unscheduled last.
    fn list_saved_decks(&self, scheduled_only: bool) -> RemoteResult<Vec<ShowSummary>>;

    fn delete_deck(&self, id: &str) -> RemoteResult<()>;

    /// Store a media file and return where it is served from.
    fn upload_media(&self, bytes: &[u8], mime: &str) -> RemoteResult<UploadedMedia>;

    /// Look up stock photos; blank queries search for `DEFAULT_STOCK_QUERY`.
    fn search_stock_images(&self, query: &str) -> RemoteResult<Vec<StockImage>>;
}

/// Sort records by start time with unscheduled records last.
pub fn sort_by_schedule(records: &mut [ShowRecord]) {
    records.sort_by(|a, b| match (&a.start_time, &b.start_time) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
