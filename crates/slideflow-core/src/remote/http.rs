//! Blocking HTTP client for the show server and the Pexels stock photo API.

use super::{
    RemoteError, RemoteResult, STOCK_RESULTS_PER_PAGE, SaveShowRequest, ScheduleWindow, ShowRecord, ShowReference,
    ShowService, ShowSummary, StockImage, UploadedMedia, stock_query,
};
use crate::deck::Deck;
use serde::Deserialize;

const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";

/// Environment variable holding the Pexels API key.
pub const PEXELS_KEY_VAR: &str = "PEXELS_API_KEY";

#[derive(Deserialize)]
struct ShowResponse {
    show: Option<ShowRecord>,
}

#[derive(Deserialize)]
struct ShowListResponse {
    shows: Vec<ShowRecord>,
}

#[derive(Deserialize)]
struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Deserialize)]
struct PexelsPhoto {
    src: PexelsSources,
}

#[derive(Deserialize)]
struct PexelsSources {
    small: String,
    medium: String,
}

fn request_error(e: ureq::Error) -> RemoteError {
    match e {
        ureq::Error::StatusCode(status) => RemoteError::Status {
            status,
            message: "request rejected".to_string(),
        },
        other => RemoteError::Http(other.to_string()),
    }
}

fn decode_error(e: ureq::Error) -> RemoteError {
    RemoteError::Decode(e.to_string())
}

/// Talks to a slideflow server over HTTP.
pub struct HttpShowService {
    base_url: String,
    pexels_key: Option<String>,
}

impl HttpShowService {
    /// Create a client for a server base URL such as `http://localhost:3030`.
    ///
    /// The Pexels key is read from `PEXELS_API_KEY`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            pexels_key: std::env::var(PEXELS_KEY_VAR).ok().filter(|k| !k.is_empty()),
        }
    }

    pub fn with_pexels_key(mut self, key: impl Into<String>) -> Self {
        self.pexels_key = Some(key.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl ShowService for HttpShowService {
    fn load_deck(&self, reference: &ShowReference) -> RemoteResult<Option<ShowRecord>> {
        let (key, value) = match reference {
            ShowReference::Id(id) => ("id", id.as_str()),
            ShowReference::Content(content) => ("contentId", content.as_str()),
        };
        let response: ShowResponse = ureq::get(&self.url("/api/shows"))
            .query(key, value)
            .call()
            .map_err(request_error)?
            .body_mut()
            .read_json()
            .map_err(decode_error)?;
        Ok(response.show)
    }

    fn save_deck(
        &self,
        reference: Option<&ShowReference>,
        deck: &Deck,
        name: &str,
        window: Option<&ScheduleWindow>,
    ) -> RemoteResult<ShowRecord> {
        let request = SaveShowRequest::new(reference, deck, name, window);
        let response: ShowResponse = ureq::post(&self.url("/api/shows"))
            .header("Content-Type", "application/json")
            .send_json(&request)
            .map_err(request_error)?
            .body_mut()
            .read_json()
            .map_err(decode_error)?;
        response
            .show
            .ok_or_else(|| RemoteError::Decode("save response carried no show".to_string()))
    }

    fn list_saved_decks(&self, scheduled_only: bool) -> RemoteResult<Vec<ShowSummary>> {
        let mut request = ureq::get(&self.url("/api/shows"));
        if scheduled_only {
            request = request.query("scheduled", "true");
        }
        let response: ShowListResponse = request
            .call()
            .map_err(request_error)?
            .body_mut()
            .read_json()
            .map_err(decode_error)?;
        Ok(response.shows.iter().map(ShowSummary::from).collect())
    }

    fn delete_deck(&self, id: &str) -> RemoteResult<()> {
        ureq::delete(&self.url("/api/shows"))
            .query("id", id)
            .call()
            .map_err(request_error)?;
        Ok(())
    }

    fn upload_media(&self, bytes: &[u8], mime: &str) -> RemoteResult<UploadedMedia> {
        ureq::post(&self.url("/api/content/upload"))
            .header("Content-Type", mime)
            .send(bytes)
            .map_err(request_error)?
            .body_mut()
            .read_json()
            .map_err(decode_error)
    }

    fn search_stock_images(&self, query: &str) -> RemoteResult<Vec<StockImage>> {
        let key = self.pexels_key.as_deref().ok_or(RemoteError::NotConfigured(PEXELS_KEY_VAR))?;
        let per_page = STOCK_RESULTS_PER_PAGE.to_string();
        let response: PexelsResponse = ureq::get(PEXELS_SEARCH_URL)
            .header("Authorization", key)
            .query("query", stock_query(query))
            .query("per_page", &per_page)
            .call()
            .map_err(request_error)?
            .body_mut()
            .read_json()
            .map_err(decode_error)?;

        Ok(response
            .photos
            .into_iter()
            .take(STOCK_RESULTS_PER_PAGE)
            .map(|photo| StockImage {
                preview_url: photo.src.small,
                full_url: photo.src.medium,
            })
            .collect())
    }
}
