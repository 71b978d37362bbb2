//! SlideFlow Show Server
//!
//! Keeps show records and uploaded media in memory and serves them over a
//! small JSON API.
//!
//! ## Routes
//!
//! ```text
//! GET    /api/shows?id=<id>              { "show": Show | null }
//! GET    /api/shows?contentId=<id>       { "show": Show | null }   latest for that content
//! GET    /api/shows[?scheduled=true]     { "shows": [Show] }       by start time, unscheduled last
//! POST   /api/shows                      { "success": true, "show": Show }
//! DELETE /api/shows?id=<id>              { "success": true }
//! POST   /api/content/upload             { "url": "...", "size": 123 }   raw body, Content-Type set
//! GET    /media/{name}                   uploaded bytes
//! GET    /health                         ok
//! ```

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use slideflow_core::remote::{SaveShowRequest, ShowRecord, sort_by_schedule, unix_millis};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;
const DEFAULT_PUBLIC_URL: &str = "http://localhost:3030";

/// Server settings, read from the environment.
#[derive(Debug, Clone)]
struct ServerConfig {
    /// `SLIDEFLOW_ADDR`, default `0.0.0.0:3030`.
    addr: SocketAddr,
    /// `SLIDEFLOW_PUBLIC_URL`: base of the URLs handed out for uploads.
    public_url: String,
}

impl ServerConfig {
    fn from_env() -> Self {
        let addr = std::env::var("SLIDEFLOW_ADDR")
            .ok()
            .and_then(|value| match value.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    warn!("Ignoring invalid SLIDEFLOW_ADDR {:?}: {}", value, e);
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3030)));
        let public_url = std::env::var("SLIDEFLOW_PUBLIC_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string());
        Self {
            addr,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }
}

/// An uploaded file.
struct StoredMedia {
    mime: String,
    bytes: Bytes,
}

/// Shared application state
struct AppState {
    shows: DashMap<String, ShowRecord>,
    media: DashMap<String, StoredMedia>,
    public_url: String,
}

impl AppState {
    fn new(public_url: impl Into<String>) -> Self {
        Self {
            shows: DashMap::new(),
            media: DashMap::new(),
            public_url: public_url.into(),
        }
    }

    /// Most recently updated show created from a content item.
    fn show_for_content(&self, content_id: &str) -> Option<ShowRecord> {
        self.shows
            .iter()
            .filter(|entry| entry.content_id.as_deref() == Some(content_id))
            .max_by_key(|entry| entry.updated_at)
            .map(|entry| entry.value().clone())
    }

    fn list_shows(&self, scheduled_only: bool) -> Vec<ShowRecord> {
        let mut shows: Vec<ShowRecord> = self
            .shows
            .iter()
            .filter(|entry| !scheduled_only || entry.is_scheduled())
            .map(|entry| entry.value().clone())
            .collect();
        sort_by_schedule(&mut shows);
        shows
    }
}

/// JSON error body with a status code.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ShowQuery {
    id: Option<String>,
    #[serde(rename = "contentId")]
    content_id: Option<String>,
    scheduled: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ShowsResponse {
    One { show: Option<ShowRecord> },
    Many { shows: Vec<ShowRecord> },
}

#[derive(Debug, Serialize)]
struct SaveResponse {
    success: bool,
    show: ShowRecord,
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    success: bool,
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    url: String,
    size: usize,
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/shows", get(get_shows).post(save_show).delete(delete_show))
        .route("/api/content/upload", post(upload_content))
        .route("/media/{name}", get(get_media))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slideflow_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    let state = Arc::new(AppState::new(config.public_url.clone()));

    info!("SlideFlow show server listening on {}", config.addr);
    info!("Media served from {}/media/", config.public_url);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app(state)).await
}

/// Index page
async fn index() -> &'static str {
    "SlideFlow Show Server - see /api/shows"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// Look up one show or list them.
async fn get_shows(State(state): State<Arc<AppState>>, Query(query): Query<ShowQuery>) -> Json<ShowsResponse> {
    if let Some(id) = query.id {
        let show = state.shows.get(&id).map(|entry| entry.value().clone());
        return Json(ShowsResponse::One { show });
    }
    if let Some(content_id) = query.content_id {
        return Json(ShowsResponse::One {
            show: state.show_for_content(&content_id),
        });
    }
    let scheduled_only = query.scheduled.as_deref() == Some("true");
    Json(ShowsResponse::Many {
        shows: state.list_shows(scheduled_only),
    })
}

/// Create a show, or update it when the request carries an id.
async fn save_show(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveShowRequest>,
) -> Result<Json<SaveResponse>, ApiError> {
    let now = unix_millis();

    let show = match request.id.clone() {
        Some(id) => {
            let mut entry = state
                .shows
                .get_mut(&id)
                .ok_or_else(|| ApiError::not_found(format!("Show {} not found", id)))?;
            request
                .apply_to(&mut entry, now)
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            info!("Updated show {}", id);
            entry.value().clone()
        }
        None => {
            let record = request
                .into_record(Uuid::new_v4().to_string(), now)
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            state.shows.insert(record.id.clone(), record.clone());
            info!("Created show {} ({})", record.id, record.name);
            record
        }
    };

    Ok(Json(SaveResponse { success: true, show }))
}

async fn delete_show(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ShowQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Show id is required"))?;
    if state.shows.remove(&id).is_some() {
        info!("Deleted show {}", id);
    }
    Ok(Json(DeleteResponse { success: true }))
}

/// File extension for an uploaded MIME type.
fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        _ => "bin",
    }
}

/// Store a raw upload and hand back its public URL.
async fn upload_content(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::bad_request("No file provided"));
    }
    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let name = format!("{}.{}", Uuid::new_v4().simple(), extension_for(&mime));
    let size = body.len();
    let url = format!("{}/media/{}", state.public_url, name);
    state.media.insert(name.clone(), StoredMedia { mime, bytes: body });
    info!("Stored upload {} ({} bytes)", name, size);

    Ok(Json(UploadResponse { url, size }))
}

async fn get_media(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Result<Response, ApiError> {
    let media = state
        .media
        .get(&name)
        .ok_or_else(|| ApiError::not_found(format!("Media {} not found", name)))?;
    Ok(([(header::CONTENT_TYPE, media.mime.clone())], media.bytes.clone()).into_response())
}
