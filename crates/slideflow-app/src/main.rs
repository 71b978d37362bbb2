//! SlideFlow display player.
//!
//! Plays the shared deck full screen in the terminal, advancing on each
//! slide's duration. With `--server` it also keeps a show in step with the
//! show server.

mod player;
mod sync;

use clap::Parser;
use slideflow_core::display::{DEFAULT_POLL_INTERVAL, DEFAULT_RELOAD_INTERVAL, DisplayConfig};
use slideflow_core::remote::{HttpShowService, RemoteError, ShowReference};
use slideflow_core::storage::{DeckStore, FileStorage, StorageError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use sync::ShowSync;
use thiserror::Error;

/// Errors that stop the player.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Show service error: {0}")]
    Remote(#[from] RemoteError),
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("{0}")]
    Usage(&'static str),
}

#[derive(Parser, Debug)]
#[command(name = "slideflow")]
#[command(author, version, about = "Play a SlideFlow deck on a display")]
struct Cli {
    /// Directory holding saved decks (defaults to the user data directory)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Show server to sync from, e.g. http://localhost:3030
    #[arg(long)]
    server: Option<String>,

    /// Show id to play from the server
    #[arg(long, conflicts_with = "content")]
    show: Option<String>,

    /// Play the latest show made from this content item
    #[arg(long)]
    content: Option<String>,

    /// Seconds between deck store polls
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
    poll_secs: u64,

    /// Seconds between full reloads
    #[arg(long, default_value_t = DEFAULT_RELOAD_INTERVAL.as_secs())]
    reload_secs: u64,
}

impl Cli {
    fn display_config(&self) -> DisplayConfig {
        DisplayConfig {
            poll_interval: Duration::from_secs(self.poll_secs.max(1)),
            reload_interval: Duration::from_secs(self.reload_secs.max(1)),
        }
    }

    fn show_reference(&self) -> Option<ShowReference> {
        match (&self.show, &self.content) {
            (Some(id), _) => Some(ShowReference::Id(id.clone())),
            (None, Some(content)) => Some(ShowReference::Content(content.clone())),
            (None, None) => None,
        }
    }

    fn show_sync(&self) -> Result<Option<ShowSync<HttpShowService>>, PlayerError> {
        match (&self.server, self.show_reference()) {
            (Some(server), Some(reference)) => Ok(Some(ShowSync::new(HttpShowService::new(server), reference))),
            (Some(_), None) => Err(PlayerError::Usage("--server needs --show or --content")),
            (None, Some(_)) => Err(PlayerError::Usage("--show and --content need --server")),
            (None, None) => Ok(None),
        }
    }
}

fn run(cli: Cli) -> Result<(), PlayerError> {
    let storage = match &cli.store {
        Some(dir) => FileStorage::new(dir.clone())?,
        None => FileStorage::default_location()?,
    };
    log::info!("Deck store at {}", storage.base_path().display());
    let store = DeckStore::new(Arc::new(storage));

    let sync = cli.show_sync()?;
    if let Some(sync) = &sync {
        log::info!("Syncing {:?} from {}", sync.reference(), cli.server.as_deref().unwrap_or_default());
    }

    player::run(&store, sync.as_ref(), cli.display_config())
}

fn main() {
    env_logger::init();
    log::info!("Starting SlideFlow player");

    if let Err(e) = run(Cli::parse()) {
        log::error!("{}", e);
        eprintln!("slideflow: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["slideflow"]);
        assert_eq!(cli.display_config(), DisplayConfig::default());
        assert!(cli.show_sync().unwrap().is_none());
    }

    #[test]
    fn test_server_needs_show() {
        let cli = Cli::parse_from(["slideflow", "--server", "http://localhost:3030"]);
        assert!(matches!(cli.show_sync(), Err(PlayerError::Usage(_))));

        let cli = Cli::parse_from(["slideflow", "--server", "http://localhost:3030", "--content", "7"]);
        let sync = cli.show_sync().unwrap().unwrap();
        assert_eq!(sync.reference(), &ShowReference::Content("7".to_string()));
    }

    #[test]
    fn test_show_conflicts_with_content() {
        assert!(Cli::try_parse_from(["slideflow", "--show", "a", "--content", "b"]).is_err());
    }

    #[test]
    fn test_intervals() {
        let cli = Cli::parse_from(["slideflow", "--poll-secs", "5", "--reload-secs", "0"]);
        let config = cli.display_config();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.reload_interval, Duration::from_secs(1));
    }
}
