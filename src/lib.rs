//! show_scout - Browse the TVMaze show directory
//!
//! This library searches a TV show directory, renders the results as show
//! cards on an in-memory page and, on request, fetches and renders the episode
//! list of a selected show.
//!
//! # Examples
//!
//! ```no_run
//! use show_scout::{BrowserConfig, PageController, ShowBrowser, TvMazeDirectory};
//!
//! let directory = TvMazeDirectory::with_config(&BrowserConfig::default())?;
//! let mut browser = ShowBrowser::new(directory, |event| println!("{:?}", event));
//!
//! browser.submit_search("batman")?;
//! browser.request_episodes(0)?;
//!
//! for item in browser.page().episode_items() {
//!     println!("{}", item);
//! }
//! # Ok::<(), show_scout::BrowserError>(())
//! ```

mod config;
mod controller;
mod directory;
mod page;

pub use config::{BrowserConfig, DEFAULT_BASE_URL};
pub use controller::{BrowserEvent, PageController, PendingEpisodes, PendingSearch, ShowBrowser};
pub use directory::{
    DirectoryError, Episode, EpisodeId, MISSING_IMAGE_URL, Show, ShowDirectory, ShowId,
    TvMazeDirectory,
};
pub use page::{Page, Region, ShowCard, Ticket, format_episode};

use std::io;
use thiserror::Error;

/// Top-level error type for show_scout operations
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Error while querying the show directory
    #[error("Show directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// An episode request referenced a card that is not on the page
    #[error("No show card at position {0}")]
    CardNotFound(usize),

    /// A newer action for the same region started before this one finished
    #[error("Response for the {0:?} region was superseded by a newer request")]
    StaleResponse(Region),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
