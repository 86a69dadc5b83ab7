//! Show directory access.
//!
//! This module provides the minimal show and episode records used for display,
//! as well as the trait every show directory backend implements.

mod tvmaze;
mod tvmaze_types;

pub use tvmaze::TvMazeDirectory;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Image shown for shows the directory has no artwork for.
pub const MISSING_IMAGE_URL: &str = "https://tinyurl.com/tv-missing";

/// Errors that can occur while talking to a show directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The configured base URL cannot be used to build request URLs
    #[error("Invalid directory base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Request to the directory failed before a response arrived
    #[error("Request failed: {0}")]
    RequestError(String),

    /// The directory answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Failed to parse the directory's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

/// Opaque identifier of a show in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowId(pub u64);

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ShowId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ShowId)
    }
}

/// Opaque identifier of an episode in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeId(pub u64);

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A show as returned by a search, reduced to what a show card displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    /// Directory identifier, used to look up episodes later
    pub id: ShowId,
    /// Display name
    pub name: String,
    /// Summary as HTML markup (empty if the directory has none)
    pub summary: String,
    /// Image URL, never empty
    pub image: String,
}

/// A single episode of a show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Directory identifier of the episode
    pub id: EpisodeId,
    /// The episode title
    pub name: String,
    /// The season number this episode belongs to
    pub season: u32,
    /// The episode number within the season
    pub number: u32,
}

/// Trait for show directories that can search shows and list episodes.
///
/// Implementors fetch fresh data on every call; nothing is cached.
pub trait ShowDirectory {
    /// Searches the directory for shows matching a free-text term.
    ///
    /// Results keep the order the directory returned them in. An empty term
    /// is passed through unchanged.
    fn search_shows(&self, term: &str) -> Result<Vec<Show>, DirectoryError>;

    /// Lists all episodes of the given show in directory order.
    fn episodes_of_show(&self, id: ShowId) -> Result<Vec<Episode>, DirectoryError>;
}

impl<D: ShowDirectory + ?Sized> ShowDirectory for &D {
    fn search_shows(&self, term: &str) -> Result<Vec<Show>, DirectoryError> {
        (**self).search_shows(term)
    }

    fn episodes_of_show(&self, id: ShowId) -> Result<Vec<Episode>, DirectoryError> {
        (**self).episodes_of_show(id)
    }
}
