/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API.
use serde::Deserialize;

/// One hit from the `search/shows` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSearchHit {
    /// The matched show
    pub show: TvMazeShow,
}

/// A show object as embedded in search results.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    pub id: u64,
    /// The name of the TV show
    pub name: String,
    /// Show summary in HTML format (may be null)
    pub summary: Option<String>,
    /// Artwork links (null when the show has no image)
    pub image: Option<TvMazeImage>,
}

/// Artwork links of a show.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    pub original: Option<String>,
}

/// A single episode from the `shows/<id>/episodes` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    pub id: u64,
    /// Episode title (may be null for episodes without a title)
    pub name: Option<String>,
    /// Season number
    pub season: u32,
    /// Episode number within the season
    pub number: u32,
}
