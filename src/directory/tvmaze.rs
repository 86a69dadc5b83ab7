/// TVMaze show directory implementation.
use super::tvmaze_types::{TvMazeEpisode, TvMazeSearchHit};
use super::{DirectoryError, Episode, EpisodeId, Show, ShowDirectory, ShowId};
use crate::config::BrowserConfig;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Show directory backed by the TVMaze API.
///
/// Every call issues exactly one GET request against the configured base URL
/// (https://api.tvmaze.com by default). There is no caching, retrying or
/// request timeout.
pub struct TvMazeDirectory {
    client: reqwest::blocking::Client,
    base_url: Url,
    missing_image_url: String,
}

impl TvMazeDirectory {
    /// Creates a directory client for the public TVMaze API.
    pub fn new() -> Result<Self, DirectoryError> {
        Self::with_config(&BrowserConfig::default())
    }

    /// Creates a directory client using the base URL and placeholder image
    /// from the given configuration.
    pub fn with_config(config: &BrowserConfig) -> Result<Self, DirectoryError> {
        Ok(Self {
            client: reqwest::blocking::Client::new(),
            base_url: parse_base_url(&config.base_url)?,
            missing_image_url: config.missing_image_url.clone(),
        })
    }

    fn search_url(&self, term: &str) -> Result<Url, DirectoryError> {
        let mut url = self.endpoint("search/shows")?;
        url.query_pairs_mut().append_pair("q", term);
        Ok(url)
    }

    fn episodes_url(&self, id: ShowId) -> Result<Url, DirectoryError> {
        self.endpoint(&format!("shows/{}/episodes", id))
    }

    fn endpoint(&self, path: &str) -> Result<Url, DirectoryError> {
        self.base_url
            .join(path)
            .map_err(|e| DirectoryError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Performs the GET request and decodes the JSON body.
    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DirectoryError> {
        debug!(%url, "requesting show directory");

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| DirectoryError::RequestError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json()
            .map_err(|e| DirectoryError::ParseError(e.to_string()))
    }

    /// Converts a TVMaze search hit to a show record.
    ///
    /// Shows without an original-resolution image get the placeholder.
    fn convert_show(hit: TvMazeSearchHit, missing_image_url: &str) -> Show {
        let show = hit.show;
        let image = show
            .image
            .and_then(|image| image.original)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| missing_image_url.to_string());

        Show {
            id: ShowId(show.id),
            name: show.name,
            summary: show.summary.unwrap_or_default(),
            image,
        }
    }

    fn convert_episode(episode: TvMazeEpisode) -> Episode {
        Episode {
            id: EpisodeId(episode.id),
            name: episode.name.unwrap_or_else(|| "Unknown".to_string()),
            season: episode.season,
            number: episode.number,
        }
    }
}

impl ShowDirectory for TvMazeDirectory {
    fn search_shows(&self, term: &str) -> Result<Vec<Show>, DirectoryError> {
        let hits: Vec<TvMazeSearchHit> = self.get_json(self.search_url(term)?)?;
        debug!(term, hits = hits.len(), "search finished");

        Ok(hits
            .into_iter()
            .map(|hit| Self::convert_show(hit, &self.missing_image_url))
            .collect())
    }

    fn episodes_of_show(&self, id: ShowId) -> Result<Vec<Episode>, DirectoryError> {
        let episodes: Vec<TvMazeEpisode> = self.get_json(self.episodes_url(id)?)?;
        debug!(show_id = %id, episodes = episodes.len(), "episode listing finished");

        Ok(episodes.into_iter().map(Self::convert_episode).collect())
    }
}

/// Parses the base URL so that endpoint paths are joined below it.
///
/// A missing trailing slash is added, otherwise `Url::join` would replace the
/// last path segment instead of appending to it.
fn parse_base_url(raw: &str) -> Result<Url, DirectoryError> {
    let invalid = |reason: String| DirectoryError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    let url = Url::parse(&normalized).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }

    Ok(url)
}
