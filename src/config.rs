//! Runtime configuration shared by the directory client and the controller.

use crate::directory::MISSING_IMAGE_URL;

/// Base URL of the public TVMaze API.
pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com/";

/// Settings passed explicitly to every component instead of living in globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Base URL of the show directory; endpoint paths are joined below it
    pub base_url: String,
    /// Image URL used for shows without artwork
    pub missing_image_url: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            missing_image_url: MISSING_IMAGE_URL.to_string(),
        }
    }
}
