use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod catalog;
pub mod watchlist;

pub use catalog::{Category, Video};
pub use watchlist::WatchlistItem;

/// Kind of media a search result refers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
    Episode,
}

impl MediaKind {
    /// Maps a provider's type tag onto a media kind.
    ///
    /// Anything the provider labels outside of series/episode (games, unknown
    /// tags, missing tags) is treated as a movie.
    pub fn from_provider_tag(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("series") | Some("tv") | Some("tv_series") => MediaKind::Series,
            Some("episode") => MediaKind::Episode,
            _ => MediaKind::Movie,
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Series => write!(f, "series"),
            MediaKind::Episode => write!(f, "episode"),
        }
    }
}

// ============================================================================
// Provider (OMDb) Types
// ============================================================================

/// A single search record as the metadata provider reports it, before filtering
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawResult {
    #[serde(rename = "imdbID", default)]
    pub external_id: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
}

/// Raw body of an OMDb `?s=` search
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    pub search: Option<Vec<RawResult>>,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

/// Body served by the search proxy endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPayload {
    #[serde(rename = "Search")]
    pub search: Vec<RawResult>,
    #[serde(rename = "Response")]
    pub response: String,
}

impl SearchPayload {
    pub fn found(results: Vec<RawResult>) -> Self {
        Self {
            search: results,
            response: "True".to_string(),
        }
    }
}

// ============================================================================
// Core Types
// ============================================================================

/// A search result eligible for playback resolution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub external_id: String,
    pub title: String,
    pub poster_url: String,
    pub year: String,
    pub media_kind: MediaKind,
}

#[cfg(test)]
impl Candidate {
    pub fn new(external_id: &str, title: &str, poster_url: &str, media_kind: MediaKind) -> Self {
        Self {
            external_id: external_id.to_string(),
            title: title.to_string(),
            poster_url: poster_url.to_string(),
            year: String::new(),
            media_kind,
        }
    }
}
