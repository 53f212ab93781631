use serde::{Deserialize, Serialize};

/// A catalog video available on the home page carousels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Category id (e.g. "sci-fi")
    pub category: String,
    pub thumbnail_url: String,
    pub video_url: String,
    /// Display string such as "2h 15m", or "N/A" for published videos
    pub duration: String,
    /// Publishing user; absent for the built-in catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
}
