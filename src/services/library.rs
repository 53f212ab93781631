//! Video library: the built-in catalog plus videos published by users
//!
//! Published videos live in memory only and are listed after the catalog
//! entries, in publish order.

use std::sync::Arc;

use reqwest::Url;
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{models::Video, services::catalog::Catalog};

pub const MIN_TITLE_LEN: usize = 5;
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Duration shown for published videos; it cannot be derived from a URL
pub const UNKNOWN_DURATION: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    #[error("Title must be at least {} characters long.", MIN_TITLE_LEN)]
    TitleTooShort,

    #[error("Description must be at least {} characters long.", MIN_DESCRIPTION_LEN)]
    DescriptionTooShort,

    #[error("Please enter a valid video URL.")]
    InvalidVideoUrl,

    #[error("Please select a category.")]
    MissingCategory,

    #[error("Unknown category {0}")]
    UnknownCategory(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub title: String,
    pub description: String,
    pub video_url: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Clone)]
pub struct VideoLibrary {
    catalog: Arc<Catalog>,
    published: Arc<RwLock<Vec<Video>>>,
}

impl VideoLibrary {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            published: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn videos(&self) -> Vec<Video> {
        let published = self.published.read().await;
        self.catalog
            .videos()
            .iter()
            .chain(published.iter())
            .cloned()
            .collect()
    }

    pub async fn video_by_id(&self, id: &str) -> Option<Video> {
        if let Some(video) = self.catalog.video_by_id(id) {
            return Some(video.clone());
        }
        self.published
            .read()
            .await
            .iter()
            .find(|v| v.id == id)
            .cloned()
    }

    pub async fn videos_by_category(&self, category_id: &str) -> Vec<Video> {
        self.videos()
            .await
            .into_iter()
            .filter(|v| v.category == category_id)
            .collect()
    }

    /// Other videos in the same category as `id`
    pub async fn related(&self, id: &str) -> Option<Vec<Video>> {
        let video = self.video_by_id(id).await?;
        Some(
            self.videos_by_category(&video.category)
                .await
                .into_iter()
                .filter(|v| v.id != video.id)
                .collect(),
        )
    }

    /// Checks a publish request against the form rules
    pub fn validate(&self, request: &PublishRequest) -> Result<(), PublishError> {
        if request.title.trim().chars().count() < MIN_TITLE_LEN {
            return Err(PublishError::TitleTooShort);
        }
        if request.description.trim().chars().count() < MIN_DESCRIPTION_LEN {
            return Err(PublishError::DescriptionTooShort);
        }
        if Url::parse(request.video_url.trim()).is_err() {
            return Err(PublishError::InvalidVideoUrl);
        }

        let category = request.category.trim();
        if category.is_empty() {
            return Err(PublishError::MissingCategory);
        }
        if self.catalog.category(category).is_none() {
            return Err(PublishError::UnknownCategory(category.to_string()));
        }

        Ok(())
    }

    /// Validates and stores a video published by `uploader_id`
    pub async fn publish(
        &self,
        uploader_id: &str,
        request: PublishRequest,
    ) -> Result<Video, PublishError> {
        self.validate(&request)?;

        let id = Uuid::new_v4().to_string();
        let video = Video {
            thumbnail_url: placeholder_thumbnail(&id),
            id,
            title: request.title.trim().to_string(),
            description: request.description.trim().to_string(),
            category: request.category.trim().to_string(),
            video_url: request.video_url.trim().to_string(),
            duration: UNKNOWN_DURATION.to_string(),
            uploader_id: Some(uploader_id.to_string()),
        };

        self.published.write().await.push(video.clone());

        tracing::info!(
            video_id = %video.id,
            uploader_id = %uploader_id,
            category = %video.category,
            "Video published"
        );

        Ok(video)
    }
}

fn placeholder_thumbnail(seed: &str) -> String {
    format!("https://picsum.photos/seed/{}/400/600", seed)
}
