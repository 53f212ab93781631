use serde::Deserialize;

use crate::models::{Category, Video};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Video {video} references unknown category {category}")]
    UnknownCategory { video: String, category: String },

    #[error("Featured video {0} is not in the catalog")]
    MissingFeatured(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<Category>,
    featured: String,
    videos: Vec<Video>,
}

/// Read-only mock video catalog, built once and shared through `AppState`
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    videos: Vec<Video>,
    featured: String,
}

impl Catalog {
    /// The catalog bundled with the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;

        for video in &file.videos {
            if !file.categories.iter().any(|c| c.id == video.category) {
                return Err(CatalogError::UnknownCategory {
                    video: video.id.clone(),
                    category: video.category.clone(),
                });
            }
        }
        if !file.videos.iter().any(|v| v.id == file.featured) {
            return Err(CatalogError::MissingFeatured(file.featured));
        }

        Ok(Self {
            categories: file.categories,
            videos: file.videos,
            featured: file.featured,
        })
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn video_by_id(&self, id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn featured(&self) -> &Video {
        // from_json guarantees the featured id exists
        self.video_by_id(&self.featured)
            .unwrap_or_else(|| &self.videos[0])
    }
}
