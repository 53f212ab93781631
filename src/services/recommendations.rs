use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::{error::AppResult, services::catalog::Catalog};

fn default_num_recommendations() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Titles the user has already watched
    #[serde(default)]
    pub viewing_history: Vec<String>,
    /// Optional category id to restrict suggestions to
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_num_recommendations")]
    pub num_recommendations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub recommendations: Vec<String>,
}

/// Produces title recommendations from a viewing history.
///
/// The recommender is an opaque collaborator; the engine never inspects how
/// suggestions are produced.
#[async_trait::async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, request: RecommendationRequest) -> AppResult<RecommendationResponse>;
}

/// Recommends catalog titles the user has not watched yet
pub struct CatalogRecommender {
    catalog: Arc<Catalog>,
}

impl CatalogRecommender {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait::async_trait]
impl Recommender for CatalogRecommender {
    async fn recommend(&self, request: RecommendationRequest) -> AppResult<RecommendationResponse> {
        let watched: HashSet<String> = request
            .viewing_history
            .iter()
            .map(|title| title.trim().to_lowercase())
            .collect();

        let category = request
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let recommendations: Vec<String> = self
            .catalog
            .videos()
            .iter()
            .filter(|v| category.map_or(true, |c| v.category == c))
            .filter(|v| !watched.contains(&v.title.to_lowercase()))
            .take(request.num_recommendations)
            .map(|v| v.title.clone())
            .collect();

        tracing::info!(
            history = request.viewing_history.len(),
            category = ?category,
            recommended = recommendations.len(),
            "Recommendations generated"
        );

        Ok(RecommendationResponse { recommendations })
    }
}
