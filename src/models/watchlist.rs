use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A video saved to a user's watchlist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: Uuid,
    pub user_id: String,
    pub video_id: String,
    pub added_date: DateTime<Utc>,
}

impl WatchlistItem {
    pub fn new(user_id: &str, video_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            video_id: video_id.to_string(),
            added_date: Utc::now(),
        }
    }
}
