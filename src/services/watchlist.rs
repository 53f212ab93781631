use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::WatchlistItem;

/// Per-user watchlists held in memory
#[derive(Clone, Default)]
pub struct WatchlistStore {
    inner: Arc<RwLock<HashMap<String, Vec<WatchlistItem>>>>,
}

impl WatchlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items for `user_id`, oldest first
    pub async fn list(&self, user_id: &str) -> Vec<WatchlistItem> {
        self.inner
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn contains(&self, user_id: &str, video_id: &str) -> bool {
        self.inner
            .read()
            .await
            .get(user_id)
            .is_some_and(|items| items.iter().any(|i| i.video_id == video_id))
    }

    /// Adds a video. Returns the stored item and whether it was newly created.
    pub async fn add(&self, user_id: &str, video_id: &str) -> (WatchlistItem, bool) {
        let mut lists = self.inner.write().await;
        let items = lists.entry(user_id.to_string()).or_default();

        if let Some(existing) = items.iter().find(|i| i.video_id == video_id) {
            return (existing.clone(), false);
        }

        let item = WatchlistItem::new(user_id, video_id);
        items.push(item.clone());

        tracing::info!(user_id = %user_id, video_id = %video_id, "Added to watchlist");

        (item, true)
    }

    /// Removes a video, returning the removed item if it was present
    pub async fn remove(&self, user_id: &str, video_id: &str) -> Option<WatchlistItem> {
        let mut lists = self.inner.write().await;
        let items = lists.get_mut(user_id)?;
        let index = items.iter().position(|i| i.video_id == video_id)?;
        let removed = items.remove(index);

        tracing::info!(user_id = %user_id, video_id = %video_id, "Removed from watchlist");

        Some(removed)
    }
}
