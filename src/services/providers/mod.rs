//! Metadata provider abstraction
//!
//! A provider turns a free-text title query into raw search records. Providers
//! are pluggable; the engine only depends on the `SearchProvider` trait so a
//! different metadata database can be swapped in without touching filtering,
//! selection or resolution.

use crate::models::RawResult;

pub mod omdb;

pub use omdb::OmdbProvider;

/// Failures a provider can report. Transport errors are converted into one of
/// these before leaving the provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Credentials or endpoint configuration are missing or rejected
    #[error("Search provider is not configured: {0}")]
    Config(String),

    /// Network failure, non-2xx status or an unreadable body
    #[error("Search provider request failed: {0}")]
    HardFailure(String),
}

pub type SearchResult<T> = Result<T, SearchError>;

/// Successful provider answer
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderReply {
    /// The provider returned records (possibly none after a blank query)
    Matches(Vec<RawResult>),
    /// The provider reported "no matches" as a soft condition
    NotFound,
}

impl ProviderReply {
    /// Raw records carried by the reply, empty for a soft not-found
    pub fn into_results(self) -> Vec<RawResult> {
        match self {
            ProviderReply::Matches(results) => results,
            ProviderReply::NotFound => Vec::new(),
        }
    }
}

/// Trait for title metadata providers
///
/// Implementations must issue at most one outbound request per call and must
/// never retry on their own. A blank query yields `Matches(vec![])` without any
/// network access.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for titles by name
    async fn search(&self, query: &str) -> SearchResult<ProviderReply>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
