//! OMDb API provider
//!
//! Issues a single `?s=<query>` search against OMDb and maps its answer onto
//! `ProviderReply`. OMDb reports "no matches" as a 200 with `Response: "False"`,
//! which is a soft condition here, as are its other refusals such as
//! "Too many results.". Only a rejected API key is reported as an error;
//! transport failures, non-2xx statuses and unreadable bodies are hard failures.

use reqwest::Client as HttpClient;
use tracing::instrument;

use crate::{
    models::OmdbSearchResponse,
    services::providers::{ProviderReply, SearchError, SearchProvider, SearchResult},
};

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl OmdbProvider {
    pub fn new(api_key: Option<String>, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    fn api_key(&self) -> SearchResult<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SearchError::Config("OMDB_API_KEY is not set".to_string()))
    }

    /// Classifies a decoded OMDb body
    fn interpret(body: OmdbSearchResponse) -> SearchResult<ProviderReply> {
        if body.response.eq_ignore_ascii_case("true") {
            return Ok(ProviderReply::Matches(body.search.unwrap_or_default()));
        }

        if !body.response.eq_ignore_ascii_case("false") {
            return Err(SearchError::HardFailure(format!(
                "Unexpected OMDb Response value: {}",
                body.response
            )));
        }

        match body.error {
            Some(detail) if detail.to_ascii_lowercase().contains("api key") => {
                Err(SearchError::Config(detail))
            }
            Some(detail) => {
                tracing::debug!(detail = %detail, "OMDb declined the search");
                Ok(ProviderReply::NotFound)
            }
            None => Ok(ProviderReply::NotFound),
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for OmdbProvider {
    #[instrument(skip(self), fields(provider = "omdb"))]
    async fn search(&self, query: &str) -> SearchResult<ProviderReply> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(ProviderReply::Matches(Vec::new()));
        }

        let api_key = self.api_key()?;

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("apikey", api_key), ("s", query)])
            .send()
            .await
            .map_err(|e| SearchError::HardFailure(format!("OMDb request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "OMDb API error");
            return Err(SearchError::HardFailure(format!(
                "OMDb API returned status {}",
                status
            )));
        }

        let body: OmdbSearchResponse = response.json().await.map_err(|e| {
            SearchError::HardFailure(format!("Failed to parse OMDb response: {}", e))
        })?;

        let reply = Self::interpret(body)?;

        match &reply {
            ProviderReply::Matches(results) => tracing::info!(
                query = %query,
                results = results.len(),
                provider = "omdb",
                "Title search completed"
            ),
            ProviderReply::NotFound => tracing::info!(
                query = %query,
                provider = "omdb",
                "Title search found nothing"
            ),
        }

        Ok(reply)
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
