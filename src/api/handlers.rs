use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{Category, SearchPayload, Video, WatchlistItem};
use crate::services::{
    library::PublishRequest,
    recommendations::{RecommendationRequest, RecommendationResponse},
    selection::SelectionSnapshot,
    servers::ServerTemplate,
    PlaybackController, SearchOutcome,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub q: Option<String>,
    /// Candidate to activate instead of the first result
    pub id: Option<String>,
    /// Server to switch to after the candidate is chosen
    pub server: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub outcome: &'static str,
    pub selection: SelectionSnapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWatchlistRequest {
    pub video_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistStatus {
    pub video_id: String,
    pub in_watchlist: bool,
}

fn required_query(q: Option<String>) -> AppResult<String> {
    q.map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Search query is required.".to_string()))
}

fn outcome_label(outcome: SearchOutcome) -> &'static str {
    match outcome {
        SearchOutcome::Candidates(_) => "resolved",
        SearchOutcome::ProviderEmpty => "provider_empty",
        SearchOutcome::NoEligibleCandidates => "no_eligible_candidates",
        SearchOutcome::EmptyQuery => "empty_query",
        SearchOutcome::Stale => "stale",
    }
}

// Handlers

pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Search proxy. A soft "no matches" answer becomes an empty list.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchPayload>> {
    let query = required_query(params.q)?;
    let reply = state.provider.search(&query).await?;
    Ok(Json(SearchPayload::found(reply.into_results())))
}

pub async fn list_servers(State(state): State<AppState>) -> Json<Vec<ServerTemplate>> {
    Json(state.registry.iter().cloned().collect())
}

/// Runs the resolution engine once for a query
pub async fn resolve(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> AppResult<Json<ResolveResponse>> {
    let query = required_query(params.q)?;
    let controller = PlaybackController::new(state.provider.clone(), state.registry.clone());

    let outcome = controller.search(&query).await?;

    if let Some(id) = params.id.as_deref() {
        controller.select_candidate(id).await?;
    }
    if let Some(server) = params.server.as_deref() {
        controller.select_server(server).await?;
    }

    let selection = controller.snapshot().await;
    tracing::info!(
        query = %query,
        outcome = outcome_label(outcome),
        url = ?selection.resolved_url,
        "Resolved playback URL"
    );

    Ok(Json(ResolveResponse {
        outcome: outcome_label(outcome),
        selection,
    }))
}

pub async fn list_videos(State(state): State<AppState>) -> Json<Vec<Video>> {
    Json(state.library.videos().await)
}

pub async fn featured_video(State(state): State<AppState>) -> Json<Video> {
    Json(state.catalog.featured().clone())
}

pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Video>> {
    state
        .library
        .video_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
}

pub async fn related_videos(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Video>>> {
    state
        .library
        .related(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
}

pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.catalog.categories().to_vec())
}

pub async fn category_videos(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Video>>> {
    if state.catalog.category(&id).is_none() {
        return Err(AppError::NotFound(format!("Category {} not found", id)));
    }
    Ok(Json(state.library.videos_by_category(&id).await))
}

/// Publishes a video on behalf of `user_id`
pub async fn publish_video(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<PublishRequest>,
) -> AppResult<(StatusCode, Json<Video>)> {
    let video = state
        .library
        .publish(&user_id, request)
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(video)))
}

pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let response = state.recommender.recommend(request).await?;
    Ok(Json(response))
}

pub async fn get_watchlist(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<WatchlistItem>> {
    Json(state.watchlist.list(&user_id).await)
}

pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<AddWatchlistRequest>,
) -> AppResult<(StatusCode, Json<WatchlistItem>)> {
    if state.library.video_by_id(&request.video_id).await.is_none() {
        return Err(AppError::NotFound(format!(
            "Video {} not found",
            request.video_id
        )));
    }

    let (item, created) = state.watchlist.add(&user_id, &request.video_id).await;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(item)))
}

pub async fn watchlist_status(
    State(state): State<AppState>,
    Path((user_id, video_id)): Path<(String, String)>,
) -> Json<WatchlistStatus> {
    let in_watchlist = state.watchlist.contains(&user_id, &video_id).await;
    Json(WatchlistStatus {
        video_id,
        in_watchlist,
    })
}

pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Path((user_id, video_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    state
        .watchlist
        .remove(&user_id, &video_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| AppError::NotFound(format!("Video {} is not in the watchlist", video_id)))
}
