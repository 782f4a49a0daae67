use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse, SearchQuery, UserProfile},
    routes::AppState,
    services::recommendations,
};

/// Handler for `POST /api/recommend`
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = payload?;
    let user_id = parse_user_id(request.user_id.as_deref())?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        search_terms = request.search_ingredients.len(),
        preferred_cuisines = ?request.preferred_cuisine,
        max_cooking_time = ?request.max_cooking_time,
        "Processing recommendation request"
    );

    let stored = state
        .catalog
        .fetch_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let query = SearchQuery::new(&request.search_ingredients);
    let profile = UserProfile::from_stored(stored)
        .with_preferred_cuisines(request.preferred_cuisine)
        .with_max_cooking_time(request.max_cooking_time);

    let model = state.model.get().await?;
    let catalog = state.catalog.fetch_catalog().await?;

    let recommendations =
        recommendations::recommend(&profile, &query, &catalog, model.as_ref()).await;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        candidates = recommendations.ranking.total_candidates,
        scoring_failures = recommendations.scoring_failures,
        empty_reason = ?recommendations.empty_reason,
        "Recommendations generated"
    );

    Ok(Json(recommendations.into_response()))
}

fn parse_user_id(raw: Option<&str>) -> AppResult<Uuid> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing required field: user_id".to_string()))?;

    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput("Invalid user_id".to_string()))
}
