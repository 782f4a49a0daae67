use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::{
    db::RecipeFilter,
    error::{AppError, AppResult},
    models::{RecipeListQuery, RecipeListResponse, RecipeResponse},
    routes::AppState,
};

/// Handler for `GET /api/recipes`
pub async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RecipeListQuery>, QueryRejection>,
) -> AppResult<Json<RecipeListResponse>> {
    let Query(query) = query?;
    let filter = RecipeFilter::from(query);

    let recipes = state.catalog.list_recipes(&filter).await?;
    tracing::debug!(count = recipes.len(), filter = ?filter, "Listed recipes");

    Ok(Json(RecipeListResponse {
        recipes: recipes.iter().map(RecipeResponse::from).collect(),
    }))
}

/// Handler for `GET /api/recipes/:id`
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<RecipeResponse>> {
    let Path(id) = id?;

    let recipe = state
        .catalog
        .fetch_recipe(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))?;

    Ok(Json(RecipeResponse::from(&recipe)))
}
