use serde::{Deserialize, Serialize};

pub mod recipe;
pub mod search;
pub mod user_profile;

pub use recipe::{Recipe, RecipeResponse, RecipeRow};
pub use search::SearchQuery;
pub use user_profile::{StoredProfile, UserProfile};

// ============================================================================
// Pipeline Types
// ============================================================================

/// Model input for one (user, recipe) pair.
///
/// Field names are the column names the registered model was trained on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    pub max_cooking_time: f64,
    pub recipe_cook_time: f64,
    pub cook_time_diff: f64,
    pub ingredient_overlap_ratio: f64,
    pub cuisine_similarity: f64,
}

/// A candidate recipe with its final score in `[0.0, 1.0]`
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecipe {
    pub recipe: Recipe,
    pub score: f64,
}

/// Why a recommendation came back without any recipes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The catalog had no recipes at all
    EmptyCatalog,
    /// An ingredient search was active and nothing contained the terms
    NoSearchMatch,
    /// Hard filters (allergies, dislikes, diet, cuisine) removed everything
    PreferenceMismatch,
}

impl EmptyReason {
    pub fn message(&self, search_terms: &[String]) -> String {
        match self {
            EmptyReason::EmptyCatalog => "No recipes are available right now.".to_string(),
            EmptyReason::NoSearchMatch => format!(
                "No recipes found containing: {}. Try different ingredients.",
                search_terms.join(", ")
            ),
            EmptyReason::PreferenceMismatch => {
                "No recipes match your preferences. Try adjusting your filters.".to_string()
            }
        }
    }
}

// ============================================================================
// API Types
// ============================================================================

/// Body of `POST /api/recommend`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub search_ingredients: Vec<String>,
    #[serde(default)]
    pub preferred_cuisine: Vec<String>,
    pub max_cooking_time: Option<u32>,
}

/// Ranked recommendations plus diagnostic counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recipes: Vec<RecipeResponse>,
    pub total_candidates: usize,
    pub total_scored: usize,
    pub scoring_failures: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_reason: Option<EmptyReason>,
}

/// Query string of `GET /api/recipes`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeListQuery {
    pub cuisine: Option<String>,
    pub max_time: Option<i32>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<RecipeResponse>,
}
