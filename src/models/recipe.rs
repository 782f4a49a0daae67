use serde::{Deserialize, Serialize};

use crate::services::ingredients::{self, RawIngredients};

pub const DEFAULT_RECIPE_NAME: &str = "Unknown Recipe";
pub const DEFAULT_CUISINE: &str = "Various";
pub const DEFAULT_COOK_TIME_MINUTES: i32 = 30;
pub const DEFAULT_SERVINGS: i32 = 4;
pub const DEFAULT_RATING: f64 = 4.0;

/// A catalog recipe with its ingredient list already normalized
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: i64,
    #[serde(default)]
    pub recipe_name: String,
    /// Ingredient names in catalog order
    #[serde(default, deserialize_with = "ingredients::deserialize")]
    pub ingredients_list: Vec<String>,
    pub cuisine: Option<String>,
    pub cook_time_minutes: Option<i32>,
    pub diet: Option<String>,
    pub rating: Option<f64>,
    // Display-only fields, passed through to clients
    pub timing: Option<String>,
    pub calories: Option<i32>,
    pub servings: Option<i32>,
    pub url: Option<String>,
    pub img_src: Option<String>,
    pub directions: Option<String>,
}

/// Row shape of the `recipes` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub recipe_name: Option<String>,
    pub ingredients_list: Option<String>,
    pub cuisine: Option<String>,
    pub cook_time_minutes: Option<i32>,
    pub diet: Option<String>,
    pub rating: Option<f64>,
    pub timing: Option<String>,
    pub calories: Option<i32>,
    pub servings: Option<i32>,
    pub url: Option<String>,
    pub img_src: Option<String>,
    pub directions: Option<String>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            recipe_name: row.recipe_name.unwrap_or_default(),
            ingredients_list: ingredients::normalize(row.ingredients_list.map(RawIngredients::Text)),
            cuisine: row.cuisine,
            cook_time_minutes: row.cook_time_minutes,
            diet: row.diet,
            rating: row.rating,
            timing: row.timing,
            calories: row.calories,
            servings: row.servings,
            url: row.url,
            img_src: row.img_src,
            directions: row.directions,
        }
    }
}

/// Recipe as returned to the client, with display defaults filled in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeResponse {
    pub id: i64,
    pub recipe_name: String,
    pub ingredients_list: Vec<String>,
    pub cuisine: String,
    pub cook_time_minutes: i32,
    pub diet: String,
    pub timing: String,
    pub calories: i32,
    pub servings: i32,
    pub rating: f64,
    pub url: String,
    pub img_src: String,
    pub directions: String,
    /// Final recommendation score, present only on recommendation results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ml_score: Option<f64>,
}

impl From<&Recipe> for RecipeResponse {
    fn from(recipe: &Recipe) -> Self {
        let name = recipe.recipe_name.trim();
        Self {
            id: recipe.id,
            recipe_name: if name.is_empty() {
                DEFAULT_RECIPE_NAME.to_string()
            } else {
                name.to_string()
            },
            ingredients_list: recipe.ingredients_list.clone(),
            cuisine: recipe
                .cuisine
                .clone()
                .unwrap_or_else(|| DEFAULT_CUISINE.to_string()),
            cook_time_minutes: recipe
                .cook_time_minutes
                .unwrap_or(DEFAULT_COOK_TIME_MINUTES),
            diet: recipe.diet.clone().unwrap_or_default(),
            timing: recipe.timing.clone().unwrap_or_default(),
            calories: recipe.calories.unwrap_or(0),
            servings: recipe.servings.unwrap_or(DEFAULT_SERVINGS),
            rating: recipe.rating.unwrap_or(DEFAULT_RATING),
            url: recipe.url.clone().unwrap_or_default(),
            img_src: recipe.img_src.clone().unwrap_or_default(),
            directions: recipe.directions.clone().unwrap_or_default(),
            ml_score: None,
        }
    }
}

impl RecipeResponse {
    pub fn scored(recipe: &Recipe, score: f64) -> Self {
        Self {
            ml_score: Some(score),
            ..Self::from(recipe)
        }
    }
}
