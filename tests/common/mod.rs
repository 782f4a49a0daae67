#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use axum_test::TestServer;
use uuid::Uuid;

use flavorfit_api::{
    create_router,
    db::{CatalogStore, RecipeFilter},
    error::AppResult,
    models::{FeatureVector, Recipe, StoredProfile},
    services::{model::ScoringError, ModelHandle, ScoringModel},
    AppState,
};

/// Catalog backed by plain collections
#[derive(Default)]
pub struct InMemoryCatalog {
    pub profiles: HashMap<Uuid, StoredProfile>,
    pub recipes: Vec<Recipe>,
    pub unreachable: bool,
}

impl InMemoryCatalog {
    pub fn with_profile(mut self, profile: StoredProfile) -> Self {
        self.profiles.insert(profile.id, profile);
        self
    }

    pub fn with_recipes(mut self, recipes: Vec<Recipe>) -> Self {
        self.recipes = recipes;
        self
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn fetch_profile(&self, user_id: Uuid) -> AppResult<Option<StoredProfile>> {
        Ok(self.profiles.get(&user_id).cloned())
    }

    async fn fetch_catalog(&self) -> AppResult<Vec<Recipe>> {
        Ok(self.recipes.clone())
    }

    async fn fetch_recipe(&self, id: i64) -> AppResult<Option<Recipe>> {
        Ok(self.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_recipes(&self, filter: &RecipeFilter) -> AppResult<Vec<Recipe>> {
        Ok(self
            .recipes
            .iter()
            .filter(|r| matches_filter(filter, r))
            .take(filter.limit as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> bool {
        !self.unreachable
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

/// Same predicate the `list_recipes` SQL applies
pub fn matches_filter(filter: &RecipeFilter, recipe: &Recipe) -> bool {
    let cuisine_ok = match &filter.cuisine {
        Some(wanted) => recipe
            .cuisine
            .as_deref()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case(wanted)),
        None => true,
    };
    let time_ok = match filter.max_cook_time {
        Some(max) => recipe.cook_time_minutes.is_some_and(|t| t <= max),
        None => true,
    };
    cuisine_ok && time_ok
}

/// Returns `base` for every recipe except those whose cook time is listed in `fail_on`
pub struct FixedModel {
    pub base: f64,
    pub fail_on: Vec<f64>,
}

impl FixedModel {
    pub fn new(base: f64) -> Self {
        Self {
            base,
            fail_on: Vec::new(),
        }
    }

    pub fn failing_on(mut self, cook_time: f64) -> Self {
        self.fail_on.push(cook_time);
        self
    }
}

#[async_trait::async_trait]
impl ScoringModel for FixedModel {
    async fn predict(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        if self.fail_on.contains(&features.recipe_cook_time) {
            return Err(ScoringError::Status {
                status: 500,
                body: "inference failed".to_string(),
            });
        }
        Ok(self.base)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

pub fn recipe(
    id: i64,
    name: &str,
    ingredients: &[&str],
    cuisine: &str,
    cook_time: i32,
    diet: &str,
) -> Recipe {
    Recipe {
        id,
        recipe_name: name.to_string(),
        ingredients_list: ingredients.iter().map(|s| s.to_string()).collect(),
        cuisine: Some(cuisine.to_string()),
        cook_time_minutes: Some(cook_time),
        diet: Some(diet.to_string()),
        rating: Some(4.5),
        timing: None,
        calories: Some(400),
        servings: Some(2),
        url: None,
        img_src: None,
        directions: None,
    }
}

pub fn profile(id: Uuid, allergies: &[&str], dislikes: &[&str], diet: &str) -> StoredProfile {
    StoredProfile {
        id,
        allergies: Some(allergies.iter().map(|s| s.to_string()).collect()),
        disliked_ingredients: Some(dislikes.iter().map(|s| s.to_string()).collect()),
        diet: Some(diet.to_string()),
    }
}

/// A small vegetarian-friendly catalog
pub fn sample_recipes() -> Vec<Recipe> {
    vec![
        recipe(1, "Tomato Pasta", &["Pasta", "Tomato", "Basil"], "Italian", 20, "Vegetarian"),
        recipe(2, "Peanut Noodles", &["noodles", "peanuts"], "Thai", 15, "vegetarian"),
        recipe(3, "Quick Salad", &["lettuce", "tomato"], "Greek", 5, "vegetarian"),
        recipe(4, "Beef Stew", &["beef", "carrot"], "Irish", 120, "regular"),
    ]
}

pub fn test_server(catalog: InMemoryCatalog, model: ModelHandle) -> TestServer {
    let state = Arc::new(AppState::new(Arc::new(catalog), model));
    TestServer::new(create_router(state)).unwrap()
}

pub fn ready_model(model: impl ScoringModel + 'static) -> ModelHandle {
    ModelHandle::ready(Arc::new(model))
}
