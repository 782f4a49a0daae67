use crate::models::{FeatureVector, Recipe, SearchQuery, UserProfile};

use super::{
    ingredients::fold,
    model::{ScoringError, ScoringModel},
};

/// Added per search term found in the recipe's ingredients
pub const INGREDIENT_MATCH_BOOST: f64 = 0.2;

/// Added when the recipe's cuisine is one the user named literally
pub const CUISINE_PREFERENCE_BOOST: f64 = 0.1;

/// Cook-time closeness tiers: (max distance in minutes, boost). First match wins.
const COOK_TIME_TIERS: &[(f64, f64)] = &[(5.0, 0.15), (15.0, 0.10), (30.0, 0.05)];

pub const MAX_SCORE: f64 = 1.0;

/// How a final score was put together
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub ingredient_boost: f64,
    pub cook_time_boost: f64,
    pub cuisine_boost: f64,
    pub final_score: f64,
}

/// Score for one recipe, with the model failure that zeroed its base if any
#[derive(Debug)]
pub struct ScoreOutcome {
    pub breakdown: ScoreBreakdown,
    pub failure: Option<ScoringError>,
}

/// Scores one candidate.
///
/// A failed or non-finite model prediction counts as a base score of `0.0`
/// for this recipe only; the failure is returned alongside the score instead
/// of being propagated.
pub async fn score(
    profile: &UserProfile,
    query: &SearchQuery,
    recipe: &Recipe,
    features: &FeatureVector,
    model: &dyn ScoringModel,
) -> ScoreOutcome {
    let prediction = model.predict(features).await.and_then(|base| {
        if base.is_finite() {
            Ok(base)
        } else {
            Err(ScoringError::NonFinite(base))
        }
    });

    let (base, failure) = fold_base_score(prediction);
    if let Some(error) = &failure {
        tracing::warn!(
            recipe_id = recipe.id,
            model = model.name(),
            error = %error,
            "Model scoring failed, using base score 0.0"
        );
    }

    let breakdown = apply_boosts(base, profile, query, recipe, features);

    tracing::debug!(
        recipe_id = recipe.id,
        base = breakdown.base,
        ingredient_boost = breakdown.ingredient_boost,
        cook_time_boost = breakdown.cook_time_boost,
        cuisine_boost = breakdown.cuisine_boost,
        final_score = breakdown.final_score,
        "Recipe scored"
    );

    ScoreOutcome { breakdown, failure }
}

/// Maps a model result to a usable base score
pub fn fold_base_score(prediction: Result<f64, ScoringError>) -> (f64, Option<ScoringError>) {
    match prediction {
        Ok(base) => (base, None),
        Err(error) => (0.0, Some(error)),
    }
}

/// Adds the heuristic boosts to `base` and clamps the result to `[0.0, 1.0]`
pub fn apply_boosts(
    base: f64,
    profile: &UserProfile,
    query: &SearchQuery,
    recipe: &Recipe,
    features: &FeatureVector,
) -> ScoreBreakdown {
    let ingredient_boost = if query.is_active() {
        let ingredients: Vec<String> = recipe.ingredients_list.iter().map(|i| fold(i)).collect();
        INGREDIENT_MATCH_BOOST * query.matched_terms(&ingredients).len() as f64
    } else {
        0.0
    };

    let cook_time_boost = cook_time_boost(features.cook_time_diff);

    let cuisine_boost = match recipe.cuisine.as_deref() {
        Some(cuisine) if profile.literal_cuisines().contains(&fold(cuisine)) => {
            CUISINE_PREFERENCE_BOOST
        }
        _ => 0.0,
    };

    let boosted = base + ingredient_boost + cook_time_boost + cuisine_boost;

    ScoreBreakdown {
        base,
        ingredient_boost,
        cook_time_boost,
        cuisine_boost,
        final_score: boosted.clamp(0.0, MAX_SCORE),
    }
}

/// Boost for how close the recipe's cook time is to the user's ceiling
pub fn cook_time_boost(diff_minutes: f64) -> f64 {
    COOK_TIME_TIERS
        .iter()
        .find(|(limit, _)| diff_minutes <= *limit)
        .map(|(_, boost)| *boost)
        .unwrap_or(0.0)
}
