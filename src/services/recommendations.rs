use crate::models::{
    EmptyReason, Recipe, RecipeResponse, RecommendationResponse, ScoredRecipe, SearchQuery,
    UserProfile,
};

use super::{
    features, filter,
    model::ScoringModel,
    ranker::{self, Ranking},
    scorer,
};

/// Result of one recommendation run
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    pub ranking: Ranking,
    /// Recipes whose model call failed and were scored from a base of 0.0
    pub scoring_failures: usize,
    /// Set when nothing survived filtering
    pub empty_reason: Option<EmptyReason>,
}

/// Generates personalized recipe recommendations
///
/// Filters the catalog down to recipes the user can eat, scores each
/// candidate with the model plus heuristic boosts, and ranks them. Candidates
/// are scored one after another; a model failure only zeroes that recipe's
/// base score.
pub async fn recommend(
    profile: &UserProfile,
    query: &SearchQuery,
    catalog: &[Recipe],
    model: &dyn ScoringModel,
) -> Recommendations {
    if catalog.is_empty() {
        tracing::warn!(user_id = %profile.user_id, "Recipe catalog is empty");
        return empty(query, EmptyReason::EmptyCatalog);
    }

    let candidates = filter::filter(profile, query, catalog);

    if candidates.is_empty() {
        let reason = empty_reason(profile, query, catalog);
        tracing::info!(
            user_id = %profile.user_id,
            catalog = catalog.len(),
            reason = ?reason,
            "No candidate recipes survived filtering"
        );
        return empty(query, reason);
    }

    let total_candidates = candidates.len();
    let mut scored = Vec::with_capacity(total_candidates);
    let mut scoring_failures = 0;

    for recipe in candidates {
        let features = features::extract(profile, recipe);
        let outcome = scorer::score(profile, query, recipe, &features, model).await;

        if outcome.failure.is_some() {
            scoring_failures += 1;
        }

        scored.push(ScoredRecipe {
            recipe: recipe.clone(),
            score: outcome.breakdown.final_score,
        });
    }

    if scoring_failures > 0 {
        tracing::warn!(
            user_id = %profile.user_id,
            failures = scoring_failures,
            scored = scored.len(),
            model = model.name(),
            "Partial model scoring failure"
        );
    }

    let ranking = ranker::rank(scored, total_candidates, query);

    tracing::info!(
        user_id = %profile.user_id,
        catalog = catalog.len(),
        candidates = ranking.total_candidates,
        scored = ranking.total_scored,
        search_active = query.is_active(),
        "Recommendations ranked"
    );

    Recommendations {
        ranking,
        scoring_failures,
        empty_reason: None,
    }
}

/// Blames the ingredient search only when the other rules alone would have
/// left candidates.
fn empty_reason(profile: &UserProfile, query: &SearchQuery, catalog: &[Recipe]) -> EmptyReason {
    if query.is_active() && !filter::filter(profile, &SearchQuery::default(), catalog).is_empty() {
        EmptyReason::NoSearchMatch
    } else {
        EmptyReason::PreferenceMismatch
    }
}

fn empty(query: &SearchQuery, reason: EmptyReason) -> Recommendations {
    Recommendations {
        ranking: ranker::rank(Vec::new(), 0, query),
        scoring_failures: 0,
        empty_reason: Some(reason),
    }
}

impl Recommendations {
    pub fn into_response(self) -> RecommendationResponse {
        let message = self.empty_reason.map(|reason| {
            reason.message(self.ranking.search_terms.as_deref().unwrap_or_default())
        });

        RecommendationResponse {
            recipes: self
                .ranking
                .recipes
                .iter()
                .map(|scored| RecipeResponse::scored(&scored.recipe, scored.score))
                .collect(),
            total_candidates: self.ranking.total_candidates,
            total_scored: self.ranking.total_scored,
            scoring_failures: self.scoring_failures,
            search_ingredients: self.ranking.search_terms,
            message,
            empty_reason: self.empty_reason,
        }
    }
}
