use crate::models::{ScoredRecipe, SearchQuery};

/// Scored recipes in presentation order with the counts clients display
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub recipes: Vec<ScoredRecipe>,
    pub total_candidates: usize,
    pub total_scored: usize,
    /// Normalized search terms, when an ingredient search was active
    pub search_terms: Option<Vec<String>>,
}

/// Orders recipes by score, highest first.
///
/// The sort is stable, so equal scores keep candidate (catalog) order.
pub fn rank(mut scored: Vec<ScoredRecipe>, total_candidates: usize, query: &SearchQuery) -> Ranking {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    Ranking {
        total_scored: scored.len(),
        recipes: scored,
        total_candidates,
        search_terms: query.is_active().then(|| query.terms().to_vec()),
    }
}
