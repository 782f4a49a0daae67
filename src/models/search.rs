use crate::services::ingredients::fold;

/// Free-text ingredient search attached to a recommendation request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    /// Folds the terms, dropping blanks and repeats while keeping first-seen order
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for term in terms {
            let term = fold(term.as_ref());
            if !term.is_empty() && !normalized.contains(&term) {
                normalized.push(term);
            }
        }
        Self { terms: normalized }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_active(&self) -> bool {
        !self.terms.is_empty()
    }

    /// Search terms found as a substring of at least one ingredient.
    ///
    /// `ingredients` must already be case-folded.
    pub fn matched_terms<'a>(&'a self, ingredients: &[String]) -> Vec<&'a str> {
        self.terms
            .iter()
            .filter(|term| ingredients.iter().any(|ing| ing.contains(term.as_str())))
            .map(String::as_str)
            .collect()
    }
}
