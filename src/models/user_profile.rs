use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::ingredients::fold;

/// Diet label meaning "no restriction"
pub const NO_DIET_RESTRICTION: &str = "regular";

/// Cooking time ceiling assumed when the user gives none
pub const DEFAULT_MAX_COOKING_TIME: u32 = 60;

/// Profile fields persisted with the user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct StoredProfile {
    pub id: Uuid,
    pub allergies: Option<Vec<String>>,
    pub disliked_ingredients: Option<Vec<String>>,
    pub diet: Option<String>,
}

/// Everything the recommendation pipeline knows about the requesting user.
///
/// Allergy, dislike and diet terms are stored case-folded; preferred
/// cuisines are kept as declared.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub allergies: BTreeSet<String>,
    pub disliked_ingredients: BTreeSet<String>,
    pub diet: String,
    pub preferred_cuisines: Vec<String>,
    pub max_cooking_time: Option<u32>,
}

fn fold_terms<I, S>(terms: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| fold(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}

impl UserProfile {
    /// Creates an unrestricted profile
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            allergies: BTreeSet::new(),
            disliked_ingredients: BTreeSet::new(),
            diet: NO_DIET_RESTRICTION.to_string(),
            preferred_cuisines: Vec::new(),
            max_cooking_time: None,
        }
    }

    /// Builds a profile from the stored account fields
    pub fn from_stored(stored: StoredProfile) -> Self {
        Self::new(stored.id)
            .with_allergies(stored.allergies.unwrap_or_default())
            .with_dislikes(stored.disliked_ingredients.unwrap_or_default())
            .with_diet(stored.diet.as_deref())
    }

    pub fn with_allergies<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allergies = fold_terms(terms);
        self
    }

    pub fn with_dislikes<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.disliked_ingredients = fold_terms(terms);
        self
    }

    /// Sets the diet label; blank or absent means no restriction
    pub fn with_diet(mut self, diet: Option<&str>) -> Self {
        self.diet = diet
            .map(fold)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| NO_DIET_RESTRICTION.to_string());
        self
    }

    pub fn with_preferred_cuisines(mut self, cuisines: Vec<String>) -> Self {
        self.preferred_cuisines = cuisines;
        self
    }

    pub fn with_max_cooking_time(mut self, minutes: Option<u32>) -> Self {
        self.max_cooking_time = minutes;
        self
    }

    pub fn has_diet_restriction(&self) -> bool {
        self.diet != NO_DIET_RESTRICTION
    }

    /// Declared cuisines, case-folded, without category expansion
    pub fn literal_cuisines(&self) -> BTreeSet<String> {
        fold_terms(&self.preferred_cuisines)
    }

    /// Cooking time ceiling with the default applied
    pub fn effective_max_cooking_time(&self) -> u32 {
        self.max_cooking_time.unwrap_or(DEFAULT_MAX_COOKING_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_is_unrestricted() {
        let profile = UserProfile::new(Uuid::new_v4());
        assert!(profile.allergies.is_empty());
        assert!(!profile.has_diet_restriction());
        assert_eq!(profile.effective_max_cooking_time(), 60);
    }

    #[test]
    fn test_terms_are_folded_and_deduplicated() {
        let profile =
            UserProfile::new(Uuid::new_v4()).with_allergies(["Peanuts", " peanuts ", "", "Shellfish"]);
        assert_eq!(
            profile.allergies.iter().collect::<Vec<_>>(),
            vec!["peanuts", "shellfish"]
        );
    }

    #[test]
    fn test_blank_diet_means_regular() {
        let profile = UserProfile::new(Uuid::new_v4()).with_diet(Some("  "));
        assert_eq!(profile.diet, NO_DIET_RESTRICTION);

        let vegan = UserProfile::new(Uuid::new_v4()).with_diet(Some("Vegan"));
        assert_eq!(vegan.diet, "vegan");
        assert!(vegan.has_diet_restriction());
    }

    #[test]
    fn test_from_stored() {
        let id = Uuid::new_v4();
        let profile = UserProfile::from_stored(StoredProfile {
            id,
            allergies: Some(vec!["Milk".to_string()]),
            disliked_ingredients: None,
            diet: None,
        });

        assert_eq!(profile.user_id, id);
        assert!(profile.allergies.contains("milk"));
        assert!(profile.disliked_ingredients.is_empty());
        assert_eq!(profile.diet, NO_DIET_RESTRICTION);
    }

    #[test]
    fn test_literal_cuisines() {
        let profile = UserProfile::new(Uuid::new_v4())
            .with_preferred_cuisines(vec![" Greek ".to_string(), "".to_string()]);
        assert_eq!(
            profile.literal_cuisines().into_iter().collect::<Vec<_>>(),
            vec!["greek"]
        );
    }
}
