use std::collections::{BTreeMap, BTreeSet};

use crate::models::{user_profile::NO_DIET_RESTRICTION, Recipe, SearchQuery, UserProfile};

use super::{cuisine, ingredients::fold};

/// The hard rule that removed a recipe from the candidate set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Exclusion {
    Allergy,
    Dislike,
    Diet,
    Cuisine,
    IngredientSearch,
}

/// Narrows the catalog to recipes the user can and wants to eat.
///
/// All rules are conjunctive; the surviving recipes keep catalog order.
pub fn filter<'a>(
    profile: &UserProfile,
    query: &SearchQuery,
    catalog: &'a [Recipe],
) -> Vec<&'a Recipe> {
    let allowed_cuisines = cuisine::expand_preferences(&profile.preferred_cuisines);
    let mut excluded: BTreeMap<Exclusion, usize> = BTreeMap::new();

    let candidates: Vec<&Recipe> = catalog
        .iter()
        .filter(|recipe| match exclusion(profile, query, &allowed_cuisines, recipe) {
            Some(reason) => {
                *excluded.entry(reason).or_default() += 1;
                false
            }
            None => true,
        })
        .collect();

    tracing::debug!(
        user_id = %profile.user_id,
        catalog = catalog.len(),
        candidates = candidates.len(),
        excluded = ?excluded,
        "Candidate filter applied"
    );

    candidates
}

/// First hard rule the recipe fails, if any
pub fn exclusion(
    profile: &UserProfile,
    query: &SearchQuery,
    allowed_cuisines: &BTreeSet<String>,
    recipe: &Recipe,
) -> Option<Exclusion> {
    let ingredients: Vec<String> = recipe.ingredients_list.iter().map(|i| fold(i)).collect();

    if ingredients.iter().any(|i| profile.allergies.contains(i)) {
        return Some(Exclusion::Allergy);
    }

    if ingredients
        .iter()
        .any(|i| profile.disliked_ingredients.contains(i))
    {
        return Some(Exclusion::Dislike);
    }

    if profile.has_diet_restriction() {
        let recipe_diet = recipe
            .diet
            .as_deref()
            .map(fold)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| NO_DIET_RESTRICTION.to_string());
        if recipe_diet != profile.diet {
            return Some(Exclusion::Diet);
        }
    }

    if !allowed_cuisines.is_empty() {
        let recipe_cuisine = recipe.cuisine.as_deref().map(fold).unwrap_or_default();
        if !allowed_cuisines.contains(&recipe_cuisine) {
            return Some(Exclusion::Cuisine);
        }
    }

    if query.is_active() && query.matched_terms(&ingredients).is_empty() {
        return Some(Exclusion::IngredientSearch);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn recipe(id: i64, ingredients: &[&str], cuisine: &str, diet: Option<&str>) -> Recipe {
        Recipe {
            id,
            recipe_name: format!("Recipe {id}"),
            ingredients_list: ingredients.iter().map(|s| s.to_string()).collect(),
            cuisine: Some(cuisine.to_string()),
            cook_time_minutes: Some(30),
            diet: diet.map(str::to_string),
            rating: Some(4.5),
            timing: None,
            calories: None,
            servings: None,
            url: None,
            img_src: None,
            directions: None,
        }
    }

    fn ids(recipes: &[&Recipe]) -> Vec<i64> {
        recipes.iter().map(|r| r.id).collect()
    }

    fn profile() -> UserProfile {
        UserProfile::new(Uuid::new_v4())
    }

    #[test]
    fn test_allergy_excludes_recipe() {
        let catalog = vec![recipe(1, &["Peanuts", "noodles"], "Thai", None)];
        let profile = profile().with_allergies(["peanuts"]);

        assert!(filter(&profile, &SearchQuery::default(), &catalog).is_empty());
    }

    #[test]
    fn test_allergy_match_is_exact_term() {
        let catalog = vec![recipe(1, &["peanut butter"], "American", None)];
        let profile = profile().with_allergies(["peanuts"]);

        assert_eq!(
            ids(&filter(&profile, &SearchQuery::default(), &catalog)),
            vec![1]
        );
    }

    #[test]
    fn test_dislike_excludes_recipe() {
        let catalog = vec![
            recipe(1, &["cilantro", "lime"], "Mexican", None),
            recipe(2, &["basil"], "Italian", None),
        ];
        let profile = profile().with_dislikes(["Cilantro"]);

        assert_eq!(
            ids(&filter(&profile, &SearchQuery::default(), &catalog)),
            vec![2]
        );
    }

    #[test]
    fn test_diet_restriction() {
        let catalog = vec![
            recipe(1, &["tofu"], "Chinese", Some("Vegan")),
            recipe(2, &["beef"], "Chinese", Some("regular")),
            recipe(3, &["rice"], "Chinese", None),
        ];
        let vegan = profile().with_diet(Some("vegan"));
        assert_eq!(ids(&filter(&vegan, &SearchQuery::default(), &catalog)), vec![1]);

        let regular = profile().with_diet(Some("regular"));
        assert_eq!(
            ids(&filter(&regular, &SearchQuery::default(), &catalog)),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_cuisine_category_expansion() {
        let catalog = vec![
            recipe(1, &["feta"], "Greek", None),
            recipe(2, &["tortilla"], "Mexican", None),
            recipe(3, &["pasta"], "italian", None),
        ];
        let profile = profile().with_preferred_cuisines(vec!["Mediterranean".to_string()]);

        assert_eq!(
            ids(&filter(&profile, &SearchQuery::default(), &catalog)),
            vec![1, 3]
        );
    }

    #[test]
    fn test_literal_cuisine_preference() {
        let catalog = vec![
            recipe(1, &["injera"], "Ethiopian", None),
            recipe(2, &["pasta"], "Italian", None),
        ];
        let profile = profile().with_preferred_cuisines(vec!["ethiopian".to_string()]);

        assert_eq!(
            ids(&filter(&profile, &SearchQuery::default(), &catalog)),
            vec![1]
        );
    }

    #[test]
    fn test_search_substring_match() {
        let catalog = vec![
            recipe(1, &["Chicken Breast", "rice"], "American", None),
            recipe(2, &["tofu"], "Chinese", None),
        ];
        let query = SearchQuery::new(["chicken"]);

        assert_eq!(ids(&filter(&profile(), &query, &catalog)), vec![1]);
    }

    #[test]
    fn test_preserves_catalog_order() {
        let catalog: Vec<Recipe> = (1..=5)
            .map(|id| recipe(id, &["salt"], "French", None))
            .collect();

        assert_eq!(
            ids(&filter(&profile(), &SearchQuery::default(), &catalog)),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_first_failing_rule_reported() {
        let profile = profile()
            .with_allergies(["shrimp"])
            .with_dislikes(["shrimp"]);
        let shrimp = recipe(1, &["shrimp"], "Thai", None);

        assert_eq!(
            exclusion(&profile, &SearchQuery::default(), &BTreeSet::new(), &shrimp),
            Some(Exclusion::Allergy)
        );
    }

    #[test]
    fn test_recipe_without_cuisine_fails_cuisine_preference() {
        let mut bare = recipe(1, &["bread"], "", None);
        bare.cuisine = None;
        let profile = profile().with_preferred_cuisines(vec!["french".to_string()]);

        assert!(filter(&profile, &SearchQuery::default(), &[bare]).is_empty());
    }
}
