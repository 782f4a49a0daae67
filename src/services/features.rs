use std::collections::BTreeSet;

use crate::models::{recipe::DEFAULT_COOK_TIME_MINUTES, FeatureVector, Recipe, UserProfile};

use super::ingredients::fold;

/// Computes the model input for a (user, recipe) pair.
///
/// Missing cook times fall back to 30 minutes for the recipe and 60 for the
/// user's ceiling. `cuisine_similarity` compares against the user's literal
/// cuisine terms; category expansion is a filter-only concern.
pub fn extract(profile: &UserProfile, recipe: &Recipe) -> FeatureVector {
    let max_cooking_time = f64::from(profile.effective_max_cooking_time());
    let recipe_cook_time = f64::from(recipe.cook_time_minutes.unwrap_or(DEFAULT_COOK_TIME_MINUTES));

    FeatureVector {
        max_cooking_time,
        recipe_cook_time,
        cook_time_diff: (recipe_cook_time - max_cooking_time).abs(),
        ingredient_overlap_ratio: overlap_ratio(profile, recipe),
        cuisine_similarity: cuisine_similarity(profile, recipe),
    }
}

/// Share of the recipe's distinct ingredients that are neither allergens nor dislikes
fn overlap_ratio(profile: &UserProfile, recipe: &Recipe) -> f64 {
    let ingredients: BTreeSet<String> = recipe.ingredients_list.iter().map(|i| fold(i)).collect();
    if ingredients.is_empty() {
        return 0.0;
    }

    let usable = ingredients
        .iter()
        .filter(|i| !profile.allergies.contains(*i) && !profile.disliked_ingredients.contains(*i))
        .count();

    usable as f64 / ingredients.len() as f64
}

fn cuisine_similarity(profile: &UserProfile, recipe: &Recipe) -> f64 {
    let Some(recipe_cuisine) = recipe.cuisine.as_deref().map(fold) else {
        return 0.0;
    };

    if profile.literal_cuisines().contains(&recipe_cuisine) {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn recipe(ingredients: &[&str], cuisine: Option<&str>, cook_time: Option<i32>) -> Recipe {
        Recipe {
            id: 1,
            recipe_name: "Test".to_string(),
            ingredients_list: ingredients.iter().map(|s| s.to_string()).collect(),
            cuisine: cuisine.map(str::to_string),
            cook_time_minutes: cook_time,
            diet: None,
            rating: None,
            timing: None,
            calories: None,
            servings: None,
            url: None,
            img_src: None,
            directions: None,
        }
    }

    #[test]
    fn test_cook_time_fields() {
        let profile = UserProfile::new(Uuid::new_v4()).with_max_cooking_time(Some(60));
        let features = extract(&profile, &recipe(&["egg"], None, Some(63)));

        assert_eq!(features.max_cooking_time, 60.0);
        assert_eq!(features.recipe_cook_time, 63.0);
        assert_eq!(features.cook_time_diff, 3.0);
    }

    #[test]
    fn test_cook_time_defaults() {
        let profile = UserProfile::new(Uuid::new_v4());
        let features = extract(&profile, &recipe(&["egg"], None, None));

        assert_eq!(features.max_cooking_time, 60.0);
        assert_eq!(features.recipe_cook_time, 30.0);
        assert_eq!(features.cook_time_diff, 30.0);
    }

    #[test]
    fn test_overlap_ratio_excludes_allergens_and_dislikes() {
        let profile = UserProfile::new(Uuid::new_v4())
            .with_allergies(["milk"])
            .with_dislikes(["onion"]);
        let features = extract(&profile, &recipe(&["Milk", "onion", "flour", "egg"], None, None));

        assert_eq!(features.ingredient_overlap_ratio, 0.5);
    }

    #[test]
    fn test_overlap_ratio_counts_distinct_ingredients() {
        let profile = UserProfile::new(Uuid::new_v4()).with_allergies(["milk"]);
        let features = extract(&profile, &recipe(&["Milk", "milk", "flour"], None, None));

        assert_eq!(features.ingredient_overlap_ratio, 0.5);
    }

    #[test]
    fn test_overlap_ratio_zero_for_empty_ingredients() {
        let unrestricted = UserProfile::new(Uuid::new_v4());
        let restricted = UserProfile::new(Uuid::new_v4()).with_allergies(["egg"]);

        for profile in [unrestricted, restricted] {
            let features = extract(&profile, &recipe(&[], Some("French"), None));
            assert_eq!(features.ingredient_overlap_ratio, 0.0);
        }
    }

    #[test]
    fn test_overlap_ratio_full_when_unrestricted() {
        let profile = UserProfile::new(Uuid::new_v4());
        let features = extract(&profile, &recipe(&["a", "b", "c"], None, None));
        assert_eq!(features.ingredient_overlap_ratio, 1.0);
    }

    #[test]
    fn test_cuisine_similarity_literal_match() {
        let profile = UserProfile::new(Uuid::new_v4())
            .with_preferred_cuisines(vec!["Italian".to_string()]);

        let features = extract(&profile, &recipe(&["pasta"], Some(" italian "), None));
        assert_eq!(features.cuisine_similarity, 1.0);
    }

    #[test]
    fn test_cuisine_similarity_ignores_category_expansion() {
        let profile = UserProfile::new(Uuid::new_v4())
            .with_preferred_cuisines(vec!["mediterranean".to_string()]);

        let features = extract(&profile, &recipe(&["feta"], Some("Greek"), None));
        assert_eq!(features.cuisine_similarity, 0.0);
    }

    #[test]
    fn test_cuisine_similarity_without_preferences() {
        let profile = UserProfile::new(Uuid::new_v4());
        let features = extract(&profile, &recipe(&["feta"], Some("Greek"), None));
        assert_eq!(features.cuisine_similarity, 0.0);
    }
}
