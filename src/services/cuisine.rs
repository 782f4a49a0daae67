use std::collections::BTreeSet;

use super::ingredients::fold;

/// Coarse cuisine categories and the concrete cuisine labels they cover.
///
/// Each category also lists itself so a recipe tagged with the category name
/// matches a preference for that category.
const CUISINE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "mediterranean",
        &[
            "mediterranean",
            "greek",
            "italian",
            "spanish",
            "turkish",
            "lebanese",
            "moroccan",
            "middle eastern",
        ],
    ),
    (
        "asian",
        &[
            "asian",
            "chinese",
            "japanese",
            "korean",
            "thai",
            "vietnamese",
            "indian",
            "filipino",
            "indonesian",
        ],
    ),
    (
        "european",
        &[
            "european",
            "french",
            "german",
            "british",
            "irish",
            "italian",
            "spanish",
            "greek",
            "polish",
            "scandinavian",
        ],
    ),
    (
        "latin american",
        &[
            "latin american",
            "mexican",
            "brazilian",
            "peruvian",
            "argentinian",
            "cuban",
            "caribbean",
        ],
    ),
    (
        "american",
        &["american", "southern", "cajun", "tex-mex", "soul food"],
    ),
];

/// Concrete cuisines covered by a category, if the term names one.
pub fn category_members(term: &str) -> Option<&'static [&'static str]> {
    let term = fold(term);
    CUISINE_CATEGORIES
        .iter()
        .find(|(category, _)| *category == term)
        .map(|(_, members)| *members)
}

/// Expands preferred cuisine terms into the set of acceptable cuisine labels.
///
/// Categories expand to their members; any other term is kept as a literal
/// cuisine. Blank terms are dropped.
pub fn expand_preferences<'a>(preferred: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    let mut expanded = BTreeSet::new();

    for term in preferred {
        let folded = fold(term);
        if folded.is_empty() {
            continue;
        }

        match category_members(&folded) {
            Some(members) => expanded.extend(members.iter().map(|m| m.to_string())),
            None => {
                expanded.insert(folded);
            }
        }
    }

    expanded
}
