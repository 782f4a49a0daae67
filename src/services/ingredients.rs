/// Ingredient field normalization
///
/// Recipes arrive with their ingredients either as a real list or as text. The
/// text form is whatever the catalog happened to store: a JSON array, a
/// Python-style list with single quotes, or a plain comma-separated string.
/// Everything downstream consumes the `Vec<String>` produced here.
use serde::{Deserialize, Deserializer};

/// Raw ingredient field as read from the catalog
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawIngredients {
    List(Vec<String>),
    Text(String),
}

/// Converts a raw ingredient field into an ordered list of ingredient names.
///
/// Lists pass through untouched. Text is parsed as a bracketed list literal
/// when it looks like one, otherwise split on commas. Never fails.
pub fn normalize(raw: Option<RawIngredients>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(RawIngredients::List(items)) => items,
        Some(RawIngredients::Text(text)) => normalize_text(&text),
    }
}

fn normalize_text(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if text.starts_with('[') {
        if let Some(items) = parse_json_array(text).or_else(|| parse_list_literal(text)) {
            return clean(items);
        }
        tracing::debug!(raw = %text, "Ingredient list literal did not parse, splitting on commas");
    }

    clean(text.split(',').map(str::to_string))
}

fn clean(items: impl IntoIterator<Item = String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_json_array(text: &str) -> Option<Vec<String>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(text).ok()?;
    Some(
        values
            .into_iter()
            .map(|value| match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
    )
}

/// Parses `['a', "b's", 'c']`. Either quote style, backslash escapes, and a
/// trailing comma are accepted; anything else rejects the whole literal.
fn parse_list_literal(text: &str) -> Option<Vec<String>> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    let mut chars = inner.chars().peekable();
    let mut items = Vec::new();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let quote = match chars.next() {
            None => break,
            Some(q @ ('\'' | '"')) => q,
            Some(_) => return None,
        };

        let mut item = String::new();
        loop {
            match chars.next()? {
                '\\' => item.push(chars.next()?),
                c if c == quote => break,
                c => item.push(c),
            }
        }
        items.push(item);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return None,
        }
    }

    Some(items)
}

/// Case-folds a term for comparison: trimmed and lowercased.
pub fn fold(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Serde adapter so recipes are normalized as they are read.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawIngredients>::deserialize(deserializer)?;
    Ok(normalize(raw))
}
