//! Collection detection by registry key mentions

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::Collection;

/// One whole-word pattern per collection: key, key + "s", singular form
///
/// Underscored keys also accept a space (`chat lists`).
static MENTIONS: LazyLock<Vec<(Collection, Regex)>> = LazyLock::new(|| {
    Collection::ALL
        .into_iter()
        .map(|collection| {
            let forms = [
                collection.name().to_string(),
                format!("{}s", collection.name()),
                collection.singular().to_string(),
            ]
            .map(|form| regex::escape(&form).replace('_', "[_ ]"));
            let pattern = format!(r"\b(?:{})\b", forms.join("|"));
            (collection, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// First collection mentioned, in registry order, else `default`
pub fn detect_collection(text: &str, default: Collection) -> Collection {
    let lowered = text.to_lowercase();
    MENTIONS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&lowered))
        .map(|(collection, _)| *collection)
        .unwrap_or(default)
}
