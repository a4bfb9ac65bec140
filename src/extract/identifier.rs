//! Record identifier extraction

use std::sync::LazyLock;

use regex::Regex;

/// Tried in order against the lowercased text; first hit wins
static ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\b(?:id|_id)\s*(?:is\s+|[:=]\s*)?([0-9a-f]{24})\b").unwrap(),
        Regex::new(r"\bwith\s+id\s+([0-9a-f]{24})\b").unwrap(),
        Regex::new(r"\b([0-9a-f]{24})\b").unwrap(),
    ]
});

/// A 24-hex identifier mentioned in the text, lowercased
pub fn extract_identifier(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();
    ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(&lowered)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}
