//! Action detection by ordered keyword sets

use std::sync::LazyLock;

use regex::Regex;

use crate::command::Action;

/// What a keyword set resolves to when it fires
#[derive(Clone, Copy)]
enum Outcome {
    Fixed(Action),
    /// `get_all` when the word "all" is present, else `get_one`
    ReadOneOrAll,
}

/// Read verbs with their inflections
const READ_VERBS: &str = r"(?:get(?:s|ting)?|find(?:s|ing)?|show(?:s|ing|n)?|fetch(?:es|ed|ing)?)";

/// Keyword sets in priority order; first hit wins
///
/// "update all" must be tested before plain "update". Verbs match with their
/// inflected forms, but only as whole words: "settings" and "address" are
/// not "set" and "add".
static KEYWORD_SETS: LazyLock<Vec<(Regex, Outcome)>> = LazyLock::new(|| {
    let sets: [(String, Outcome); 6] = [
        (
            r"\b(?:add(?:s|ed|ing)?|creat(?:e|es|ed|ing)|insert(?:s|ed|ing)?|new|register(?:s|ed|ing)?)\b"
                .to_string(),
            Outcome::Fixed(Action::Insert),
        ),
        (
            r"\b(?:replac(?:e|es|ed|ing)|overwrit(?:e|es|ing|ten)|overwrote|updat(?:e|es|ed|ing)\s+all)\b"
                .to_string(),
            Outcome::Fixed(Action::Update),
        ),
        (
            r"\b(?:updat(?:e|es|ed|ing)|modif(?:y|ies|ied|ying)|chang(?:e|es|ed|ing)|edit(?:s|ed|ing)?|patch(?:es|ed|ing)?|set)\b"
                .to_string(),
            Outcome::Fixed(Action::Patch),
        ),
        (
            r"\b(?:delet(?:e|es|ed|ing)|remov(?:e|es|ed|ing)|destroy(?:s|ed|ing)?|drop(?:s|ped|ping)?)\b"
                .to_string(),
            Outcome::Fixed(Action::Delete),
        ),
        (
            format!(r"\b(?:list(?:s|ed|ing)?|{READ_VERBS}\s+all)\b"),
            Outcome::Fixed(Action::GetAll),
        ),
        (format!(r"\b{READ_VERBS}\b"), Outcome::ReadOneOrAll),
    ];
    sets.into_iter()
        .map(|(pattern, outcome)| (Regex::new(&pattern).unwrap(), outcome))
        .collect()
});

static ALL_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\ball\b").unwrap());

/// Classify the request; `get_all` when no keyword matches
pub fn detect_action(text: &str) -> Action {
    let lowered = text.to_lowercase();

    for (pattern, outcome) in KEYWORD_SETS.iter() {
        if !pattern.is_match(&lowered) {
            continue;
        }
        return match outcome {
            Outcome::Fixed(action) => *action,
            Outcome::ReadOneOrAll if ALL_WORD.is_match(&lowered) => Action::GetAll,
            Outcome::ReadOneOrAll => Action::GetOne,
        };
    }

    Action::GetAll
}
