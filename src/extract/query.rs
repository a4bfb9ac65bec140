//! Query-filter extraction for reads and targeted writes

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::fields::read_value;
use super::RESERVED_WORDS;
use crate::filter::{Filter, Predicate};
use crate::value::{ObjectId, Value, ID_FIELD};

static EMAIL_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap()
});

/// `name is X`, `named X`, `called X`; group 1 marks `name to|as X`, which is a change
static NAME_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:name|named|called)\b(?:\s+(to|as)\s+|\s+is\s+|\s*[=:]\s*|\s+)").unwrap()
});

static STATUS_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bstatus\b(?:\s+(?:is|to)\s+|\s*[=:]\s*|\s+)([a-zA-Z]+)").unwrap()
});

static ID_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:id|_id)\s*(?:is\s+|[=:]\s*)?([a-f0-9]{24})\b").unwrap()
});

static ENTITY_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:user|contact|customer|employee)s?\s+([A-Za-z0-9_]+)").unwrap()
});

/// One predicate and the text it was read from
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Criterion {
    pub field: &'static str,
    pub predicate: Predicate,
    pub span: Range<usize>,
}

/// Filter predicates mentioned in the text
pub fn extract_filter(text: &str) -> Filter {
    let mut filter = Filter::new();
    for criterion in scan_criteria(text) {
        filter.set(criterion.field, criterion.predicate);
    }
    filter
}

pub(crate) fn scan_criteria(text: &str) -> Vec<Criterion> {
    let mut criteria = Vec::new();

    if let Some(m) = EMAIL_TOKEN.find(text) {
        criteria.push(Criterion {
            field: "email",
            predicate: Predicate::Eq(Value::from(m.as_str())),
            span: m.range(),
        });
    }

    let named = NAME_PHRASE
        .captures_iter(text)
        .filter(|caps| caps.get(1).is_none())
        .filter_map(|caps| caps.get(0))
        .map(|m| read_value(text, m.end()).0)
        .find(|span| !span.is_empty());
    match named {
        Some(span) => criteria.push(name_criterion(text, span)),
        None => criteria.extend(entity_criterion(text)),
    }

    if let Some(m) = STATUS_PHRASE.captures(text).and_then(|c| c.get(1)) {
        criteria.push(Criterion {
            field: "status",
            predicate: Predicate::Eq(Value::from(m.as_str())),
            span: m.range(),
        });
    }

    if let Some(m) = ID_PHRASE.captures(text).and_then(|c| c.get(1)) {
        if let Ok(id) = ObjectId::parse_str(m.as_str()) {
            criteria.push(Criterion {
                field: ID_FIELD,
                predicate: Predicate::Eq(Value::ObjectId(id)),
                span: m.range(),
            });
        }
    }

    criteria
}

/// Name criterion from an entity reference alone
pub(crate) fn entity_criterion(text: &str) -> Option<Criterion> {
    entity_reference(text).map(|span| name_criterion(text, span))
}

fn name_criterion(text: &str, span: Range<usize>) -> Criterion {
    let name = text[span.clone()].trim_matches(|c| c == '"' || c == '\'');
    Criterion {
        field: "name",
        predicate: Predicate::contains_ignore_case(name),
        span,
    }
}

/// `user John`, `contact Nisha`: the word after an entity noun
///
/// Connector words, identifiers and the local part of an email address are
/// not names.
fn entity_reference(text: &str) -> Option<Range<usize>> {
    let word = ENTITY_REFERENCE.captures(text)?.get(1)?;
    let candidate = word.as_str().to_lowercase();

    if RESERVED_WORDS.contains(&candidate.as_str()) || ObjectId::is_valid(&candidate) {
        return None;
    }

    let mut after = text[word.end()..].chars();
    match (after.next(), after.next()) {
        (Some('@'), _) => return None,
        (Some('.'), Some(c)) if c.is_alphanumeric() => return None,
        _ => {}
    }

    Some(word.range())
}
