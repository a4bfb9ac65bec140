//! Field/value extraction for write requests
//!
//! Four key-value patterns are scanned in turn and every hit lands in one
//! mapping, later hits overwriting earlier ones. Unquoted values run to the
//! next comma or newline and are then cut at the next clause boundary, so
//! `name John and email j@x.io` yields two fields rather than one.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::RESERVED_WORDS;
use crate::value::{Document, Value};

/// `set|create|add|with FIELD to|as|=|: VALUE`
static SET_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(set|create|add|with)\s+(\w+)(?:\s+(to|as)\s+|\s*[=:]\s*)").unwrap()
});

/// `FIELD: VALUE` / `FIELD=VALUE`
static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\w+)\s*[=:]\s*").unwrap());

/// Common field names followed by an optional `is|to|as|=|:`
static KNOWN_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(name|email|phone|title|description|status)\b(?:\s+(is|to|as)\s+|\s*[=:]\s*|\s+)",
    )
    .unwrap()
});

/// `FIELD to|as VALUE`
static CHANGE_TO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\w+)\s+(?:to|as)\s+").unwrap());

/// Where an unquoted value stops: a conjunction or the start of another clause
static CLAUSE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:and|with|where|whose|set)\s+|\s+\w+\s+(?:to|as|is)\s+|\s+\w+\s*[:=]")
        .unwrap()
});

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+$").unwrap());

/// A value found in the text
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldMatch {
    pub value: Value,
    /// Byte range of the value text
    pub span: Range<usize>,
    /// Phrased as a change (`set x ...`, `x to ...`) rather than a mention
    pub explicit: bool,
}

/// Every field/value pair mentioned in the text
pub fn extract_fields(text: &str) -> Document {
    scan_fields(text)
        .into_iter()
        .map(|(field, found)| (field, found.value))
        .collect()
}

pub(crate) fn scan_fields(text: &str) -> BTreeMap<String, FieldMatch> {
    let mut fields = BTreeMap::new();

    scan(text, &SET_CLAUSE, &mut fields, |caps| {
        let prefix = caps[1].to_lowercase();
        let explicit = prefix != "with" || caps.get(3).is_some();
        (caps[2].to_string(), explicit)
    });
    scan(text, &ASSIGNMENT, &mut fields, |caps| (caps[1].to_string(), false));
    scan(text, &KNOWN_FIELD, &mut fields, |caps| {
        let explicit = caps
            .get(2)
            .map(|c| !c.as_str().eq_ignore_ascii_case("is"))
            .unwrap_or(false);
        (caps[1].to_lowercase(), explicit)
    });
    scan(text, &CHANGE_TO, &mut fields, |caps| (caps[1].to_string(), true));

    fields
}

/// Run one pattern over the whole text, resuming after each value
fn scan(
    text: &str,
    pattern: &Regex,
    fields: &mut BTreeMap<String, FieldMatch>,
    field_of: impl Fn(&Captures<'_>) -> (String, bool),
) {
    let mut pos = 0;
    while pos < text.len() {
        let Some(caps) = pattern.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };

        let (value_span, resume) = read_value(text, whole.end());
        pos = resume.max(whole.end()).max(whole.start() + 1);
        while pos < text.len() && !text.is_char_boundary(pos) {
            pos += 1;
        }

        let (field, explicit) = field_of(&caps);
        if is_reserved(&field) || value_span.is_empty() {
            continue;
        }

        let value = coerce_token(&text[value_span.clone()]);
        let explicit = match fields.get(&field) {
            Some(previous) if previous.value == value => explicit || previous.explicit,
            _ => explicit,
        };
        fields.insert(
            field,
            FieldMatch {
                value,
                span: value_span,
                explicit,
            },
        );
    }
}

/// Locate the value starting at `start`
///
/// Returns the value's byte range (quotes and surrounding space excluded)
/// and the position scanning should resume from.
pub(crate) fn read_value(text: &str, start: usize) -> (Range<usize>, usize) {
    let rest = &text[start..];

    for quote in ['"', '\''] {
        if let Some(inner) = rest.strip_prefix(quote) {
            if let Some(close) = inner.find(quote) {
                let begin = start + 1;
                return (begin..begin + close, begin + close + 1);
            }
        }
    }

    let run = rest.find([',', '\n']).unwrap_or(rest.len());
    let segment = &rest[..run];
    let cut = CLAUSE_BOUNDARY
        .find(segment)
        .map(|m| m.start())
        .unwrap_or(segment.len());

    let raw = &segment[..cut];
    let trimmed = raw.trim_end();
    let leading = raw.len() - raw.trim_start().len();
    let begin = start + leading.min(trimmed.len());
    let end = start + trimmed.len();

    (begin..end.max(begin), start + cut)
}

/// Coerce a raw value: booleans, integers, decimals, else trimmed string
pub fn coerce_token(raw: &str) -> Value {
    let token = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();

    if token.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(i) = token.parse::<i64>() {
            return Value::Int(i);
        }
    }
    if DECIMAL.is_match(token) {
        if let Ok(f) = token.parse::<f64>() {
            return Value::Float(f);
        }
    }
    Value::String(token.to_string())
}

fn is_reserved(field: &str) -> bool {
    let lowered = field.to_lowercase();
    RESERVED_WORDS.contains(&lowered.as_str())
}
