//! Query filters
//!
//! A [`Filter`] maps field paths to predicates. Its JSON form is the usual
//! document-store query shape (`{"name": {"$regex": "jo", "$options": "i"}}`),
//! which is what the model is asked to produce and what result envelopes
//! echo back. An empty filter matches every document.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::error::StoreError;
use crate::value::{lookup_path, Document, ObjectId, Value, ID_FIELD};

/// Filter JSON that cannot be represented
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FilterParseError(pub String);

/// A single condition on one field
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Regex {
        pattern: String,
        case_insensitive: bool,
    },
}

impl Predicate {
    /// Case-insensitive regex matching the literal text
    pub fn contains_ignore_case(text: &str) -> Self {
        Predicate::Regex {
            pattern: regex::escape(text.trim()),
            case_insensitive: true,
        }
    }

    fn operator(&self) -> &'static str {
        match self {
            Predicate::Eq(_) => "$eq",
            Predicate::Ne(_) => "$ne",
            Predicate::Gt(_) => "$gt",
            Predicate::Gte(_) => "$gte",
            Predicate::Lt(_) => "$lt",
            Predicate::Lte(_) => "$lte",
            Predicate::In(_) => "$in",
            Predicate::Regex { .. } => "$regex",
        }
    }
}

/// Field path to predicates; all predicates must hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: BTreeMap<String, Vec<Predicate>>,
}

impl Filter {
    /// The match-all filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact identifier lookup
    pub fn by_id(id: ObjectId) -> Self {
        let mut filter = Self::new();
        filter.set(ID_FIELD, Predicate::Eq(Value::ObjectId(id)));
        filter
    }

    /// Replace every predicate on `field` with `predicate`
    pub fn set(&mut self, field: impl Into<String>, predicate: Predicate) {
        self.fields.insert(field.into(), vec![predicate]);
    }

    /// Add a predicate alongside existing ones on `field`
    pub fn push(&mut self, field: impl Into<String>, predicate: Predicate) {
        self.fields.entry(field.into()).or_default().push(predicate);
    }

    pub fn get(&self, field: &str) -> Option<&[Predicate]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Parse the document-store JSON query shape
    pub fn from_json(json: &serde_json::Value) -> Result<Self, FilterParseError> {
        let object = match json {
            serde_json::Value::Null => return Ok(Self::new()),
            serde_json::Value::Object(object) => object,
            other => {
                return Err(FilterParseError(format!(
                    "filter must be an object, found {}",
                    json_kind(other)
                )))
            }
        };

        let mut filter = Self::new();
        for (field, condition) in object {
            if field.starts_with('$') {
                return Err(FilterParseError(format!(
                    "unsupported top-level operator '{}'",
                    field
                )));
            }
            for predicate in parse_condition(field, condition)? {
                filter.push(field.clone(), predicate);
            }
        }
        Ok(filter)
    }

    /// Render in the document-store JSON query shape
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (field, predicates) in &self.fields {
            let rendered = match predicates.as_slice() {
                [Predicate::Eq(value)] => value.to_json(),
                _ => {
                    let mut ops = serde_json::Map::new();
                    for predicate in predicates {
                        match predicate {
                            Predicate::Eq(v)
                            | Predicate::Ne(v)
                            | Predicate::Gt(v)
                            | Predicate::Gte(v)
                            | Predicate::Lt(v)
                            | Predicate::Lte(v) => {
                                ops.insert(predicate.operator().to_string(), v.to_json());
                            }
                            Predicate::In(values) => {
                                ops.insert(
                                    "$in".to_string(),
                                    serde_json::Value::Array(
                                        values.iter().map(Value::to_json).collect(),
                                    ),
                                );
                            }
                            Predicate::Regex {
                                pattern,
                                case_insensitive,
                            } => {
                                ops.insert("$regex".to_string(), pattern.clone().into());
                                if *case_insensitive {
                                    ops.insert("$options".to_string(), "i".into());
                                }
                            }
                        }
                    }
                    serde_json::Value::Object(ops)
                }
            };
            object.insert(field.clone(), rendered);
        }
        serde_json::Value::Object(object)
    }

    /// Compile regex predicates once for repeated matching
    pub fn compile(&self) -> Result<CompiledFilter, StoreError> {
        let mut conditions = Vec::new();
        for (field, predicates) in &self.fields {
            for predicate in predicates {
                let condition = match predicate {
                    Predicate::Regex {
                        pattern,
                        case_insensitive,
                    } => {
                        let regex = RegexBuilder::new(pattern)
                            .case_insensitive(*case_insensitive)
                            .build()
                            .map_err(|e| StoreError::InvalidFilter(e.to_string()))?;
                        Condition::Regex(regex)
                    }
                    other => Condition::Plain(other.clone()),
                };
                conditions.push((field.clone(), condition));
            }
        }
        Ok(CompiledFilter { conditions })
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Convert operands on `_id` into identifiers when they have the right shape
fn operand(field: &str, json: &serde_json::Value) -> Value {
    if field == ID_FIELD {
        if let Some(id) = json.as_str().and_then(|s| ObjectId::parse_str(s).ok()) {
            return Value::ObjectId(id);
        }
    }
    Value::from_json(json.clone())
}

fn parse_condition(
    field: &str,
    condition: &serde_json::Value,
) -> Result<Vec<Predicate>, FilterParseError> {
    let operators = match condition {
        serde_json::Value::Object(map) if !map.is_empty() && map.keys().all(|k| k.starts_with('$')) => {
            map
        }
        _ => return Ok(vec![Predicate::Eq(operand(field, condition))]),
    };

    let case_insensitive = operators
        .get("$options")
        .and_then(|o| o.as_str())
        .map(|o| o.contains('i'))
        .unwrap_or(false);

    let mut predicates = Vec::new();
    for (op, arg) in operators {
        let predicate = match op.as_str() {
            "$eq" => Predicate::Eq(operand(field, arg)),
            "$ne" => Predicate::Ne(operand(field, arg)),
            "$gt" => Predicate::Gt(operand(field, arg)),
            "$gte" => Predicate::Gte(operand(field, arg)),
            "$lt" => Predicate::Lt(operand(field, arg)),
            "$lte" => Predicate::Lte(operand(field, arg)),
            "$in" => match arg {
                serde_json::Value::Array(items) => {
                    Predicate::In(items.iter().map(|v| operand(field, v)).collect())
                }
                other => {
                    return Err(FilterParseError(format!(
                        "$in on '{}' expects an array, found {}",
                        field,
                        json_kind(other)
                    )))
                }
            },
            "$regex" => match arg.as_str() {
                Some(pattern) => Predicate::Regex {
                    pattern: pattern.to_string(),
                    case_insensitive,
                },
                None => {
                    return Err(FilterParseError(format!(
                        "$regex on '{}' expects a string",
                        field
                    )))
                }
            },
            "$options" => continue,
            unknown => {
                return Err(FilterParseError(format!(
                    "unsupported operator '{}' on '{}'",
                    unknown, field
                )))
            }
        };
        predicates.push(predicate);
    }

    if predicates.is_empty() {
        return Err(FilterParseError(format!(
            "$options on '{}' without $regex",
            field
        )));
    }
    Ok(predicates)
}

enum Condition {
    Plain(Predicate),
    Regex(Regex),
}

/// A filter ready to test documents
pub struct CompiledFilter {
    conditions: Vec<(String, Condition)>,
}

impl CompiledFilter {
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, condition)| condition_holds(lookup_path(document, field), condition))
    }
}

fn condition_holds(actual: Option<&Value>, condition: &Condition) -> bool {
    let predicate = match condition {
        Condition::Regex(regex) => {
            return match actual {
                Some(Value::String(s)) => regex.is_match(s),
                Some(Value::Array(items)) => items
                    .iter()
                    .any(|v| v.as_str().map(|s| regex.is_match(s)).unwrap_or(false)),
                _ => false,
            }
        }
        Condition::Plain(predicate) => predicate,
    };

    match predicate {
        Predicate::Eq(expected) => equals(actual, expected),
        Predicate::Ne(expected) => !equals(actual, expected),
        Predicate::In(options) => options.iter().any(|o| equals(actual, o)),
        Predicate::Gt(bound) => ordered(actual, bound, |o| o == Ordering::Greater),
        Predicate::Gte(bound) => ordered(actual, bound, |o| o != Ordering::Less),
        Predicate::Lt(bound) => ordered(actual, bound, |o| o == Ordering::Less),
        Predicate::Lte(bound) => ordered(actual, bound, |o| o != Ordering::Greater),
        Predicate::Regex { .. } => false,
    }
}

/// Missing fields equal null; array fields match on any element
fn equals(actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        None => expected.is_null(),
        Some(value) if value.matches(expected) => true,
        Some(Value::Array(items)) => items.iter().any(|item| item.matches(expected)),
        Some(_) => false,
    }
}

fn ordered(actual: Option<&Value>, bound: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    actual
        .and_then(|value| value.compare(bound))
        .map(accept)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::document_from_json;
    use serde_json::json;

    fn doc(json: serde_json::Value) -> Document {
        document_from_json(json).unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let compiled = Filter::new().compile().unwrap();
        assert!(compiled.matches(&doc(json!({"name": "x"}))));
        assert!(compiled.matches(&Document::new()));
    }

    #[test]
    fn test_regex_filter_from_json() {
        let filter = Filter::from_json(&json!({"name": {"$regex": "nis", "$options": "i"}})).unwrap();
        let compiled = filter.compile().unwrap();
        assert!(compiled.matches(&doc(json!({"name": "Nisha"}))));
        assert!(!compiled.matches(&doc(json!({"name": "Bob"}))));
        assert_eq!(
            filter.to_json(),
            json!({"name": {"$regex": "nis", "$options": "i"}})
        );
    }

    #[test]
    fn test_id_strings_become_object_ids() {
        let filter = Filter::from_json(&json!({"_id": "507f1f77bcf86cd799439011"})).unwrap();
        let id = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(filter, Filter::by_id(id));
    }

    #[test]
    fn test_range_operators() {
        let filter = Filter::from_json(&json!({"totalCost": {"$gte": 10, "$lt": 20}})).unwrap();
        let compiled = filter.compile().unwrap();
        assert!(compiled.matches(&doc(json!({"totalCost": 10}))));
        assert!(compiled.matches(&doc(json!({"totalCost": 19.5}))));
        assert!(!compiled.matches(&doc(json!({"totalCost": 20}))));
        assert!(!compiled.matches(&doc(json!({}))));
    }

    #[test]
    fn test_in_and_ne() {
        let filter =
            Filter::from_json(&json!({"status": {"$in": ["open", "closed"]}, "level": {"$ne": "debug"}}))
                .unwrap();
        let compiled = filter.compile().unwrap();
        assert!(compiled.matches(&doc(json!({"status": "open"}))));
        assert!(!compiled.matches(&doc(json!({"status": "open", "level": "debug"}))));
        assert!(!compiled.matches(&doc(json!({"status": "draft"}))));
    }

    #[test]
    fn test_array_field_matches_any_element() {
        let filter = Filter::from_json(&json!({"permissions": "read"})).unwrap();
        let compiled = filter.compile().unwrap();
        assert!(compiled.matches(&doc(json!({"permissions": ["read", "write"]}))));
    }

    #[test]
    fn test_rejects_unsupported_operators() {
        assert!(Filter::from_json(&json!({"$or": []})).is_err());
        assert!(Filter::from_json(&json!({"age": {"$exists": true}})).is_err());
        assert!(Filter::from_json(&json!("name")).is_err());
        assert!(Filter::from_json(&json!(null)).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_regex_is_a_store_error() {
        let mut filter = Filter::new();
        filter.set(
            "name",
            Predicate::Regex {
                pattern: "(".to_string(),
                case_insensitive: false,
            },
        );
        assert!(matches!(filter.compile(), Err(StoreError::InvalidFilter(_))));
    }

    #[test]
    fn test_literal_regex_is_escaped() {
        let mut filter = Filter::new();
        filter.set("name", Predicate::contains_ignore_case("a.b"));
        let compiled = filter.compile().unwrap();
        assert!(compiled.matches(&doc(json!({"name": "A.B"}))));
        assert!(!compiled.matches(&doc(json!({"name": "axb"}))));
    }
}
