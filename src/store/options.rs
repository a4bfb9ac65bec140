//! Read shaping for `get_all`: projection, sort order and limit
//!
//! JSON forms follow the usual document-store conventions, since the model
//! is asked to produce them: `{"name": 1, "_id": 0}` for a projection and
//! `[["age", -1], ["name", 1]]` for a sort.

use std::cmp::Ordering;

use serde::{Serialize, Serializer};
use serde_json::Value as Json;

use crate::filter::FilterParseError;
use crate::value::{lookup_path, Document, Value, ID_FIELD};

/// Which top-level fields a read returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Only these fields; `_id` too unless `keep_id` is false
    Include { fields: Vec<String>, keep_id: bool },
    /// Everything except these fields
    Exclude(Vec<String>),
}

impl Projection {
    /// `None` for null or an empty projection
    ///
    /// Accepts `{"field": 1|0|true|false}` or a list of field names to keep.
    /// Including and excluding in one projection is only allowed for `_id`.
    pub fn from_json(json: &Json) -> Result<Option<Self>, FilterParseError> {
        match json {
            Json::Null => Ok(None),
            Json::Array(items) => {
                let fields = items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_string).ok_or_else(|| {
                            FilterParseError("projection list must hold field names".to_string())
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((!fields.is_empty()).then_some(Projection::Include {
                    fields,
                    keep_id: true,
                }))
            }
            Json::Object(object) => {
                let mut include = Vec::new();
                let mut exclude = Vec::new();
                let mut keep_id = true;
                for (field, flag) in object {
                    let on = match flag {
                        Json::Bool(b) => *b,
                        Json::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
                        other => {
                            return Err(FilterParseError(format!(
                                "projection flag for '{}' must be 0 or 1, found {}",
                                field, other
                            )))
                        }
                    };
                    match (field.as_str(), on) {
                        (ID_FIELD, on) => keep_id = on,
                        (_, true) => include.push(field.clone()),
                        (_, false) => exclude.push(field.clone()),
                    }
                }
                match (include.is_empty(), exclude.is_empty()) {
                    (false, false) => Err(FilterParseError(
                        "projection cannot mix included and excluded fields".to_string(),
                    )),
                    (false, true) => Ok(Some(Projection::Include {
                        fields: include,
                        keep_id,
                    })),
                    (true, _) => {
                        if !keep_id {
                            exclude.push(ID_FIELD.to_string());
                        }
                        Ok((!exclude.is_empty()).then_some(Projection::Exclude(exclude)))
                    }
                }
            }
            other => Err(FilterParseError(format!(
                "projection must be an object or a list, found {}",
                other
            ))),
        }
    }

    pub fn to_json(&self) -> Json {
        let mut object = serde_json::Map::new();
        match self {
            Projection::Include { fields, keep_id } => {
                for field in fields {
                    object.insert(field.clone(), 1.into());
                }
                if !keep_id {
                    object.insert(ID_FIELD.to_string(), 0.into());
                }
            }
            Projection::Exclude(fields) => {
                for field in fields {
                    object.insert(field.clone(), 0.into());
                }
            }
        }
        Json::Object(object)
    }

    pub fn apply(&self, mut document: Document) -> Document {
        match self {
            Projection::Include { fields, keep_id } => {
                document.retain(|key, _| {
                    (key == ID_FIELD && *keep_id) || fields.iter().any(|f| f == key)
                });
            }
            Projection::Exclude(fields) => {
                for field in fields {
                    document.remove(field);
                }
            }
        }
        document
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn from_json(json: &Json) -> Option<Self> {
        match json {
            Json::Number(n) => match n.as_f64()? {
                d if d > 0.0 => Some(SortDirection::Ascending),
                d if d < 0.0 => Some(SortDirection::Descending),
                _ => None,
            },
            Json::String(s) => match s.trim().to_lowercase().as_str() {
                "asc" | "ascending" | "1" => Some(SortDirection::Ascending),
                "desc" | "descending" | "-1" => Some(SortDirection::Descending),
                _ => None,
            },
            _ => None,
        }
    }
}

/// One sort criterion; field may be a dotted path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parse `[["field", 1|-1], ...]`, `{"field": 1|-1}` or `["field", ...]`
    pub fn list_from_json(json: &Json) -> Result<Vec<SortKey>, FilterParseError> {
        let invalid = |what: &Json| FilterParseError(format!("invalid sort entry {}", what));
        let direction = |field: &str, dir: &Json| {
            SortDirection::from_json(dir).ok_or_else(|| {
                FilterParseError(format!(
                    "sort direction for '{}' must be 1 or -1, found {}",
                    field, dir
                ))
            })
        };

        match json {
            Json::Null => Ok(Vec::new()),
            Json::Object(object) => object
                .iter()
                .map(|(field, dir)| {
                    Ok(SortKey {
                        field: field.clone(),
                        direction: direction(field, dir)?,
                    })
                })
                .collect(),
            Json::Array(entries) => {
                // A flat ["field", -1] pair is one key, not two
                if let [Json::String(field), dir @ (Json::Number(_) | Json::String(_))] =
                    entries.as_slice()
                {
                    if let Some(direction) = SortDirection::from_json(dir) {
                        return Ok(vec![SortKey {
                            field: field.clone(),
                            direction,
                        }]);
                    }
                }
                entries
                    .iter()
                    .map(|entry| match entry {
                        Json::String(field) => Ok(SortKey::ascending(field.clone())),
                        Json::Array(pair) => match pair.as_slice() {
                            [Json::String(field), dir] => Ok(SortKey {
                                field: field.clone(),
                                direction: direction(field, dir)?,
                            }),
                            _ => Err(invalid(entry)),
                        },
                        _ => Err(invalid(entry)),
                    })
                    .collect()
            }
            other => Err(invalid(other)),
        }
    }

    pub fn to_json(&self) -> Json {
        let direction = match self.direction {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        };
        serde_json::json!([self.field, direction])
    }

    /// Order two documents by this key; missing fields sort first
    fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ordering = match (lookup_path(a, &self.field), lookup_path(b, &self.field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x
                .compare(y)
                .unwrap_or_else(|| type_rank(x).cmp(&type_rank(y))),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl Serialize for SortKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Cross-type order: null, numbers, strings, objects, arrays, ids, bools
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Int(_) | Value::Float(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::ObjectId(_) => 5,
        Value::Bool(_) => 6,
    }
}

/// How `find_many` shapes its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindOptions {
    pub projection: Option<Projection>,
    pub sort: Vec<SortKey>,
    pub limit: usize,
}

impl FindOptions {
    /// Insertion order, whole documents, at most `limit`
    pub fn limit(limit: usize) -> Self {
        Self {
            projection: None,
            sort: Vec::new(),
            limit,
        }
    }

    /// Sort in place by every key in turn; stable for ties
    pub fn sort_documents(&self, documents: &mut [Document]) {
        if self.sort.is_empty() {
            return;
        }
        documents.sort_by(|a, b| {
            self.sort
                .iter()
                .map(|key| key.compare(a, b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
    }

    pub fn project(&self, document: Document) -> Document {
        match &self.projection {
            Some(projection) => projection.apply(document),
            None => document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(pairs: &[(&str, Value)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_projection_forms() {
        assert_eq!(
            Projection::from_json(&json!({"name": 1, "_id": 0})).unwrap(),
            Some(Projection::Include {
                fields: vec!["name".to_string()],
                keep_id: false
            })
        );
        assert_eq!(
            Projection::from_json(&json!(["name", "email"])).unwrap(),
            Some(Projection::Include {
                fields: vec!["name".to_string(), "email".to_string()],
                keep_id: true
            })
        );
        assert_eq!(
            Projection::from_json(&json!({"password": false})).unwrap(),
            Some(Projection::Exclude(vec!["password".to_string()]))
        );
        assert_eq!(Projection::from_json(&json!({})).unwrap(), None);
        assert!(Projection::from_json(&json!({"name": 1, "email": 0})).is_err());
        assert!(Projection::from_json(&json!("name")).is_err());
    }

    #[test]
    fn test_projection_apply() {
        let document = doc(&[
            ("_id", "x".into()),
            ("name", "Ann".into()),
            ("email", "a@b.io".into()),
        ]);
        let include = Projection::Include {
            fields: vec!["name".to_string()],
            keep_id: true,
        };
        let kept = include.apply(document.clone());
        assert_eq!(kept.keys().collect::<Vec<_>>(), vec!["_id", "name"]);

        let exclude = Projection::Exclude(vec!["email".to_string(), "_id".to_string()]);
        let kept = exclude.apply(document);
        assert_eq!(kept.keys().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn test_sort_forms() {
        let expected = vec![SortKey::descending("age"), SortKey::ascending("name")];
        assert_eq!(
            SortKey::list_from_json(&json!([["age", -1], ["name", 1]])).unwrap(),
            expected
        );
        assert_eq!(
            SortKey::list_from_json(&json!({"age": "desc", "name": "asc"})).unwrap(),
            expected
        );
        assert_eq!(
            SortKey::list_from_json(&json!(["age", -1])).unwrap(),
            vec![SortKey::descending("age")]
        );
        assert_eq!(
            SortKey::list_from_json(&json!(["name", "age"])).unwrap(),
            vec![SortKey::ascending("name"), SortKey::ascending("age")]
        );
        assert!(SortKey::list_from_json(&json!([["age", 0]])).is_err());
        assert!(SortKey::list_from_json(&json!(5)).is_err());
    }

    #[test]
    fn test_sort_documents_missing_first_then_ties_stable() {
        let mut documents = vec![
            doc(&[("name", "c".into()), ("age", 30.into())]),
            doc(&[("name", "a".into())]),
            doc(&[("name", "b".into()), ("age", 20.into())]),
            doc(&[("name", "d".into()), ("age", 30.into())]),
        ];
        let options = FindOptions {
            sort: vec![SortKey::ascending("age")],
            ..FindOptions::limit(10)
        };
        options.sort_documents(&mut documents);
        let names: Vec<_> = documents
            .iter()
            .map(|d| d["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a", "b", "c", "d"]);

        let options = FindOptions {
            sort: vec![SortKey::descending("age"), SortKey::descending("name")],
            ..FindOptions::limit(10)
        };
        options.sort_documents(&mut documents);
        let names: Vec<_> = documents
            .iter()
            .map(|d| d["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["d", "c", "b", "a"]);
    }
}
