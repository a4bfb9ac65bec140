//! Payload validation against a collection's field table
//!
//! Coercion is lax: values that have an unambiguous reading as the declared
//! type are converted (`"42"` for an int field, `7` for a string field),
//! anything else is a type mismatch.

use super::{Collection, FieldSpec, FieldType};
use crate::error::ValidationError;
use crate::value::{Document, Value};

/// Validate a payload against the full shape (insert and full replace)
///
/// Unknown fields are dropped, every required field must be present and
/// non-null, and only supplied fields appear in the output.
pub fn validate_full(collection: Collection, item: &Document) -> Result<Document, ValidationError> {
    let descriptor = collection.descriptor();
    let mut validated = Document::new();

    for spec in descriptor.fields {
        match item.get(spec.name) {
            None | Some(Value::Null) if spec.required => {
                return Err(missing(spec, collection));
            }
            None => {}
            Some(value) => {
                validated.insert(spec.name.to_string(), coerce(spec, value)?);
            }
        }
    }

    if validated.is_empty() {
        return Err(ValidationError::NoValidFields {
            collection: collection.name().to_string(),
        });
    }
    Ok(validated)
}

/// Validate only the fields named in a partial update
pub fn validate_partial(
    collection: Collection,
    item: &Document,
) -> Result<Document, ValidationError> {
    let descriptor = collection.descriptor();
    let mut validated = Document::new();

    for (name, value) in item {
        let Some(spec) = descriptor.field(name) else {
            tracing::debug!(field = %name, collection = %collection, "dropping unknown field");
            continue;
        };
        if spec.required && value.is_null() {
            return Err(missing(spec, collection));
        }
        validated.insert(name.clone(), coerce(spec, value)?);
    }

    if validated.is_empty() {
        return Err(ValidationError::NoValidFields {
            collection: collection.name().to_string(),
        });
    }
    Ok(validated)
}

fn missing(spec: &FieldSpec, collection: Collection) -> ValidationError {
    ValidationError::MissingField {
        field: spec.name.to_string(),
        collection: collection.name().to_string(),
    }
}

fn coerce(spec: &FieldSpec, value: &Value) -> Result<Value, ValidationError> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    let coerced = match (spec.field_type, value) {
        (FieldType::Any, v) => Some(v.clone()),

        (FieldType::String, Value::String(s)) => Some(Value::String(s.clone())),
        (FieldType::String, Value::Int(i)) => Some(Value::String(i.to_string())),
        (FieldType::String, Value::Float(f)) => Some(Value::String(f.to_string())),
        (FieldType::String, Value::Bool(b)) => Some(Value::String(b.to_string())),
        (FieldType::String, Value::ObjectId(id)) => Some(Value::String(id.to_hex())),

        (FieldType::Int, Value::Int(i)) => Some(Value::Int(*i)),
        (FieldType::Int, Value::Float(f)) if f.fract() == 0.0 && f.is_finite() => {
            Some(Value::Int(*f as i64))
        }
        (FieldType::Int, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::Int),

        (FieldType::Float, Value::Float(f)) => Some(Value::Float(*f)),
        (FieldType::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
        (FieldType::Float, Value::String(s)) => s.trim().parse::<f64>().ok().map(Value::Float),

        (FieldType::Bool, Value::Bool(b)) => Some(Value::Bool(*b)),
        (FieldType::Bool, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },

        (FieldType::Object, Value::Object(map)) => Some(Value::Object(map.clone())),
        (FieldType::List, Value::Array(items)) => Some(Value::Array(items.clone())),

        _ => None,
    };

    coerced.ok_or_else(|| ValidationError::TypeMismatch {
        field: spec.name.to_string(),
        expected: spec.field_type.to_string(),
        found: value.type_name().to_string(),
    })
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
    fn test_full_drops_unknown_fields() {
        let item = doc(json!({"name": "John", "email": "j@x.io", "shoeSize": 44}));
        let validated = validate_full(Collection::Users, &item).unwrap();
        assert_eq!(validated.len(), 2);
        assert!(!validated.contains_key("shoeSize"));
    }

    #[test]
    fn test_full_requires_email_for_users() {
        let item = doc(json!({"name": "Jane"}));
        let err = validate_full(Collection::Users, &item).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "email".to_string(),
                collection: "users".to_string(),
            }
        );
    }

    #[test]
    fn test_full_rejects_null_required_field() {
        let item = doc(json!({"name": null, "email": "j@x.io"}));
        assert!(matches!(
            validate_full(Collection::Users, &item),
            Err(ValidationError::MissingField { .. })
        ));
    }

    #[test]
    fn test_full_with_only_unknown_fields_is_empty() {
        let item = doc(json!({"colour": "red"}));
        assert_eq!(
            validate_full(Collection::Categories, &item),
            Err(ValidationError::NoValidFields {
                collection: "categories".to_string()
            })
        );
    }

    #[test]
    fn test_partial_checks_only_named_fields() {
        let item = doc(json!({"name": "Jane"}));
        let validated = validate_partial(Collection::Users, &item).unwrap();
        assert_eq!(validated.get("name"), Some(&Value::from("Jane")));
    }

    #[test]
    fn test_partial_rejects_nulling_required_field() {
        let item = doc(json!({"email": null}));
        assert!(validate_partial(Collection::Users, &item).is_err());
    }

    #[test]
    fn test_coercion_table() {
        let cases = [
            (json!({"age": "42"}), Some(Value::Int(42))),
            (json!({"age": 42.0}), Some(Value::Int(42))),
            (json!({"age": "old"}), None),
            (json!({"age": true}), None),
        ];
        for (input, expected) in cases {
            let result = validate_partial(Collection::Users, &doc(input.clone()));
            match expected {
                Some(value) => assert_eq!(result.unwrap().get("age"), Some(&value), "{input}"),
                None => assert!(result.is_err(), "{input}"),
            }
        }

        let validated =
            validate_partial(Collection::Users, &doc(json!({"mobile": 5551234, "isActive": "TRUE"})))
                .unwrap();
        assert_eq!(validated.get("mobile"), Some(&Value::from("5551234")));
        assert_eq!(validated.get("isActive"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_structured_fields_are_strict() {
        let err = validate_partial(Collection::Jobs, &doc(json!({"geometry": "point"}))).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { .. }));

        let ok = validate_partial(Collection::Roles, &doc(json!({"permissions": ["read"]})));
        assert!(ok.is_ok());

        let any = validate_partial(Collection::Users, &doc(json!({"role": {"k": 1}})));
        assert!(any.is_ok());
    }
}
