//! Directive construction for the model-assisted decision
//!
//! The directive is one plain-text prompt: the action set, every registered
//! collection with its fields, the JSON shape to answer with, the extraction
//! rules, then the raw request.

use std::fmt::Write as _;
use std::sync::LazyLock;

use crate::command::Action;
use crate::schema::Collection;

/// Collection catalogue, rendered once
static COLLECTION_CATALOGUE: LazyLock<String> = LazyLock::new(|| {
    let mut out = String::new();
    for collection in Collection::ALL {
        let fields: Vec<String> = collection
            .descriptor()
            .fields
            .iter()
            .map(|f| {
                if f.required {
                    format!("{} ({}, required)", f.name, f.field_type)
                } else {
                    format!("{} ({})", f.name, f.field_type)
                }
            })
            .collect();
        let _ = writeln!(out, "- {}: {}", collection.name(), fields.join(", "));
    }
    out
});

const RULES: &str = r#"Action meanings:
1. "insert": create a new record
2. "get_one": retrieve a single record (use item_id if given, otherwise filter)
3. "get_all": retrieve multiple records with an optional filter
4. "update": full replacement of a record (prefer item_id, otherwise filter)
5. "patch": partial update of a record (prefer item_id, otherwise filter)
6. "delete": remove a record (prefer item_id, otherwise filter)

Extraction rules:
- An entity mentioned without an id (e.g. "contact Nisha") becomes the filter {"name": {"$regex": "Nisha", "$options": "i"}}
- Field changes mentioned in the request (e.g. "message to hello", "update age to 30") go in "item"
- Always output both "item" and "filter"; use null for the one that does not apply
- An explicit 24-character hex id goes in "item_id"; also fill "filter" when the request gives criteria
- Do not assume anything beyond what the request states
- Only use the operators $eq, $ne, $gt, $gte, $lt, $lte, $in, $regex and $options in filters
- For "get_all" only: "projection" picks fields to include (1) or exclude (0), "sort" is a list of [field, direction] pairs (1 = ascending, -1 = descending), "limit" caps the number of results; use null when the request does not ask for them

Answer with a single JSON object and nothing else:
{
  "action": "one of the actions above",
  "collection": "one of the collection names above",
  "item_id": "24-character hex id or null",
  "item": {"field": "value"} or null,
  "filter": {"field": "value"} or null,
  "projection": {"field": 1} or null,
  "sort": [["field", 1]] or null,
  "limit": integer or null
}"#;

/// Build the full directive for one request
pub fn build_directive(user_input: &str) -> String {
    let actions: Vec<String> = Action::ALL
        .iter()
        .map(|a| format!("\"{}\"", a.as_str()))
        .collect();

    format!(
        "You turn natural-language requests into document database operations.\n\n\
         Available actions: [{}]\n\n\
         Available collections and their fields:\n{}\n\
         {}\n\n\
         User request: {}\n",
        actions.join(", "),
        COLLECTION_CATALOGUE.as_str(),
        RULES,
        user_input.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_lists_every_action_and_collection() {
        let directive = build_directive("list all");
        for action in Action::ALL {
            assert!(directive.contains(&format!("\"{}\"", action.as_str())));
        }
        for collection in Collection::ALL {
            assert!(directive.contains(&format!("- {}:", collection.name())));
        }
    }

    #[test]
    fn test_directive_marks_required_fields() {
        let directive = build_directive("x");
        assert!(directive.contains("- users: name (string, required), email (string, required)"));
    }

    #[test]
    fn test_directive_ends_with_request() {
        let directive = build_directive("  delete contact Nisha ");
        assert!(directive.trim_end().ends_with("User request: delete contact Nisha"));
        assert!(directive.contains("\"item_id\""));
    }

    #[test]
    fn test_directive_offers_read_options() {
        let directive = build_directive("x");
        for key in ["\"projection\"", "\"sort\"", "\"limit\""] {
            assert!(directive.contains(key), "{key}");
        }
    }
}
