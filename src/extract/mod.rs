//! Deterministic Extractor
//!
//! Rule-based text-to-command resolution with no network dependency. Used as
//! the fallback when the model path fails, and directly by `--offline` runs.
//!
//! Resolution runs in dependency order: action, then collection and
//! identifier, then item and filter (both depend on the action).

mod action;
mod collection;
mod fields;
mod identifier;
mod query;

use std::collections::BTreeMap;
use std::ops::Range;

pub use action::detect_action;
pub use collection::detect_collection;
pub use fields::{coerce_token, extract_fields};
pub use identifier::extract_identifier;
pub use query::extract_filter;

use crate::command::{Action, Command};
use crate::filter::Filter;
use crate::schema::Collection;

use fields::FieldMatch;
use query::Criterion;

/// Words that are never field names or entity names
pub(crate) const RESERVED_WORDS: &[&str] = &[
    "a", "an", "the", "all", "and", "or", "by", "for", "from", "in", "of", "on", "to", "is",
    "it", "me", "this", "that", "who", "whose", "where", "which", "with", "having", "named",
    "called", "id", "_id", "set", "add", "create", "insert", "new", "register", "update",
    "modify", "change", "edit", "patch", "replace", "overwrite", "delete", "remove", "destroy",
    "drop", "list", "get", "show", "fetch", "find",
];

/// Resolve a complete command from text alone
pub fn extract_command(text: &str, default_collection: Collection) -> Command {
    let action = detect_action(text);
    let collection = detect_collection(text, default_collection);
    let item_id = extract_identifier(text);

    let mut fields = if action.writes_item() {
        fields::scan_fields(text)
    } else {
        BTreeMap::new()
    };

    let filter = if item_id.is_none() && action != Action::Insert {
        let mut criteria = query::scan_criteria(text);
        if matches!(action, Action::Update | Action::Patch) {
            separate_changes_from_criteria(text, &mut fields, &mut criteria);
        }
        let mut filter = Filter::new();
        for criterion in criteria {
            filter.set(criterion.field, criterion.predicate);
        }
        Some(filter)
    } else {
        None
    };

    let mut command = Command::new(text, action, collection);
    command.item_id = item_id;
    command.filter = filter;
    if !fields.is_empty() {
        command.item = Some(
            fields
                .into_iter()
                .map(|(field, found)| (field, found.value))
                .collect(),
        );
    }

    tracing::debug!(
        action = %command.action,
        collection = %command.collection,
        has_id = command.item_id.is_some(),
        "deterministic extraction complete"
    );
    command
}

/// Resolve phrases picked up both as a change and as a criterion
///
/// `update user with email a@b.io set status to active` reads `a@b.io` as a
/// criterion and `active` as a change. A phrase worded as a change stays in
/// the item; a plain mention stays in the filter, unless nothing in the text
/// is worded as a change, in which case every mention is a change. A name
/// taken as a change leaves the entity reference (`user John`) as the target.
fn separate_changes_from_criteria(
    text: &str,
    fields: &mut BTreeMap<String, FieldMatch>,
    criteria: &mut Vec<Criterion>,
) {
    let has_changes = fields.values().any(|found| found.explicit);
    let before = criteria.len();
    criteria.retain(|criterion| {
        let Some(found) = fields.get(criterion.field) else {
            return true;
        };
        if !overlaps(&found.span, &criterion.span) {
            return true;
        }
        if found.explicit || !has_changes {
            false
        } else {
            fields.remove(criterion.field);
            true
        }
    });

    let name_dropped = criteria.len() < before && criteria.iter().all(|c| c.field != "name");
    if name_dropped {
        if let Some(entity) = query::entity_criterion(text) {
            let clashes = fields
                .values()
                .any(|found| overlaps(&found.span, &entity.span));
            if !clashes {
                criteria.push(entity);
            }
        }
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
