//! The six command handlers
//!
//! Each handler checks its payload and target before touching the store, so
//! a rejected command never writes anything.

use serde_json::Value as Json;

use super::envelope::Envelope;
use crate::command::Command;
use crate::error::{CrudError, CrudResult, TargetingError};
use crate::filter::Filter;
use crate::schema::{validate_full, validate_partial};
use crate::store::{DocumentStore, FindOptions};
use crate::value::{document_to_json, Document, ObjectId, Value, ID_FIELD};

/// The record(s) a command points at: identifier first, then filter
fn target(command: &Command) -> CrudResult<Filter> {
    if let Some(item_id) = command.item_id.as_deref() {
        return Ok(Filter::by_id(ObjectId::parse_str(item_id)?));
    }
    match &command.filter {
        Some(filter) if !filter.is_empty() => Ok(filter.clone()),
        _ => Err(TargetingError::NoTarget {
            action: command.action.to_string(),
        }
        .into()),
    }
}

/// The non-empty `item`, or a missing-payload error
fn payload(command: &Command) -> CrudResult<&Document> {
    command
        .item
        .as_ref()
        .filter(|item| !item.is_empty())
        .ok_or_else(|| CrudError::MissingPayload {
            action: command.action.to_string(),
        })
}

pub(super) async fn insert(store: &dyn DocumentStore, command: &Command) -> CrudResult<Envelope> {
    let validated = validate_full(command.collection, payload(command)?)?;
    let result = store.insert_one(command.collection, validated).await?;
    Ok(Envelope::ok(command.action, command.collection)
        .with("inserted_id", result.inserted_id.to_json()))
}

pub(super) async fn get_one(store: &dyn DocumentStore, command: &Command) -> CrudResult<Envelope> {
    let filter = target(command)?;
    let document = store
        .find_one(command.collection, &filter)
        .await?
        .ok_or(CrudError::NotFound)?;
    Ok(Envelope::ok(command.action, command.collection).with("data", document_to_json(&document)))
}

/// An identifier, when given, narrows the read; otherwise the filter applies
/// and an absent or empty filter matches everything. A requested limit never
/// exceeds `page_size`; zero means no limit of its own.
pub(super) async fn get_all(
    store: &dyn DocumentStore,
    command: &Command,
    page_size: usize,
) -> CrudResult<Envelope> {
    let filter = match command.item_id.as_deref() {
        Some(item_id) => Filter::by_id(ObjectId::parse_str(item_id)?),
        None => command.filter.clone().unwrap_or_default(),
    };
    let options = FindOptions {
        projection: command.projection.clone(),
        sort: command.sort.clone().unwrap_or_default(),
        limit: match command.limit {
            Some(limit) if limit > 0 => limit.min(page_size),
            _ => page_size,
        },
    };
    let documents = store
        .find_many(command.collection, &filter, &options)
        .await?;
    let data: Vec<Json> = documents.iter().map(document_to_json).collect();
    Ok(Envelope::ok(command.action, command.collection)
        .with("count", data.len())
        .with("data", data)
        .with("filter", filter.to_json()))
}

pub(super) async fn update(store: &dyn DocumentStore, command: &Command) -> CrudResult<Envelope> {
    let validated = validate_full(command.collection, payload(command)?)?;
    let filter = target(command)?;
    let result = store
        .replace_one(command.collection, &filter, validated)
        .await?;
    Ok(Envelope::ok(command.action, command.collection)
        .with("matched_count", result.matched_count)
        .with("modified_count", result.modified_count)
        .with("filter_used", filter.to_json()))
}

/// Reads the current document first; the write is pinned to its `_id` so the
/// same record that was found is the one changed.
pub(super) async fn patch(store: &dyn DocumentStore, command: &Command) -> CrudResult<Envelope> {
    let item = payload(command)?;
    let filter = target(command)?;
    let existing = store
        .find_one(command.collection, &filter)
        .await?
        .ok_or(CrudError::NotFound)?;

    let validated = validate_partial(command.collection, item)?;
    let updated_fields: Vec<String> = validated.keys().cloned().collect();

    let write_filter = match existing.get(ID_FIELD) {
        Some(Value::ObjectId(id)) => Filter::by_id(*id),
        _ => filter.clone(),
    };
    let result = store
        .update_fields(command.collection, &write_filter, validated)
        .await?;

    Ok(Envelope::ok(command.action, command.collection)
        .with("matched_count", result.matched_count)
        .with("modified_count", result.modified_count)
        .with("updated_fields", updated_fields)
        .with("filter_used", filter.to_json()))
}

pub(super) async fn delete(store: &dyn DocumentStore, command: &Command) -> CrudResult<Envelope> {
    let filter = target(command)?;
    let result = store.delete_one(command.collection, &filter).await?;
    Ok(Envelope::ok(command.action, command.collection)
        .with("deleted_count", result.deleted_count)
        .with("filter_used", filter.to_json()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Action;
    use crate::filter::Predicate;
    use crate::schema::Collection;
    use crate::store::InMemoryStore;
    use serde_json::json;

    fn doc(pairs: &[(&str, Value)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    async fn seeded() -> (InMemoryStore, String) {
        let store = InMemoryStore::new();
        let result = store
            .insert_one(
                Collection::Users,
                doc(&[("name", "Ann".into()), ("email", "ann@example.com".into())]),
            )
            .await
            .unwrap();
        let id = result.inserted_id.to_json().as_str().unwrap().to_string();
        (store, id)
    }

    #[tokio::test]
    async fn test_insert_validates_before_writing() {
        let store = InMemoryStore::new();
        let command = Command::new("x", Action::Insert, Collection::Users)
            .with_item(doc(&[("name", "John".into())]));
        let err = insert(&store, &command).await.unwrap_err();
        assert!(err.to_string().contains("missing required field 'email'"));
        assert_eq!(store.count(Collection::Users).await, 0);
    }

    #[tokio::test]
    async fn test_insert_without_item() {
        let store = InMemoryStore::new();
        let command = Command::new("x", Action::Insert, Collection::Users);
        let err = insert(&store, &command).await.unwrap_err();
        assert_eq!(err.to_string(), "No item data provided for insert operation");
    }

    #[tokio::test]
    async fn test_get_one_by_id_and_missing() {
        let (store, id) = seeded().await;
        let command = Command::new("x", Action::GetOne, Collection::Users).with_item_id(&id);
        let envelope = get_one(&store, &command).await.unwrap();
        assert_eq!(envelope.get("data").unwrap()["_id"], json!(id));

        let absent = Command::new("x", Action::GetOne, Collection::Users)
            .with_item_id("ffffffffffffffffffffffff");
        assert!(matches!(
            get_one(&store, &absent).await.unwrap_err(),
            CrudError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_targeting_errors() {
        let (store, _) = seeded().await;
        let untargeted = Command::new("x", Action::Delete, Collection::Users)
            .with_filter(Filter::new());
        assert_eq!(
            delete(&store, &untargeted).await.unwrap_err().to_string(),
            "No item ID or filter provided for delete operation"
        );

        let bad_id = Command::new("x", Action::GetOne, Collection::Users).with_item_id("42");
        assert!(matches!(
            get_one(&store, &bad_id).await.unwrap_err(),
            CrudError::Targeting(TargetingError::InvalidIdentifier { .. })
        ));
        assert_eq!(store.count(Collection::Users).await, 1);
    }

    #[tokio::test]
    async fn test_get_all_caps_and_echoes_filter() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .insert_one(Collection::Tasks, doc(&[("title", format!("t{i}").into())]))
                .await
                .unwrap();
        }
        let command = Command::new("x", Action::GetAll, Collection::Tasks);
        let envelope = get_all(&store, &command, 3).await.unwrap();
        assert_eq!(envelope.get("count"), Some(&json!(3)));
        assert_eq!(envelope.get("filter"), Some(&json!({})));
    }

    #[tokio::test]
    async fn test_get_all_applies_read_options() {
        use crate::store::{Projection, SortKey};

        let store = InMemoryStore::new();
        for title in ["b", "d", "a", "c"] {
            store
                .insert_one(Collection::Tasks, doc(&[("title", title.into()), ("status", "open".into())]))
                .await
                .unwrap();
        }
        let mut command = Command::new("x", Action::GetAll, Collection::Tasks);
        command.projection = Some(Projection::Include {
            fields: vec!["title".to_string()],
            keep_id: false,
        });
        command.sort = Some(vec![SortKey::ascending("title")]);
        command.limit = Some(2);
        let envelope = get_all(&store, &command, 100).await.unwrap();
        assert_eq!(
            envelope.get("data"),
            Some(&json!([{"title": "a"}, {"title": "b"}]))
        );

        // A limit above the page size is cut to it
        command.limit = Some(50);
        let envelope = get_all(&store, &command, 3).await.unwrap();
        assert_eq!(envelope.get("count"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_update_requires_full_shape() {
        let (store, id) = seeded().await;
        let command = Command::new("x", Action::Update, Collection::Users)
            .with_item_id(&id)
            .with_item(doc(&[("name", "Jane".into())]));
        let err = update(&store, &command).await.unwrap_err();
        assert!(err.to_string().starts_with("Validation error"));
        assert!(err.to_string().contains("email"));
    }

    #[tokio::test]
    async fn test_patch_writes_only_named_fields() {
        let (store, id) = seeded().await;
        let mut filter = Filter::new();
        filter.set("name", Predicate::contains_ignore_case("ann"));
        let command = Command::new("x", Action::Patch, Collection::Users)
            .with_filter(filter)
            .with_item(doc(&[("mobile", 5551234.into()), ("nickname", "A".into())]));
        let envelope = patch(&store, &command).await.unwrap();
        assert_eq!(envelope.get("updated_fields"), Some(&json!(["mobile"])));
        assert_eq!(envelope.get("modified_count"), Some(&json!(1)));

        let stored = store
            .find_one(
                Collection::Users,
                &Filter::by_id(ObjectId::parse_str(&id).unwrap()),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.get("mobile"), Some(&Value::from("5551234")));
        assert_eq!(stored.get("email"), Some(&Value::from("ann@example.com")));
        assert!(stored.get("nickname").is_none());
    }

    #[tokio::test]
    async fn test_patch_missing_document() {
        let (store, _) = seeded().await;
        let command = Command::new("x", Action::Patch, Collection::Users)
            .with_item_id("ffffffffffffffffffffffff")
            .with_item(doc(&[("name", "Z".into())]));
        assert!(matches!(
            patch(&store, &command).await.unwrap_err(),
            CrudError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_delete_nothing_matched_is_success() {
        let store = InMemoryStore::new();
        let command = Command::new("x", Action::Delete, Collection::Contacts)
            .with_item_id("507f1f77bcf86cd799439011");
        let envelope = delete(&store, &command).await.unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.get("deleted_count"), Some(&json!(0)));
    }
}
