//! In-memory document store

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DeleteResult, DocumentStore, FindOptions, InsertOneResult, StoreResult, UpdateResult};
use crate::error::StoreError;
use crate::filter::Filter;
use crate::schema::Collection;
use crate::value::{Document, ObjectId, Value, ID_FIELD};

/// Collections held in insertion order behind one lock
///
/// Each write holds the write lock for its whole read-modify-write, which
/// makes single-document operations atomic.
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    closed: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of documents in `collection`
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(StoreError::Unavailable("store is closed".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalise a supplied `_id`: hex strings become identifiers
fn identifier_of(document: &Document) -> Option<Value> {
    document.get(ID_FIELD).map(|id| match id {
        Value::String(s) => ObjectId::parse_str(s)
            .map(Value::ObjectId)
            .unwrap_or_else(|_| id.clone()),
        other => other.clone(),
    })
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find_one(&self, collection: Collection, filter: &Filter) -> StoreResult<Option<Document>> {
        self.ensure_open()?;
        let compiled = filter.compile()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| compiled.matches(doc)))
            .cloned())
    }

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        self.ensure_open()?;
        let compiled = filter.compile()?;
        let mut matched: Vec<Document> = {
            let collections = self.collections.read().await;
            let Some(docs) = collections.get(&collection) else {
                return Ok(Vec::new());
            };
            if options.sort.is_empty() {
                docs.iter()
                    .filter(|doc| compiled.matches(doc))
                    .take(options.limit)
                    .cloned()
                    .collect()
            } else {
                docs.iter().filter(|doc| compiled.matches(doc)).cloned().collect()
            }
        };
        options.sort_documents(&mut matched);
        matched.truncate(options.limit);
        Ok(matched.into_iter().map(|doc| options.project(doc)).collect())
    }

    async fn insert_one(&self, collection: Collection, mut document: Document) -> StoreResult<InsertOneResult> {
        self.ensure_open()?;
        let id = identifier_of(&document).unwrap_or_else(|| Value::ObjectId(ObjectId::new()));

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if docs
            .iter()
            .any(|doc| doc.get(ID_FIELD).is_some_and(|existing| existing.matches(&id)))
        {
            let rendered = match &id {
                Value::ObjectId(oid) => oid.to_hex(),
                other => other.to_json().to_string(),
            };
            return Err(StoreError::DuplicateKey(rendered));
        }

        document.insert(ID_FIELD.to_string(), id.clone());
        docs.push(document);
        tracing::debug!(collection = %collection, "document inserted");
        Ok(InsertOneResult { inserted_id: id })
    }

    async fn replace_one(
        &self,
        collection: Collection,
        filter: &Filter,
        mut document: Document,
    ) -> StoreResult<UpdateResult> {
        self.ensure_open()?;
        let compiled = filter.compile()?;
        let mut collections = self.collections.write().await;
        let Some(existing) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| compiled.matches(doc)))
        else {
            return Ok(UpdateResult::default());
        };

        match existing.get(ID_FIELD) {
            Some(id) => {
                document.insert(ID_FIELD.to_string(), id.clone());
            }
            None => {
                document.remove(ID_FIELD);
            }
        }
        let modified = *existing != document;
        if modified {
            *existing = document;
        }
        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn update_fields(
        &self,
        collection: Collection,
        filter: &Filter,
        fields: Document,
    ) -> StoreResult<UpdateResult> {
        self.ensure_open()?;
        let compiled = filter.compile()?;
        let mut collections = self.collections.write().await;
        let Some(existing) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| compiled.matches(doc)))
        else {
            return Ok(UpdateResult::default());
        };

        let mut modified = false;
        for (field, value) in fields {
            if field == ID_FIELD {
                continue;
            }
            if existing.get(&field) != Some(&value) {
                existing.insert(field, value);
                modified = true;
            }
        }
        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<DeleteResult> {
        self.ensure_open()?;
        let compiled = filter.compile()?;
        let mut collections = self.collections.write().await;
        let deleted = match collections.get_mut(&collection) {
            Some(docs) => match docs.iter().position(|doc| compiled.matches(doc)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };
        Ok(DeleteResult {
            deleted_count: deleted,
        })
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.collections.write().await.clear();
            tracing::debug!("in-memory store closed");
        }
    }
}
