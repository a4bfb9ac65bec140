//! Document Store
//!
//! The dispatcher only sees [`DocumentStore`]. [`InMemoryStore`] is the
//! adapter shipped with the crate; [`seed`] preloads it from a JSON file.

mod memory;
pub mod options;
pub mod seed;

use async_trait::async_trait;
use serde::Serialize;

pub use memory::InMemoryStore;
pub use options::{FindOptions, Projection, SortDirection, SortKey};
pub use seed::load_seed_file;

use crate::error::StoreError;
use crate::filter::Filter;
use crate::schema::Collection;
use crate::value::{Document, Value};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertOneResult {
    pub inserted_id: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Single-document operations over named collections
///
/// Writes touch at most the first matching document. Nothing is retried.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: Collection, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Matching documents, sorted, then cut to `options.limit`, then projected
    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// Store `document`, assigning `_id` when it has none
    async fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<InsertOneResult>;

    /// Replace the whole document, keeping its `_id`
    async fn replace_one(
        &self,
        collection: Collection,
        filter: &Filter,
        document: Document,
    ) -> StoreResult<UpdateResult>;

    /// Overwrite only the given top-level fields
    async fn update_fields(
        &self,
        collection: Collection,
        filter: &Filter,
        fields: Document,
    ) -> StoreResult<UpdateResult>;

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<DeleteResult>;

    /// Release resources; later calls fail with `StoreError::Unavailable`
    async fn close(&self);
}
