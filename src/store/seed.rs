//! Preload a store from a JSON file
//!
//! ```json
//! { "users": [ {"name": "Ann", "email": "ann@example.com"} ], "tasks": [] }
//! ```
//!
//! Top-level keys must be registered collections. `_id` values that look
//! like identifiers are stored as identifiers.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use super::DocumentStore;
use crate::schema::Collection;
use crate::value::document_from_json;

/// Insert every document in the file; returns how many were inserted
pub async fn load_seed_file(store: &dyn DocumentStore, path: &Path) -> Result<usize> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Seed file {} is not valid JSON", path.display()))?;
    let serde_json::Value::Object(sections) = parsed else {
        bail!("Seed file must map collection names to arrays of documents");
    };

    let mut inserted = 0;
    for (name, documents) in sections {
        let collection: Collection = name
            .parse()
            .map_err(|e| anyhow!("Seed file section '{}': {}", name, e))?;
        let serde_json::Value::Array(documents) = documents else {
            bail!("Seed file section '{}' must be an array", name);
        };
        for (index, json) in documents.into_iter().enumerate() {
            let document = document_from_json(json)
                .ok_or_else(|| anyhow!("{}[{}] is not an object", name, index))?;
            store
                .insert_one(collection, document)
                .await
                .with_context(|| format!("Failed to insert {}[{}]", name, index))?;
            inserted += 1;
        }
    }

    info!(path = %path.display(), inserted, "seed file loaded");
    Ok(inserted)
}
