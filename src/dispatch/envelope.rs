//! Uniform result shape
//!
//! `{"success": true, "action": …, "collection": …, <handler fields>}` or
//! `{"success": false, "error": …, "action": …, "collection": …}`.

use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::command::Action;
use crate::schema::Collection;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub action: Action,
    pub collection: Collection,
    /// Handler-specific fields, already serialized
    #[serde(flatten)]
    pub body: Map<String, Json>,
}

impl Envelope {
    pub fn ok(action: Action, collection: Collection) -> Self {
        Self {
            success: true,
            error: None,
            action,
            collection,
            body: Map::new(),
        }
    }

    pub fn failed(action: Action, collection: Collection, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            action,
            collection,
            body: Map::new(),
        }
    }

    /// Add a handler field
    pub fn with(mut self, key: &str, value: impl Into<Json>) -> Self {
        self.body.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Json> {
        self.body.get(key)
    }

    pub fn to_json(&self) -> Json {
        serde_json::to_value(self).unwrap_or(Json::Null)
    }
}
