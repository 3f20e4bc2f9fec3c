//! The document store abstraction.
//!
//! A document is a JSON object stored under `(collection, id)`. The store owns
//! the id and both timestamps: they are kept beside the JSON body, never
//! inside it, and are merged back in when a document is read as an entity.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::RepositoryError;

/// Keys the store manages itself. They are stripped from every write.
pub const RESERVED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// The collections Vitrine stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Products,
    Categories,
    Media,
    Applications,
}

impl Collection {
    pub const ALL: [Self; 4] = [
        Self::Products,
        Self::Categories,
        Self::Media,
        Self::Applications,
    ];

    /// Name used as the collection key in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Media => "media",
            Self::Applications => "applications",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    /// JSON body without the reserved keys.
    pub data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// The full JSON view: body plus `id`, `createdAt` and `updatedAt`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = self.data.clone();
        object.insert("id".to_owned(), Value::String(self.id.clone()));
        object.insert(
            "createdAt".to_owned(),
            Value::String(self.created_at.to_rfc3339()),
        );
        object.insert(
            "updatedAt".to_owned(),
            Value::String(self.updated_at.to_rfc3339()),
        );
        Value::Object(object)
    }

    /// Deserialize into a typed entity.
    ///
    /// # Errors
    ///
    /// Returns `DataCorruption` if the stored body does not fit `T`.
    pub fn into_entity<T: DeserializeOwned>(self) -> Result<T, RepositoryError> {
        let id = self.id.clone();
        serde_json::from_value(self.to_json()).map_err(|e| {
            RepositoryError::DataCorruption(format!("document {id} has unexpected shape: {e}"))
        })
    }
}

/// Turn a serialized write input into a storable JSON object.
///
/// # Errors
///
/// Returns `InvalidPatch` if `value` is not a JSON object.
pub fn into_body(value: Value) -> Result<Map<String, Value>, RepositoryError> {
    match value {
        Value::Object(mut object) => {
            for key in RESERVED_KEYS {
                object.remove(key);
            }
            Ok(object)
        }
        other => Err(RepositoryError::InvalidPatch(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Timestamp a query can order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: SortField,
    pub direction: Direction,
}

/// Equality filter on one top-level body field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

/// A collection query. The default returns every document, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Filter>,
    pub order_by: Option<OrderBy>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep documents whose `field` equals `value`.
    #[must_use]
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub const fn order_by(mut self, field: SortField, direction: Direction) -> Self {
        self.order_by = Some(OrderBy { field, direction });
        self
    }

    /// Most recently created first.
    #[must_use]
    pub fn newest_first() -> Self {
        Self::new().order_by(SortField::CreatedAt, Direction::Desc)
    }
}

/// Persistent JSON document storage.
///
/// Implementations assign ids and timestamps. `update` merges the given keys
/// into the stored body (keys not mentioned are left alone) and refreshes
/// `updated_at`. There are no transactions across calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents in `collection` matching `query`.
    async fn list(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Document>, RepositoryError>;

    /// One document, or `None` if it does not exist.
    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, RepositoryError>;

    /// Store a new document under a generated id.
    async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
    ) -> Result<Document, RepositoryError>;

    /// Merge `patch` into an existing document.
    ///
    /// Returns `NotFound` if the document does not exist.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Document, RepositoryError>;

    /// Hard-delete a document. Returns `NotFound` if it does not exist.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), RepositoryError>;

    /// Number of documents in `collection`.
    async fn count(&self, collection: Collection) -> Result<usize, RepositoryError> {
        Ok(self.list(collection, &Query::new()).await?.len())
    }

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_into_body_strips_reserved_keys() {
        let body = into_body(json!({"id": "x", "createdAt": "t", "title": "a"})).unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body["title"], "a");
    }

    #[test]
    fn test_into_body_rejects_non_objects() {
        let err = into_body(json!([1, 2])).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidPatch(msg) if msg.contains("an array")));
    }

    #[test]
    fn test_to_json_includes_store_fields() {
        let now = Utc::now();
        let doc = Document {
            id: "c1".to_owned(),
            data: into_body(json!({"title": "x"})).unwrap(),
            created_at: now,
            updated_at: now,
        };
        let value = doc.to_json();
        assert_eq!(value["id"], "c1");
        assert!(value["createdAt"].is_string());
        assert_eq!(value["title"], "x");
    }
}
