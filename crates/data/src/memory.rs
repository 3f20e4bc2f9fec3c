//! In-process document store for tests and local development.
//!
//! Behaves like [`PgDocumentStore`](crate::PgDocumentStore): generated ids,
//! store-owned timestamps, top-level merge on update. Timestamps are strictly
//! increasing so ordering by `createdAt` is deterministic even when documents
//! are written within the same clock tick.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::document::{Collection, Direction, Document, DocumentStore, Query, SortField};
use crate::error::RepositoryError;

#[derive(Debug, Default)]
struct Inner {
    collections: HashMap<Collection, HashMap<String, Document>>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Inner {
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }
}

/// Document store held in memory behind a `tokio` `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_key(doc: &Document, field: SortField) -> DateTime<Utc> {
    match field {
        SortField::CreatedAt => doc.created_at,
        SortField::UpdatedAt => doc.updated_at,
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Document>, RepositoryError> {
        let inner = self.inner.read().await;
        let mut docs: Vec<Document> = inner
            .collections
            .get(&collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| {
                        query
                            .filter
                            .as_ref()
                            .is_none_or(|f| doc.data.get(&f.field) == Some(&f.value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let order = query.order_by.unwrap_or(crate::document::OrderBy {
            field: SortField::CreatedAt,
            direction: Direction::Asc,
        });
        docs.sort_by(|a, b| {
            let ordering = sort_key(a, order.field)
                .cmp(&sort_key(b, order.field))
                .then_with(|| a.id.cmp(&b.id));
            match order.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });

        Ok(docs)
    }

    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .collections
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
    ) -> Result<Document, RepositoryError> {
        let mut inner = self.inner.write().await;
        let now = inner.next_timestamp();
        let doc = Document {
            id: Uuid::new_v4().simple().to_string(),
            data: body,
            created_at: now,
            updated_at: now,
        };
        inner
            .collections
            .entry(collection)
            .or_default()
            .insert(doc.id.clone(), doc.clone());
        Ok(doc)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Document, RepositoryError> {
        let mut inner = self.inner.write().await;
        let now = inner.next_timestamp();
        let doc = inner
            .collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or(RepositoryError::NotFound)?;

        doc.data.extend(patch);
        doc.updated_at = now;
        Ok(doc.clone())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        inner
            .collections
            .get_mut(&collection)
            .and_then(|docs| docs.remove(id))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::document::into_body;

    fn body(value: Value) -> Map<String, Value> {
        into_body(value).unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = MemoryDocumentStore::new();
        let doc = store
            .insert(Collection::Categories, body(json!({"title": "Feeders"})))
            .await
            .unwrap();
        assert!(!doc.id.is_empty());
        assert_eq!(doc.created_at, doc.updated_at);

        let fetched = store.get(Collection::Categories, &doc.id).await.unwrap();
        assert_eq!(fetched, Some(doc));
    }

    #[tokio::test]
    async fn test_update_merges_only_supplied_keys() {
        let store = MemoryDocumentStore::new();
        let doc = store
            .insert(
                Collection::Products,
                body(json!({"title": "Pump", "price": "10", "images": ["a"]})),
            )
            .await
            .unwrap();

        let updated = store
            .update(Collection::Products, &doc.id, body(json!({"price": "12"})))
            .await
            .unwrap();

        assert_eq!(updated.data["price"], "12");
        assert_eq!(updated.data["title"], "Pump");
        assert_eq!(updated.data["images"], json!(["a"]));
        assert_eq!(updated.created_at, doc.created_at);
        assert!(updated.updated_at > doc.updated_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_not_found() {
        let store = MemoryDocumentStore::new();
        assert!(matches!(
            store.update(Collection::Media, "nope", Map::new()).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store.delete(Collection::Media, "nope").await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let store = MemoryDocumentStore::new();
        for (title, category) in [("a", "c1"), ("b", "c2"), ("c", "c1")] {
            store
                .insert(
                    Collection::Products,
                    body(json!({"title": title, "categoryId": category})),
                )
                .await
                .unwrap();
        }

        let query = Query::newest_first().filter_eq("categoryId", "c1");
        let docs = store.list(Collection::Products, &query).await.unwrap();
        let titles: Vec<_> = docs.iter().map(|d| d.data["title"].clone()).collect();
        assert_eq!(titles, vec![json!("c"), json!("a")]);

        assert_eq!(store.count(Collection::Products).await.unwrap(), 3);
        assert_eq!(store.count(Collection::Media).await.unwrap(), 0);
    }
}
