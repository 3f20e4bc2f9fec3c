//! Preconditions and side effects around admin writes.
//!
//! None of these run in a transaction: a product created between
//! [`can_delete_category`] and the delete in [`delete_category`] is not seen.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use vitrine_core::CategoryId;

use crate::document::{Collection, Document, DocumentStore, Query};
use crate::error::RepositoryError;
use crate::repositories::to_body;
use crate::storage::ObjectStorage;

/// True iff no product references `category_id`.
///
/// # Errors
///
/// Returns an error if the product query fails.
pub async fn can_delete_category(
    store: &dyn DocumentStore,
    category_id: &CategoryId,
) -> Result<bool, RepositoryError> {
    let query = Query::new().filter_eq("categoryId", category_id.as_str());
    let referencing = store.list(Collection::Products, &query).await?;
    Ok(referencing.is_empty())
}

/// Delete a category after checking that nothing references it.
///
/// # Errors
///
/// Returns `Conflict` if at least one product references the category,
/// `NotFound` if it does not exist.
#[instrument(skip(store), fields(category_id = %category_id))]
pub async fn delete_category(
    store: &dyn DocumentStore,
    category_id: &CategoryId,
) -> Result<(), RepositoryError> {
    if !can_delete_category(store, category_id).await? {
        return Err(RepositoryError::Conflict(format!(
            "category {category_id} is still used by products"
        )));
    }
    store.delete(Collection::Categories, category_id.as_str()).await
}

/// Merge-update a document with the fields present in `patch`.
///
/// `patch` must serialize to a JSON object; keys it omits are left untouched
/// and `updatedAt` is refreshed by the store.
///
/// # Errors
///
/// Returns `InvalidPatch` for a non-object patch and `NotFound` if the
/// document does not exist.
pub async fn update_entity<P: Serialize + Sync>(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
    patch: &P,
) -> Result<Document, RepositoryError> {
    let body = to_body(patch)?;
    debug!(%collection, id, keys = ?body.keys().collect::<Vec<_>>(), "Merging patch");
    store.update(collection, id, body).await
}

/// Images in `old` that are no longer in `new`.
#[must_use]
pub fn dropped_images<'a>(old: &'a [String], new: &[String]) -> Vec<&'a str> {
    old.iter()
        .filter(|url| !new.contains(url))
        .map(String::as_str)
        .collect()
}

/// Image URLs stored under `field`, read from the raw document.
///
/// Accepts a single string or an array; anything else yields nothing, so a
/// record that no longer decodes can still be cleaned up.
#[must_use]
pub fn stored_image_urls(document: &Document, field: &str) -> Vec<String> {
    match document.data.get(field) {
        Some(Value::String(url)) => vec![url.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Delete the stored objects behind `urls`, best-effort.
///
/// Blank URLs and URLs that do not belong to `storage` are skipped. Failures
/// are logged at `warn` and otherwise ignored.
pub async fn delete_images<'a>(storage: &dyn ObjectStorage, urls: impl IntoIterator<Item = &'a str>) {
    let paths: Vec<String> = urls
        .into_iter()
        .filter(|url| !url.trim().is_empty())
        .filter_map(|url| {
            let path = storage.path_from_url(url);
            if path.is_none() {
                debug!(url, "Image is not in managed storage; leaving it");
            }
            path
        })
        .collect();

    for path in paths {
        if let Err(e) = storage.delete(&path).await {
            warn!(path = %path, error = %e, "Failed to delete image");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use serde_json::{Map, json};
    use vitrine_core::{
        CategoryPatch, MultilingualText, NewCategory, NewProduct, ProductPatch,
    };

    use super::*;
    use crate::memory::MemoryDocumentStore;
    use crate::repositories::{CategoryRepository, MediaRepository, ProductRepository};
    use crate::storage::MemoryObjectStorage;

    fn text(s: &str) -> MultilingualText {
        MultilingualText::new(format!("{s} ru"), format!("{s} uz"), s)
    }

    fn new_product(category_id: &CategoryId, images: Vec<String>) -> NewProduct {
        NewProduct {
            title: text("Feed pump"),
            description: text("Moves feed"),
            price: Decimal::new(150, 0),
            features: vec![],
            category_id: category_id.to_string(),
            images,
        }
    }

    #[tokio::test]
    async fn test_category_delete_scenario() {
        let store = MemoryDocumentStore::new();
        let storage = MemoryObjectStorage::new();
        let categories = CategoryRepository::new(&store);
        let products = ProductRepository::new(&store);

        let category = categories
            .create(&NewCategory {
                title: text("Feeders"),
            })
            .await
            .unwrap();
        let product = products
            .create(&new_product(&category.id, vec![]))
            .await
            .unwrap();

        assert!(!can_delete_category(&store, &category.id).await.unwrap());
        assert!(matches!(
            delete_category(&store, &category.id).await,
            Err(RepositoryError::Conflict(_))
        ));
        assert!(categories.get(&category.id).await.unwrap().is_some());

        products.delete(&product.id, &storage).await.unwrap();
        assert!(can_delete_category(&store, &category.id).await.unwrap());
        delete_category(&store, &category.id).await.unwrap();
        assert!(categories.get(&category.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_update_only_touches_supplied_fields() {
        let store = MemoryDocumentStore::new();
        let categories = CategoryRepository::new(&store);
        let category = categories
            .create(&NewCategory {
                title: text("Drinkers"),
            })
            .await
            .unwrap();
        let storage = MemoryObjectStorage::new();
        let products = ProductRepository::new(&store);
        let product = products
            .create(&new_product(&category.id, vec!["memory://objects/p/a.png".into()]))
            .await
            .unwrap();

        let patch = ProductPatch {
            price: Some(Decimal::new(200, 0)),
            ..ProductPatch::default()
        };
        let updated = products.update(&product.id, &patch, &storage).await.unwrap();

        assert_eq!(updated.price.amount(), Decimal::new(200, 0));
        assert_eq!(updated.title, product.title);
        assert_eq!(updated.images, product.images);
        assert_eq!(updated.category_id, product.category_id);
        assert_eq!(updated.created_at, product.created_at);
        assert!(updated.updated_at > product.updated_at);

        let renamed = categories
            .update(&category.id, &CategoryPatch { title: Some(text("Waterers")) })
            .await
            .unwrap();
        assert_eq!(renamed.created_at, category.created_at);
    }

    #[tokio::test]
    async fn test_update_entity_rejects_non_object_patch() {
        let store = MemoryDocumentStore::new();
        let err = update_entity(&store, Collection::Products, "p", &json!("price=5"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidPatch(_)));
    }

    #[tokio::test]
    async fn test_replacing_images_deletes_dropped_ones_after_update() {
        let store = MemoryDocumentStore::new();
        let storage = MemoryObjectStorage::new();
        let old = storage.upload("products/old.png", vec![1], "image/png").await.unwrap();
        let kept = storage.upload("products/kept.png", vec![2], "image/png").await.unwrap();
        let new = storage.upload("products/new.png", vec![3], "image/png").await.unwrap();

        let products = ProductRepository::new(&store);
        let product = products
            .create(&new_product(&CategoryId::new("c1"), vec![old.clone(), kept.clone()]))
            .await
            .unwrap();

        let patch = ProductPatch {
            images: Some(vec![kept.clone(), new.clone()]),
            ..ProductPatch::default()
        };
        let updated = products.update(&product.id, &patch, &storage).await.unwrap();

        assert_eq!(updated.images, vec![kept, new]);
        assert_eq!(
            storage.paths().await,
            vec!["products/kept.png".to_string(), "products/new.png".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_product_survives_missing_image() {
        let store = MemoryDocumentStore::new();
        let storage = MemoryObjectStorage::new();
        let present = storage.upload("products/a.png", vec![1], "image/png").await.unwrap();
        let products = ProductRepository::new(&store);
        let product = products
            .create(&new_product(
                &CategoryId::new("c1"),
                vec![
                    "memory://objects/products/gone.png".to_string(),
                    present,
                    "https://elsewhere.example.com/x.png".to_string(),
                ],
            ))
            .await
            .unwrap();

        products.delete(&product.id, &storage).await.unwrap();
        assert!(products.get(&product.id).await.unwrap().is_none());
        assert!(storage.paths().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_malformed_product_removes_record_and_images() {
        let store = MemoryDocumentStore::new();
        let storage = MemoryObjectStorage::new();
        let image = storage.upload("products/x.png", vec![1], "image/png").await.unwrap();

        let mut body = Map::new();
        body.insert("title".to_string(), json!(42));
        body.insert("price".to_string(), json!("not-a-number"));
        body.insert("images".to_string(), json!([image, 7]));
        let document = store.insert(Collection::Products, body).await.unwrap();

        let products = ProductRepository::new(&store);
        let id = vitrine_core::ProductId::new(&document.id);
        assert!(matches!(
            products.get(&id).await,
            Err(RepositoryError::DataCorruption(_))
        ));

        products.delete(&id, &storage).await.unwrap();
        assert!(store.get(Collection::Products, &document.id).await.unwrap().is_none());
        assert!(storage.paths().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_malformed_media_removes_record_and_image() {
        let store = MemoryDocumentStore::new();
        let storage = MemoryObjectStorage::new();
        let image = storage.upload("media/logo.png", vec![1], "image/png").await.unwrap();

        let mut body = Map::new();
        body.insert("type".to_string(), json!("poster"));
        body.insert("imageUrl".to_string(), json!(image));
        let document = store.insert(Collection::Media, body).await.unwrap();

        let media = MediaRepository::new(&store);
        let id = vitrine_core::MediaId::new(&document.id);
        media.delete(&id, &storage).await.unwrap();
        assert!(store.get(Collection::Media, &document.id).await.unwrap().is_none());
        assert!(storage.paths().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let store = MemoryDocumentStore::new();
        let storage = MemoryObjectStorage::new();
        let result = ProductRepository::new(&store)
            .delete(&vitrine_core::ProductId::new("missing"), &storage)
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    /// Store whose merge-updates always fail.
    struct FailingUpdates(MemoryDocumentStore);

    #[async_trait]
    impl DocumentStore for FailingUpdates {
        async fn list(
            &self,
            collection: Collection,
            query: &Query,
        ) -> Result<Vec<Document>, RepositoryError> {
            self.0.list(collection, query).await
        }

        async fn get(
            &self,
            collection: Collection,
            id: &str,
        ) -> Result<Option<Document>, RepositoryError> {
            self.0.get(collection, id).await
        }

        async fn insert(
            &self,
            collection: Collection,
            body: Map<String, Value>,
        ) -> Result<Document, RepositoryError> {
            self.0.insert(collection, body).await
        }

        async fn update(
            &self,
            _collection: Collection,
            _id: &str,
            _patch: Map<String, Value>,
        ) -> Result<Document, RepositoryError> {
            Err(RepositoryError::DataCorruption("backend unavailable".to_string()))
        }

        async fn delete(&self, collection: Collection, id: &str) -> Result<(), RepositoryError> {
            self.0.delete(collection, id).await
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failed_update_keeps_old_images() {
        let store = FailingUpdates(MemoryDocumentStore::new());
        let storage = MemoryObjectStorage::new();
        let old = storage.upload("products/old.png", vec![1], "image/png").await.unwrap();

        let products = ProductRepository::new(&store);
        let product = products
            .create(&new_product(&CategoryId::new("c1"), vec![old]))
            .await
            .unwrap();

        let patch = ProductPatch {
            images: Some(vec![]),
            ..ProductPatch::default()
        };
        assert!(products.update(&product.id, &patch, &storage).await.is_err());
        assert_eq!(storage.paths().await, vec!["products/old.png".to_string()]);
    }

    #[test]
    fn test_dropped_images() {
        let old = vec!["a".to_string(), "b".to_string()];
        let new = vec!["b".to_string(), "c".to_string()];
        assert_eq!(dropped_images(&old, &new), vec!["a"]);
        assert!(dropped_images(&[], &new).is_empty());
    }
}
