//! Product repository.
//!
//! Products own their images: deleting a product deletes its stored images,
//! and an update that replaces the image list deletes the images it dropped.
//! Image deletion always runs after the record write and is best-effort.

use tracing::instrument;
use vitrine_core::{CategoryId, NewProduct, Product, ProductId, ProductPatch};

use super::{fetch_all, fetch_one, insert};
use crate::document::{Collection, DocumentStore, Query};
use crate::error::RepositoryError;
use crate::guards;
use crate::storage::ObjectStorage;

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        fetch_all(self.store, Collection::Products, &Query::newest_first()).await
    }

    /// Products filed under `category_id`, in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let query = Query::new().filter_eq("categoryId", category_id.as_str());
        fetch_all(self.store, Collection::Products, &query).await
    }

    /// # Errors
    ///
    /// Returns an error if the store query fails or the document is malformed.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        fetch_one(self.store, Collection::Products, id.as_str()).await
    }

    /// # Errors
    ///
    /// Returns an error if the store write fails.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        insert(self.store, Collection::Products, input).await
    }

    /// Merge `patch` into the product. If the patch carries a new image list,
    /// images missing from it are deleted once the record is saved.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist. On error no image is
    /// deleted.
    #[instrument(skip(self, patch, storage), fields(product_id = %id))]
    pub async fn update(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
        storage: &dyn ObjectStorage,
    ) -> Result<Product, RepositoryError> {
        let current: Product = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        let updated: Product =
            guards::update_entity(self.store, Collection::Products, id.as_str(), patch)
                .await?
                .into_entity()?;

        if patch.images.is_some() {
            let dropped = guards::dropped_images(&current.images, &updated.images);
            guards::delete_images(storage, dropped).await;
        }

        Ok(updated)
    }

    /// Delete the product, then its images.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist.
    #[instrument(skip(self, storage), fields(product_id = %id))]
    pub async fn delete(
        &self,
        id: &ProductId,
        storage: &dyn ObjectStorage,
    ) -> Result<(), RepositoryError> {
        // Raw read so a record that no longer decodes can still be removed
        let images = self
            .store
            .get(Collection::Products, id.as_str())
            .await?
            .map(|document| guards::stored_image_urls(&document, "images"))
            .unwrap_or_default();
        self.store.delete(Collection::Products, id.as_str()).await?;

        guards::delete_images(storage, images.iter().map(String::as_str)).await;
        Ok(())
    }
}
