//! Category repository.

use tracing::instrument;
use vitrine_core::{Category, CategoryId, CategoryPatch, NewCategory};

use super::{fetch_all, fetch_one, insert};
use crate::document::{Collection, DocumentStore, Query};
use crate::error::RepositoryError;
use crate::guards;

/// Repository for product categories.
pub struct CategoryRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// All categories, oldest first (the order they appear in navigation).
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        fetch_all(self.store, Collection::Categories, &Query::new()).await
    }

    /// # Errors
    ///
    /// Returns an error if the store query fails or the document is malformed.
    pub async fn get(&self, id: &CategoryId) -> Result<Option<Category>, RepositoryError> {
        fetch_one(self.store, Collection::Categories, id.as_str()).await
    }

    /// # Errors
    ///
    /// Returns an error if the store write fails.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &NewCategory) -> Result<Category, RepositoryError> {
        insert(self.store, Collection::Categories, input).await
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the category does not exist.
    #[instrument(skip(self, patch), fields(category_id = %id))]
    pub async fn update(
        &self,
        id: &CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category, RepositoryError> {
        guards::update_entity(self.store, Collection::Categories, id.as_str(), patch)
            .await?
            .into_entity()
    }

    /// True if no product references the category.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn can_delete(&self, id: &CategoryId) -> Result<bool, RepositoryError> {
        guards::can_delete_category(self.store, id).await
    }

    /// Delete a category that no product references.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if a product still references it and `NotFound` if
    /// it does not exist.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete(&self, id: &CategoryId) -> Result<(), RepositoryError> {
        guards::delete_category(self.store, id).await
    }
}
