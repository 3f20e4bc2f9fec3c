//! Media repository (certificates and partner logos).

use tracing::instrument;
use vitrine_core::{Media, MediaId, MediaPatch, MediaType, NewMedia};

use super::{fetch_all, fetch_one, insert};
use crate::document::{Collection, DocumentStore, Query};
use crate::error::RepositoryError;
use crate::guards;
use crate::storage::ObjectStorage;

/// Repository for about-page media.
pub struct MediaRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> MediaRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Media, oldest first, optionally only one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list(&self, kind: Option<MediaType>) -> Result<Vec<Media>, RepositoryError> {
        let query = match kind {
            Some(kind) => Query::new().filter_eq("type", kind.as_str()),
            None => Query::new(),
        };
        fetch_all(self.store, Collection::Media, &query).await
    }

    /// # Errors
    ///
    /// Returns an error if the store query fails or the document is malformed.
    pub async fn get(&self, id: &MediaId) -> Result<Option<Media>, RepositoryError> {
        fetch_one(self.store, Collection::Media, id.as_str()).await
    }

    /// # Errors
    ///
    /// Returns an error if the store write fails.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &NewMedia) -> Result<Media, RepositoryError> {
        insert(self.store, Collection::Media, input).await
    }

    /// Merge `patch` into the record. A replaced image is deleted after the
    /// record is saved.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist. On error no image is
    /// deleted.
    #[instrument(skip(self, patch, storage), fields(media_id = %id))]
    pub async fn update(
        &self,
        id: &MediaId,
        patch: &MediaPatch,
        storage: &dyn ObjectStorage,
    ) -> Result<Media, RepositoryError> {
        let current: Media = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        let updated: Media = guards::update_entity(self.store, Collection::Media, id.as_str(), patch)
            .await?
            .into_entity()?;

        if current.image_url != updated.image_url {
            guards::delete_images(storage, [current.image_url.as_str()]).await;
        }

        Ok(updated)
    }

    /// Delete the record, then its image.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    #[instrument(skip(self, storage), fields(media_id = %id))]
    pub async fn delete(&self, id: &MediaId, storage: &dyn ObjectStorage) -> Result<(), RepositoryError> {
        let images = self
            .store
            .get(Collection::Media, id.as_str())
            .await?
            .map(|document| guards::stored_image_urls(&document, "imageUrl"))
            .unwrap_or_default();
        self.store.delete(Collection::Media, id.as_str()).await?;

        guards::delete_images(storage, images.iter().map(String::as_str)).await;
        Ok(())
    }
}
