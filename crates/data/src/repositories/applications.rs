//! Customer application repository.

use tracing::instrument;
use vitrine_core::{Application, ApplicationId, ApplicationPatch, ApplicationStatus, NewApplication};

use super::{fetch_all, fetch_one, insert};
use crate::document::{Collection, DocumentStore, Query};
use crate::error::RepositoryError;
use crate::guards;

/// Repository for contact-form applications.
pub struct ApplicationRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ApplicationRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Applications, newest first, optionally only those with `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, RepositoryError> {
        let query = match status {
            Some(status) => Query::newest_first().filter_eq("status", status.as_str()),
            None => Query::newest_first(),
        };
        fetch_all(self.store, Collection::Applications, &query).await
    }

    /// # Errors
    ///
    /// Returns an error if the store query fails or the document is malformed.
    pub async fn get(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        fetch_one(self.store, Collection::Applications, id.as_str()).await
    }

    /// Store a validated submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &NewApplication) -> Result<Application, RepositoryError> {
        insert(self.store, Collection::Applications, input).await
    }

    /// Change the status. Any transition is accepted.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the application does not exist.
    #[instrument(skip(self, patch), fields(application_id = %id))]
    pub async fn update(
        &self,
        id: &ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<Application, RepositoryError> {
        guards::update_entity(self.store, Collection::Applications, id.as_str(), patch)
            .await?
            .into_entity()
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the application does not exist.
    #[instrument(skip(self), fields(application_id = %id))]
    pub async fn delete(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        self.store.delete(Collection::Applications, id.as_str()).await
    }
}
