//! Typed repositories, one per collection.
//!
//! Each repository borrows the shared [`DocumentStore`] and converts between
//! stored documents and `vitrine_core` entities. Inputs are expected to be
//! validated by the caller; repositories only persist them.

pub mod applications;
pub mod categories;
pub mod media;
pub mod products;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

pub use applications::ApplicationRepository;
pub use categories::CategoryRepository;
pub use media::MediaRepository;
pub use products::ProductRepository;

use crate::document::{Collection, DocumentStore, Query, into_body};
use crate::error::RepositoryError;

/// Every document matching `query` that deserializes as `T`.
///
/// Documents of the wrong shape are logged and skipped so one bad record
/// cannot take down a whole listing.
pub(crate) async fn fetch_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    query: &Query,
) -> Result<Vec<T>, RepositoryError> {
    let docs = store.list(collection, query).await?;
    Ok(docs
        .into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            doc.into_entity()
                .map_err(|e| warn!(%collection, %id, error = %e, "Skipping malformed document"))
                .ok()
        })
        .collect())
}

/// One document as `T`, or `None` if it does not exist.
pub(crate) async fn fetch_one<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
) -> Result<Option<T>, RepositoryError> {
    store
        .get(collection, id)
        .await?
        .map(crate::document::Document::into_entity)
        .transpose()
}

/// Serialize a write input into a storable body.
pub(crate) fn to_body<T: Serialize>(input: &T) -> Result<Map<String, Value>, RepositoryError> {
    into_body(serde_json::to_value(input)?)
}

/// Insert a serialized input and read it back as `T`.
pub(crate) async fn insert<I: Serialize, T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    input: &I,
) -> Result<T, RepositoryError> {
    store
        .insert(collection, to_body(input)?)
        .await?
        .into_entity()
}
