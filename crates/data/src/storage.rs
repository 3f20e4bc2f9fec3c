//! Object storage for uploaded images.
//!
//! Objects are addressed by a slash-separated path inside one bucket and
//! served from `{endpoint}/{bucket}/{path}`. Records only keep the public URL,
//! so [`ObjectStorage::path_from_url`] recovers the path when an image has to
//! be deleted.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use crate::error::StorageError;

/// Binary object storage.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `path` and return the public URL.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Public URL of the object at `path`.
    fn download_url(&self, path: &str) -> String;

    /// Delete the object at `path`.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Recover the object path from a URL produced by this storage, or `None`
    /// if the URL points elsewhere.
    fn path_from_url(&self, url: &str) -> Option<String>;
}

/// Build a unique object path for an upload: `{folder}/{uuid}-{name}`.
///
/// The file name is reduced to ASCII alphanumerics, `.`, `-` and `_`.
#[must_use]
pub fn object_path(folder: &str, file_name: &str) -> String {
    let cleaned: String = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('-');
    let name = if cleaned.is_empty() { "upload" } else { cleaned };

    format!(
        "{}/{}-{name}",
        folder.trim_matches('/'),
        Uuid::new_v4().simple()
    )
}

fn validate_path(path: &str) -> Result<(), StorageError> {
    let bad = path.is_empty()
        || path.starts_with('/')
        || path.split('/').any(|segment| segment.is_empty() || segment == "..");
    if bad {
        return Err(StorageError::InvalidPath(path.to_owned()));
    }
    Ok(())
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn decode_path(encoded: &str) -> Option<String> {
    let decoded = encoded
        .split('/')
        .map(|segment| urlencoding::decode(segment).ok().map(|s| s.into_owned()))
        .collect::<Option<Vec<_>>>()?
        .join("/");
    validate_path(&decoded).ok().map(|()| decoded)
}

// =============================================================================
// HTTP bucket
// =============================================================================

/// Object storage over an HTTP bucket API.
///
/// `PUT {endpoint}/{bucket}/{path}` uploads, `DELETE` on the same URL removes,
/// and the same URL serves the object publicly. Requests carry the token as a
/// bearer credential when one is configured.
#[derive(Clone)]
pub struct HttpObjectStorage {
    client: reqwest::Client,
    base: String,
    token: Option<SecretString>,
}

impl std::fmt::Debug for HttpObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpObjectStorage")
            .field("base", &self.base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl HttpObjectStorage {
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: &Url, bucket: &str, token: Option<SecretString>) -> Self {
        let base = format!(
            "{}/{}",
            endpoint.as_str().trim_end_matches('/'),
            urlencoding::encode(bucket.trim_matches('/'))
        );
        Self {
            client,
            base,
            token,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }
}

async fn check_status(response: reqwest::Response, path: &str) -> Result<(), StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(StorageError::NotFound(path.to_owned()));
    }
    let message = response.text().await.unwrap_or_default();
    Err(StorageError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        validate_path(path)?;
        let url = self.download_url(path);
        let response = self
            .authorize(self.client.put(&url))
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        check_status(response, path).await?;
        Ok(url)
    }

    fn download_url(&self, path: &str) -> String {
        format!("{}/{}", self.base, encode_path(path))
    }

    #[instrument(skip(self))]
    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        validate_path(path)?;
        let response = self
            .authorize(self.client.delete(self.download_url(path)))
            .send()
            .await?;
        check_status(response, path).await
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        let rest = url.strip_prefix(&self.base)?.strip_prefix('/')?;
        let rest = rest.split(['?', '#']).next().unwrap_or(rest);
        decode_path(rest)
    }
}

// =============================================================================
// In memory
// =============================================================================

/// A stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object storage held in process. URLs use the `memory://` scheme.
#[derive(Debug, Default)]
pub struct MemoryObjectStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
}

const MEMORY_URL_PREFIX: &str = "memory://objects/";

impl MemoryObjectStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The object at `path`, if present.
    pub async fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    /// Paths of every stored object, sorted.
    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.objects.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        validate_path(path)?;
        self.objects.write().await.insert(
            path.to_owned(),
            StoredObject {
                bytes,
                content_type: content_type.to_owned(),
            },
        );
        Ok(self.download_url(path))
    }

    fn download_url(&self, path: &str) -> String {
        format!("{MEMORY_URL_PREFIX}{}", encode_path(path))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.objects
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(path.to_owned()))
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(MEMORY_URL_PREFIX).and_then(decode_path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn http_storage() -> HttpObjectStorage {
        let endpoint = Url::parse("https://storage.example.com/v1/").unwrap();
        HttpObjectStorage::new(reqwest::Client::new(), &endpoint, "catalog", None)
    }

    #[test]
    fn test_object_path_sanitizes_name() {
        let path = object_path("products", "C:\\Photos\\Feed Pump (1).JPG");
        assert!(path.starts_with("products/"));
        assert!(path.ends_with("-feed-pump--1-.jpg"));
        assert!(!path.contains(' '));

        let path = object_path("/media/", "???");
        assert!(path.starts_with("media/"));
        assert!(path.ends_with("-upload"));
    }

    #[test]
    fn test_http_url_round_trip() {
        let storage = http_storage();
        let url = storage.download_url("products/abc-pump photo.png");
        assert_eq!(
            url,
            "https://storage.example.com/v1/catalog/products/abc-pump%20photo.png"
        );
        assert_eq!(
            storage.path_from_url(&url).as_deref(),
            Some("products/abc-pump photo.png")
        );
    }

    #[test]
    fn test_foreign_urls_are_ignored() {
        let storage = http_storage();
        assert_eq!(storage.path_from_url("https://cdn.other.com/x.png"), None);
        assert_eq!(
            storage.path_from_url("https://storage.example.com/v1/catalog/../secret"),
            None
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let endpoint = Url::parse("https://storage.example.com").unwrap();
        let storage = HttpObjectStorage::new(
            reqwest::Client::new(),
            &endpoint,
            "catalog",
            Some(SecretString::from("super-secret-token")),
        );
        let debug = format!("{storage:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_memory_storage_lifecycle() {
        let storage = MemoryObjectStorage::new();
        let url = storage
            .upload("media/logo.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        let path = storage.path_from_url(&url).unwrap();
        assert_eq!(path, "media/logo.png");
        assert_eq!(storage.object(&path).await.unwrap().bytes, vec![1, 2, 3]);

        storage.delete(&path).await.unwrap();
        assert!(matches!(
            storage.delete(&path).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_traversal_paths() {
        let storage = MemoryObjectStorage::new();
        assert!(matches!(
            storage.upload("../etc/passwd", vec![], "text/plain").await,
            Err(StorageError::InvalidPath(_))
        ));
    }
}
