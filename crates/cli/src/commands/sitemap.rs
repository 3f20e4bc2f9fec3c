//! Sitemap export.
//!
//! Writes the same document the storefront serves at `/sitemap.xml`, for
//! hosts that want a static copy.

use std::path::Path;

use url::Url;
use vitrine_core::sitemap::{self, SitemapEntry};
use vitrine_data::{DocumentStore, ProductRepository, RepositoryError};

use super::{ConnectError, connect_store};

#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Invalid base URL '{0}': must be an absolute http(s) URL")]
    InvalidBaseUrl(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Cannot write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Normalize `base_url` to `scheme://host[:port][/path]` without a trailing slash.
///
/// # Errors
///
/// Returns `InvalidBaseUrl` for relative or non-http(s) URLs.
pub fn parse_base_url(base_url: &str) -> Result<String, SitemapError> {
    let url = Url::parse(base_url.trim())
        .map_err(|_| SitemapError::InvalidBaseUrl(base_url.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(SitemapError::InvalidBaseUrl(base_url.to_string()));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Render the sitemap for every product in `store`.
///
/// # Errors
///
/// Returns an error if the product listing fails.
pub async fn render(store: &dyn DocumentStore, base_url: &str) -> Result<String, SitemapError> {
    let products = ProductRepository::new(store).list().await?;
    let entries = sitemap::entries(
        products
            .iter()
            .map(|product| SitemapEntry::product(product.id.as_str(), product.updated_at)),
    );
    tracing::info!(urls = entries.len(), "Rendered sitemap");
    Ok(sitemap::render(base_url, &entries))
}

/// Render from `store` and write to `out`.
///
/// # Errors
///
/// Returns an error if rendering or the file write fails.
pub async fn export(
    store: &dyn DocumentStore,
    base_url: &str,
    out: &Path,
) -> Result<(), SitemapError> {
    let base = parse_base_url(base_url)?;
    let xml = render(store, &base).await?;
    tokio::fs::write(out, xml)
        .await
        .map_err(|source| SitemapError::Write {
            path: out.display().to_string(),
            source,
        })?;
    tracing::info!(path = %out.display(), "Sitemap written");
    Ok(())
}

/// Export the sitemap of the database at `DATABASE_URL`.
///
/// # Errors
///
/// Returns an error if the base URL is invalid, the connection fails, or
/// the file cannot be written.
pub async fn run(base_url: &str, out: &Path) -> Result<(), SitemapError> {
    // Fail on a bad URL before connecting
    parse_base_url(base_url)?;
    let store = connect_store().await?;
    export(&store, base_url, out).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use vitrine_core::{MultilingualText, NewCategory, NewProduct};
    use vitrine_data::{CategoryRepository, MemoryDocumentStore};

    #[test]
    fn test_parse_base_url() {
        assert_eq!(
            parse_base_url("https://example.uz/").unwrap(),
            "https://example.uz"
        );
        assert_eq!(
            parse_base_url(" http://localhost:3000 ").unwrap(),
            "http://localhost:3000"
        );
        assert!(parse_base_url("example.uz").is_err());
        assert!(parse_base_url("ftp://example.uz").is_err());
    }

    #[tokio::test]
    async fn test_export_lists_static_pages_and_products() {
        let store = MemoryDocumentStore::new();
        let text = MultilingualText::new("Насос", "Nasos", "Pump");
        let category = CategoryRepository::new(&store)
            .create(&NewCategory {
                title: text.clone(),
            })
            .await
            .unwrap();
        let product = ProductRepository::new(&store)
            .create(&NewProduct {
                title: text.clone(),
                description: text,
                price: Decimal::new(1_500_000, 0),
                features: Vec::new(),
                category_id: category.id.to_string(),
                images: Vec::new(),
            })
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("sitemap.xml");
        export(&store, "https://example.uz/", &out).await.unwrap();

        let xml = std::fs::read_to_string(&out).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://example.uz/about</loc>"));
        assert!(xml.contains(&format!(
            "<loc>https://example.uz/products/{}</loc>",
            product.id
        )));
    }

    #[tokio::test]
    async fn test_export_rejects_relative_base_url() {
        let store = MemoryDocumentStore::new();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("sitemap.xml");
        let result = export(&store, "/relative", &out).await;
        assert!(matches!(result, Err(SitemapError::InvalidBaseUrl(_))));
        assert!(!out.exists());
    }
}
