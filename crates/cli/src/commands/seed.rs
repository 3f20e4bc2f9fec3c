//! Seed the catalog from a YAML file.
//!
//! The whole file is parsed and validated before the database is touched.
//! Products name their category by the `key` given to it in the same file:
//!
//! ```yaml
//! categories:
//!   - key: pumps
//!     title: { ru: Насосы, uz: Nasoslar, en: Pumps }
//! products:
//!   - category: pumps
//!     title: { ru: Насос, uz: Nasos, en: Pump }
//!     description: { ru: ..., uz: ..., en: ... }
//!     price: "1500000"
//!     features:
//!       - { ru: ..., uz: ..., en: ... }
//!     images: []
//! media:
//!   - type: certificate
//!     title: { ru: ..., uz: ..., en: ... }
//!     imageUrl: https://cdn.example.uz/cert.jpg
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info, instrument, warn};
use vitrine_core::{CategoryId, MultilingualText, NewCategory, NewMedia, NewProduct};
use vitrine_data::{
    CategoryRepository, Collection, DocumentStore, MediaRepository, ProductRepository, Query,
    RepositoryError,
};

use super::{ConnectError, connect_store};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error("Unknown category key: {0}")]
    UnknownCategory(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Top-level shape of a catalog file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
    #[serde(default)]
    pub media: Vec<NewMedia>,
}

/// A category plus the key products use to refer to it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedCategory {
    pub key: String,
    pub title: MultilingualText,
}

/// A product filed under a category key from the same file.
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub category: String,
    #[serde(flatten)]
    pub product: NewProduct,
}

/// What a seed run wrote.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub products: usize,
    pub media: usize,
}

/// Parse a catalog file.
///
/// # Errors
///
/// Returns an error if the YAML does not match [`CatalogFile`].
pub fn parse(content: &str) -> Result<CatalogFile, SeedError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Every problem in `file`, each prefixed with where it was found.
#[must_use]
pub fn validate(file: &CatalogFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut keys = HashSet::new();

    for (i, category) in file.categories.iter().enumerate() {
        let key = category.key.trim();
        if key.is_empty() {
            errors.push(format!("categories[{i}]: key is required"));
        } else if !keys.insert(key) {
            errors.push(format!("categories[{i}]: duplicate key '{key}'"));
        }
        let input = NewCategory {
            title: category.title.clone(),
        };
        if let Err(e) = input.validate() {
            errors.push(format!("categories[{i}]: {e}"));
        }
    }

    for (i, seed) in file.products.iter().enumerate() {
        let key = seed.category.trim();
        if !keys.contains(key) {
            errors.push(format!("products[{i}]: unknown category '{key}'"));
        }
        // The key stands in for the id until the category exists
        let mut input = seed.product.clone();
        input.category_id = key.to_string();
        if let Err(e) = input.validate() {
            errors.push(format!("products[{i}]: {e}"));
        }
    }

    for (i, media) in file.media.iter().enumerate() {
        if let Err(e) = media.validate() {
            errors.push(format!("media[{i}]: {e}"));
        }
    }

    errors
}

/// Write a validated catalog: categories first, then products, then media.
///
/// # Errors
///
/// Returns the first store error. Records written before it are kept.
#[instrument(skip_all)]
pub async fn apply(
    store: &dyn DocumentStore,
    file: &CatalogFile,
) -> Result<SeedSummary, SeedError> {
    let categories = CategoryRepository::new(store);
    let products = ProductRepository::new(store);
    let media = MediaRepository::new(store);

    let mut ids: HashMap<&str, CategoryId> = HashMap::new();
    for category in &file.categories {
        let created = categories
            .create(&NewCategory {
                title: category.title.clone(),
            })
            .await?;
        ids.insert(category.key.trim(), created.id);
    }

    let mut summary = SeedSummary {
        categories: ids.len(),
        ..SeedSummary::default()
    };

    for seed in &file.products {
        let Some(category_id) = ids.get(seed.category.trim()) else {
            return Err(SeedError::UnknownCategory(seed.category.clone()));
        };
        let mut input = seed.product.clone();
        input.category_id = category_id.to_string();
        products.create(&input).await?;
        summary.products += 1;
    }

    for item in &file.media {
        media.create(item).await?;
        summary.media += 1;
    }

    Ok(summary)
}

/// Delete every product, category and media record.
///
/// Stored images are not touched.
///
/// # Errors
///
/// Returns the first store error.
#[instrument(skip_all)]
pub async fn clear(store: &dyn DocumentStore) -> Result<usize, SeedError> {
    let mut removed = 0;
    // Products before categories so no product is left pointing at a gap
    for collection in [Collection::Products, Collection::Media, Collection::Categories] {
        for document in store.list(collection, &Query::new()).await? {
            store.delete(collection, &document.id).await?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Seed the database at `DATABASE_URL` from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or the database rejects a write.
pub async fn run(path: &Path, clear_existing: bool) -> Result<(), SeedError> {
    info!(path = %path.display(), "Loading catalog from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
    let file = parse(&content)?;

    info!(
        categories = file.categories.len(),
        products = file.products.len(),
        media = file.media.len(),
        "Parsed catalog"
    );

    let errors = validate(&file);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    let store = connect_store().await?;

    if clear_existing {
        let removed = clear(&store).await?;
        warn!(removed, "Cleared existing catalog (stored images were left in place)");
    }

    let summary = apply(&store, &file).await?;

    info!("Seeding complete!");
    info!("  Categories: {}", summary.categories);
    info!("  Products: {}", summary.products);
    info!("  Media: {}", summary.media);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use vitrine_data::MemoryDocumentStore;

    const CATALOG: &str = r#"
categories:
  - key: pumps
    title: { ru: Насосы, uz: Nasoslar, en: Pumps }
  - key: feeders
    title: { ru: Кормушки, uz: Oziqlantirgichlar, en: Feeders }
products:
  - category: pumps
    title: { ru: Насос, uz: Nasos, en: Feed pump }
    description: { ru: Описание, uz: Tavsif, en: Description }
    price: "1500000"
    features:
      - { ru: Тихий, uz: Jim, en: Quiet }
  - category: feeders
    title: { ru: Кормушка, uz: Oziqlantirgich, en: Feeder }
    description: { ru: Описание, uz: Tavsif, en: Description }
    price: "250000.50"
media:
  - type: certificate
    title: { ru: Сертификат, uz: Sertifikat, en: Certificate }
    imageUrl: https://cdn.example.uz/cert.jpg
"#;

    #[test]
    fn test_parse_catalog() {
        let file = parse(CATALOG).unwrap();
        assert_eq!(file.categories.len(), 2);
        assert_eq!(file.products.len(), 2);
        assert_eq!(file.media.len(), 1);
        assert_eq!(file.products[0].category, "pumps");
        assert_eq!(file.products[1].product.price, Decimal::new(25_000_050, 2));
        assert!(validate(&file).is_empty());
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        assert!(parse("brands: []\n").is_err());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let yaml = r#"
categories:
  - key: pumps
    title: { ru: Насосы, uz: Nasoslar, en: Pumps }
  - key: pumps
    title: { ru: Насосы, en: Pumps }
products:
  - category: valves
    title: { ru: Клапан, uz: Klapan, en: Valve }
    description: { ru: Описание, uz: Tavsif, en: Description }
    price: "0"
"#;
        let errors = validate(&parse(yaml).unwrap());
        assert!(errors.iter().any(|e| e.contains("duplicate key 'pumps'")));
        assert!(errors.iter().any(|e| e.starts_with("categories[1]: title")));
        assert!(errors.iter().any(|e| e.contains("unknown category 'valves'")));
        assert!(errors.iter().any(|e| e.starts_with("products[0]: price")));
    }

    #[tokio::test]
    async fn test_apply_links_products_to_categories() {
        let store = MemoryDocumentStore::new();
        let file = parse(CATALOG).unwrap();

        let summary = apply(&store, &file).await.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                categories: 2,
                products: 2,
                media: 1
            }
        );

        let categories = CategoryRepository::new(&store).list().await.unwrap();
        let pumps = categories
            .iter()
            .find(|c| c.title.resolve(vitrine_core::Locale::En, vitrine_core::Locale::Ru) == "Pumps")
            .unwrap();
        let products = ProductRepository::new(&store)
            .list_by_category(&pumps.id)
            .await
            .unwrap();
        assert_eq!(products.len(), 1);
        assert!(!CategoryRepository::new(&store).can_delete(&pumps.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_removes_catalog_but_not_applications() {
        let store = MemoryDocumentStore::new();
        apply(&store, &parse(CATALOG).unwrap()).await.unwrap();
        let mut body = serde_json::Map::new();
        body.insert("name".to_string(), serde_json::json!("Aziz"));
        store.insert(Collection::Applications, body).await.unwrap();

        let removed = clear(&store).await.unwrap();
        assert_eq!(removed, 5);
        assert_eq!(store.count(Collection::Products).await.unwrap(), 0);
        assert_eq!(store.count(Collection::Categories).await.unwrap(), 0);
        assert_eq!(store.count(Collection::Applications).await.unwrap(), 1);
    }
}
