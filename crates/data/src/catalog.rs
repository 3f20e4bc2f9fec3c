//! Catalog listing: fetch, filter, search and paginate products.
//!
//! The store only ever answers three shapes of query here: all products newest
//! first, all products with one `categoryId`, or everything (for search).
//! Search and pagination happen in memory via [`vitrine_core::catalog`].

use tracing::{debug, instrument};
use vitrine_core::catalog::{CatalogPage, CatalogQuery, paginate, search_products, sort_newest_first};
use vitrine_core::{Locale, Product};

use crate::document::{Collection, DocumentStore, Query};
use crate::error::RepositoryError;
use crate::repositories::fetch_all;

/// One page of products for the storefront.
///
/// With a non-blank search term the category filter is ignored and every
/// product whose title, description or features (as shown in `locale`)
/// contain the term is returned. Results are newest first in every mode.
///
/// # Errors
///
/// Returns an error if the store query fails.
#[instrument(skip(store), fields(page = query.page(), page_size = query.page_size()))]
pub async fn list_products(
    store: &dyn DocumentStore,
    query: &CatalogQuery,
    locale: Locale,
    primary: Locale,
) -> Result<CatalogPage<Product>, RepositoryError> {
    let products = if let Some(term) = query.search_term() {
        let all: Vec<Product> =
            fetch_all(store, Collection::Products, &Query::newest_first()).await?;
        let hits = search_products(all, &term, locale, primary);
        debug!(term = %term, hits = hits.len(), "Catalog search");
        hits
    } else if let Some(category_id) = &query.category_id {
        let filter = Query::new().filter_eq("categoryId", category_id.as_str());
        let mut in_category: Vec<Product> =
            fetch_all(store, Collection::Products, &filter).await?;
        sort_newest_first(&mut in_category);
        in_category
    } else {
        fetch_all(store, Collection::Products, &Query::newest_first()).await?
    };

    Ok(paginate(products, query.page(), query.page_size()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use vitrine_core::{CategoryId, MultilingualText, NewProduct};

    use super::*;
    use crate::memory::MemoryDocumentStore;
    use crate::repositories::ProductRepository;

    async fn seed(store: &MemoryDocumentStore, title: &str, category: &str) -> Product {
        ProductRepository::new(store)
            .create(&NewProduct {
                title: MultilingualText::new(format!("{title} ru"), format!("{title} uz"), title),
                description: MultilingualText::new("описание", "tavsif", "description"),
                price: Decimal::new(10, 0),
                features: vec![],
                category_id: category.to_string(),
                images: vec![],
            })
            .await
            .unwrap()
    }

    fn query(page: u32, page_size: u32) -> CatalogQuery {
        CatalogQuery {
            page,
            page_size,
            ..CatalogQuery::default()
        }
    }

    #[tokio::test]
    async fn test_25_products_paginate_10_10_5_0() {
        let store = MemoryDocumentStore::new();
        for n in 0..25 {
            seed(&store, &format!("Item {n}"), "c1").await;
        }

        let mut sizes = Vec::new();
        for page in 1..=4 {
            let result = list_products(&store, &query(page, 10), Locale::En, Locale::Ru)
                .await
                .unwrap();
            assert_eq!(result.total_pages, 3);
            assert_eq!(result.total_count, 25);
            sizes.push(result.items.len());
        }
        assert_eq!(sizes, vec![10, 10, 5, 0]);

        let first = list_products(&store, &query(1, 10), Locale::En, Locale::Ru)
            .await
            .unwrap();
        assert_eq!(first.items[0].title.resolve(Locale::En, Locale::Ru), "Item 24");
    }

    #[tokio::test]
    async fn test_category_filter_is_newest_first_slice() {
        let store = MemoryDocumentStore::new();
        let a = seed(&store, "Feeder A", "feeders").await;
        seed(&store, "Drinker", "drinkers").await;
        let b = seed(&store, "Feeder B", "feeders").await;
        let c = seed(&store, "Feeder C", "feeders").await;

        let catalog_query = CatalogQuery {
            category_id: Some(CategoryId::new("feeders")),
            page: 1,
            page_size: 2,
            search: None,
        };
        let page = list_products(&store, &catalog_query, Locale::En, Locale::Ru)
            .await
            .unwrap();
        let ids: Vec<_> = page.items.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![c.id, b.id]);
        assert_eq!(page.total_count, 3);

        let second = list_products(
            &store,
            &CatalogQuery {
                page: 2,
                ..catalog_query
            },
            Locale::En,
            Locale::Ru,
        )
        .await
        .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].id, a.id);
    }

    #[tokio::test]
    async fn test_search_ignores_category_and_case() {
        let store = MemoryDocumentStore::new();
        seed(&store, "Feed pump v2", "pumps").await;
        seed(&store, "Drinker", "drinkers").await;

        let catalog_query = CatalogQuery {
            category_id: Some(CategoryId::new("drinkers")),
            search: Some("PUMP".to_string()),
            ..CatalogQuery::default()
        };
        let page = list_products(&store, &catalog_query, Locale::En, Locale::Ru)
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(
            page.items[0].title.resolve(Locale::En, Locale::Ru),
            "Feed pump v2"
        );
    }

    #[tokio::test]
    async fn test_blank_search_falls_back_to_category() {
        let store = MemoryDocumentStore::new();
        seed(&store, "Feed pump", "pumps").await;
        seed(&store, "Drinker", "drinkers").await;

        let catalog_query = CatalogQuery {
            category_id: Some(CategoryId::new("drinkers")),
            search: Some("   ".to_string()),
            ..CatalogQuery::default()
        };
        let page = list_products(&store, &catalog_query, Locale::En, Locale::Ru)
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let store = MemoryDocumentStore::new();
        let page = list_products(&store, &CatalogQuery::default(), Locale::Ru, Locale::Ru)
            .await
            .unwrap();
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }
}
