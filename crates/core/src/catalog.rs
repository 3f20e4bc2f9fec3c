//! Catalog listing logic: search matching, ordering and pagination.
//!
//! Everything here runs over products already fetched from the store. The
//! store-facing half of the pipeline lives in `vitrine_data::catalog`.

use serde::Serialize;

use crate::types::{CategoryId, Locale, Product, localize};

/// Delay between the last keystroke in the search box and the request.
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Upper bound for a requested page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A catalog listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Restrict to one category. Ignored while a search term is active.
    pub category_id: Option<CategoryId>,
    /// Free-text search across title, description and features.
    pub search: Option<String>,
    /// 1-based page number; 0 is read as 1.
    pub page: u32,
    /// Items per page; clamped to `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            category_id: None,
            search: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogQuery {
    /// Trimmed, lowercased search term, or `None` if blank.
    #[must_use]
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    /// Page number, never below 1.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Page size, clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage<T> {
    pub items: Vec<T>,
    /// Number of items across all pages.
    pub total_count: usize,
    /// `ceil(total_count / page_size)`; zero for an empty result.
    pub total_pages: u32,
    pub page: u32,
    pub page_size: u32,
}

impl<T> CatalogPage<T> {
    /// True if a page after this one has items.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// True if a page before this one exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Transform every item, keeping the counts.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CatalogPage<U> {
        CatalogPage {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// True if `term` (already lowercased) occurs in the product's title,
/// description or any feature, as displayed in `locale`.
#[must_use]
pub fn matches_search(product: &Product, term: &str, locale: Locale, primary: Locale) -> bool {
    let contains = |text| localize(text, locale, primary).to_lowercase().contains(term);

    contains(&product.title)
        || contains(&product.description)
        || product.features.iter().any(contains)
}

/// Keep only products matching `term` (already lowercased), preserving order.
#[must_use]
pub fn search_products(
    products: Vec<Product>,
    term: &str,
    locale: Locale,
    primary: Locale,
) -> Vec<Product> {
    products
        .into_iter()
        .filter(|product| matches_search(product, term, locale, primary))
        .collect()
}

/// Sort by creation time, most recent first. Ties keep their input order.
pub fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Cut one page out of an already filtered and ordered list.
///
/// Items `[(page - 1) * page_size, page * page_size)` are returned; a page
/// past the end is empty, not an error.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> CatalogPage<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_count = items.len();
    let size = page_size as usize;
    let total_pages = u32::try_from(total_count.div_ceil(size)).unwrap_or(u32::MAX);

    let start = (page as usize - 1).saturating_mul(size);
    let items = items.into_iter().skip(start).take(size).collect();

    CatalogPage {
        items,
        total_count,
        total_pages,
        page,
        page_size,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::types::{LocalizedText, MultilingualText, Price, ProductId};

    fn product(n: i64, title: &str) -> Product {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(n);
        Product {
            id: ProductId::new(format!("p{n}")),
            title: MultilingualText::new(format!("{title} ru"), format!("{title} uz"), title).into(),
            description: MultilingualText::default().into(),
            price: Price::default(),
            features: vec![],
            category_id: None,
            images: vec![],
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_pagination_of_25_by_10() {
        let items: Vec<u32> = (0..25).collect();
        let first = paginate(items.clone(), 1, 10);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_count, 25);
        assert!(first.has_next());

        let third = paginate(items.clone(), 3, 10);
        assert_eq!(third.items, (20..25).collect::<Vec<_>>());
        assert!(!third.has_next());

        let fourth = paginate(items, 4, 10);
        assert!(fourth.items.is_empty());
        assert_eq!(fourth.total_pages, 3);
    }

    #[test]
    fn test_pagination_of_empty_list() {
        let page = paginate(Vec::<u32>::new(), 1, 10);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_page_zero_reads_as_first() {
        let page = paginate(vec![1, 2, 3], 0, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![1, 2]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let products = vec![product(1, "Feed pump v2"), product(2, "Drinker")];
        let hits = search_products(products, "pump", Locale::En, Locale::Ru);
        assert_eq!(hits.len(), 1);

        let query = CatalogQuery {
            search: Some("  PUMP ".to_string()),
            ..CatalogQuery::default()
        };
        assert_eq!(query.search_term().as_deref(), Some("pump"));
    }

    #[test]
    fn test_search_uses_active_locale() {
        let p = product(1, "Feed pump");
        assert!(matches_search(&p, "feed pump uz", Locale::Uz, Locale::Ru));
        assert!(!matches_search(&p, "feed pump uz", Locale::En, Locale::Ru));
    }

    #[test]
    fn test_search_covers_description_and_features() {
        let mut p = product(1, "Drinker");
        p.description = LocalizedText::Legacy("Nipple drinker for broilers".to_string());
        p.features = vec![MultilingualText::new("", "", "Stainless STEEL").into()];
        assert!(matches_search(&p, "broilers", Locale::En, Locale::Ru));
        assert!(matches_search(&p, "steel", Locale::En, Locale::Ru));
        assert!(!matches_search(&p, "plastic", Locale::En, Locale::Ru));
    }

    #[test]
    fn test_sort_newest_first() {
        let mut products = vec![product(1, "a"), product(3, "c"), product(2, "b")];
        sort_newest_first(&mut products);
        let ids: Vec<_> = products.iter().map(|p| p.id.as_str().to_owned()).collect();
        assert_eq!(ids, vec!["p3", "p2", "p1"]);
    }

    #[test]
    fn test_query_clamps() {
        let query = CatalogQuery {
            page: 0,
            page_size: 10_000,
            ..CatalogQuery::default()
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), MAX_PAGE_SIZE);
        assert_eq!(
            CatalogQuery {
                search: Some("   ".to_string()),
                ..CatalogQuery::default()
            }
            .search_term(),
            None
        );
    }
}
