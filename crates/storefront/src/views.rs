//! View models handed to templates.
//!
//! Everything here is already resolved to the request locale, so templates
//! never see a `LocalizedText`.

use serde::Serialize;
use vitrine_core::catalog::CatalogPage;
use vitrine_core::locale::LOCALE_QUERY_PARAM;
use vitrine_core::{Category, CategoryId, Locale, Media, Product, localize};

use crate::messages::Messages;

/// Shared context for every full page: language, strings and switcher.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub locale: Locale,
    pub lang: &'static str,
    pub t: &'static Messages,
    pub path: String,
    pub languages: Vec<LanguageLink>,
}

/// One entry of the language switcher.
#[derive(Debug, Clone)]
pub struct LanguageLink {
    pub code: &'static str,
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

impl PageContext {
    #[must_use]
    pub fn new(locale: Locale, path: &str) -> Self {
        let languages = Locale::ALL
            .iter()
            .map(|&candidate| LanguageLink {
                code: candidate.code(),
                label: candidate.native_name(),
                href: format!("{path}?{LOCALE_QUERY_PARAM}={}", candidate.code()),
                active: candidate == locale,
            })
            .collect();

        Self {
            locale,
            lang: locale.code(),
            t: Messages::for_locale(locale),
            path: path.to_string(),
            languages,
        }
    }

    /// Whether `prefix` is the current section, for nav highlighting.
    #[must_use]
    pub fn is_section(&self, prefix: &str) -> bool {
        if prefix == "/" {
            self.path == "/"
        } else {
            self.path.starts_with(prefix)
        }
    }
}

/// A product in a listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: String,
    pub title: String,
    pub price: String,
    pub image: Option<String>,
    pub href: String,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, locale: Locale, primary: Locale) -> Self {
        Self {
            id: product.id.to_string(),
            title: localize(&product.title, locale, primary).to_string(),
            price: product.price.to_string(),
            image: product.cover_image().map(str::to_string),
            href: format!("/products/{}", urlencoding::encode(product.id.as_str())),
        }
    }
}

/// A product on its detail page.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub category: Option<String>,
}

impl ProductDetail {
    #[must_use]
    pub fn new(
        product: &Product,
        category: Option<&Category>,
        locale: Locale,
        primary: Locale,
    ) -> Self {
        Self {
            id: product.id.to_string(),
            title: localize(&product.title, locale, primary).to_string(),
            description: localize(&product.description, locale, primary).to_string(),
            price: product.price.to_string(),
            features: product
                .features
                .iter()
                .map(|feature| localize(feature, locale, primary).to_string())
                .filter(|feature| !feature.is_empty())
                .collect(),
            images: product.images.clone(),
            category: category.map(|c| localize(&c.title, locale, primary).to_string()),
        }
    }
}

/// An option in the category filter.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: String,
    pub title: String,
    pub selected: bool,
}

impl CategoryOption {
    #[must_use]
    pub fn list(
        categories: &[Category],
        selected: Option<&CategoryId>,
        locale: Locale,
        primary: Locale,
    ) -> Vec<Self> {
        categories
            .iter()
            .map(|category| Self {
                id: category.id.to_string(),
                title: localize(&category.title, locale, primary).to_string(),
                selected: selected == Some(&category.id),
            })
            .collect()
    }
}

/// A certificate or partner logo.
#[derive(Debug, Clone)]
pub struct MediaView {
    pub title: String,
    pub image_url: String,
}

impl MediaView {
    #[must_use]
    pub fn new(media: &Media, locale: Locale, primary: Locale) -> Self {
        Self {
            title: localize(&media.title, locale, primary).to_string(),
            image_url: media.image_url.clone(),
        }
    }
}

/// Catalog filter state, carried through pagination links.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl CatalogFilter {
    /// Query string for `page` with the current filter, without leading `?`.
    #[must_use]
    pub fn query_string(&self, page: u32) -> String {
        let mut params = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            params.push(format!("q={}", urlencoding::encode(search)));
        } else if let Some(category) = &self.category {
            params.push(format!("category={}", urlencoding::encode(category)));
        }
        if page > 1 {
            params.push(format!("page={page}"));
        }
        params.join("&")
    }

    fn href(&self, base: &str, page: u32) -> String {
        let query = self.query_string(page);
        if query.is_empty() {
            base.to_string()
        } else {
            format!("{base}?{query}")
        }
    }
}

/// A pagination link. `href` is the full page, `fragment` the HTMX partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub fragment: String,
    pub current: bool,
}

/// One rendered page of catalog results.
#[derive(Debug, Clone)]
pub struct CatalogResults {
    pub products: Vec<ProductCard>,
    pub total_count: usize,
    pub page: u32,
    pub total_pages: u32,
    pub pages: Vec<PageLink>,
    pub previous: Option<PageLink>,
    pub next: Option<PageLink>,
}

impl CatalogResults {
    #[must_use]
    pub fn new(page: CatalogPage<Product>, filter: &CatalogFilter, locale: Locale, primary: Locale) -> Self {
        let link = |number: u32| PageLink {
            number,
            href: filter.href("/products", number),
            fragment: filter.href("/products/results", number),
            current: number == page.page,
        };

        let pages = (1..=page.total_pages).map(link).collect();
        let previous = page.has_previous().then(|| link(page.page - 1));
        let next = page.has_next().then(|| link(page.page + 1));

        Self {
            products: page
                .items
                .iter()
                .map(|product| ProductCard::new(product, locale, primary))
                .collect(),
            total_count: page.total_count,
            page: page.page,
            total_pages: page.total_pages,
            pages,
            previous,
            next,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
