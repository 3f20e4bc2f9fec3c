//! Catalog route handlers.
//!
//! `GET /products` renders the whole page; the search box and filters then
//! swap `#catalog-results` with `GET /products/results`, which returns only
//! the results fragment.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;
use vitrine_core::catalog::{CatalogQuery, SEARCH_DEBOUNCE_MS};
use vitrine_core::{CategoryId, ProductId};
use vitrine_data::{CategoryRepository, ProductRepository, catalog};

use crate::error::{AppError, Localized, PageError};
use crate::filters;
use crate::messages::Messages;
use crate::middleware::Lang;
use crate::state::AppState;
use crate::views::{CatalogFilter, CatalogResults, CategoryOption, PageContext, ProductDetail};

/// Catalog query parameters.
///
/// Everything is optional and parsed leniently: an unparsable page is page 1
/// and an empty category means all categories.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub category: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
}

impl CatalogParams {
    fn category(&self) -> Option<String> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
    }

    fn search(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(String::from)
    }

    /// Store-facing query for a page of `page_size` products.
    #[must_use]
    pub fn to_query(&self, page_size: u32) -> CatalogQuery {
        CatalogQuery {
            category_id: self.category().map(CategoryId::new),
            search: self.search(),
            page: self
                .page
                .as_deref()
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(1),
            page_size,
        }
    }

    fn filter(&self) -> CatalogFilter {
        CatalogFilter {
            category: self.category(),
            search: self.search(),
        }
    }
}

/// Full catalog page.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub t: &'static Messages,
    pub categories: Vec<CategoryOption>,
    pub search: String,
    pub debounce_ms: u64,
    pub results: CatalogResults,
}

/// Results fragment swapped in by HTMX.
#[derive(Template, WebTemplate)]
#[template(path = "products/_results.html")]
pub struct ProductResultsTemplate {
    pub t: &'static Messages,
    pub results: CatalogResults,
}

/// Product detail page.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductDetail,
}

async fn load_results(
    state: &AppState,
    params: &CatalogParams,
    locale: vitrine_core::Locale,
) -> Result<CatalogResults, AppError> {
    let primary = state.primary_locale();
    let query = params.to_query(state.config().catalog_page_size);
    let page = catalog::list_products(state.store(), &query, locale, primary).await?;
    Ok(CatalogResults::new(page, &params.filter(), locale, primary))
}

/// Display the catalog page.
#[instrument(skip(state), fields(locale = %locale))]
pub async fn index(
    State(state): State<AppState>,
    Lang(locale): Lang,
    Query(params): Query<CatalogParams>,
) -> Result<ProductsIndexTemplate, PageError> {
    let categories = CategoryRepository::new(state.store())
        .list()
        .await
        .localized(locale)?;
    let results = load_results(&state, &params, locale)
        .await
        .localized(locale)?;
    let selected = params.category().map(CategoryId::new);

    Ok(ProductsIndexTemplate {
        page: PageContext::new(locale, "/products"),
        t: Messages::for_locale(locale),
        categories: CategoryOption::list(
            &categories,
            selected.as_ref(),
            locale,
            state.primary_locale(),
        ),
        search: params.search().unwrap_or_default(),
        debounce_ms: SEARCH_DEBOUNCE_MS,
        results,
    })
}

/// Render only the results list (HTMX).
#[instrument(skip(state), fields(locale = %locale))]
pub async fn results(
    State(state): State<AppState>,
    Lang(locale): Lang,
    Query(params): Query<CatalogParams>,
) -> Result<ProductResultsTemplate, PageError> {
    let results = load_results(&state, &params, locale)
        .await
        .localized(locale)?;
    Ok(ProductResultsTemplate {
        t: Messages::for_locale(locale),
        results,
    })
}

/// Display a product detail page.
#[instrument(skip(state), fields(locale = %locale))]
pub async fn show(
    State(state): State<AppState>,
    Lang(locale): Lang,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate, PageError> {
    let product = ProductRepository::new(state.store())
        .get(&ProductId::new(&id))
        .await
        .localized(locale)?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
        .localized(locale)?;

    // The category may have been deleted; the page still renders without it
    let category = match &product.category_id {
        Some(category_id) => CategoryRepository::new(state.store())
            .get(category_id)
            .await
            .localized(locale)?,
        None => None,
    };

    Ok(ProductShowTemplate {
        page: PageContext::new(locale, &format!("/products/{}", urlencoding::encode(&id))),
        product: ProductDetail::new(&product, category.as_ref(), locale, state.primary_locale()),
    })
}
