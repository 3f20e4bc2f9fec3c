//! JSON catalog API.
//!
//! Same query parameters and results as the catalog page, as JSON.

use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;
use vitrine_core::catalog::CatalogPage;
use vitrine_data::catalog;

use crate::error::Result;
use crate::middleware::Lang;
use crate::routes::products::CatalogParams;
use crate::state::AppState;
use crate::views::ProductCard;

/// `GET /api/products`
#[instrument(skip(state), fields(locale = %locale))]
pub async fn products(
    State(state): State<AppState>,
    Lang(locale): Lang,
    Query(params): Query<CatalogParams>,
) -> Result<Json<CatalogPage<ProductCard>>> {
    let primary = state.primary_locale();
    let query = params.to_query(state.config().catalog_page_size);
    let page = catalog::list_products(state.store(), &query, locale, primary).await?;
    Ok(Json(page.map(|product| ProductCard::new(&product, locale, primary))))
}
