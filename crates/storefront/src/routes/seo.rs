//! Sitemap and robots.txt.

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};
use tracing::instrument;
use vitrine_core::sitemap::{self, SitemapEntry};
use vitrine_data::ProductRepository;

use crate::error::Result;
use crate::state::AppState;

/// `GET /sitemap.xml`: static pages and every product, with locale alternates.
#[instrument(skip(state))]
pub async fn sitemap_xml(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.store()).list().await?;
    let entries = sitemap::entries(
        products
            .iter()
            .map(|product| SitemapEntry::product(product.id.as_str(), product.updated_at)),
    );
    let xml = sitemap::render(&state.config().base_url, &entries);
    Ok(([(CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}

/// `GET /robots.txt`
pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!(
            "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n",
            state.config().base_url
        ),
    )
}
