//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                   - Home page
//! GET  /products           - Catalog page (?category=&q=&page=)
//! GET  /products/results   - Catalog results fragment (HTMX)
//! GET  /products/{id}      - Product detail
//! GET  /about              - Company, certificates, partners
//! GET  /contact            - Contact form
//! POST /contact            - Submit application (rate limited)
//! GET  /api/products       - Catalog page as JSON
//! GET  /sitemap.xml        - Sitemap with locale alternates
//! GET  /robots.txt         - Robots file
//! ```
//!
//! Every route accepts `?lang=ru|uz|en` to switch the locale.

pub mod about;
pub mod api;
pub mod contact;
pub mod home;
pub mod products;
pub mod seo;

use axum::{
    Router,
    routing::{MethodRouter, get, post},
};

use crate::middleware::contact_rate_limiter;
use crate::state::AppState;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/results", get(products::results))
        .route("/{id}", get(products::show))
}

/// Contact form methods. Only submissions are rate limited.
pub fn contact_route() -> MethodRouter<AppState> {
    get(contact::show).merge(post(contact::submit).layer(contact_rate_limiter()))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .route("/about", get(about::about))
        .route("/contact", contact_route())
        .route("/api/products", get(api::products))
        .route("/sitemap.xml", get(seo::sitemap_xml))
        .route("/robots.txt", get(seo::robots_txt))
}
