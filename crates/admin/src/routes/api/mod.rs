//! JSON API for catalog administration, mounted under `/api/admin`.
//!
//! ```text
//! GET    /products                   - List products, newest first
//! POST   /products                   - Create product
//! GET    /products/{id}              - Get product
//! PATCH  /products/{id}              - Merge-update product
//! DELETE /products/{id}              - Delete product and its images
//!
//! GET    /categories                 - List categories
//! POST   /categories                 - Create category
//! GET    /categories/{id}            - Get category
//! PATCH  /categories/{id}            - Merge-update category
//! DELETE /categories/{id}            - Delete unused category (409 if in use)
//! GET    /categories/{id}/can-delete - Whether no product references it
//!
//! GET    /media?type=                - List certificates and partner logos
//! POST   /media                      - Create media record
//! GET    /media/{id}                 - Get media record
//! PATCH  /media/{id}                 - Merge-update media record
//! DELETE /media/{id}                 - Delete media record and its image
//!
//! GET    /applications?status=       - List applications, newest first
//! GET    /applications/{id}          - Get application
//! PATCH  /applications/{id}          - Change status
//! DELETE /applications/{id}          - Delete application
//!
//! POST   /uploads                    - Store an image (multipart), returns its URL
//! ```

pub mod applications;
pub mod categories;
pub mod media;
pub mod products;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the complete admin API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(products::router())
        .merge(categories::router())
        .merge(media::router())
        .merge(applications::router())
        .merge(uploads::router())
}
