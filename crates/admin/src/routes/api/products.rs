//! Product API handlers.
//!
//! Input is validated before anything is written. Updates merge only the
//! supplied fields; images dropped by an update or delete are removed from
//! storage afterwards.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::{info, instrument};
use vitrine_core::{CategoryId, NewProduct, Product, ProductId, ProductPatch};
use vitrine_data::{CategoryRepository, ProductRepository};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/{id}", get(show).patch(update).delete(destroy))
}

/// The category must exist when a product is filed under it.
async fn require_category(state: &AppState, category_id: &str) -> Result<()> {
    let id = CategoryId::new(category_id);
    match CategoryRepository::new(state.store()).get(&id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::BadRequest(format!("unknown category: {id}"))),
    }
}

/// All products, newest first.
///
/// GET /api/admin/products
#[instrument(skip_all)]
pub async fn list(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(ProductRepository::new(state.store()).list().await?))
}

/// GET /api/admin/products/{id}
#[instrument(skip(_admin, state))]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.store())
        .get(&ProductId::new(&id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// POST /api/admin/products
#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(mut input): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    // Stored ids must match exactly for the category filter and delete check
    input.category_id = input.category_id.trim().to_string();
    input.validate()?;
    require_category(&state, &input.category_id).await?;

    let product = ProductRepository::new(state.store()).create(&input).await?;
    info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PATCH /api/admin/products/{id}
#[instrument(skip(admin, state, patch), fields(admin = %admin.email))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    patch.category_id = patch.category_id.map(|id| id.trim().to_string());
    patch.validate()?;
    if let Some(category_id) = &patch.category_id {
        require_category(&state, category_id).await?;
    }

    let product = ProductRepository::new(state.store())
        .update(&ProductId::new(&id), &patch, state.storage())
        .await?;
    info!(product_id = %product.id, "Product updated");
    Ok(Json(product))
}

/// DELETE /api/admin/products/{id}
#[instrument(skip(admin, state), fields(admin = %admin.email))]
pub async fn destroy(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    ProductRepository::new(state.store())
        .delete(&ProductId::new(&id), state.storage())
        .await?;
    info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
