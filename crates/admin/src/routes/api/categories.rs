//! Category API handlers.
//!
//! A category cannot be deleted while any product references it; the admin
//! UI asks `can-delete` first, and `DELETE` answers `409 Conflict` if a
//! product still uses it.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tracing::{info, instrument};
use vitrine_core::{Category, CategoryId, CategoryPatch, NewCategory};
use vitrine_data::CategoryRepository;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list).post(create))
        .route("/categories/{id}", get(show).patch(update).delete(destroy))
        .route("/categories/{id}/can-delete", get(can_delete))
}

/// Answer of the deletion precondition.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanDeleteResponse {
    pub can_delete: bool,
}

/// GET /api/admin/categories
#[instrument(skip_all)]
pub async fn list(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>> {
    Ok(Json(CategoryRepository::new(state.store()).list().await?))
}

/// GET /api/admin/categories/{id}
#[instrument(skip(_admin, state))]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>> {
    CategoryRepository::new(state.store())
        .get(&CategoryId::new(&id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))
}

/// POST /api/admin/categories
#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>)> {
    input.validate()?;
    let category = CategoryRepository::new(state.store()).create(&input).await?;
    info!(category_id = %category.id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// PATCH /api/admin/categories/{id}
#[instrument(skip(admin, state, patch), fields(admin = %admin.email))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<Category>> {
    patch.validate()?;
    let category = CategoryRepository::new(state.store())
        .update(&CategoryId::new(&id), &patch)
        .await?;
    Ok(Json(category))
}

/// GET /api/admin/categories/{id}/can-delete
#[instrument(skip(_admin, state))]
pub async fn can_delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CanDeleteResponse>> {
    let can_delete = CategoryRepository::new(state.store())
        .can_delete(&CategoryId::new(&id))
        .await?;
    Ok(Json(CanDeleteResponse { can_delete }))
}

/// DELETE /api/admin/categories/{id}
#[instrument(skip(admin, state), fields(admin = %admin.email))]
pub async fn destroy(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    CategoryRepository::new(state.store())
        .delete(&CategoryId::new(&id))
        .await?;
    info!(category_id = %id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
