//! Customer application API handlers.
//!
//! Applications are created by the storefront contact form; admins only read,
//! move their status and delete them.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::{info, instrument};
use vitrine_core::{Application, ApplicationId, ApplicationPatch, ApplicationStatus};
use vitrine_data::ApplicationRepository;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the applications router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/applications", get(list))
        .route("/applications/{id}", get(show).patch(update).delete(destroy))
}

/// Optional `?status=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct ApplicationParams {
    pub status: Option<String>,
}

impl ApplicationParams {
    fn status(&self) -> Result<Option<ApplicationStatus>> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|status| !status.is_empty())
            .map(|status| status.parse().map_err(AppError::BadRequest))
            .transpose()
    }
}

/// Applications, newest first.
///
/// GET /api/admin/applications
#[instrument(skip(_admin, state))]
pub async fn list(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(params): Query<ApplicationParams>,
) -> Result<Json<Vec<Application>>> {
    let status = params.status()?;
    Ok(Json(
        ApplicationRepository::new(state.store())
            .list(status)
            .await?,
    ))
}

/// GET /api/admin/applications/{id}
#[instrument(skip(_admin, state))]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Application>> {
    ApplicationRepository::new(state.store())
        .get(&ApplicationId::new(&id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("application {id}")))
}

/// Change the status. Any transition is accepted.
///
/// PATCH /api/admin/applications/{id}
#[instrument(skip(admin, state), fields(admin = %admin.email))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ApplicationPatch>,
) -> Result<Json<Application>> {
    let application = ApplicationRepository::new(state.store())
        .update(&ApplicationId::new(&id), &patch)
        .await?;
    info!(application_id = %id, status = %application.status, "Application updated");
    Ok(Json(application))
}

/// DELETE /api/admin/applications/{id}
#[instrument(skip(admin, state), fields(admin = %admin.email))]
pub async fn destroy(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    ApplicationRepository::new(state.store())
        .delete(&ApplicationId::new(&id))
        .await?;
    info!(application_id = %id, "Application deleted");
    Ok(StatusCode::NO_CONTENT)
}
