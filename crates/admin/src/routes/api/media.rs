//! Media (certificates and partner logos) API handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::{info, instrument};
use vitrine_core::{Media, MediaId, MediaPatch, MediaType, NewMedia};
use vitrine_data::MediaRepository;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the media router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/media", get(list).post(create))
        .route("/media/{id}", get(show).patch(update).delete(destroy))
}

/// Optional `?type=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct MediaParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl MediaParams {
    fn kind(&self) -> Result<Option<MediaType>> {
        self.kind
            .as_deref()
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
            .map(|kind| kind.parse().map_err(AppError::BadRequest))
            .transpose()
    }
}

/// GET /api/admin/media
#[instrument(skip(_admin, state))]
pub async fn list(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(params): Query<MediaParams>,
) -> Result<Json<Vec<Media>>> {
    let kind = params.kind()?;
    Ok(Json(MediaRepository::new(state.store()).list(kind).await?))
}

/// GET /api/admin/media/{id}
#[instrument(skip(_admin, state))]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Media>> {
    MediaRepository::new(state.store())
        .get(&MediaId::new(&id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("media {id}")))
}

/// POST /api/admin/media
#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<NewMedia>,
) -> Result<(StatusCode, Json<Media>)> {
    input.validate()?;
    let media = MediaRepository::new(state.store()).create(&input).await?;
    info!(media_id = %media.id, kind = %media.kind, "Media created");
    Ok((StatusCode::CREATED, Json(media)))
}

/// PATCH /api/admin/media/{id}
#[instrument(skip(admin, state, patch), fields(admin = %admin.email))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<MediaPatch>,
) -> Result<Json<Media>> {
    patch.validate()?;
    let media = MediaRepository::new(state.store())
        .update(&MediaId::new(&id), &patch, state.storage())
        .await?;
    Ok(Json(media))
}

/// DELETE /api/admin/media/{id}
#[instrument(skip(admin, state), fields(admin = %admin.email))]
pub async fn destroy(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    MediaRepository::new(state.store())
        .delete(&MediaId::new(&id), state.storage())
        .await?;
    info!(media_id = %id, "Media deleted");
    Ok(StatusCode::NO_CONTENT)
}
