use std::sync::Arc;

use axum::{
    extract::rejection::PathRejection,
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use fotos_core::models::{PhotoPatch, PhotoResponse};

use crate::auth::CallerContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::photo_response;
use crate::state::AppState;

#[utoipa::path(
    patch,
    path = "/api/v0/photos/{id}",
    tag = "photos",
    params(
        ("id" = i64, Path, description = "Photo ID")
    ),
    request_body = PhotoPatch,
    responses(
        (status = 200, description = "Photo updated", body = PhotoResponse),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 401, description = "Administrator access required", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, path, patch), fields(role = %caller.role, operation = "edit_photo"))]
pub async fn edit_photo(
    State(state): State<Arc<AppState>>,
    caller: CallerContext,
    path: Result<Path<i64>, PathRejection>,
    ValidatedJson(patch): ValidatedJson<PhotoPatch>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Path(id) = path?;
    let photo = state.ingest.edit(&caller, id, patch).await?;

    Ok(Json(photo_response(&state, photo)))
}
