use std::sync::Arc;

use axum::{
    extract::rejection::PathRejection,
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use fotos_core::models::PhotoResponse;

use crate::auth::CallerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::photo_response;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;

/// Replace the image of an existing photo, keeping its id, title and description
#[utoipa::path(
    put,
    path = "/api/v0/photos/{id}/image",
    tag = "photos",
    params(
        ("id" = i64, Path, description = "Photo ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image replaced", body = PhotoResponse),
        (status = 400, description = "Invalid file or image", body = ErrorResponse),
        (status = 401, description = "Administrator access required", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, path, multipart), fields(role = %caller.role, operation = "replace_photo_image"))]
pub async fn replace_photo_image(
    State(state): State<Arc<AppState>>,
    caller: CallerContext,
    path: Result<Path<i64>, PathRejection>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let Path(id) = path?;
    caller.require_admin()?;

    let file = extract_multipart_file(multipart).await?;
    let photo = state.ingest.replace(&caller, id, file).await?;

    Ok(Json(photo_response(&state, photo)))
}
