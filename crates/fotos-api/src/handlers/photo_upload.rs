use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::auth::CallerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::ingest::BatchReport;
use crate::state::AppState;
use crate::utils::upload::extract_batch_form;

/// Batch upload handler
///
/// Every `files` (or `file`) part is processed on its own; the shared
/// `title` and `description` fields apply to all of them. The report lists
/// the created ids and one error line per rejected file.
///
/// Returns 201 when at least one photo was stored and 422 with the same
/// report body when every file was rejected.
#[utoipa::path(
    post,
    path = "/api/v0/photos/upload",
    tag = "photos",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "At least one photo stored", body = BatchReport),
        (status = 400, description = "Empty or oversized batch", body = ErrorResponse),
        (status = 401, description = "Administrator access required", body = ErrorResponse),
        (status = 422, description = "Every file was rejected", body = BatchReport),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(role = %caller.role, operation = "upload_photos"))]
pub async fn upload_photos(
    State(state): State<Arc<AppState>>,
    caller: CallerContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    // Reject before reading the body
    caller.require_admin()?;

    let form = extract_batch_form(multipart).await?;
    let report = state
        .ingest
        .ingest_batch(&caller, form.files, form.title, form.description)
        .await?;

    let status = if report.success {
        StatusCode::CREATED
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    Ok((status, Json(report)))
}
