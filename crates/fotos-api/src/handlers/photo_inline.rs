use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use fotos_core::models::InlineUploadRequest;

use crate::auth::CallerContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::ingest::InlineResult;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v0/photos/inline",
    tag = "photos",
    request_body = InlineUploadRequest,
    responses(
        (status = 201, description = "Photo stored", body = InlineResult),
        (status = 400, description = "Invalid payload or image", body = ErrorResponse),
        (status = 401, description = "Administrator access required", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(role = %caller.role, operation = "upload_inline"))]
pub async fn upload_inline(
    State(state): State<Arc<AppState>>,
    caller: CallerContext,
    ValidatedJson(request): ValidatedJson<InlineUploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let result = state.ingest.ingest_inline(&caller, request).await?;

    Ok((StatusCode::CREATED, Json(result)))
}
