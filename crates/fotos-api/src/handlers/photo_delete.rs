use std::sync::Arc;

use axum::{
    extract::rejection::PathRejection,
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::CallerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

#[utoipa::path(
    delete,
    path = "/api/v0/photos/{id}",
    tag = "photos",
    params(
        ("id" = i64, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo and its files deleted", body = DeleteResponse),
        (status = 401, description = "Administrator access required", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, path), fields(role = %caller.role, operation = "delete_photo"))]
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    caller: CallerContext,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Path(id) = path?;
    state.ingest.delete(&caller, id).await?;

    Ok(Json(DeleteResponse { success: true }))
}
