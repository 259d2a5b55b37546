use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::photo_response;
use crate::state::AppState;
use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use fotos_core::models::{PageQuery, PhotoListResponse, PhotoResponse};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v0/photos",
    tag = "photos",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of photos in id order", body = PhotoListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "list_photos"))]
pub async fn list_photos(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(query) = query?;
    let (page, per_page) = query.resolve();

    let (photos, total) = state.lifecycle.list(page, per_page).await?;
    let total_pages = (total + per_page - 1) / per_page;

    let photos = photos
        .into_iter()
        .map(|photo| photo_response(&state, photo))
        .collect();

    Ok(Json(PhotoListResponse {
        photos,
        page,
        per_page,
        total,
        total_pages,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v0/photos/all",
    tag = "photos",
    responses(
        (status = 200, description = "Every photo in id order", body = Vec<PhotoResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_all_photos"))]
pub async fn list_all_photos(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let photos: Vec<PhotoResponse> = state
        .lifecycle
        .list_all()
        .await?
        .into_iter()
        .map(|photo| photo_response(&state, photo))
        .collect();

    Ok(Json(photos))
}

#[utoipa::path(
    get,
    path = "/api/v0/photos/{id}",
    tag = "photos",
    params(
        ("id" = i64, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo found", body = PhotoResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, path), fields(operation = "get_photo"))]
pub async fn get_photo(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Path(id) = path?;
    let photo = state.lifecycle.get(id).await?;

    Ok(Json(photo_response(&state, photo)))
}
