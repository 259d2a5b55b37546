pub mod health;
pub mod photo_delete;
pub mod photo_edit;
pub mod photo_inline;
pub mod photo_replace;
pub mod photo_upload;
pub mod photos_get;

use fotos_core::models::{Photo, PhotoResponse};

use crate::state::AppState;

/// Attach public URLs to a stored photo
pub(crate) fn photo_response(state: &AppState, photo: Photo) -> PhotoResponse {
    let image_url = state.lifecycle.url(&photo.image_path);
    let thumbnail_url = photo
        .thumbnail_path
        .as_deref()
        .map(|path| state.lifecycle.url(path));
    PhotoResponse::new(photo, image_url, thumbnail_url)
}
