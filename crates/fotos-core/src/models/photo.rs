use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use crate::constants::{DEFAULT_PER_PAGE, MAX_PER_PAGE};

/// A stored photo. Paths are relative to the media root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_path: String,
    pub thumbnail_path: Option<String>,
    pub width: i64,
    pub height: i64,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Photo {
    /// Title to show, falling back to the photo number when none was given
    pub fn display_title(&self) -> String {
        if self.title.trim().is_empty() {
            format!("Photo #{}", self.id)
        } else {
            self.title.clone()
        }
    }
}

/// Row values for a photo that has not been persisted yet
#[derive(Debug, Clone)]
pub struct PhotoInsert {
    pub title: String,
    pub description: String,
    pub image_path: String,
    pub thumbnail_path: Option<String>,
    pub width: i64,
    pub height: i64,
    pub file_size: i64,
}

/// New file locations and the metadata that goes with them
#[derive(Debug, Clone)]
pub struct PhotoFiles {
    pub image_path: String,
    pub thumbnail_path: Option<String>,
    pub width: i64,
    pub height: i64,
    pub file_size: i64,
}

/// Partial field update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct PhotoPatch {
    #[serde(default)]
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Single image sent as a base64 string, optionally a `data:` URL
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct InlineUploadRequest {
    pub image: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PhotoResponse {
    pub id: i64,
    pub title: String,
    pub display_title: String,
    pub description: String,
    pub image_url: String,
    pub thumbnail_url: Option<String>,
    pub width: i64,
    pub height: i64,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PhotoResponse {
    pub fn new(photo: Photo, image_url: String, thumbnail_url: Option<String>) -> Self {
        PhotoResponse {
            display_title: photo.display_title(),
            id: photo.id,
            title: photo.title,
            description: photo.description,
            image_url,
            thumbnail_url,
            width: photo.width,
            height: photo.height,
            file_size: photo.file_size,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PhotoListResponse {
    pub photos: Vec<PhotoResponse>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageQuery {
    /// Clamp to a valid (page, per_page) pair
    pub fn resolve(&self) -> (i64, i64) {
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let page = self.page.unwrap_or(1).max(1);
        (page, per_page)
    }
}
