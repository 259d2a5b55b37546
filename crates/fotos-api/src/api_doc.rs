//! OpenAPI documentation, served as JSON at [`crate::constants::OPENAPI_PATH`].

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use crate::services::ingest;
use fotos_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fotos API",
        version = "0.1.0",
        description = "Photo gallery API (v0). Uploads are normalized to JPEG with a thumbnail; mutating endpoints require the administrator bearer token."
    ),
    paths(
        handlers::health::health_check,
        handlers::photos_get::list_photos,
        handlers::photos_get::list_all_photos,
        handlers::photos_get::get_photo,
        handlers::photo_upload::upload_photos,
        handlers::photo_inline::upload_inline,
        handlers::photo_replace::replace_photo_image,
        handlers::photo_edit::edit_photo,
        handlers::photo_delete::delete_photo,
    ),
    components(
        schemas(
            models::PhotoResponse,
            models::PhotoListResponse,
            models::PhotoPatch,
            models::InlineUploadRequest,
            ingest::BatchReport,
            ingest::BatchStats,
            ingest::InlineResult,
            handlers::photo_delete::DeleteResponse,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "photos", description = "Photo upload, browsing, editing and deletion"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_photo_routes() {
        let spec = get_openapi_spec();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();

        for expected in [
            "/api/v0/photos",
            "/api/v0/photos/all",
            "/api/v0/photos/{id}",
            "/api/v0/photos/{id}/image",
            "/api/v0/photos/upload",
            "/api/v0/photos/inline",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "{}", expected);
        }

        let components = spec.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
