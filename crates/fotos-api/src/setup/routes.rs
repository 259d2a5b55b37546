//! Route configuration and setup

use crate::constants::{API_PREFIX, OPENAPI_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, patch, post, put},
    Json, Router,
};
use fotos_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = config.request_body_limit();

    // Server-level concurrency limit; image decoding is memory heavy
    let concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(256)
        .max(1);

    tracing::info!(body_limit, concurrency_limit, "HTTP limits configured");

    let app = public_routes()
        .merge(admin_routes())
        .layer(ConcurrencyLimitLayer::new(concurrency_limit))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Browsing, health and docs; open to visitors
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            OPENAPI_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .route(
            &format!("{}/photos", API_PREFIX),
            get(handlers::photos_get::list_photos),
        )
        .route(
            &format!("{}/photos/all", API_PREFIX),
            get(handlers::photos_get::list_all_photos),
        )
        .route(
            &format!("{}/photos/{{id}}", API_PREFIX),
            get(handlers::photos_get::get_photo),
        )
}

/// Mutating routes. Handlers resolve the caller and the services refuse
/// anyone but the administrator.
fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/photos/upload", API_PREFIX),
            post(handlers::photo_upload::upload_photos),
        )
        .route(
            &format!("{}/photos/inline", API_PREFIX),
            post(handlers::photo_inline::upload_inline),
        )
        .route(
            &format!("{}/photos/{{id}}", API_PREFIX),
            patch(handlers::photo_edit::edit_photo).delete(handlers::photo_delete::delete_photo),
        )
        .route(
            &format!("{}/photos/{{id}}/image", API_PREFIX),
            put(handlers::photo_replace::replace_photo_image),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fotos_core::config::Config;
    use std::collections::HashMap;

    fn config(cors: &str) -> Config {
        let vars: HashMap<&str, &str> = [("CORS_ORIGINS", cors)].into_iter().collect();
        Config::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap()
    }

    #[test]
    fn test_cors_accepts_wildcard_and_list() {
        assert!(setup_cors(&config("*")).is_ok());
        assert!(setup_cors(&config("http://localhost:5173,https://fotos.example")).is_ok());
    }

    #[test]
    fn test_cors_rejects_invalid_origin() {
        assert!(setup_cors(&config("http://bad\u{7f}origin")).is_err());
    }
}
