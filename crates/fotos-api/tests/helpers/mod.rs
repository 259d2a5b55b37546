//! Test helpers: build AppState and router for integration tests.
//!
//! Every app gets its own in-memory database and a temporary media root.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use fotos_api::constants;
use fotos_api::setup::routes;
use fotos_api::state::AppState;
use fotos_core::Config;
use fotos_storage::{LocalStorage, Storage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const ADMIN_TOKEN: &str = "test-admin-token-0123456789abcdef";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn media_root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Number of files in one collection directory
    pub fn file_count(&self, collection: &str) -> usize {
        std::fs::read_dir(self.media_root().join(collection))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(temp_dir.path());

    let pool = fotos_db::connect_in_memory()
        .await
        .expect("Failed to create test database");

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path(), config.media.media_base_url.clone())
            .await
            .expect("Failed to create local storage"),
    );

    let state = Arc::new(AppState::new(config.clone(), pool, storage));
    let app = routes::setup_routes(&config, state.clone()).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        temp_dir,
    }
}

fn create_test_config(media_root: &Path) -> Config {
    let media_root = media_root.display().to_string();
    let vars: HashMap<&str, String> = [
        ("ENVIRONMENT", "test".to_string()),
        ("ADMIN_TOKEN", ADMIN_TOKEN.to_string()),
        ("DATABASE_URL", "sqlite::memory:".to_string()),
        ("MEDIA_ROOT", media_root),
        ("MEDIA_BASE_URL", "http://localhost:3000/media".to_string()),
        ("MAX_FILE_SIZE_MB", "2".to_string()),
        ("MAX_BATCH_FILES", "5".to_string()),
    ]
    .into_iter()
    .collect();

    let config = Config::from_lookup(|key| vars.get(key).cloned()).expect("Invalid test config");
    config.validate().expect("Invalid test config");
    config
}
