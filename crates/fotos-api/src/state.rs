//! Application state shared by every handler.
//!
//! Handlers take `State<Arc<AppState>>`; the auth extractor pulls its
//! [`AuthState`] out of it through `FromRef`.

use axum::extract::FromRef;
use fotos_core::Config;
use fotos_db::PhotoRepository;
use fotos_storage::{PathResolver, Storage};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::AuthState;
use crate::services::{IngestConfig, IngestService, PhotoLifecycle};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub lifecycle: PhotoLifecycle,
    pub ingest: IngestService,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool, storage: Arc<dyn Storage>) -> Self {
        let repository = Arc::new(PhotoRepository::new(pool.clone()));
        let resolver = PathResolver::new(config.media.collection_root.clone());
        let lifecycle = PhotoLifecycle::new(repository, storage, resolver);
        let ingest = IngestService::new(lifecycle.clone(), IngestConfig::from(&config.media));
        let auth = AuthState::new(config.admin_token());

        Self {
            config,
            pool,
            lifecycle,
            ingest,
            auth,
        }
    }
}

impl FromRef<Arc<AppState>> for AuthState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.auth.clone()
    }
}
