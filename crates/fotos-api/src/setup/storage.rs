//! File store setup

use anyhow::{Context, Result};
use fotos_core::Config;
use fotos_storage::{LocalStorage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let media = &config.media;
    let storage = LocalStorage::new(media.media_root.clone(), media.media_base_url.clone())
        .await
        .with_context(|| {
            format!(
                "Failed to initialize media root {}",
                media.media_root.display()
            )
        })?;

    tracing::info!(media_root = %media.media_root.display(), "Local storage ready");

    Ok(Arc::new(storage))
}
