//! Environment-driven configuration
//!
//! [`Config::from_env`] loads `.env` (if present) and reads every setting with
//! a default. Components receive the sub-structs they need at construction.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context};

use crate::constants::BYTES_PER_MB;

const SERVER_PORT: u16 = 3000;
const DATABASE_URL: &str = "sqlite://fotos.db?mode=rwc";
const DB_MAX_CONNECTIONS: u32 = 5;
const MEDIA_ROOT: &str = "./media";
const MEDIA_BASE_URL: &str = "/media";
const DEV_ADMIN_TOKEN: &str = "dev-admin-token";
const IMAGE_MAX_WIDTH: u32 = 1920;
const IMAGE_MAX_HEIGHT: u32 = 1920;
const IMAGE_MIN_DIMENSION: u32 = 100;
const IMAGE_MAX_DIMENSION: u32 = 8000;
const IMAGE_QUALITY: u8 = 85;
const MAX_FILE_SIZE_MB: usize = 20;
const MAX_BATCH_FILES: usize = 20;
const THUMBNAIL_MAX_WIDTH: u32 = 300;
const THUMBNAIL_MAX_HEIGHT: u32 = 300;
const THUMBNAIL_QUALITY: u8 = 80;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub admin_token: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
}

/// Bounds applied to every uploaded original
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    /// Bounding box the normalized original must fit in
    pub max_width: u32,
    pub max_height: u32,
    /// Decoded sides below this are rejected
    pub min_dimension: u32,
    /// Decoded sides above this are rejected
    pub max_dimension: u32,
    /// Raw upload size limit in bytes
    pub max_file_size: usize,
    pub quality: u8,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_width: IMAGE_MAX_WIDTH,
            max_height: IMAGE_MAX_HEIGHT,
            min_dimension: IMAGE_MIN_DIMENSION,
            max_dimension: IMAGE_MAX_DIMENSION,
            max_file_size: MAX_FILE_SIZE_MB * BYTES_PER_MB,
            quality: IMAGE_QUALITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSettings {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            max_width: THUMBNAIL_MAX_WIDTH,
            max_height: THUMBNAIL_MAX_HEIGHT,
            quality: THUMBNAIL_QUALITY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory files are written under
    pub media_root: PathBuf,
    /// URL prefix the media root is served from
    pub media_base_url: String,
    /// Optional prefix placed in front of both collection directories
    pub collection_root: String,
    pub max_batch_files: usize,
    pub limits: ImageLimits,
    pub thumbnails: ThumbnailSettings,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            media_root: PathBuf::from(MEDIA_ROOT),
            media_base_url: MEDIA_BASE_URL.to_string(),
            collection_root: String::new(),
            max_batch_files: MAX_BATCH_FILES,
            limits: ImageLimits::default(),
            thumbnails: ThumbnailSettings::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());
        let is_production = is_production_name(&environment);

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let admin_token = match lookup("ADMIN_TOKEN").filter(|t| !t.trim().is_empty()) {
            Some(token) => token,
            None if is_production => {
                return Err(anyhow!("ADMIN_TOKEN must be set in production"));
            }
            None => DEV_ADMIN_TOKEN.to_string(),
        };

        let server = ServerConfig {
            server_port: parse_var(&lookup, "SERVER_PORT", SERVER_PORT)?,
            environment,
            cors_origins,
            admin_token,
        };

        let database = DatabaseConfig {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DATABASE_URL.to_string()),
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", DB_MAX_CONNECTIONS)?,
        };

        let max_file_size_mb: usize = parse_var(&lookup, "MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB)?;

        let limits = ImageLimits {
            max_width: parse_var(&lookup, "IMAGE_MAX_WIDTH", IMAGE_MAX_WIDTH)?,
            max_height: parse_var(&lookup, "IMAGE_MAX_HEIGHT", IMAGE_MAX_HEIGHT)?,
            min_dimension: parse_var(&lookup, "IMAGE_MIN_DIMENSION", IMAGE_MIN_DIMENSION)?,
            max_dimension: parse_var(&lookup, "IMAGE_MAX_DIMENSION", IMAGE_MAX_DIMENSION)?,
            max_file_size: max_file_size_mb.saturating_mul(BYTES_PER_MB),
            quality: parse_var(&lookup, "IMAGE_QUALITY", IMAGE_QUALITY)?,
        };

        let thumbnails = ThumbnailSettings {
            max_width: parse_var(&lookup, "THUMBNAIL_MAX_WIDTH", THUMBNAIL_MAX_WIDTH)?,
            max_height: parse_var(&lookup, "THUMBNAIL_MAX_HEIGHT", THUMBNAIL_MAX_HEIGHT)?,
            quality: parse_var(&lookup, "THUMBNAIL_QUALITY", THUMBNAIL_QUALITY)?,
        };

        let media = MediaConfig {
            media_root: PathBuf::from(lookup("MEDIA_ROOT").unwrap_or_else(|| MEDIA_ROOT.into())),
            media_base_url: lookup("MEDIA_BASE_URL").unwrap_or_else(|| MEDIA_BASE_URL.into()),
            collection_root: lookup("COLLECTION_ROOT")
                .map(|s| s.trim().trim_matches('/').to_string())
                .unwrap_or_default(),
            max_batch_files: parse_var(&lookup, "MAX_BATCH_FILES", MAX_BATCH_FILES)?,
            limits,
            thumbnails,
        };

        Ok(Config {
            server,
            database,
            media,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let limits = &self.media.limits;

        if limits.max_width == 0 || limits.max_height == 0 {
            return Err(anyhow!("IMAGE_MAX_WIDTH and IMAGE_MAX_HEIGHT must be positive"));
        }
        if limits.min_dimension == 0 {
            return Err(anyhow!("IMAGE_MIN_DIMENSION must be positive"));
        }
        if limits.min_dimension > limits.max_dimension {
            return Err(anyhow!(
                "IMAGE_MIN_DIMENSION ({}) cannot exceed IMAGE_MAX_DIMENSION ({})",
                limits.min_dimension,
                limits.max_dimension
            ));
        }
        if limits.max_file_size == 0 {
            return Err(anyhow!("MAX_FILE_SIZE_MB must be positive"));
        }
        validate_quality("IMAGE_QUALITY", limits.quality)?;

        let thumbnails = &self.media.thumbnails;
        if thumbnails.max_width == 0 || thumbnails.max_height == 0 {
            return Err(anyhow!(
                "THUMBNAIL_MAX_WIDTH and THUMBNAIL_MAX_HEIGHT must be positive"
            ));
        }
        validate_quality("THUMBNAIL_QUALITY", thumbnails.quality)?;

        if self.media.max_batch_files == 0 {
            return Err(anyhow!("MAX_BATCH_FILES must be positive"));
        }
        if self.database.max_connections == 0 {
            return Err(anyhow!("DB_MAX_CONNECTIONS must be positive"));
        }
        if !self.database.database_url.starts_with("sqlite:") {
            return Err(anyhow!("DATABASE_URL must be a sqlite: connection string"));
        }

        Ok(())
    }

    pub fn server_port(&self) -> u16 {
        self.server.server_port
    }

    pub fn environment(&self) -> &str {
        &self.server.environment
    }

    pub fn is_production(&self) -> bool {
        is_production_name(&self.server.environment)
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.server.cors_origins
    }

    pub fn admin_token(&self) -> &str {
        &self.server.admin_token
    }

    pub fn database_url(&self) -> &str {
        &self.database.database_url
    }

    /// Upper bound for one request body: a full batch plus form overhead.
    pub fn request_body_limit(&self) -> usize {
        self.media
            .limits
            .max_file_size
            .saturating_mul(self.media.max_batch_files)
            .saturating_add(BYTES_PER_MB)
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        _ => Ok(default),
    }
}

fn validate_quality(key: &str, quality: u8) -> Result<(), anyhow::Error> {
    if !(1..=100).contains(&quality) {
        return Err(anyhow!("{} must be between 1 and 100, got {}", key, quality));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.admin_token(), "dev-admin-token");
        assert_eq!(config.media.limits, ImageLimits::default());
        assert_eq!(config.media.limits.max_file_size, 20 * 1024 * 1024);
        assert_eq!(config.media.thumbnails.max_width, 300);
        assert_eq!(config.media.thumbnails.quality, 80);
        assert_eq!(config.media.collection_root, "");
        assert!(!config.is_production());
        config.validate().unwrap();
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SERVER_PORT", "8080"),
            ("IMAGE_QUALITY", "70"),
            ("MAX_FILE_SIZE_MB", "5"),
            ("COLLECTION_ROOT", "/gallery/"),
        ])
        .unwrap();
        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.media.limits.quality, 70);
        assert_eq!(config.media.limits.max_file_size, 5 * 1024 * 1024);
        assert_eq!(config.media.collection_root, "gallery");
    }

    #[test]
    fn test_production_requires_admin_token() {
        let err = config_from(&[("ENVIRONMENT", "production"), ("CORS_ORIGINS", "https://a.b")])
            .unwrap_err();
        assert!(err.to_string().contains("ADMIN_TOKEN"));
    }

    #[test]
    fn test_production_rejects_wildcard_cors() {
        let err = config_from(&[("ENVIRONMENT", "prod"), ("ADMIN_TOKEN", "s3cret")]).unwrap_err();
        assert!(err.to_string().contains("CORS_ORIGINS"));
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        assert!(config_from(&[("SERVER_PORT", "eighty")]).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = config_from(&[("IMAGE_QUALITY", "0")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("IMAGE_MIN_DIMENSION", "9000")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("THUMBNAIL_MAX_WIDTH", "0")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("DATABASE_URL", "postgres://localhost/fotos")]).unwrap();
        assert!(config.validate().is_err());
    }
}
