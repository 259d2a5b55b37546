//! API constants

/// Versioned prefix for every JSON endpoint
pub const API_PREFIX: &str = "/api/v0";

/// Where the generated OpenAPI document is served
pub const OPENAPI_PATH: &str = "/api/v0/openapi.json";
