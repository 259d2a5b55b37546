//! Shared constants

/// Longest title a photo may carry
pub const TITLE_MAX_LENGTH: usize = 200;

/// Page size of the gallery listing when the client does not ask for one
pub const DEFAULT_PER_PAGE: i64 = 3;

pub const MAX_PER_PAGE: i64 = 100;

pub const BYTES_PER_MB: usize = 1024 * 1024;
