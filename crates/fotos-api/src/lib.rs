//! Fotos API Library
//!
//! HTTP handlers, the ingestion and lifecycle services, and application setup
//! for the photo gallery.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
pub mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod services;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
