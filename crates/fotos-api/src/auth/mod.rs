//! Single-administrator authentication.
//!
//! Requests carrying `Authorization: Bearer <ADMIN_TOKEN>` resolve to the
//! administrator; everything else is a visitor. Mutating services check the
//! role themselves through [`CallerContext::require_admin`].

pub mod middleware;
pub mod models;

pub use middleware::AuthState;
pub use models::{CallerContext, UserRole};
