use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};
use std::convert::Infallible;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use super::models::CallerContext;

#[derive(Clone)]
pub struct AuthState {
    admin_token: Arc<str>,
}

impl AuthState {
    pub fn new(admin_token: impl Into<Arc<str>>) -> Self {
        Self {
            admin_token: admin_token.into(),
        }
    }

    /// Resolve the caller from request headers
    pub fn resolve(&self, headers: &HeaderMap) -> CallerContext {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim);

        match token {
            Some(token) if secure_compare(token, &self.admin_token) => CallerContext::admin(),
            Some(_) => {
                tracing::debug!("Bearer token did not match the administrator token");
                CallerContext::visitor()
            }
            None => CallerContext::visitor(),
        }
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

// Never rejects: anonymous callers are visitors and services decide what they may do
impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        Ok(auth.resolve(&parts.headers))
    }
}
