//! Session Gate: resolve the session token on a request into an [`AuthContext`].
//! Token comes from `Authorization: Bearer <token>` or the session cookie.

use crate::error::AppError;
use crate::session::{AuthContext, SESSION_COOKIE};
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if bearer.is_some() {
        return bearer;
    }
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED.into()))?;
        state.sessions.resolve(&token).ok_or_else(|| {
            tracing::debug!(path = %parts.uri.path(), "rejected request with unknown or expired session");
            AppError::Unauthorized(LOGIN_REQUIRED.into())
        })
    }
}
