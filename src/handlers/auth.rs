//! Login, logout and the landing page.

use crate::error::AppError;
use crate::extractors::session_token;
use crate::response::{ok_with_message, success_one_ok};
use crate::service::validation::{body_to_map, FormFields};
use crate::service::{dashboard, CredentialStore};
use crate::session::{AuthContext, SESSION_COOKIE};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;

pub const INVALID_CREDENTIALS: &str = "Invalid username or password. Please try again.";

#[derive(Serialize)]
pub struct LoginBody {
    pub username: String,
    pub token: String,
}

fn session_cookie(token: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token)
}

fn cleared_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

pub async fn login(State(state): State<AppState>, Json(body): Json<Value>) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let f = FormFields::new(&body);
    let username = f.text("username")?;
    // Passwords are compared as typed, surrounding whitespace included.
    let password = match body.get("password") {
        Some(Value::String(s)) if !s.is_empty() => s.as_str(),
        _ => return Err(AppError::validation("password", "password is required")),
    };

    let result = CredentialStore::verify(&state.pool, &username, password).await?;
    let identity = match result.identity {
        Some(identity) if result.ok => identity,
        _ => {
            tracing::warn!(username = %username, "failed login");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    let ctx = state.sessions.issue(identity.admin_id, &identity.username);
    tracing::info!(admin = %ctx.username, "admin logged in");
    let (status, json) = ok_with_message(
        LoginBody {
            username: ctx.username.clone(),
            token: ctx.token.clone(),
        },
        "Welcome back, Admin!",
    );
    Ok((status, [(header::SET_COOKIE, session_cookie(&ctx.token))], json))
}

/// Works with or without a live session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        if state.sessions.revoke(&token) {
            tracing::info!("admin logged out");
        }
    }
    let (status, json) = ok_with_message(Value::Null, "You have been logged out successfully.");
    (status, [(header::SET_COOKIE, cleared_cookie())], json)
}

pub async fn home(State(state): State<AppState>, auth: AuthContext) -> Result<impl IntoResponse, AppError> {
    let summary = dashboard::summary(&state.pool, &auth).await?;
    Ok(success_one_ok(summary))
}
