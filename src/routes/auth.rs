//! Login and logout are the only routes outside the Session Gate.

use crate::handlers::auth::{home, login, logout};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout).get(logout))
        .route("/home", get(home))
        .with_state(state)
}
