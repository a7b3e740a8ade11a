pub mod auth;
pub mod common;
pub mod registry;

pub use auth::auth_routes;
pub use common::common_routes;
pub use registry::registry_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Request bodies are small form submissions.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Full application: common routes at the root, auth and registries under `/api/v1`.
pub fn app_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth_routes(state.clone()))
        .merge(registry_routes(state.clone()));
    Router::new()
        .merge(common_routes(state))
        .nest("/api/v1", api)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}
