//! Unauthenticated probes mounted at the root.

use crate::state::AppState;
use crate::store::missing_tables;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize)]
struct Readiness {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing_tables: Vec<&'static str>,
}

impl Readiness {
    fn degraded(database: &'static str, missing_tables: Vec<&'static str>) -> (StatusCode, Json<Readiness>) {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Readiness {
                status: "degraded",
                database,
                missing_tables,
            }),
        )
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": env!("CARGO_PKG_NAME") }))
}

/// Ready once the database answers and every table exists.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    match missing_tables(&state.pool).await {
        Ok(missing) if missing.is_empty() => (
            StatusCode::OK,
            Json(Readiness {
                status: "ok",
                database: "ok",
                missing_tables: Vec::new(),
            }),
        ),
        Ok(missing) => {
            tracing::warn!(?missing, "schema incomplete");
            Readiness::degraded("incomplete", missing)
        }
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            Readiness::degraded("unavailable", Vec::new())
        }
    }
}

async fn version() -> Json<Value> {
    Json(json!({ "name": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION") }))
}

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
