//! Shared application state for all routes.

use crate::session::SessionStore;
use crate::settings::Settings;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(pool: SqlitePool, settings: &Settings) -> Self {
        AppState {
            pool,
            sessions: SessionStore::new(settings.session_ttl_minutes),
        }
    }
}
