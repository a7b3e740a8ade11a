//! Orphanage admin server: creates the database and tables if needed, then serves the API.
//!
//! Run from repo root: `cargo run -p orphanage-server`
//! Provision a login first with `cargo run --bin create-admin`.

use orphanage_admin::{app_router, connect, ensure_database_exists, ensure_tables, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("orphanage_admin=info,orphanage_server=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    ensure_database_exists(&settings.database_url).await?;
    let pool = connect(&settings).await?;
    ensure_tables(&pool).await?;

    let state = AppState::new(pool, &settings);
    let app = app_router(state);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("orphanage admin listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
