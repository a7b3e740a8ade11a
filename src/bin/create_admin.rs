//! Provision the default admin account. Idempotent.
//!
//! `cargo run --bin create-admin -- --username admin --password admin123`

use clap::Parser;
use orphanage_admin::bootstrap::{provision_admin, Provisioned, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
use orphanage_admin::settings::{Settings, DEFAULT_DATABASE_URL};
use orphanage_admin::store::{connect, ensure_database_exists};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "create-admin", about = "Create the orphanage admin account if it does not exist")]
struct Args {
    #[arg(long, env = "ADMIN_USERNAME", default_value = DEFAULT_ADMIN_USERNAME)]
    username: String,
    #[arg(long, env = "ADMIN_PASSWORD", default_value = DEFAULT_ADMIN_PASSWORD, hide_env_values = true)]
    password: String,
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orphanage_admin=info")),
        )
        .init();

    let args = Args::parse();
    let settings = Settings {
        database_url: args.database_url,
        ..Settings::from_env()?
    };
    ensure_database_exists(&settings.database_url).await?;
    let pool = connect(&settings).await?;

    match provision_admin(&pool, &args.username, &args.password).await? {
        Provisioned::Created { admin_id } => {
            println!("Admin user '{}' created successfully (id {}).", args.username, admin_id)
        }
        Provisioned::AlreadyExists => println!("Admin user '{}' already exists.", args.username),
    }
    pool.close().await;
    Ok(())
}
