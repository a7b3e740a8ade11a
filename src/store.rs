//! SQLite pool setup and table DDL. All five tables live in one database file.

use crate::error::AppError;
use crate::settings::Settings;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;

const ADMINS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS admins (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )
"#;

/// Reference columns are declared for documentation only; `connect` leaves the
/// foreign_keys pragma off and the registries apply the deletion policies.
const DATA_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS caretakers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        age INTEGER NOT NULL,
        gender TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS children (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        age INTEGER NOT NULL,
        gender TEXT NOT NULL,
        health_status TEXT NOT NULL,
        admission_date TEXT NOT NULL,
        caretaker_id INTEGER REFERENCES caretakers(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS adopters (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name TEXT NOT NULL,
        gender TEXT NOT NULL,
        dob TEXT NOT NULL,
        address TEXT NOT NULL,
        contact_number TEXT NOT NULL,
        occupation TEXT NOT NULL,
        marital_status TEXT NOT NULL,
        adoption_reason TEXT NOT NULL,
        date_applied TEXT NOT NULL,
        status TEXT NOT NULL,
        age INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS adoptions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        adopter_id INTEGER NOT NULL REFERENCES adopters(id),
        child_id INTEGER NOT NULL REFERENCES children(id),
        adoption_date TEXT NOT NULL,
        status TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_children_caretaker_id ON children(caretaker_id)",
    "CREATE INDEX IF NOT EXISTS idx_adoptions_child_id ON adoptions(child_id)",
    "CREATE INDEX IF NOT EXISTS idx_adoptions_adopter_id ON adoptions(adopter_id)",
];

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Create the database file in `database_url` if it does not exist yet. No-op for in-memory URLs.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    if is_memory_url(database_url) {
        return Ok(());
    }
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        tracing::info!(database_url = %database_url, "creating database");
        Sqlite::create_database(database_url).await?;
    }
    Ok(())
}

pub async fn connect(settings: &Settings) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(&settings.database_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(false);
    let mut pool_opts = SqlitePoolOptions::new().max_connections(settings.max_connections.max(1));
    if is_memory_url(&settings.database_url) {
        // Every in-memory connection is its own database; pin exactly one.
        pool_opts = pool_opts
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    let pool = pool_opts.connect_with(opts).await?;
    Ok(pool)
}

/// Fresh private database with all tables created. Used by tests and demos.
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let settings = Settings {
        database_url: "sqlite::memory:".into(),
        ..Settings::default()
    };
    let pool = connect(&settings).await?;
    ensure_tables(&pool).await?;
    Ok(pool)
}

pub async fn ensure_admin_table(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(ADMINS_DDL).execute(pool).await?;
    Ok(())
}

/// Tables the server needs before it can take requests.
pub const TABLES: [&str; 5] = ["admins", "caretakers", "children", "adopters", "adoptions"];

/// Names from [`TABLES`] that are absent from the schema, in declaration order.
pub async fn missing_tables(pool: &SqlitePool) -> Result<Vec<&'static str>, AppError> {
    let present: Vec<(String,)> = sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table'")
        .fetch_all(pool)
        .await?;
    Ok(TABLES
        .into_iter()
        .filter(|t| !present.iter().any(|(name,)| name == t))
        .collect())
}

/// Idempotent DDL for admins, caretakers, children, adopters and adoptions.
pub async fn ensure_tables(pool: &SqlitePool) -> Result<(), AppError> {
    ensure_admin_table(pool).await?;
    for ddl in DATA_DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_tables_is_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        ensure_tables(&pool).await.unwrap();
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('admins','caretakers','children','adopters','adoptions')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 5);
        assert!(missing_tables(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_tables_reports_what_ddl_has_not_created() {
        let settings = Settings {
            database_url: "sqlite::memory:".into(),
            ..Settings::default()
        };
        let pool = connect(&settings).await.unwrap();
        assert_eq!(missing_tables(&pool).await.unwrap(), TABLES.to_vec());
        ensure_admin_table(&pool).await.unwrap();
        assert_eq!(
            missing_tables(&pool).await.unwrap(),
            vec!["caretakers", "children", "adopters", "adoptions"]
        );
    }

    #[test]
    fn memory_urls_are_detected() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite:file:memdb_1?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite:orphanage.db"));
    }
}
