//! One-shot admin provisioning used by the `create-admin` binary.

use crate::error::AppError;
use crate::service::CredentialStore;
use crate::store::ensure_admin_table;
use sqlx::SqlitePool;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provisioned {
    Created { admin_id: i64 },
    AlreadyExists,
}

/// Creates the admins table if needed, then the admin unless that username is taken. Safe to rerun.
pub async fn provision_admin(pool: &SqlitePool, username: &str, password: &str) -> Result<Provisioned, AppError> {
    ensure_admin_table(pool).await?;
    if CredentialStore::exists(pool, username).await? {
        return Ok(Provisioned::AlreadyExists);
    }
    match CredentialStore::create_admin(pool, username, password).await {
        Ok(admin_id) => Ok(Provisioned::Created { admin_id }),
        Err(AppError::Conflict(_)) => Ok(Provisioned::AlreadyExists),
        Err(e) => Err(e),
    }
}
