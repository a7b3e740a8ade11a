//! Admin credential store.

use crate::error::AppError;
use crate::password::{hash_password, verify_password};
use sqlx::SqlitePool;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminIdentity {
    pub admin_id: i64,
    pub username: String,
}

/// Outcome of a login attempt. A failure carries no hint of which part was wrong.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthResult {
    pub ok: bool,
    pub identity: Option<AdminIdentity>,
}

impl AuthResult {
    fn granted(identity: AdminIdentity) -> Self {
        AuthResult {
            ok: true,
            identity: Some(identity),
        }
    }

    fn denied() -> Self {
        AuthResult {
            ok: false,
            identity: None,
        }
    }
}

pub struct CredentialStore;

impl CredentialStore {
    pub async fn verify(pool: &SqlitePool, username: &str, password: &str) -> Result<AuthResult, AppError> {
        tracing::debug!(username = %username, "verify credentials");
        let row: Option<(i64, String, String)> =
            sqlx::query_as("SELECT id, username, password_hash FROM admins WHERE username = ?")
                .bind(username)
                .fetch_optional(pool)
                .await?;
        match row {
            Some((admin_id, username, password_hash)) if verify_password(&password_hash, password) => {
                Ok(AuthResult::granted(AdminIdentity { admin_id, username }))
            }
            Some(_) => Ok(AuthResult::denied()),
            None => {
                // Same hashing work as a real account so response time does not reveal unknown usernames.
                let _ = verify_password(&hash_password(""), password);
                Ok(AuthResult::denied())
            }
        }
    }

    pub async fn exists(pool: &SqlitePool, username: &str) -> Result<bool, AppError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM admins WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn create_admin(pool: &SqlitePool, username: &str, password: &str) -> Result<i64, AppError> {
        if username.trim().is_empty() {
            return Err(AppError::validation("username", "username is required"));
        }
        if password.is_empty() {
            return Err(AppError::validation("password", "password is required"));
        }
        let res = sqlx::query("INSERT INTO admins (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(hash_password(password))
            .execute(pool)
            .await;
        match res {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::Conflict(format!("admin '{}' already exists", username)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, AppError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins").fetch_one(pool).await?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::connect_in_memory;

    #[tokio::test]
    async fn correct_password_yields_identity() {
        let pool = connect_in_memory().await.unwrap();
        let id = CredentialStore::create_admin(&pool, "admin", "admin123").await.unwrap();
        let res = CredentialStore::verify(&pool, "admin", "admin123").await.unwrap();
        assert!(res.ok);
        assert_eq!(
            res.identity,
            Some(AdminIdentity {
                admin_id: id,
                username: "admin".into()
            })
        );
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let pool = connect_in_memory().await.unwrap();
        CredentialStore::create_admin(&pool, "admin", "admin123").await.unwrap();
        let wrong = CredentialStore::verify(&pool, "admin", "nope").await.unwrap();
        let missing = CredentialStore::verify(&pool, "ghost", "admin123").await.unwrap();
        assert_eq!(wrong, missing);
        assert!(!wrong.ok);
    }

    #[tokio::test]
    async fn username_match_is_exact() {
        let pool = connect_in_memory().await.unwrap();
        CredentialStore::create_admin(&pool, "admin", "admin123").await.unwrap();
        assert!(!CredentialStore::verify(&pool, "Admin", "admin123").await.unwrap().ok);
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let pool = connect_in_memory().await.unwrap();
        CredentialStore::create_admin(&pool, "admin", "a").await.unwrap();
        let err = CredentialStore::create_admin(&pool, "admin", "b").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(CredentialStore::count(&pool).await.unwrap(), 1);
    }
}
