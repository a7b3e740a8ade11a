//! Child registry.

use crate::error::AppError;
use crate::models::{Child, ChildListing};
use crate::service::validation::FormFields;
use crate::session::AuthContext;
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;

const CHILD_COLUMNS: &str = "id, name, age, gender, health_status, admission_date, caretaker_id";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildInput {
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub health_status: String,
    pub admission_date: NaiveDate,
    pub caretaker_id: Option<i64>,
}

impl ChildInput {
    pub fn from_body(body: &HashMap<String, Value>) -> Result<Self, AppError> {
        let f = FormFields::new(body);
        Ok(ChildInput {
            name: f.text("name")?,
            age: f.age("age")?,
            gender: f.text("gender")?,
            health_status: f.text("health_status")?,
            admission_date: f.date("admission_date")?,
            caretaker_id: f.optional_id("caretaker_id")?,
        })
    }
}

async fn check_caretaker(conn: &mut SqliteConnection, caretaker_id: Option<i64>) -> Result<(), AppError> {
    let Some(caretaker_id) = caretaker_id else {
        return Ok(());
    };
    let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM caretakers WHERE id = ?")
        .bind(caretaker_id)
        .fetch_optional(&mut *conn)
        .await?;
    if found.is_none() {
        return Err(AppError::validation(
            "caretaker_id",
            format!("caretaker {} does not exist", caretaker_id),
        ));
    }
    Ok(())
}

pub struct ChildRegistry;

impl ChildRegistry {
    /// Left join: children with no caretaker are listed with `caretaker_name = None`.
    pub async fn list(pool: &SqlitePool, _auth: &AuthContext) -> Result<Vec<ChildListing>, AppError> {
        let rows = sqlx::query_as::<_, ChildListing>(
            r#"
            SELECT c.id, c.name, c.age, c.gender, c.health_status, c.admission_date, c.caretaker_id,
                   t.name AS caretaker_name
            FROM children c
            LEFT JOIN caretakers t ON c.caretaker_id = t.id
            ORDER BY c.id
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(pool: &SqlitePool, auth: &AuthContext, input: &ChildInput) -> Result<i64, AppError> {
        let mut tx = pool.begin().await?;
        check_caretaker(&mut tx, input.caretaker_id).await?;
        let done = sqlx::query(
            r#"
            INSERT INTO children (name, age, gender, health_status, admission_date, caretaker_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.gender)
        .bind(&input.health_status)
        .bind(input.admission_date)
        .bind(input.caretaker_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        let id = done.last_insert_rowid();
        tracing::info!(admin = %auth.username, child_id = id, caretaker_id = ?input.caretaker_id, "child created");
        Ok(id)
    }

    pub async fn get(pool: &SqlitePool, _auth: &AuthContext, id: i64) -> Result<Child, AppError> {
        sqlx::query_as::<_, Child>(&format!("SELECT {} FROM children WHERE id = ?", CHILD_COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("child {}", id)))
    }

    pub async fn update(pool: &SqlitePool, auth: &AuthContext, id: i64, input: &ChildInput) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM children WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(AppError::NotFound(format!("child {}", id)));
        }
        check_caretaker(&mut tx, input.caretaker_id).await?;
        sqlx::query(
            r#"
            UPDATE children
            SET name = ?, age = ?, gender = ?, health_status = ?, admission_date = ?, caretaker_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.gender)
        .bind(&input.health_status)
        .bind(input.admission_date)
        .bind(input.caretaker_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        tracing::info!(admin = %auth.username, child_id = id, "child updated");
        Ok(())
    }

    /// Adoptions naming this child are kept; the ledger list stops showing them.
    pub async fn delete(pool: &SqlitePool, auth: &AuthContext, id: i64) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM children WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(AppError::NotFound(format!("child {}", id)));
        }
        let (orphaned,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM adoptions WHERE child_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        if orphaned > 0 {
            tracing::warn!(child_id = id, adoptions = orphaned, "deleted child still referenced by adoptions");
        }
        tracing::info!(admin = %auth.username, child_id = id, "child deleted");
        Ok(())
    }
}
