//! Adopter registry: prospective-adopter applications.

use crate::error::AppError;
use crate::models::Adopter;
use crate::service::validation::FormFields;
use crate::session::AuthContext;
use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::HashMap;

const ADOPTER_COLUMNS: &str = "id, full_name, gender, dob, address, contact_number, occupation, \
     marital_status, adoption_reason, date_applied, status, age";

const CONTACT_NUMBER_PATTERN: &str = r"^\+?[0-9][0-9 ()\-]{4,19}$";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdopterInput {
    pub full_name: String,
    pub gender: String,
    pub dob: NaiveDate,
    pub address: String,
    pub contact_number: String,
    pub occupation: String,
    pub marital_status: String,
    pub adoption_reason: String,
    pub date_applied: NaiveDate,
    pub status: String,
    pub age: i64,
}

impl AdopterInput {
    pub fn from_body(body: &HashMap<String, Value>) -> Result<Self, AppError> {
        let f = FormFields::new(body);
        let phone = Regex::new(CONTACT_NUMBER_PATTERN)
            .map_err(|_| AppError::validation("contact_number", "invalid pattern for contact_number"))?;
        Ok(AdopterInput {
            full_name: f.text("full_name")?,
            gender: f.text("gender")?,
            dob: f.date("dob")?,
            address: f.text("address")?,
            contact_number: f.matching("contact_number", &phone, "must be a phone number")?,
            occupation: f.text("occupation")?,
            marital_status: f.text("marital_status")?,
            adoption_reason: f.text("adoption_reason")?,
            date_applied: f.date("date_applied")?,
            status: f.text("status")?,
            age: f.age("age")?,
        })
    }
}

pub struct AdopterRegistry;

impl AdopterRegistry {
    pub async fn list(pool: &SqlitePool, _auth: &AuthContext) -> Result<Vec<Adopter>, AppError> {
        let rows = sqlx::query_as::<_, Adopter>(&format!("SELECT {} FROM adopters ORDER BY id", ADOPTER_COLUMNS))
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn create(pool: &SqlitePool, auth: &AuthContext, input: &AdopterInput) -> Result<i64, AppError> {
        let done = sqlx::query(
            r#"
            INSERT INTO adopters (full_name, gender, dob, address, contact_number, occupation,
                                  marital_status, adoption_reason, date_applied, status, age)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.full_name)
        .bind(&input.gender)
        .bind(input.dob)
        .bind(&input.address)
        .bind(&input.contact_number)
        .bind(&input.occupation)
        .bind(&input.marital_status)
        .bind(&input.adoption_reason)
        .bind(input.date_applied)
        .bind(&input.status)
        .bind(input.age)
        .execute(pool)
        .await?;
        let id = done.last_insert_rowid();
        tracing::info!(admin = %auth.username, adopter_id = id, "adopter created");
        Ok(id)
    }

    pub async fn get(pool: &SqlitePool, _auth: &AuthContext, id: i64) -> Result<Adopter, AppError> {
        sqlx::query_as::<_, Adopter>(&format!("SELECT {} FROM adopters WHERE id = ?", ADOPTER_COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("adopter {}", id)))
    }

    pub async fn update(pool: &SqlitePool, auth: &AuthContext, id: i64, input: &AdopterInput) -> Result<(), AppError> {
        let done = sqlx::query(
            r#"
            UPDATE adopters
            SET full_name = ?, gender = ?, dob = ?, address = ?, contact_number = ?, occupation = ?,
                marital_status = ?, adoption_reason = ?, date_applied = ?, status = ?, age = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.full_name)
        .bind(&input.gender)
        .bind(input.dob)
        .bind(&input.address)
        .bind(&input.contact_number)
        .bind(&input.occupation)
        .bind(&input.marital_status)
        .bind(&input.adoption_reason)
        .bind(input.date_applied)
        .bind(&input.status)
        .bind(input.age)
        .bind(id)
        .execute(pool)
        .await?;
        if done.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("adopter {}", id)));
        }
        tracing::info!(admin = %auth.username, adopter_id = id, "adopter updated");
        Ok(())
    }

    /// Adoptions naming this adopter are kept; the ledger list stops showing them.
    pub async fn delete(pool: &SqlitePool, auth: &AuthContext, id: i64) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM adopters WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(AppError::NotFound(format!("adopter {}", id)));
        }
        let (orphaned,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM adoptions WHERE adopter_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        if orphaned > 0 {
            tracing::warn!(adopter_id = id, adoptions = orphaned, "deleted adopter still referenced by adoptions");
        }
        tracing::info!(admin = %auth.username, adopter_id = id, "adopter deleted");
        Ok(())
    }
}
