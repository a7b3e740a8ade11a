//! Adoption ledger: links one adopter to one child.
//!
//! `list` inner-joins both sides, so an adoption whose adopter or child has been
//! deleted drops out of the listing while `get` can still return its raw fields.
//! Writes that touch more than one table run in a single transaction.

use crate::error::AppError;
use crate::models::{Adoption, AdoptionDetail, AdoptionListing, AdoptionStatus};
use crate::service::validation::FormFields;
use crate::session::AuthContext;
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;

/// Every new adoption starts here; there is no separate approval step.
pub const INITIAL_STATUS: AdoptionStatus = AdoptionStatus::Approved;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAdoption {
    pub adopter_id: i64,
    pub child_id: i64,
    pub adoption_date: NaiveDate,
}

impl NewAdoption {
    pub fn from_body(body: &HashMap<String, Value>) -> Result<Self, AppError> {
        let f = FormFields::new(body);
        Ok(NewAdoption {
            adopter_id: f.id("adopter_id")?,
            child_id: f.id("child_id")?,
            adoption_date: f.date("adoption_date")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdoptionUpdate {
    pub adoption_date: NaiveDate,
    pub status: AdoptionStatus,
}

impl AdoptionUpdate {
    pub fn from_body(body: &HashMap<String, Value>) -> Result<Self, AppError> {
        let f = FormFields::new(body);
        let adoption_date = f.date("adoption_date")?;
        let status = f
            .text("status")?
            .parse::<AdoptionStatus>()
            .map_err(|e| AppError::validation("status", e.to_string()))?;
        Ok(AdoptionUpdate { adoption_date, status })
    }
}

async fn require_row(conn: &mut SqliteConnection, table: &str, field: &str, id: i64) -> Result<(), AppError> {
    let found: Option<(i64,)> = sqlx::query_as(&format!("SELECT id FROM {} WHERE id = ?", table))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    if found.is_none() {
        return Err(AppError::validation(field, format!("{} {} does not exist", field, id)));
    }
    Ok(())
}

pub struct AdoptionLedger;

impl AdoptionLedger {
    pub async fn list(pool: &SqlitePool, _auth: &AuthContext) -> Result<Vec<AdoptionListing>, AppError> {
        let rows = sqlx::query_as::<_, AdoptionListing>(
            r#"
            SELECT a.id, a.adopter_id, a.child_id, a.adoption_date, a.status,
                   p.full_name AS adopter_name, c.name AS child_name
            FROM adoptions a
            JOIN adopters p ON a.adopter_id = p.id
            JOIN children c ON a.child_id = c.id
            ORDER BY a.id
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Adopter and child must exist and the child must not already have an active adoption.
    pub async fn create(pool: &SqlitePool, auth: &AuthContext, input: &NewAdoption) -> Result<i64, AppError> {
        let mut tx = pool.begin().await?;
        require_row(&mut tx, "adopters", "adopter_id", input.adopter_id).await?;
        require_row(&mut tx, "children", "child_id", input.child_id).await?;

        let existing: Vec<(String,)> = sqlx::query_as("SELECT status FROM adoptions WHERE child_id = ?")
            .bind(input.child_id)
            .fetch_all(&mut *tx)
            .await?;
        let active = existing
            .iter()
            .any(|(s,)| s.parse::<AdoptionStatus>().map(|st| st.is_active()).unwrap_or(true));
        if active {
            return Err(AppError::Conflict(format!(
                "child {} already has an active adoption",
                input.child_id
            )));
        }

        let done = sqlx::query(
            "INSERT INTO adoptions (adopter_id, child_id, adoption_date, status) VALUES (?, ?, ?, ?)",
        )
        .bind(input.adopter_id)
        .bind(input.child_id)
        .bind(input.adoption_date)
        .bind(INITIAL_STATUS.as_str())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        let id = done.last_insert_rowid();
        tracing::info!(
            admin = %auth.username,
            adoption_id = id,
            adopter_id = input.adopter_id,
            child_id = input.child_id,
            "adoption recorded"
        );
        Ok(id)
    }

    /// Names are `None` when the adopter or child no longer exists.
    pub async fn get(pool: &SqlitePool, _auth: &AuthContext, id: i64) -> Result<AdoptionDetail, AppError> {
        sqlx::query_as::<_, AdoptionDetail>(
            r#"
            SELECT a.id, a.adopter_id, a.child_id, a.adoption_date, a.status,
                   p.full_name AS adopter_name, c.name AS child_name
            FROM adoptions a
            LEFT JOIN adopters p ON a.adopter_id = p.id
            LEFT JOIN children c ON a.child_id = c.id
            WHERE a.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("adoption {}", id)))
    }

    /// Rejects a status change that the current status does not allow.
    pub async fn update(
        pool: &SqlitePool,
        auth: &AuthContext,
        id: i64,
        input: &AdoptionUpdate,
    ) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        let current = sqlx::query_as::<_, Adoption>(
            "SELECT id, adopter_id, child_id, adoption_date, status FROM adoptions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("adoption {}", id)))?;

        if !current.status.can_transition_to(input.status) {
            return Err(AppError::validation(
                "status",
                format!("cannot change status from {} to {}", current.status, input.status),
            ));
        }

        sqlx::query("UPDATE adoptions SET adoption_date = ?, status = ? WHERE id = ?")
            .bind(input.adoption_date)
            .bind(input.status.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(
            admin = %auth.username,
            adoption_id = id,
            from = %current.status,
            to = %input.status,
            "adoption updated"
        );
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, auth: &AuthContext, id: i64) -> Result<(), AppError> {
        let done = sqlx::query("DELETE FROM adoptions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("adoption {}", id)));
        }
        tracing::info!(admin = %auth.username, adoption_id = id, "adoption deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::adopters::AdopterRegistry;
    use crate::service::children::ChildRegistry;
    use crate::store::connect_in_memory;
    use crate::test_support::{adopter_input, admin_ctx, child_input};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed(pool: &SqlitePool) -> (i64, i64) {
        let auth = admin_ctx();
        let adopter = AdopterRegistry::create(pool, &auth, &adopter_input("Maria Lopez")).await.unwrap();
        let child = ChildRegistry::create(pool, &auth, &child_input("Amy", None)).await.unwrap();
        (adopter, child)
    }

    fn new_adoption(adopter_id: i64, child_id: i64) -> NewAdoption {
        NewAdoption {
            adopter_id,
            child_id,
            adoption_date: date(2024, 6, 1),
        }
    }

    #[tokio::test]
    async fn create_starts_approved_and_lists_both_names() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let (adopter, child) = seed(&pool).await;
        let id = AdoptionLedger::create(&pool, &auth, &new_adoption(adopter, child)).await.unwrap();

        let detail = AdoptionLedger::get(&pool, &auth, id).await.unwrap();
        assert_eq!(detail.adoption.status, AdoptionStatus::Approved);
        assert_eq!(detail.adoption.adoption_date, date(2024, 6, 1));

        let rows = AdoptionLedger::list(&pool, &auth).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].adopter_name, "Maria Lopez");
        assert_eq!(rows[0].child_name, "Amy");
        assert_eq!(rows[0].status, AdoptionStatus::Approved);
    }

    #[tokio::test]
    async fn references_must_exist() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let (adopter, child) = seed(&pool).await;
        let err = AdoptionLedger::create(&pool, &auth, &new_adoption(adopter + 100, child)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "adopter_id"));
        let err = AdoptionLedger::create(&pool, &auth, &new_adoption(adopter, child + 100)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "child_id"));
        assert!(AdoptionLedger::list(&pool, &auth).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleted_child_hides_adoption_from_list_only() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let (adopter, child) = seed(&pool).await;
        let id = AdoptionLedger::create(&pool, &auth, &new_adoption(adopter, child)).await.unwrap();

        ChildRegistry::delete(&pool, &auth, child).await.unwrap();
        assert!(AdoptionLedger::list(&pool, &auth).await.unwrap().is_empty());

        let detail = AdoptionLedger::get(&pool, &auth, id).await.unwrap();
        assert_eq!(detail.adoption.child_id, child);
        assert_eq!(detail.adoption.adopter_id, adopter);
        assert_eq!(detail.child_name, None);
        assert_eq!(detail.adopter_name.as_deref(), Some("Maria Lopez"));
    }

    #[tokio::test]
    async fn deleted_adopter_hides_adoption_from_list() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let (adopter, child) = seed(&pool).await;
        AdoptionLedger::create(&pool, &auth, &new_adoption(adopter, child)).await.unwrap();
        AdopterRegistry::delete(&pool, &auth, adopter).await.unwrap();
        assert!(AdoptionLedger::list(&pool, &auth).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn completing_keeps_other_fields() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let (adopter, child) = seed(&pool).await;
        let id = AdoptionLedger::create(&pool, &auth, &new_adoption(adopter, child)).await.unwrap();
        let before = AdoptionLedger::get(&pool, &auth, id).await.unwrap();

        let change = AdoptionUpdate {
            adoption_date: date(2024, 6, 1),
            status: AdoptionStatus::Completed,
        };
        AdoptionLedger::update(&pool, &auth, id, &change).await.unwrap();
        let after = AdoptionLedger::get(&pool, &auth, id).await.unwrap();
        assert_eq!(after.adoption.status, AdoptionStatus::Completed);
        assert_eq!(after.adoption.adopter_id, before.adoption.adopter_id);
        assert_eq!(after.adoption.child_id, before.adoption.child_id);
        assert_eq!(after.adoption.adoption_date, before.adoption.adoption_date);
        assert_eq!(after.adopter_name, before.adopter_name);
        assert_eq!(after.child_name, before.child_name);
    }

    #[tokio::test]
    async fn terminal_status_cannot_be_reopened() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let (adopter, child) = seed(&pool).await;
        let id = AdoptionLedger::create(&pool, &auth, &new_adoption(adopter, child)).await.unwrap();
        let complete = AdoptionUpdate {
            adoption_date: date(2024, 6, 1),
            status: AdoptionStatus::Completed,
        };
        AdoptionLedger::update(&pool, &auth, id, &complete).await.unwrap();

        let reopen = AdoptionUpdate {
            adoption_date: date(2024, 6, 1),
            status: AdoptionStatus::Approved,
        };
        let err = AdoptionLedger::update(&pool, &auth, id, &reopen).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "status"));
        let detail = AdoptionLedger::get(&pool, &auth, id).await.unwrap();
        assert_eq!(detail.adoption.status, AdoptionStatus::Completed);
    }

    #[tokio::test]
    async fn one_active_adoption_per_child() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let (adopter, child) = seed(&pool).await;
        let first = AdoptionLedger::create(&pool, &auth, &new_adoption(adopter, child)).await.unwrap();
        let err = AdoptionLedger::create(&pool, &auth, &new_adoption(adopter, child)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let reject = AdoptionUpdate {
            adoption_date: date(2024, 6, 1),
            status: AdoptionStatus::Rejected,
        };
        AdoptionLedger::update(&pool, &auth, first, &reject).await.unwrap();
        AdoptionLedger::create(&pool, &auth, &new_adoption(adopter, child)).await.unwrap();
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let change = AdoptionUpdate {
            adoption_date: date(2024, 6, 1),
            status: AdoptionStatus::Completed,
        };
        assert!(AdoptionLedger::get(&pool, &auth, 3).await.unwrap_err().is_not_found());
        assert!(AdoptionLedger::update(&pool, &auth, 3, &change).await.unwrap_err().is_not_found());
        assert!(AdoptionLedger::delete(&pool, &auth, 3).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let (adopter, child) = seed(&pool).await;
        let id = AdoptionLedger::create(&pool, &auth, &new_adoption(adopter, child)).await.unwrap();
        AdoptionLedger::delete(&pool, &auth, id).await.unwrap();
        assert!(AdoptionLedger::get(&pool, &auth, id).await.unwrap_err().is_not_found());
    }

    #[test]
    fn update_body_rejects_free_text_status() {
        let body = crate::service::validation::body_to_map(serde_json::json!({
            "adoption_date": "2024-06-01",
            "status": "Sort of done"
        }))
        .unwrap();
        let err = AdoptionUpdate::from_body(&body).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "status"));
    }
}
