//! Caretaker registry.

use crate::error::AppError;
use crate::models::Caretaker;
use crate::service::validation::FormFields;
use crate::session::AuthContext;
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaretakerInput {
    pub name: String,
    pub age: i64,
    pub gender: String,
}

impl CaretakerInput {
    pub fn from_body(body: &HashMap<String, Value>) -> Result<Self, AppError> {
        let f = FormFields::new(body);
        Ok(CaretakerInput {
            name: f.text("name")?,
            age: f.age("age")?,
            gender: f.text("gender")?,
        })
    }
}

pub struct CaretakerRegistry;

impl CaretakerRegistry {
    pub async fn list(pool: &SqlitePool, _auth: &AuthContext) -> Result<Vec<Caretaker>, AppError> {
        let rows = sqlx::query_as::<_, Caretaker>("SELECT id, name, age, gender FROM caretakers ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn create(pool: &SqlitePool, auth: &AuthContext, input: &CaretakerInput) -> Result<i64, AppError> {
        let done = sqlx::query("INSERT INTO caretakers (name, age, gender) VALUES (?, ?, ?)")
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.gender)
            .execute(pool)
            .await?;
        let id = done.last_insert_rowid();
        tracing::info!(admin = %auth.username, caretaker_id = id, "caretaker created");
        Ok(id)
    }

    pub async fn get(pool: &SqlitePool, _auth: &AuthContext, id: i64) -> Result<Caretaker, AppError> {
        sqlx::query_as::<_, Caretaker>("SELECT id, name, age, gender FROM caretakers WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("caretaker {}", id)))
    }

    pub async fn update(
        pool: &SqlitePool,
        auth: &AuthContext,
        id: i64,
        input: &CaretakerInput,
    ) -> Result<(), AppError> {
        let done = sqlx::query("UPDATE caretakers SET name = ?, age = ?, gender = ? WHERE id = ?")
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.gender)
            .bind(id)
            .execute(pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("caretaker {}", id)));
        }
        tracing::info!(admin = %auth.username, caretaker_id = id, "caretaker updated");
        Ok(())
    }

    /// Children assigned to the caretaker are detached (caretaker_id set to NULL) in the same transaction.
    pub async fn delete(pool: &SqlitePool, auth: &AuthContext, id: i64) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        let detached = sqlx::query("UPDATE children SET caretaker_id = NULL WHERE caretaker_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let deleted = sqlx::query("DELETE FROM caretakers WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(AppError::NotFound(format!("caretaker {}", id)));
        }
        tx.commit().await?;
        tracing::info!(admin = %auth.username, caretaker_id = id, detached_children = detached, "caretaker deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::connect_in_memory;
    use crate::test_support::admin_ctx;

    fn jane() -> CaretakerInput {
        CaretakerInput {
            name: "Jane Doe".into(),
            age: 34,
            gender: "F".into(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let id = CaretakerRegistry::create(&pool, &auth, &jane()).await.unwrap();
        let got = CaretakerRegistry::get(&pool, &auth, id).await.unwrap();
        assert_eq!(
            got,
            Caretaker {
                id,
                name: "Jane Doe".into(),
                age: 34,
                gender: "F".into()
            }
        );
    }

    #[tokio::test]
    async fn list_keeps_insertion_order_and_allows_duplicate_names() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let a = CaretakerRegistry::create(&pool, &auth, &jane()).await.unwrap();
        let b = CaretakerRegistry::create(&pool, &auth, &jane()).await.unwrap();
        let ids: Vec<i64> = CaretakerRegistry::list(&pool, &auth).await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn update_changes_fields() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let id = CaretakerRegistry::create(&pool, &auth, &jane()).await.unwrap();
        let changed = CaretakerInput {
            name: "Jane Smith".into(),
            age: 35,
            gender: "F".into(),
        };
        CaretakerRegistry::update(&pool, &auth, id, &changed).await.unwrap();
        let got = CaretakerRegistry::get(&pool, &auth, id).await.unwrap();
        assert_eq!(got.name, "Jane Smith");
        assert_eq!(got.age, 35);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        assert!(CaretakerRegistry::get(&pool, &auth, 42).await.unwrap_err().is_not_found());
        assert!(CaretakerRegistry::update(&pool, &auth, 42, &jane()).await.unwrap_err().is_not_found());
        assert!(CaretakerRegistry::delete(&pool, &auth, 42).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let pool = connect_in_memory().await.unwrap();
        let auth = admin_ctx();
        let id = CaretakerRegistry::create(&pool, &auth, &jane()).await.unwrap();
        CaretakerRegistry::delete(&pool, &auth, id).await.unwrap();
        assert!(CaretakerRegistry::get(&pool, &auth, id).await.unwrap_err().is_not_found());
    }

    #[test]
    fn input_requires_every_field() {
        let body: HashMap<String, Value> = [("name".to_string(), Value::from("Jane"))].into();
        let err = CaretakerInput::from_body(&body).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "age"));
    }
}
