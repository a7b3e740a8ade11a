//! Landing-page summary.

use crate::error::AppError;
use crate::models::DashboardSummary;
use crate::session::AuthContext;
use sqlx::SqlitePool;

pub async fn summary(pool: &SqlitePool, _auth: &AuthContext) -> Result<DashboardSummary, AppError> {
    let (caretakers, children, adopters, adoptions): (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT (SELECT COUNT(*) FROM caretakers),
               (SELECT COUNT(*) FROM children),
               (SELECT COUNT(*) FROM adopters),
               (SELECT COUNT(*) FROM adoptions)
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(DashboardSummary {
        caretakers,
        children,
        adopters,
        adoptions,
    })
}
