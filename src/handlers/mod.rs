pub mod adopters;
pub mod adoptions;
pub mod auth;
pub mod caretakers;
pub mod children;

use crate::error::AppError;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| AppError::BadRequest("invalid id".into()))
}
