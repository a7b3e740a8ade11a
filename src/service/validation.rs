//! Request body coercion: required fields, integer/date parsing, length and pattern checks.

use crate::error::AppError;
use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

pub const MAX_TEXT_LENGTH: usize = 255;
pub const MIN_AGE: i64 = 0;
pub const MAX_AGE: i64 = 150;
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn body_to_map(value: Value) -> Result<HashMap<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m.into_iter().collect()),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Typed reads over a submitted body. Every getter reports the offending field on failure.
pub struct FormFields<'a> {
    body: &'a HashMap<String, Value>,
}

impl<'a> FormFields<'a> {
    pub fn new(body: &'a HashMap<String, Value>) -> Self {
        FormFields { body }
    }

    fn present(&self, col: &str) -> Option<&'a Value> {
        match self.body.get(col) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some(v),
        }
    }

    fn required(&self, col: &str) -> Result<&'a Value, AppError> {
        self.present(col)
            .ok_or_else(|| AppError::validation(col, format!("{} is required", col)))
    }

    pub fn text(&self, col: &str) -> Result<String, AppError> {
        let s = match self.required(col)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return Err(AppError::validation(col, format!("{} must be text", col))),
        };
        if s.chars().count() > MAX_TEXT_LENGTH {
            return Err(AppError::validation(
                col,
                format!("{} must be at most {} characters", col, MAX_TEXT_LENGTH),
            ));
        }
        Ok(s)
    }

    pub fn int(&self, col: &str, min: i64, max: i64) -> Result<i64, AppError> {
        let n = coerce_int(col, self.required(col)?)?;
        if n < min {
            return Err(AppError::validation(col, format!("{} must be at least {}", col, min)));
        }
        if n > max {
            return Err(AppError::validation(col, format!("{} must be at most {}", col, max)));
        }
        Ok(n)
    }

    pub fn age(&self, col: &str) -> Result<i64, AppError> {
        self.int(col, MIN_AGE, MAX_AGE)
    }

    pub fn id(&self, col: &str) -> Result<i64, AppError> {
        self.int(col, 1, i64::MAX)
    }

    /// Missing, null or blank means no reference.
    pub fn optional_id(&self, col: &str) -> Result<Option<i64>, AppError> {
        match self.present(col) {
            None => Ok(None),
            Some(_) => self.id(col).map(Some),
        }
    }

    pub fn date(&self, col: &str) -> Result<NaiveDate, AppError> {
        let raw = match self.required(col)? {
            Value::String(s) => s.trim(),
            _ => return Err(AppError::validation(col, format!("{} must be a date (YYYY-MM-DD)", col))),
        };
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|_| AppError::validation(col, format!("{} must be a date (YYYY-MM-DD)", col)))
    }

    pub fn matching(&self, col: &str, pattern: &Regex, hint: &str) -> Result<String, AppError> {
        let s = self.text(col)?;
        if !pattern.is_match(&s) {
            return Err(AppError::validation(col, format!("{} {}", col, hint)));
        }
        Ok(s)
    }
}

fn coerce_int(col: &str, v: &Value) -> Result<i64, AppError> {
    let parsed = match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| AppError::validation(col, format!("{} must be a whole number", col)))
}
