//! Shared fixtures for unit tests.

use crate::service::adopters::AdopterInput;
use crate::service::children::ChildInput;
use crate::session::AuthContext;
use chrono::NaiveDate;

pub fn admin_ctx() -> AuthContext {
    AuthContext {
        admin_id: 1,
        username: "admin".into(),
        token: "test-token".into(),
    }
}

pub fn child_input(name: &str, caretaker_id: Option<i64>) -> ChildInput {
    ChildInput {
        name: name.into(),
        age: 5,
        gender: "F".into(),
        health_status: "Good".into(),
        admission_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        caretaker_id,
    }
}

pub fn adopter_input(full_name: &str) -> AdopterInput {
    AdopterInput {
        full_name: full_name.into(),
        gender: "F".into(),
        dob: NaiveDate::from_ymd_opt(1988, 3, 14).unwrap(),
        address: "12 Elm Street".into(),
        contact_number: "+1 555-0100".into(),
        occupation: "Teacher".into(),
        marital_status: "Married".into(),
        adoption_reason: "Growing our family".into(),
        date_applied: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
        status: "Pending".into(),
        age: 36,
    }
}
