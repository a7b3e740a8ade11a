//! Row types for the five tables and the joined views the registries return.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Caretaker {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Child {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub health_status: String,
    pub admission_date: NaiveDate,
    pub caretaker_id: Option<i64>,
}

/// Child row with the caretaker's name; `None` when no caretaker is assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ChildListing {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub health_status: String,
    pub admission_date: NaiveDate,
    pub caretaker_id: Option<i64>,
    pub caretaker_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Adopter {
    pub id: i64,
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

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Adoption {
    pub id: i64,
    pub adopter_id: i64,
    pub child_id: i64,
    pub adoption_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: AdoptionStatus,
}

/// Ledger view: only adoptions whose adopter and child both still exist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AdoptionListing {
    pub id: i64,
    pub adopter_id: i64,
    pub child_id: i64,
    pub adoption_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: AdoptionStatus,
    pub adopter_name: String,
    pub child_name: String,
}

/// Single adoption with names resolved where possible; names are `None` for dangling references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AdoptionDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub adoption: Adoption,
    pub adopter_name: Option<String>,
    pub child_name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AdoptionStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown adoption status '{0}' (expected Pending, Approved, Rejected or Completed)")]
pub struct UnknownStatus(pub String);

impl AdoptionStatus {
    pub const ALL: [AdoptionStatus; 4] = [
        AdoptionStatus::Pending,
        AdoptionStatus::Approved,
        AdoptionStatus::Rejected,
        AdoptionStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionStatus::Pending => "Pending",
            AdoptionStatus::Approved => "Approved",
            AdoptionStatus::Rejected => "Rejected",
            AdoptionStatus::Completed => "Completed",
        }
    }

    /// Staying on the same status is always allowed; Completed and Rejected are terminal.
    pub fn can_transition_to(&self, next: AdoptionStatus) -> bool {
        use AdoptionStatus::*;
        if *self == next {
            return true;
        }
        matches!(
            (*self, next),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Completed) | (Approved, Rejected)
        )
    }

    /// Counts toward the one-active-adoption-per-child rule.
    pub fn is_active(&self) -> bool {
        !matches!(self, AdoptionStatus::Rejected)
    }
}

impl fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdoptionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        AdoptionStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for AdoptionStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Row counts for the landing page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub caretakers: i64,
    pub children: i64,
    pub adopters: i64,
    pub adoptions: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("approved".parse::<AdoptionStatus>(), Ok(AdoptionStatus::Approved));
        assert_eq!(" Completed ".parse::<AdoptionStatus>(), Ok(AdoptionStatus::Completed));
        assert!("Finalised".parse::<AdoptionStatus>().is_err());
    }

    #[test]
    fn terminal_statuses_do_not_move() {
        use AdoptionStatus::*;
        assert!(Approved.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Approved));
        assert!(!Completed.can_transition_to(Approved));
        assert!(!Rejected.can_transition_to(Pending));
        assert!(Rejected.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Completed));
    }
}
