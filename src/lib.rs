//! Orphanage admin: session-gated records for caretakers, children, adopters and adoptions.

pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod response;
pub mod routes;
pub mod service;
pub mod session;
pub mod settings;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;

pub use error::{AppError, ConfigError};
pub use models::{Adopter, Adoption, AdoptionDetail, AdoptionListing, AdoptionStatus, Caretaker, Child, ChildListing};
pub use response::{created_with_message, ok_with_message, success_many, success_one_ok};
pub use routes::{app_router, auth_routes, common_routes, registry_routes};
pub use service::{AdopterRegistry, AdoptionLedger, CaretakerRegistry, ChildRegistry, CredentialStore};
pub use session::{AuthContext, SessionStore};
pub use settings::Settings;
pub use state::AppState;
pub use store::{connect, connect_in_memory, ensure_database_exists, ensure_tables};
