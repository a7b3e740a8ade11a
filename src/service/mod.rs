pub mod adopters;
pub mod adoptions;
pub mod caretakers;
pub mod children;
pub mod credentials;
pub mod dashboard;
pub mod validation;

pub use adopters::{AdopterInput, AdopterRegistry};
pub use adoptions::{AdoptionLedger, AdoptionUpdate, NewAdoption};
pub use caretakers::{CaretakerInput, CaretakerRegistry};
pub use children::{ChildInput, ChildRegistry};
pub use credentials::{AdminIdentity, AuthResult, CredentialStore};
pub use validation::FormFields;
