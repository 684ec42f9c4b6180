pub mod domain;
pub mod error;
pub mod schema;

pub use domain::RegistrationRecord;
pub use schema::{validate, Field, FieldErrors, RawFormInput};
