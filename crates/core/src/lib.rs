//! `lockera-core`: shared building blocks for the account service.
//!
//! Pure types only: identifiers and the domain error model. No IO.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::UserId;
