//! Accounts domain module (root accounts, subusers and activation serials).
//!
//! This crate contains the record types and their business rules,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod serial;
pub mod user;

pub use serial::{Serial, SerialCode};
pub use user::{NewAccount, PublicUser, SubuserName, User};
