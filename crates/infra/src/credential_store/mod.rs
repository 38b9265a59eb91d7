//! Credential store boundary (users + serial ledger).
//!
//! The trait exposes compound operations (`register_with_serial`,
//! `delete_subuser`) so that check-and-write happens under the store's own
//! single-writer lock instead of read-then-write in the caller.

mod collections;
pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryCredentialStore;
pub use json_file::JsonFileCredentialStore;
pub use r#trait::{CredentialStore, StoreError};
