use std::sync::Arc;

use thiserror::Error;

use lockera_accounts::{Serial, SerialCode, User};
use lockera_core::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("email already registered")]
    EmailTaken,

    /// No unconsumed serial matches the code.
    #[error("serial unknown or already used")]
    SerialUnavailable,

    #[error("serial already exists")]
    SerialExists,

    #[error("record not found")]
    NotFound,

    #[error("storage io error: {0}")]
    Io(String),

    #[error("stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("lock poisoned")]
    Poisoned,
}

/// Storage for user records and activation serials.
///
/// Users are kept in insertion order; `list_by_creator` preserves it.
/// Every mutating call is atomic and durable once it returns `Ok`.
pub trait CredentialStore: Send + Sync {
    fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Users whose creator is `creator`, in insertion order.
    fn list_by_creator(&self, creator: UserId) -> Result<Vec<User>, StoreError>;

    /// Insert a user. Fails with `EmailTaken` if the email is in use.
    fn insert_user(&self, user: User) -> Result<(), StoreError>;

    /// Insert a root user and consume the serial named by `user.serial`, as
    /// one unit. Checks email uniqueness first, then serial availability.
    fn register_with_serial(&self, user: User) -> Result<(), StoreError>;

    /// Remove `id` if it is a subuser created by `owner`; `NotFound` otherwise.
    fn delete_subuser(&self, owner: UserId, id: UserId) -> Result<User, StoreError>;

    fn find_serial(&self, code: &SerialCode) -> Result<Option<Serial>, StoreError>;

    /// Insert an unconsumed serial. Fails with `SerialExists` if the code is
    /// known, consumed or not.
    fn insert_serial(&self, code: SerialCode) -> Result<Serial, StoreError>;

    /// Relink subusers that lost their `created_by` to the root account that
    /// shares their serial. Returns how many records were updated.
    fn backfill_creators(&self) -> Result<usize, StoreError>;
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        (**self).find_user(id)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        (**self).find_user_by_email(email)
    }

    fn list_by_creator(&self, creator: UserId) -> Result<Vec<User>, StoreError> {
        (**self).list_by_creator(creator)
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        (**self).insert_user(user)
    }

    fn register_with_serial(&self, user: User) -> Result<(), StoreError> {
        (**self).register_with_serial(user)
    }

    fn delete_subuser(&self, owner: UserId, id: UserId) -> Result<User, StoreError> {
        (**self).delete_subuser(owner, id)
    }

    fn find_serial(&self, code: &SerialCode) -> Result<Option<Serial>, StoreError> {
        (**self).find_serial(code)
    }

    fn insert_serial(&self, code: SerialCode) -> Result<Serial, StoreError> {
        (**self).insert_serial(code)
    }

    fn backfill_creators(&self) -> Result<usize, StoreError> {
        (**self).backfill_creators()
    }
}
