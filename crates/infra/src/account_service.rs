//! Account operations: registration, subusers and serials.
//!
//! Handlers call into [`AccountService`]; it validates input with the
//! `lockera-accounts` rules, delegates atomic check-and-write steps to the
//! [`CredentialStore`] and queues notifications on the outbox.

use std::str::FromStr;

use chrono::Utc;
use thiserror::Error;

use lockera_accounts::{NewAccount, PublicUser, Serial, SerialCode, SubuserName, User};
use lockera_auth::{hash_password, Principal};
use lockera_core::{DomainError, UserId};

use crate::credential_store::{CredentialStore, StoreError};
use crate::notify::{Notification, NotificationOutbox, Party};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("missing required field: {0}")]
    MissingFields(&'static str),

    #[error("email already registered")]
    EmailTaken,

    #[error("serial is invalid or already used")]
    InvalidSerial,

    #[error("serial has already been used")]
    SerialUsed,

    #[error("serial already exists")]
    SerialExists,

    #[error("serial is required")]
    MissingSerial,

    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Store(StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AccountError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::EmailTaken => AccountError::EmailTaken,
            StoreError::SerialUnavailable => AccountError::InvalidSerial,
            StoreError::SerialExists => AccountError::SerialExists,
            StoreError::NotFound => AccountError::NotFound,
            other => AccountError::Store(other),
        }
    }
}

impl From<DomainError> for AccountError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::MissingField(field) => AccountError::MissingFields(field),
            DomainError::InvalidId(_) => AccountError::NotFound,
            other => AccountError::Internal(other.to_string()),
        }
    }
}

pub struct AccountService<S> {
    store: S,
    outbox: NotificationOutbox,
    subuser_domain: String,
}

impl<S> AccountService<S>
where
    S: CredentialStore + Clone + 'static,
{
    pub fn new(store: S, outbox: NotificationOutbox, subuser_domain: impl Into<String>) -> Self {
        Self {
            store,
            outbox,
            subuser_domain: subuser_domain.into(),
        }
    }

    /// Redeem a serial and create a root account.
    pub async fn register(
        &self,
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
        serial: Option<&str>,
    ) -> Result<PublicUser, AccountError> {
        let account = NewAccount::parse(name, email, password, serial)?;

        // Cheap rejection before paying for the hash; the store re-checks under its lock.
        if self.store.find_user_by_email(&account.email)?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let password = account.password.clone();
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))?
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        let user = User::root(&account, hash, Utc::now());
        let record = user.clone();
        self.write(move |store| store.register_with_serial(record)).await?;

        tracing::info!(user_id = %user.id, serial = %user.serial, "account registered");
        Ok(user.public())
    }

    /// The principal's own record.
    pub fn me(&self, principal: &Principal) -> Result<PublicUser, AccountError> {
        self.store
            .find_user(principal.id)?
            .map(PublicUser::from)
            .ok_or(AccountError::Unauthorized)
    }

    pub async fn create_subuser(
        &self,
        principal: &Principal,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<PublicUser, AccountError> {
        let name = SubuserName::parse(first_name, last_name)?;
        let creator = self
            .store
            .find_user(principal.id)?
            .ok_or(AccountError::Unauthorized)?;

        let subuser = User::subuser(&creator, &name, &self.subuser_domain, Utc::now());
        let record = subuser.clone();
        self.write(move |store| store.insert_user(record)).await?;
        tracing::info!(user_id = %creator.id, subuser_id = %subuser.id, "subuser created");

        self.outbox.enqueue(Notification::SubuserAdded {
            owner: party(&creator),
            subuser: party(&subuser),
            at: subuser.created_at,
        });
        Ok(subuser.public())
    }

    pub fn list_subusers(&self, principal: &Principal) -> Result<Vec<PublicUser>, AccountError> {
        let subusers = self.store.list_by_creator(principal.id)?;
        Ok(subusers.into_iter().map(PublicUser::from).collect())
    }

    /// Any user by id. Not restricted to the caller's own subusers.
    pub fn get_subuser(&self, id: &str) -> Result<PublicUser, AccountError> {
        let id = UserId::from_str(id)?;
        self.store
            .find_user(id)?
            .map(PublicUser::from)
            .ok_or(AccountError::NotFound)
    }

    pub async fn delete_subuser(&self, principal: &Principal, id: &str) -> Result<PublicUser, AccountError> {
        let id = UserId::from_str(id)?;
        let owner = principal.id;
        let removed = self.write(move |store| store.delete_subuser(owner, id)).await?;
        tracing::info!(user_id = %principal.id, subuser_id = %removed.id, "subuser deleted");

        // The owner record is only needed for the notification text.
        let owner = match self.store.find_user(principal.id) {
            Ok(Some(owner)) => party(&owner),
            _ => Party {
                name: principal.email.clone(),
                email: principal.email.clone(),
            },
        };
        self.outbox.enqueue(Notification::SubuserRemoved {
            owner,
            subuser: party(&removed),
            at: Utc::now(),
        });
        Ok(removed.public())
    }

    /// Insert a new unconsumed serial. Permission checks happen at the edge.
    pub async fn generate_serial(&self, code: Option<&str>) -> Result<Serial, AccountError> {
        let code = serial_code(code)?;
        let serial = self.write(move |store| store.insert_serial(code)).await?;
        tracing::info!(serial = %serial.serial, "serial generated");
        Ok(serial)
    }

    pub fn validate_serial(&self, code: Option<&str>) -> Result<(), AccountError> {
        let code = serial_code(code)?;
        match self.store.find_serial(&code)? {
            None => Err(AccountError::InvalidSerial),
            Some(serial) if !serial.is_available() => Err(AccountError::SerialUsed),
            Some(_) => Ok(()),
        }
    }

    /// Insert each code that is not already present. Returns how many were added.
    pub fn seed_serials<I, T>(&self, codes: I) -> Result<usize, AccountError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut added = 0;
        for raw in codes {
            let Ok(code) = SerialCode::parse(raw.as_ref()) else {
                continue;
            };
            match self.store.insert_serial(code) {
                Ok(serial) => {
                    tracing::info!(serial = %serial.serial, "serial seeded");
                    added += 1;
                }
                Err(StoreError::SerialExists) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(added)
    }

    /// Run a store mutation on the blocking pool. File-backed stores fsync
    /// and rename while holding their lock.
    async fn write<T, F>(&self, f: F) -> Result<T, AccountError>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T, StoreError> + Send + 'static,
    {
        let store = self.store.clone();
        let out = tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))??;
        Ok(out)
    }
}

fn serial_code(raw: Option<&str>) -> Result<SerialCode, AccountError> {
    SerialCode::parse(raw.unwrap_or_default()).map_err(|_| AccountError::MissingSerial)
}

fn party(user: &User) -> Party {
    Party {
        name: user.name.clone(),
        email: user.email.clone(),
    }
}
