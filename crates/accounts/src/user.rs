//! User records: root accounts and the subusers they create.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lockera_core::{DomainError, UserId};

use crate::serial::SerialCode;

/// Stored user record.
///
/// # Invariants
/// - `email` is unique across all users (enforced by the store).
/// - `created_by == None` marks a root account; root accounts carry a password hash.
/// - Subusers carry their creator's serial and no password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: Option<String>,
    pub serial: String,
    #[serde(default)]
    pub created_by: Option<UserId>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a root account from a validated registration and an already
    /// computed password hash.
    pub fn root(account: &NewAccount, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            name: account.name.clone(),
            email: account.email.clone(),
            password_hash: Some(password_hash),
            serial: account.serial.as_str().to_string(),
            created_by: None,
            created_at: now,
        }
    }

    /// Build a subuser owned by `creator`.
    ///
    /// The subuser inherits the creator's serial and cannot log in.
    pub fn subuser(creator: &User, name: &SubuserName, domain: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            name: name.display_name(),
            email: name.email(domain),
            password_hash: None,
            serial: creator.serial.clone(),
            created_by: Some(creator.id),
            created_at: now,
        }
    }

    pub fn is_owned_by(&self, owner: UserId) -> bool {
        self.created_by == Some(owner)
    }

    /// Password-stripped view for responses.
    pub fn public(&self) -> PublicUser {
        PublicUser::from(self)
    }
}

/// A user without its password hash. This is the only shape that leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub serial: String,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            serial: user.serial.clone(),
            created_by: user.created_by,
            created_at: user.created_at,
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            serial: user.serial,
            created_by: user.created_by,
            created_at: user.created_at,
        }
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub serial: SerialCode,
}

impl NewAccount {
    /// Every field must be present and non-blank.
    pub fn parse(
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
        serial: Option<&str>,
    ) -> Result<Self, DomainError> {
        let name = required("name", name)?;
        let email = required("email", email)?;
        // Passwords are taken verbatim; only emptiness is rejected.
        let password = match password {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => return Err(DomainError::MissingField("password")),
        };
        let serial = SerialCode::parse(serial.unwrap_or_default())?;

        Ok(Self {
            name,
            email,
            password,
            serial,
        })
    }
}

/// First/last name pair used to derive a subuser's display name and email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubuserName {
    first: String,
    last: String,
}

impl SubuserName {
    pub fn parse(first: Option<&str>, last: Option<&str>) -> Result<Self, DomainError> {
        Ok(Self {
            first: required("firstName", first)?,
            last: required("lastName", last)?,
        })
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }

    /// `first.last@domain`, lower-cased. Not checked for uniqueness here.
    pub fn email(&self, domain: &str) -> String {
        format!(
            "{}.{}@{}",
            self.first.to_lowercase(),
            self.last.to_lowercase(),
            domain
        )
    }
}

fn required(field: &'static str, value: Option<&str>) -> Result<String, DomainError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DomainError::MissingField(field)),
    }
}
