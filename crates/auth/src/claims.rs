use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use lockera_core::UserId;

use crate::Role;

/// How long an issued session token stays valid, in hours.
pub const SESSION_TTL_HOURS: i64 = 24;

/// JWT claims model (transport-agnostic).
///
/// This is the set of claims Lockera expects once a token has been
/// decoded and its signature verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the authenticated user's id.
    pub sub: UserId,

    /// Email of the subject at issuance.
    pub email: String,

    /// Roles granted to the subject.
    pub roles: Vec<Role>,

    /// Unique token id (used for logout revocation).
    pub jti: Uuid,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl JwtClaims {
    /// Claims for a fresh session valid for [`SESSION_TTL_HOURS`] from `now`.
    pub fn session(sub: UserId, email: impl Into<String>, roles: Vec<Role>, now: DateTime<Utc>) -> Self {
        Self {
            sub,
            email: email.into(),
            roles,
            jti: Uuid::now_v7(),
            issued_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims.
///
/// Note: this validates the *claims* only. Signature verification happens in
/// [`crate::token`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
