//! Session token signing and verification (HS256 JWT).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{validate_claims, JwtClaims, TokenValidationError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Missing, malformed, badly signed or revoked.
    #[error("invalid token")]
    InvalidToken,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Encode(String),
}

impl From<TokenValidationError> for TokenError {
    fn from(value: TokenValidationError) -> Self {
        match value {
            TokenValidationError::Expired => TokenError::Expired,
            TokenValidationError::NotYetValid | TokenValidationError::InvalidTimeWindow => {
                TokenError::InvalidToken
            }
        }
    }
}

/// Verifies a bearer token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError>;
}

/// Signs claims into a bearer token.
pub trait JwtIssuer: Send + Sync {
    fn issue(&self, claims: &JwtClaims) -> Result<String, TokenError>;
}

/// HMAC-SHA256 token codec keyed by a shared secret.
#[derive(Clone)]
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256Jwt {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();

        // Time window checks are done by `validate_claims` against our own
        // claim names, so the registered-claim checks are turned off here.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl core::fmt::Debug for Hs256Jwt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Jwt").finish_non_exhaustive()
    }
}

impl JwtIssuer for Hs256Jwt {
    fn issue(&self, claims: &JwtClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                TokenError::InvalidToken
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use lockera_core::UserId;

    use super::*;
    use crate::Role;

    fn claims(now: DateTime<Utc>) -> JwtClaims {
        JwtClaims::session(UserId::new(), "a@x.com", vec![Role::USER], now)
    }

    #[test]
    fn issued_token_validates_with_same_secret() {
        let jwt = Hs256Jwt::new("test-secret");
        let now = Utc::now();
        let claims = claims(now);

        let token = jwt.issue(&claims).unwrap();
        let decoded = jwt.validate(&token, now).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn other_secret_is_rejected() {
        let now = Utc::now();
        let token = Hs256Jwt::new("secret-a").issue(&claims(now)).unwrap();

        let err = Hs256Jwt::new("secret-b").validate(&token, now).unwrap_err();
        assert_eq!(err, TokenError::InvalidToken);
    }

    #[test]
    fn garbage_is_rejected() {
        let jwt = Hs256Jwt::new("test-secret");
        assert_eq!(
            jwt.validate("not.a.token", Utc::now()).unwrap_err(),
            TokenError::InvalidToken
        );
        assert_eq!(jwt.validate("", Utc::now()).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn expired_token_reports_expired() {
        let jwt = Hs256Jwt::new("test-secret");
        let issued = Utc::now() - Duration::hours(25);
        let token = jwt.issue(&claims(issued)).unwrap();

        assert_eq!(jwt.validate(&token, Utc::now()).unwrap_err(), TokenError::Expired);
    }
}
