//! Credential checks, session issuance/verification and logout revocation.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use lockera_auth::{
    verify_password, Hs256Jwt, JwtClaims, JwtIssuer, JwtValidator, Principal, Role, TokenError,
};

use crate::credential_store::{CredentialStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("user not found")]
    NotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("token has expired")]
    Expired,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for AuthError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::InvalidToken => AuthError::InvalidToken,
            TokenError::Expired => AuthError::Expired,
            TokenError::Encode(msg) => AuthError::Internal(msg),
        }
    }
}

/// A freshly issued session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub principal: Principal,
}

pub struct AuthService<S> {
    store: S,
    jwt: Hs256Jwt,
    admin_emails: HashSet<String>,
    /// Revoked token ids and when they would have expired anyway.
    revoked: Mutex<HashMap<Uuid, DateTime<Utc>>>,
}

impl<S> AuthService<S>
where
    S: CredentialStore,
{
    pub fn new(store: S, jwt: Hs256Jwt, admin_emails: impl IntoIterator<Item = String>) -> Self {
        Self {
            store,
            jwt,
            admin_emails: admin_emails.into_iter().map(|e| e.to_lowercase()).collect(),
            revoked: Mutex::new(HashMap::new()),
        }
    }

    /// Check email + password and issue a 24h session token.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let user = self.store.find_user_by_email(email)?.ok_or(AuthError::NotFound)?;

        // Subusers have no password and cannot log in.
        let Some(hash) = user.password_hash.clone() else {
            return Err(AuthError::InvalidCredentials);
        };

        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&hash, &password))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !matches {
            tracing::info!(user_id = %user.id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let claims = JwtClaims::session(user.id, user.email.clone(), self.roles_for(&user.email), Utc::now());
        let token = self.jwt.issue(&claims)?;
        tracing::info!(user_id = %user.id, "login succeeded");

        Ok(Session {
            token,
            principal: Principal::from(&claims),
        })
    }

    /// Validate a bearer token: signature, time window, and revocation.
    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.jwt.validate(token, Utc::now())?;
        if self.is_revoked(claims.jti)? {
            return Err(AuthError::InvalidToken);
        }
        Ok(Principal::from(&claims))
    }

    /// Revoke a token until its natural expiry.
    ///
    /// Returns `false` (and does nothing) for tokens that are already invalid.
    pub fn revoke(&self, token: &str) -> Result<bool, AuthError> {
        let now = Utc::now();
        let Ok(claims) = self.jwt.validate(token, now) else {
            return Ok(false);
        };

        let mut revoked = self
            .revoked
            .lock()
            .map_err(|_| AuthError::Internal("revocation lock poisoned".to_string()))?;
        revoked.retain(|_, expires_at| *expires_at > now);
        revoked.insert(claims.jti, claims.expires_at);
        tracing::info!(user_id = %claims.sub, "session revoked");
        Ok(true)
    }

    fn is_revoked(&self, jti: Uuid) -> Result<bool, AuthError> {
        let revoked = self
            .revoked
            .lock()
            .map_err(|_| AuthError::Internal("revocation lock poisoned".to_string()))?;
        Ok(revoked.contains_key(&jti))
    }

    fn roles_for(&self, email: &str) -> Vec<Role> {
        if self.admin_emails.contains(&email.to_lowercase()) {
            vec![Role::USER, Role::ADMIN]
        } else {
            vec![Role::USER]
        }
    }
}

impl<S> AuthService<Arc<S>> {
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use lockera_accounts::{NewAccount, SubuserName, User};
    use lockera_auth::hash_password;

    use super::*;
    use crate::credential_store::InMemoryCredentialStore;

    fn service(admins: &[&str]) -> (AuthService<Arc<InMemoryCredentialStore>>, User) {
        let store = Arc::new(InMemoryCredentialStore::new());
        let account = NewAccount::parse(Some("Ann"), Some("a@x.com"), Some("pw1"), Some("S1")).unwrap();
        let ann = User::root(&account, hash_password("pw1").unwrap(), Utc::now());
        store.insert_user(ann.clone()).unwrap();

        let svc = AuthService::new(
            store,
            Hs256Jwt::new("test-secret"),
            admins.iter().map(|s| s.to_string()),
        );
        (svc, ann)
    }

    #[tokio::test]
    async fn login_then_verify() {
        let (svc, ann) = service(&[]);

        let session = svc.authenticate("a@x.com", "pw1").await.unwrap();
        let principal = svc.verify(&session.token).unwrap();

        assert_eq!(principal.id, ann.id);
        assert_eq!(principal.email, "a@x.com");
        assert!(!principal.is_admin());
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password() {
        let (svc, _) = service(&[]);

        assert_eq!(svc.authenticate("nobody@x.com", "pw1").await.unwrap_err(), AuthError::NotFound);
        assert_eq!(
            svc.authenticate("a@x.com", "wrong").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn subusers_cannot_log_in() {
        let (svc, ann) = service(&[]);
        let name = SubuserName::parse(Some("Bo"), Some("Li")).unwrap();
        svc.store()
            .insert_user(User::subuser(&ann, &name, "lockera.com", Utc::now()))
            .unwrap();

        assert_eq!(
            svc.authenticate("bo.li@lockera.com", "").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn configured_admins_get_admin_role() {
        let (svc, _) = service(&["A@X.com"]);
        let session = svc.authenticate("a@x.com", "pw1").await.unwrap();
        assert!(session.principal.is_admin());
    }

    #[tokio::test]
    async fn revoked_tokens_stop_verifying() {
        let (svc, _) = service(&[]);
        let session = svc.authenticate("a@x.com", "pw1").await.unwrap();

        assert!(svc.revoke(&session.token).unwrap());
        assert_eq!(svc.verify(&session.token).unwrap_err(), AuthError::InvalidToken);

        // A second session for the same user is unaffected.
        let again = svc.authenticate("a@x.com", "pw1").await.unwrap();
        assert!(svc.verify(&again.token).is_ok());
    }

    #[test]
    fn garbage_tokens() {
        let (svc, _) = service(&[]);
        assert_eq!(svc.verify("nope").unwrap_err(), AuthError::InvalidToken);
        assert!(!svc.revoke("nope").unwrap());
    }
}
