//! `lockera-auth`: authentication/authorization boundary.
//!
//! This crate is decoupled from HTTP and storage: it signs and verifies
//! session tokens, hashes passwords and makes pure policy decisions.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod token;

pub use authorize::{authorize, permissions_for, AuthzError};
pub use claims::{JwtClaims, TokenValidationError, validate_claims, SESSION_TTL_HOURS};
pub use password::{hash_password, verify_password, PasswordError};
pub use permissions::Permission;
pub use principal::Principal;
pub use roles::Role;
pub use token::{Hs256Jwt, JwtIssuer, JwtValidator, TokenError};
