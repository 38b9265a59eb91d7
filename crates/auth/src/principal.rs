use lockera_core::UserId;

use crate::{JwtClaims, Role};

/// The authenticated identity behind a request.
///
/// Built from verified claims only; never from request input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub email: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }
}

impl From<&JwtClaims> for Principal {
    fn from(claims: &JwtClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email.clone(),
            roles: claims.roles.clone(),
        }
    }
}
