use thiserror::Error;

use crate::{Permission, Principal, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Role to permission mapping.
///
/// `admin` grants everything; plain accounts get no extra permissions
/// (subuser operations are ownership-checked by the store instead).
pub fn permissions_for(roles: &[Role]) -> Vec<Permission> {
    if roles.iter().any(Role::is_admin) {
        return vec![Permission::WILDCARD];
    }
    Vec::new()
}

/// Authorize a principal for a permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let granted = permissions_for(&principal.roles);

    if granted.iter().any(|p| p.is_wildcard() || p == required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use lockera_core::UserId;

    use super::*;

    fn principal(id: UserId, roles: Vec<Role>) -> Principal {
        Principal {
            id,
            email: "a@x.com".to_string(),
            roles,
        }
    }

    #[test]
    fn admin_gets_wildcard() {
        let admin = principal(UserId::new(), vec![Role::USER, Role::ADMIN]);
        assert_eq!(authorize(&admin, &Permission::SERIALS_GENERATE), Ok(()));
    }

    #[test]
    fn plain_user_cannot_generate_serials() {
        let user = principal(UserId::new(), vec![Role::USER]);
        assert_eq!(
            authorize(&user, &Permission::SERIALS_GENERATE),
            Err(AuthzError::Forbidden("serials.generate".to_string()))
        );
    }
}
