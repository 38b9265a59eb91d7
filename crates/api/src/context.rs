use lockera_auth::Principal;
use lockera_core::UserId;

/// Authenticated identity for a request.
///
/// Inserted by the auth middleware from a verified token; handlers never
/// build it from request input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn user_id(&self) -> UserId {
        self.principal.id
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
