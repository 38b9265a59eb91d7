//! API-side permission guard.
//!
//! Handlers call this before touching the service layer; the services
//! themselves stay permission-agnostic.

use lockera_auth::{authorize, AuthzError, Permission};

use crate::context::PrincipalContext;

pub fn require_permission(
    principal: &PrincipalContext,
    required: &Permission,
) -> Result<(), AuthzError> {
    authorize(principal.principal(), required).inspect_err(|e| {
        tracing::info!(user_id = %principal.user_id(), error = %e, "request denied");
    })
}
