use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use lockera_auth::Permission;

use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub async fn validate_serial(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<dto::SerialRequest>,
) -> axum::response::Response {
    let serial = dto::serial_text(body.serial.as_ref());
    match services.accounts.validate_serial(serial.as_deref()) {
        Ok(()) => (
            StatusCode::OK,
            Json(dto::MessageResponse {
                message: "serial is valid",
            }),
        )
            .into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}

pub async fn generate_serial(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<dto::SerialRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require_permission(&principal, &Permission::SERIALS_GENERATE) {
        return errors::authz_error_to_response(e);
    }

    let serial = dto::serial_text(body.serial.as_ref());
    match services.accounts.generate_serial(serial.as_deref()).await {
        Ok(serial) => (
            StatusCode::OK,
            Json(dto::SerialResponse {
                message: "serial added",
                serial: serial.serial,
            }),
        )
            .into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}
