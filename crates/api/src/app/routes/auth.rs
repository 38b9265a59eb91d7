use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;
use crate::middleware::extract_bearer;

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<dto::RegisterRequest>,
) -> axum::response::Response {
    let serial = dto::serial_text(body.serial.as_ref());
    let registered = services
        .accounts
        .register(
            body.name.as_deref(),
            body.email.as_deref(),
            body.password.as_deref(),
            serial.as_deref(),
        )
        .await;

    match registered {
        Ok(_) => (
            StatusCode::OK,
            Json(dto::MessageResponse {
                message: "user registered",
            }),
        )
            .into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<dto::LoginRequest>,
) -> axum::response::Response {
    let (Some(email), Some(password)) = (body.email.as_deref(), body.password.as_deref()) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_fields",
            "email and password are required",
        );
    };

    match services.auth.authenticate(email, password).await {
        Ok(session) => (
            StatusCode::OK,
            Json(dto::LoginResponse {
                message: "login successful",
                token: session.token,
            }),
        )
            .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// Revokes the presented token, if any. Always succeeds for the client.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    if let Some(token) = extract_bearer(&headers) {
        if let Err(e) = services.auth.revoke(token) {
            return errors::auth_error_to_response(e);
        }
    }

    (
        StatusCode::OK,
        Json(dto::MessageResponse {
            message: "session closed",
        }),
    )
        .into_response()
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.accounts.me(principal.principal()) {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}
