use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use lockera_auth::AuthzError;
use lockera_infra::{AccountError, AuthError};

pub fn account_error_to_response(err: AccountError) -> axum::response::Response {
    match err {
        AccountError::MissingFields(field) => json_error(
            StatusCode::BAD_REQUEST,
            "missing_fields",
            format!("missing required field: {field}"),
        ),
        AccountError::EmailTaken => json_error(StatusCode::BAD_REQUEST, "email_taken", "email already registered"),
        AccountError::InvalidSerial => {
            json_error(StatusCode::BAD_REQUEST, "invalid_serial", "serial is invalid or already used")
        }
        AccountError::SerialUsed => json_error(StatusCode::BAD_REQUEST, "serial_used", "serial has already been used"),
        AccountError::SerialExists => json_error(StatusCode::BAD_REQUEST, "serial_exists", "serial already exists"),
        AccountError::MissingSerial => json_error(StatusCode::BAD_REQUEST, "missing_serial", "serial is required"),
        AccountError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        AccountError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "unauthorized", "unauthorized"),
        AccountError::Store(e) => internal(e),
        AccountError::Internal(msg) => internal(msg),
    }
}

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::NotFound => json_error(StatusCode::BAD_REQUEST, "user_not_found", "user not found"),
        AuthError::InvalidCredentials => {
            json_error(StatusCode::BAD_REQUEST, "invalid_credentials", "incorrect password")
        }
        AuthError::InvalidToken => json_error(StatusCode::UNAUTHORIZED, "unauthorized", "invalid token"),
        AuthError::Expired => json_error(StatusCode::UNAUTHORIZED, "unauthorized", "token has expired"),
        AuthError::Store(e) => internal(e),
        AuthError::Internal(msg) => internal(msg),
    }
}

pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
}

/// Details go to the log only.
fn internal(detail: impl std::fmt::Display) -> axum::response::Response {
    tracing::error!(error = %detail, "request failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal server error")
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use lockera_infra::StoreError;

    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (account_error_to_response(AccountError::MissingFields("name")), StatusCode::BAD_REQUEST),
            (account_error_to_response(AccountError::SerialUsed), StatusCode::BAD_REQUEST),
            (account_error_to_response(AccountError::NotFound), StatusCode::NOT_FOUND),
            (account_error_to_response(AccountError::Unauthorized), StatusCode::UNAUTHORIZED),
            (
                account_error_to_response(AccountError::Store(StoreError::Io("disk full".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (auth_error_to_response(AuthError::InvalidCredentials), StatusCode::BAD_REQUEST),
            (auth_error_to_response(AuthError::Expired), StatusCode::UNAUTHORIZED),
            (
                authz_error_to_response(AuthzError::Forbidden("serials.generate".into())),
                StatusCode::FORBIDDEN,
            ),
        ];
        for (response, status) in cases {
            assert_eq!(response.status(), status);
        }
    }
}
