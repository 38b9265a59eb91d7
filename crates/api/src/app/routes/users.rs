use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub async fn create_subuser(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<dto::CreateSubuserRequest>,
) -> axum::response::Response {
    let created = services.accounts.create_subuser(
        principal.principal(),
        body.first_name.as_deref(),
        body.last_name.as_deref(),
    )
    .await;

    match created {
        Ok(user) => (
            StatusCode::OK,
            Json(dto::UserResponse {
                message: "subuser added",
                user,
            }),
        )
            .into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}

pub async fn list_subusers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.accounts.list_subusers(principal.principal()) {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}

pub async fn get_subuser(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.accounts.get_subuser(&id) {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}

pub async fn delete_subuser(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.accounts.delete_subuser(principal.principal(), &id).await {
        Ok(user) => (
            StatusCode::OK,
            Json(dto::UserResponse {
                message: "subuser deleted",
                user,
            }),
        )
            .into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}
