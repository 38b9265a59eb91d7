//! Lenient JSON body extraction.
//!
//! An empty body reads as the DTO's `Default`, so missing input surfaces as
//! the same domain error as missing fields. Bodies that are not JSON, or
//! carry wrong-typed fields, are rejected with 400 and the request's own
//! error code instead of axum's plain-text 415/422.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::app::errors;

/// A request DTO and the error code used when its body cannot be read.
pub trait RequestBody: DeserializeOwned + Default {
    const REJECTION_CODE: &'static str;
}

pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: RequestBody,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        parse(&bytes).map(JsonBody)
    }
}

fn parse<T: RequestBody>(bytes: &[u8]) -> Result<T, Response> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::debug!(error = %e, "request body rejected");
        errors::json_error(StatusCode::BAD_REQUEST, T::REJECTION_CODE, format!("invalid request body: {e}"))
    })
}
