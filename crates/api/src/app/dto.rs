use serde::{Deserialize, Serialize};
use serde_json::Value;

use lockera_accounts::PublicUser;

use crate::app::extract::RequestBody;

// -------------------------
// Request DTOs
// -------------------------
//
// Fields are optional so that missing values surface as domain errors
// (`missing_fields`, `missing_serial`) instead of extractor rejections.

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Clients send either a string or a number.
    pub serial: Option<Value>,
}

impl RequestBody for RegisterRequest {
    const REJECTION_CODE: &'static str = "missing_fields";
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl RequestBody for LoginRequest {
    const REJECTION_CODE: &'static str = "missing_fields";
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubuserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl RequestBody for CreateSubuserRequest {
    const REJECTION_CODE: &'static str = "missing_fields";
}

#[derive(Debug, Default, Deserialize)]
pub struct SerialRequest {
    pub serial: Option<Value>,
}

impl RequestBody for SerialRequest {
    const REJECTION_CODE: &'static str = "missing_serial";
}

/// A serial value as text. Strings are taken as-is, numbers are formatted.
pub fn serial_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct SerialResponse {
    pub message: &'static str,
    pub serial: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serial_accepts_strings_and_numbers() {
        assert_eq!(serial_text(Some(&json!("ABC123"))), Some("ABC123".to_string()));
        assert_eq!(serial_text(Some(&json!(123456))), Some("123456".to_string()));
        assert_eq!(serial_text(Some(&json!(null))), None);
        assert_eq!(serial_text(Some(&json!(["x"]))), None);
        assert_eq!(serial_text(None), None);
    }

    #[test]
    fn subuser_request_uses_camel_case() {
        let req: CreateSubuserRequest =
            serde_json::from_value(json!({ "firstName": "Carlos", "lastName": "Ruiz" })).unwrap();
        assert_eq!(req.first_name.as_deref(), Some("Carlos"));
        assert_eq!(req.last_name.as_deref(), Some("Ruiz"));
    }
}
