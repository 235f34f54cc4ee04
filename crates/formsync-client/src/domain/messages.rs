//! JSON bodies of the configuration server's endpoints.
//!
//! | Call               | Method | Request body       | Response body |
//! |--------------------|--------|--------------------|---------------|
//! | `/api/config`      | GET    | —                  | `ConfigMap`   |
//! | `/api/save-config` | POST   | `ConfigMap`        | `{message}`   |
//! | `/api/send-email`  | POST   | —                  | `{message}`   |
//! | `/login`           | POST   | `{password}`       | `{error?}`    |
//!
//! The configuration object itself is [`formsync_core::ConfigMap`], which
//! already serializes as a flat JSON object.

use serde::{Deserialize, Serialize};

/// Endpoint paths, relative to the server base URL.
pub mod endpoints {
    pub const CONFIG: &str = "/api/config";
    pub const SAVE_CONFIG: &str = "/api/save-config";
    pub const SEND_EMAIL: &str = "/api/send-email";
    pub const LOGIN: &str = "/login";
    /// Where the page navigates after a successful login.
    pub const HOME: &str = "/";
}

/// `{message}` reply of save-config and send-email.
///
/// The message is optional on the wire: send-email falls back to a default
/// text when the server omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Reply of `POST /login`.  Absence of `error` means the login succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error body some endpoints send with a non-2xx status.
///
/// Either field may carry the human-readable reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// The reason text, preferring `error` over `message`.
    pub fn reason(self) -> Option<String> {
        self.error.or(self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response_without_message() {
        let r: MessageResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(r.message, None);
    }

    #[test]
    fn test_message_response_with_message() {
        let r: MessageResponse =
            serde_json::from_str(r#"{"message":"Configuration saved successfully!"}"#).unwrap();
        assert_eq!(r.message.as_deref(), Some("Configuration saved successfully!"));
    }

    #[test]
    fn test_login_request_serializes_password_field() {
        let body = serde_json::to_string(&LoginRequest {
            password: "hunter2".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"password":"hunter2"}"#);
    }

    #[test]
    fn test_login_response_error_is_optional() {
        let ok: LoginResponse = serde_json::from_str("{}").unwrap();
        let bad: LoginResponse = serde_json::from_str(r#"{"error":"Invalid password"}"#).unwrap();
        assert!(ok.error.is_none());
        assert_eq!(bad.error.as_deref(), Some("Invalid password"));
    }

    #[test]
    fn test_error_body_prefers_error_field() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"nope","message":"other"}"#).unwrap();
        assert_eq!(body.reason().as_deref(), Some("nope"));
    }

    #[test]
    fn test_error_body_falls_back_to_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"message":"Unauthorized"}"#).unwrap();
        assert_eq!(body.reason().as_deref(), Some("Unauthorized"));
    }
}
