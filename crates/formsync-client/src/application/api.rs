//! The `ConfigApi` port: everything the page needs from the server.
//!
//! Each supported transport provides an implementation in the
//! infrastructure layer (`HttpConfigApi` for a live server,
//! `StubConfigApi` for scripted tests).

use async_trait::async_trait;
use thiserror::Error;

use formsync_core::ConfigMap;

use crate::domain::messages::{LoginRequest, LoginResponse, MessageResponse};

/// Error type for configuration API calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, reset, …).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    ///
    /// `reason` carries the `error`/`message` text of the body, if any.
    #[error("server responded with status {status}")]
    Status { status: u16, reason: Option<String> },

    /// The response body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Server-provided reason text, if the failure carried one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ApiError::Status { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }
}

/// Calls the configuration page makes against its server.
///
/// No call applies a timeout or retry; every failure is final for that
/// user action.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigApi: Send + Sync {
    /// `GET /api/config`.
    async fn fetch_config(&self) -> Result<ConfigMap, ApiError>;

    /// `POST /api/save-config` with the collected form.
    async fn save_config(&self, config: &ConfigMap) -> Result<MessageResponse, ApiError>;

    /// `POST /api/send-email` with no body.
    async fn send_email(&self) -> Result<MessageResponse, ApiError>;

    /// `POST /login`.
    ///
    /// A non-2xx reply is returned as [`ApiError::Status`] with the body's
    /// `error` text in `reason`.
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
}
