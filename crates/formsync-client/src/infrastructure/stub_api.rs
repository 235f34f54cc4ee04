//! In-memory `ConfigApi` for tests and offline runs.
//!
//! `StubConfigApi` behaves like a small configuration server: it holds a
//! stored configuration, replaces it on save, and checks a password on
//! login.  Every call is recorded so assertions can inspect what the page
//! sent and in which order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let api = Arc::new(StubConfigApi::new().with_config(stored));
//! let page = ConfigPage::from_layout(api.clone(), &layout, timings)?;
//!
//! page.load().await?;
//! page.save().await?;
//!
//! assert_eq!(api.saved().len(), 1);
//! ```
//!
//! # Scripted failures
//!
//! `fail_fetch`, `fail_save` and `fail_send` make the matching call return
//! the given error until cleared.  `with_delay` holds each reply back, which
//! lets a test observe the page while a request is in flight.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use formsync_core::ConfigMap;

use crate::application::api::{ApiError, ConfigApi};
use crate::domain::messages::{LoginRequest, LoginResponse, MessageResponse};

/// Reply text of a successful save.
pub const SAVED_MESSAGE: &str = "Configuration saved successfully!";
/// Reply text of a successful send-email.
pub const SENT_MESSAGE: &str = "Email sent successfully!";
/// Error text of a rejected login.
pub const INVALID_PASSWORD: &str = "Invalid password";

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubCall {
    FetchConfig,
    SaveConfig(ConfigMap),
    SendEmail,
    Login(String),
}

#[derive(Default)]
struct Failures {
    fetch: Option<ApiError>,
    save: Option<ApiError>,
    send: Option<ApiError>,
}

/// A scripted configuration server that records every call.
#[derive(Default)]
pub struct StubConfigApi {
    stored: Mutex<ConfigMap>,
    calls: Mutex<Vec<StubCall>>,
    failures: Mutex<Failures>,
    password: Option<String>,
    send_message: Option<String>,
    delay: Option<Duration>,
}

impl StubConfigApi {
    /// An empty server that accepts any password.
    pub fn new() -> Self {
        Self {
            send_message: Some(SENT_MESSAGE.to_string()),
            ..Self::default()
        }
    }

    /// Sets the stored configuration returned by `fetch_config`.
    pub fn with_config(self, config: ConfigMap) -> Self {
        *lock(&self.stored) = config;
        self
    }

    /// Only `password` is accepted by `login`.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Message of a successful send-email; `None` omits the field.
    pub fn with_send_message(mut self, message: Option<&str>) -> Self {
        self.send_message = message.map(str::to_string);
        self
    }

    /// Holds every reply back by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_fetch(&self, error: Option<ApiError>) {
        lock(&self.failures).fetch = error;
    }

    pub fn fail_save(&self, error: Option<ApiError>) {
        lock(&self.failures).save = error;
    }

    pub fn fail_send(&self, error: Option<ApiError>) {
        lock(&self.failures).send = error;
    }

    /// The configuration currently stored on the "server".
    pub fn stored(&self) -> ConfigMap {
        lock(&self.stored).clone()
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<StubCall> {
        lock(&self.calls).clone()
    }

    /// The bodies of every save-config call, in order.
    pub fn saved(&self) -> Vec<ConfigMap> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                StubCall::SaveConfig(config) => Some(config.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StubCall) {
        debug!("stub api: {call:?}");
        lock(&self.calls).push(call);
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ConfigApi for StubConfigApi {
    async fn fetch_config(&self) -> Result<ConfigMap, ApiError> {
        self.record(StubCall::FetchConfig);
        self.pause().await;
        if let Some(e) = lock(&self.failures).fetch.clone() {
            return Err(e);
        }
        Ok(self.stored())
    }

    async fn save_config(&self, config: &ConfigMap) -> Result<MessageResponse, ApiError> {
        self.record(StubCall::SaveConfig(config.clone()));
        self.pause().await;
        if let Some(e) = lock(&self.failures).save.clone() {
            return Err(e);
        }
        *lock(&self.stored) = config.clone();
        Ok(MessageResponse {
            message: Some(SAVED_MESSAGE.to_string()),
        })
    }

    async fn send_email(&self) -> Result<MessageResponse, ApiError> {
        self.record(StubCall::SendEmail);
        self.pause().await;
        if let Some(e) = lock(&self.failures).send.clone() {
            return Err(e);
        }
        Ok(MessageResponse {
            message: self.send_message.clone(),
        })
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.record(StubCall::Login(request.password.clone()));
        self.pause().await;
        match &self.password {
            Some(expected) if *expected != request.password => Err(ApiError::Status {
                status: 401,
                reason: Some(INVALID_PASSWORD.to_string()),
            }),
            _ => Ok(LoginResponse::default()),
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
