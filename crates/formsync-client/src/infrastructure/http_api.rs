//! HTTP implementation of the `ConfigApi` port.
//!
//! All calls go to `ClientConfig::server_url` plus the paths in
//! [`endpoints`].  The client keeps a cookie store for its whole lifetime,
//! so a successful `login` authenticates every later call made through the
//! same `HttpConfigApi`.
//!
//! No timeout is configured.  A hung server leaves the action pending.
//!
//! # Status handling
//!
//! Any non-2xx reply becomes [`ApiError::Status`].  If the body is a JSON
//! object with an `error` or `message` field, that text is kept as the
//! reason.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use formsync_core::ConfigMap;

use crate::application::api::{ApiError, ConfigApi};
use crate::domain::messages::{endpoints, ErrorBody, LoginRequest, LoginResponse, MessageResponse};
use crate::domain::ClientConfig;

/// `ConfigApi` over HTTP with a session cookie store.
#[derive(Clone)]
pub struct HttpConfigApi {
    client: Client,
    config: ClientConfig,
}

impl HttpConfigApi {
    /// Builds a client for `config.server_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(response).await
    }
}

/// Checks the status and decodes a JSON body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    debug!("{status} ({} bytes)", body.len());

    if !status.is_success() {
        let reason = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::reason);
        return Err(ApiError::Status {
            status: status.as_u16(),
            reason,
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl ConfigApi for HttpConfigApi {
    async fn fetch_config(&self) -> Result<ConfigMap, ApiError> {
        let url = self.config.endpoint(endpoints::CONFIG);
        debug!("GET {url}");
        self.call(self.client.get(url)).await
    }

    async fn save_config(&self, config: &ConfigMap) -> Result<MessageResponse, ApiError> {
        let url = self.config.endpoint(endpoints::SAVE_CONFIG);
        debug!("POST {url}");
        self.call(self.client.post(url).json(config)).await
    }

    async fn send_email(&self) -> Result<MessageResponse, ApiError> {
        let url = self.config.endpoint(endpoints::SEND_EMAIL);
        debug!("POST {url}");
        self.call(self.client.post(url)).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let url = self.config.endpoint(endpoints::LOGIN);
        debug!("POST {url}");
        self.call(self.client.post(url).json(request)).await
    }
}
