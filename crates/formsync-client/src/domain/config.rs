//! Client configuration.
//!
//! [`ClientConfig`] holds every runtime setting of the client.  The binary
//! fills it from CLI arguments and environment variables; tests build it
//! directly.  No environment reads happen in here.

use formsync_core::StatusTimings;

/// All runtime configuration for the configuration-page client.
///
/// # Example
///
/// ```rust
/// use formsync_client::domain::ClientConfig;
///
/// let cfg = ClientConfig::default();
/// assert_eq!(cfg.endpoint("/api/config"), "http://127.0.0.1:5000/api/config");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the configuration server, without a trailing slash.
    pub server_url: String,

    /// Fade timings of the status message line.
    pub status_timings: StatusTimings,
}

impl ClientConfig {
    /// Creates a config for `server_url`, dropping any trailing slashes.
    pub fn new(server_url: &str) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Absolute URL of an endpoint path such as `/api/config`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }
}

impl Default for ClientConfig {
    /// | Field           | Default                  |
    /// |-----------------|--------------------------|
    /// | server_url      | `http://127.0.0.1:5000`  |
    /// | status_timings  | 5000 / 1000 ms           |
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            status_timings: StatusTimings::default(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
