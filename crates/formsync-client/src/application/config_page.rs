//! ConfigPage: the configuration page controller.
//!
//! One `ConfigPage` is one open page.  It owns the form document, the
//! synchronizer built from the page's binding table, the status line, and a
//! handle to the server API.
//!
//! # Actions
//!
//! | Action         | Network call            | Status line                          |
//! |----------------|-------------------------|--------------------------------------|
//! | `load`         | GET `/api/config`       | —                                    |
//! | `save`         | POST `/api/save-config` | server `message` (transient)         |
//! | `send_email`   | POST `/api/send-email`  | pending text, then result (transient)|
//! | `login`        | POST `/login`           | — (outcome returned)                 |
//! | `toggle` / `choose` / `edit` / `set` | none | —                                |
//!
//! # Concurrency
//!
//! The form sits behind an async mutex that is held only around synchronous
//! reads and writes, never across a network call.  Nothing orders `load`,
//! `save` and `send_email` against each other: a save can run before the
//! initial load finished, and two saves can be in flight at once.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use formsync_core::{
    ConfigMap, EditError, ElementId, ElementKind, FormDocument, FormEvent, FormLayout,
    FormSynchronizer, LayoutError, MemoryForm, StatusLine, StatusTimings,
};

use super::api::{ApiError, ConfigApi};
use super::status_board::StatusBoard;
use crate::domain::messages::{endpoints, LoginRequest};

/// Shown while the email is being generated.
pub const EMAIL_PENDING_MESSAGE: &str = "Email being generated.";
/// Shown when send-email succeeds without a server message.
pub const EMAIL_SENT_MESSAGE: &str = "Email sent!";
/// Shown when send-email fails for any reason.
pub const EMAIL_FAILED_MESSAGE: &str = "Error sending email!";
/// Login failure text when the server gives none.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed.";

/// Errors returned by page actions.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Login accepted; the page navigates to this path.
    Redirect(String),
    /// Login refused; the text is shown to the user.
    Failed(String),
}

/// An open configuration page.
pub struct ConfigPage {
    api: Arc<dyn ConfigApi>,
    form: Mutex<MemoryForm>,
    sync: FormSynchronizer,
    status: StatusBoard,
}

impl ConfigPage {
    /// Creates a page over an already-built form and synchronizer.
    pub fn new(
        api: Arc<dyn ConfigApi>,
        form: MemoryForm,
        sync: FormSynchronizer,
        timings: StatusTimings,
    ) -> Self {
        Self {
            api,
            form: Mutex::new(form),
            sync,
            status: StatusBoard::new(timings),
        }
    }

    /// Creates a page from a layout.
    ///
    /// # Errors
    ///
    /// Returns the layout's validation or generation error.
    pub fn from_layout(
        api: Arc<dyn ConfigApi>,
        layout: &FormLayout,
        timings: StatusTimings,
    ) -> Result<Self, LayoutError> {
        let (form, sync) = layout.instantiate()?;
        Ok(Self::new(api, form, sync, timings))
    }

    // ── Network actions ───────────────────────────────────────────────────────

    /// Fetches the configuration and applies it to the form.
    ///
    /// Returns the fetched map.  On failure the form is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Api`] if the fetch fails.
    pub async fn load(&self) -> Result<ConfigMap, PageError> {
        let config = match self.api.fetch_config().await {
            Ok(c) => c,
            Err(e) => {
                error!("error fetching configuration: {e}");
                return Err(e.into());
            }
        };

        let mut form = self.form.lock().await;
        self.sync.apply_config(&mut *form, &config);
        info!("configuration loaded ({} keys)", config.len());
        Ok(config)
    }

    /// Collects the form and posts it to the server.
    ///
    /// On success the server's message is shown as a transient status and
    /// returned.  On failure the error is logged and nothing is shown.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Api`] if the request fails.
    pub async fn save(&self) -> Result<String, PageError> {
        let config = self.collect().await;
        debug!("saving {} fields", config.len());

        match self.api.save_config(&config).await {
            Ok(reply) => {
                let message = reply.message.unwrap_or_default();
                self.status.show_transient(&message);
                info!("configuration saved: {message}");
                Ok(message)
            }
            Err(e) => {
                error!("error saving configuration: {e}");
                Err(e.into())
            }
        }
    }

    /// Asks the server to generate and send the digest email now.
    ///
    /// Shows [`EMAIL_PENDING_MESSAGE`] while the request runs, then the
    /// server's message (or [`EMAIL_SENT_MESSAGE`]).  Any failure shows
    /// [`EMAIL_FAILED_MESSAGE`].  Both result messages fade out.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Api`] if the request fails.
    pub async fn send_email(&self) -> Result<String, PageError> {
        self.status.show_pending(EMAIL_PENDING_MESSAGE);

        match self.api.send_email().await {
            Ok(reply) => {
                let message = reply
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| EMAIL_SENT_MESSAGE.to_string());
                self.status.show_transient(&message);
                info!("send-email accepted: {message}");
                Ok(message)
            }
            Err(e) => {
                self.status.show_transient(EMAIL_FAILED_MESSAGE);
                error!("error sending email: {e}");
                Err(e.into())
            }
        }
    }

    /// Submits `password` to the login endpoint.
    pub async fn login(&self, password: &str) -> LoginOutcome {
        let request = LoginRequest {
            password: password.to_string(),
        };

        let outcome = match self.api.login(&request).await {
            Ok(reply) => match reply.error {
                None => LoginOutcome::Redirect(endpoints::HOME.to_string()),
                Some(reason) => LoginOutcome::Failed(reason),
            },
            Err(e) => LoginOutcome::Failed(
                e.reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string()),
            ),
        };

        match &outcome {
            LoginOutcome::Redirect(to) => info!("login accepted, continuing to {to}"),
            LoginOutcome::Failed(reason) => warn!("login rejected: {reason}"),
        }
        outcome
    }

    // ── User interaction ──────────────────────────────────────────────────────

    /// The user sets a checkbox.  Returns `false` if `control` is not a
    /// checkbox on the page.
    pub async fn toggle(&self, control: &ElementId, checked: bool) -> bool {
        self.click(control, checked, |kind| matches!(kind, ElementKind::Checkbox))
            .await
    }

    /// The user picks a segmented choice.  Returns `false` if `choice` is
    /// not a radio on the page.  A radio cannot be unchecked directly, only
    /// by picking another choice of its group.
    pub async fn choose(&self, choice: &ElementId) -> bool {
        self.click(choice, true, |kind| matches!(kind, ElementKind::Radio { .. }))
            .await
    }

    async fn click(
        &self,
        id: &ElementId,
        checked: bool,
        accepts: fn(&ElementKind) -> bool,
    ) -> bool {
        let mut form = self.form.lock().await;
        let accepted = form.element(id).is_some_and(|e| accepts(&e.kind));
        if !accepted || !form.set_checked(id, checked) {
            return false;
        }
        self.sync
            .handle_event(&mut *form, &FormEvent::Change(id.clone()));
        true
    }

    /// The user types into a plain input.  Returns `false` if it is not on
    /// the page.
    pub async fn edit(&self, element: &ElementId, value: &str) -> bool {
        let mut form = self.form.lock().await;
        if !form.set_value(element, value) {
            return false;
        }
        self.sync
            .handle_event(&mut *form, &FormEvent::Change(element.clone()));
        true
    }

    /// Sets config key `key` to `value` through whichever widget shows it.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Edit`] if the key is not on the page or the
    /// value is not valid for its widget.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), PageError> {
        let mut form = self.form.lock().await;
        self.sync.user_edit(&mut *form, key, value)?;
        Ok(())
    }

    // ── Snapshots ─────────────────────────────────────────────────────────────

    /// What the form would submit right now.
    pub async fn collect(&self) -> ConfigMap {
        let form = self.form.lock().await;
        self.sync.collect_config(&*form)
    }

    /// Copy of the form document.
    pub async fn form(&self) -> MemoryForm {
        self.form.lock().await.clone()
    }

    /// Copy of the status line.
    pub fn status(&self) -> StatusLine {
        self.status.snapshot()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::api::MockConfigApi;
    use crate::domain::messages::{LoginResponse, MessageResponse};
    use formsync_core::layout::{carrier_id, choice_id, toggle_id};
    use formsync_core::{FieldSpec, StatusPhase};
    use std::time::Duration;

    fn layout() -> FormLayout {
        FormLayout::new(vec![
            FieldSpec::direct("HOUR"),
            FieldSpec::toggle("QOTD"),
            FieldSpec::segmented("UNIT_SYSTEM", ["METRIC", "IMPERIAL"]),
        ])
    }

    fn page(api: MockConfigApi) -> ConfigPage {
        ConfigPage::from_layout(Arc::new(api), &layout(), StatusTimings::default()).unwrap()
    }

    fn transport_error() -> ApiError {
        ApiError::Transport("connection refused".to_string())
    }

    // ── load ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_load_applies_fetched_config() {
        // Arrange
        let mut api = MockConfigApi::new();
        api.expect_fetch_config().times(1).returning(|| {
            Ok(ConfigMap::from_pairs([
                ("HOUR", "7"),
                ("QOTD", "True"),
                ("UNIT_SYSTEM", "IMPERIAL"),
            ]))
        });
        let page = page(api);

        // Act
        let fetched = page.load().await.unwrap();

        // Assert
        assert_eq!(fetched.len(), 3);
        let form = page.form().await;
        assert_eq!(form.value(&"HOUR".into()).as_deref(), Some("7"));
        assert_eq!(form.is_checked(&toggle_id("QOTD")), Some(true));
        assert_eq!(
            form.is_checked(&choice_id("UNIT_SYSTEM", "IMPERIAL")),
            Some(true)
        );
    }

    #[tokio::test]
    async fn test_load_failure_leaves_form_untouched() {
        let mut api = MockConfigApi::new();
        api.expect_fetch_config()
            .returning(|| Err(transport_error()));
        let page = page(api);
        let before = page.collect().await;

        let result = page.load().await;

        assert!(matches!(result, Err(PageError::Api(ApiError::Transport(_)))));
        assert_eq!(page.collect().await, before);
        assert_eq!(page.status().phase(), StatusPhase::Hidden);
    }

    // ── save ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_save_posts_collected_form_and_shows_message() {
        // Arrange
        let mut api = MockConfigApi::new();
        api.expect_save_config()
            .withf(|config| {
                config.get("HOUR") == Some("5")
                    && config.get("QOTD") == Some("True")
                    && config.get("UNIT_SYSTEM") == Some("METRIC")
            })
            .times(1)
            .returning(|_| {
                Ok(MessageResponse {
                    message: Some("Configuration saved successfully!".to_string()),
                })
            });
        let page = page(api);
        page.set("HOUR", "5").await.unwrap();
        page.set("QOTD", "True").await.unwrap();

        // Act
        let message = page.save().await.unwrap();

        // Assert
        assert_eq!(message, "Configuration saved successfully!");
        assert_eq!(page.status().text(), "Configuration saved successfully!");
        assert_eq!(page.status().phase(), StatusPhase::Visible);
    }

    #[tokio::test]
    async fn test_save_failure_shows_no_status() {
        let mut api = MockConfigApi::new();
        api.expect_save_config().returning(|_| {
            Err(ApiError::Status {
                status: 500,
                reason: None,
            })
        });
        let page = page(api);

        let result = page.save().await;

        assert!(result.is_err());
        assert_eq!(page.status().text(), "");
    }

    // ── send_email ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_send_email_without_message_uses_default() {
        let mut api = MockConfigApi::new();
        api.expect_send_email()
            .times(1)
            .returning(|| Ok(MessageResponse::default()));
        let page = page(api);

        let message = page.send_email().await.unwrap();

        assert_eq!(message, EMAIL_SENT_MESSAGE);
        assert_eq!(page.status().text(), "Email sent!");
    }

    #[tokio::test]
    async fn test_send_email_uses_server_message() {
        let mut api = MockConfigApi::new();
        api.expect_send_email().returning(|| {
            Ok(MessageResponse {
                message: Some("Email sent successfully!".to_string()),
            })
        });
        let page = page(api);

        assert_eq!(page.send_email().await.unwrap(), "Email sent successfully!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_email_failure_shows_error_then_clears() {
        // Arrange
        let mut api = MockConfigApi::new();
        api.expect_send_email().returning(|| Err(transport_error()));
        let page = page(api);

        // Act
        let result = page.send_email().await;

        // Assert
        assert!(result.is_err());
        assert_eq!(page.status().text(), "Error sending email!");

        tokio::time::sleep(Duration::from_millis(6100)).await;
        assert_eq!(page.status().text(), "");
        assert_eq!(page.status().phase(), StatusPhase::Hidden);
    }

    // ── login ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_login_success_redirects_home() {
        let mut api = MockConfigApi::new();
        api.expect_login()
            .withf(|req| req.password == "s3cret")
            .returning(|_| Ok(LoginResponse::default()));
        let page = page(api);

        assert_eq!(
            page.login("s3cret").await,
            LoginOutcome::Redirect("/".to_string())
        );
    }

    #[tokio::test]
    async fn test_login_rejection_surfaces_server_error() {
        let mut api = MockConfigApi::new();
        api.expect_login().returning(|_| {
            Err(ApiError::Status {
                status: 401,
                reason: Some("Invalid password".to_string()),
            })
        });
        let page = page(api);

        assert_eq!(
            page.login("wrong").await,
            LoginOutcome::Failed("Invalid password".to_string())
        );
    }

    #[tokio::test]
    async fn test_login_error_in_ok_body_is_failure() {
        let mut api = MockConfigApi::new();
        api.expect_login().returning(|_| {
            Ok(LoginResponse {
                error: Some("Too many attempts".to_string()),
            })
        });
        let page = page(api);

        assert_eq!(
            page.login("x").await,
            LoginOutcome::Failed("Too many attempts".to_string())
        );
    }

    #[tokio::test]
    async fn test_login_transport_failure_uses_default_text() {
        let mut api = MockConfigApi::new();
        api.expect_login().returning(|_| Err(transport_error()));
        let page = page(api);

        assert_eq!(
            page.login("x").await,
            LoginOutcome::Failed(LOGIN_FAILED_MESSAGE.to_string())
        );
    }

    // ── interaction ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_toggle_updates_carrier_without_network() {
        // Arrange: any API call would fail the test
        let mut api = MockConfigApi::new();
        api.expect_fetch_config().never();
        api.expect_save_config().never();
        api.expect_send_email().never();
        api.expect_login().never();
        let page = page(api);
        let form = page.form().await;
        assert_eq!(form.value(&carrier_id("QOTD")).as_deref(), Some("False"));

        // Act
        let found = page.toggle(&toggle_id("QOTD"), true).await;

        // Assert
        assert!(found);
        let form = page.form().await;
        assert_eq!(form.value(&carrier_id("QOTD")).as_deref(), Some("True"));
    }

    #[tokio::test]
    async fn test_choose_moves_segmented_selection() {
        let page = page(MockConfigApi::new());

        assert!(page.choose(&choice_id("UNIT_SYSTEM", "IMPERIAL")).await);

        let form = page.form().await;
        assert_eq!(
            form.value(&carrier_id("UNIT_SYSTEM")).as_deref(),
            Some("IMPERIAL")
        );
        assert_eq!(
            form.is_checked(&choice_id("UNIT_SYSTEM", "METRIC")),
            Some(false)
        );
    }

    #[tokio::test]
    async fn test_toggle_cannot_uncheck_a_segmented_choice() {
        // Arrange
        let page = page(MockConfigApi::new());
        let metric = choice_id("UNIT_SYSTEM", "METRIC");

        // Act
        let accepted = page.toggle(&metric, false).await;

        // Assert: the selection and carrier are unchanged
        assert!(!accepted);
        let form = page.form().await;
        assert_eq!(form.is_checked(&metric), Some(true));
        assert_eq!(
            form.value(&carrier_id("UNIT_SYSTEM")).as_deref(),
            Some("METRIC")
        );
    }

    #[tokio::test]
    async fn test_choose_rejects_a_checkbox() {
        let page = page(MockConfigApi::new());

        assert!(!page.choose(&toggle_id("QOTD")).await);

        let form = page.form().await;
        assert_eq!(form.is_checked(&toggle_id("QOTD")), Some(false));
        assert_eq!(form.value(&carrier_id("QOTD")).as_deref(), Some("False"));
    }

    #[tokio::test]
    async fn test_edit_missing_element_returns_false() {
        let page = page(MockConfigApi::new());
        assert!(!page.edit(&"NOT_ON_PAGE".into(), "x").await);
        assert!(!page.toggle(&"NOT_ON_PAGE".into(), true).await);
    }

    #[tokio::test]
    async fn test_set_unknown_key_is_edit_error() {
        let page = page(MockConfigApi::new());
        let result = page.set("NOPE", "1").await;
        assert!(matches!(result, Err(PageError::Edit(EditError::UnknownKey(_)))));
    }
}
