//! End-to-end page flows against the in-memory configuration server.
//!
//! Each test builds the digest page over a `StubConfigApi` and drives it the
//! way a user would: load, edit widgets, save, send.

use std::sync::Arc;
use std::time::Duration;

use tokio_test::{assert_err, assert_ok};

use formsync_client::application::config_page::{
    EMAIL_FAILED_MESSAGE, EMAIL_PENDING_MESSAGE, EMAIL_SENT_MESSAGE,
};
use formsync_client::application::{ApiError, ConfigPage, LoginOutcome};
use formsync_client::infrastructure::stub_api::{StubCall, SAVED_MESSAGE, SENT_MESSAGE};
use formsync_client::infrastructure::StubConfigApi;
use formsync_core::layout::{choice_id, toggle_id};
use formsync_core::{ConfigMap, FormLayout, StatusPhase, StatusTimings};

fn stored_config() -> ConfigMap {
    ConfigMap::from_pairs([
        ("RECIPIENT_EMAIL", "reader@example.com"),
        ("SMTP_HOST", "smtp.example.com"),
        ("SMTP_PORT", "587"),
        ("HOUR", "6"),
        ("MINUTE", "30"),
        ("PUZZLES", "True"),
        ("WOTD", "False"),
        ("QOTD", "True"),
        ("UNIT_SYSTEM", "IMPERIAL"),
        ("TIME_SYSTEM", "12HR"),
        ("LOGGING_LEVEL", "WARNING"),
    ])
}

fn digest_page(api: Arc<StubConfigApi>) -> ConfigPage {
    let layout = FormLayout::digest().expect("built-in layout must parse");
    ConfigPage::from_layout(api, &layout, StatusTimings::default())
        .expect("built-in layout must build")
}

#[tokio::test]
async fn test_load_then_collect_returns_stored_values() {
    // Arrange
    let api = Arc::new(StubConfigApi::new().with_config(stored_config()));
    let page = digest_page(Arc::clone(&api));

    // Act
    assert_ok!(page.load().await);
    let collected = page.collect().await;

    // Assert: every stored key comes back unchanged
    for (key, value) in stored_config().iter() {
        assert_eq!(collected.get(key), Some(value), "key {key}");
    }
    // Keys the server did not send keep their markup defaults
    assert_eq!(collected.get("TIMEZONE"), Some("UTC"));
    assert_eq!(api.calls(), vec![StubCall::FetchConfig]);
}

#[tokio::test]
async fn test_edit_widgets_then_save_persists_changes() {
    // Arrange
    let api = Arc::new(StubConfigApi::new().with_config(stored_config()));
    let page = digest_page(Arc::clone(&api));
    assert_ok!(page.load().await);

    // Act: flip a toggle, pick a choice, type into an input
    assert!(page.toggle(&toggle_id("QOTD"), false).await);
    assert!(page.choose(&choice_id("UNIT_SYSTEM", "METRIC")).await);
    assert!(page.edit(&"HOUR".into(), "8").await);
    let message = assert_ok!(page.save().await);

    // Assert
    assert_eq!(message, SAVED_MESSAGE);
    let stored = api.stored();
    assert_eq!(stored.get("QOTD"), Some("False"));
    assert_eq!(stored.get("UNIT_SYSTEM"), Some("METRIC"));
    assert_eq!(stored.get("HOUR"), Some("8"));
    assert_eq!(stored.get("PUZZLES"), Some("True"));
    assert_eq!(page.status().text(), SAVED_MESSAGE);
}

#[tokio::test]
async fn test_set_by_key_goes_through_widgets() {
    let api = Arc::new(StubConfigApi::new());
    let page = digest_page(Arc::clone(&api));

    assert_ok!(page.set("WOTD", "True").await);
    assert_ok!(page.set("TIME_SYSTEM", "12HR").await);
    assert_err!(page.set("TIME_SYSTEM", "36HR").await);
    assert_ok!(page.save().await);

    let saved = api.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].get("WOTD"), Some("True"));
    assert_eq!(saved[0].get("TIME_SYSTEM"), Some("12HR"));
}

#[tokio::test]
async fn test_toggle_makes_no_network_call() {
    let api = Arc::new(StubConfigApi::new());
    let page = digest_page(Arc::clone(&api));

    assert!(page.toggle(&toggle_id("PUZZLES"), true).await);
    assert!(page.choose(&choice_id("LOGGING_LEVEL", "DEBUG")).await);

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_failed_load_still_allows_save_of_defaults() {
    // Arrange
    let api = Arc::new(StubConfigApi::new().with_config(stored_config()));
    api.fail_fetch(Some(ApiError::Transport("connection reset".to_string())));
    let page = digest_page(Arc::clone(&api));

    // Act
    assert_err!(page.load().await);
    assert_ok!(page.save().await);

    // Assert: markup defaults overwrote the stored values
    let stored = api.stored();
    assert_eq!(stored.get("UNIT_SYSTEM"), Some("METRIC"));
    assert_eq!(stored.get("QOTD"), Some("False"));
    assert_eq!(stored.get("HOUR"), Some(""));
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_saves_both_reach_server_last_reply_wins() {
    // Arrange
    let api = Arc::new(StubConfigApi::new().with_delay(Duration::from_secs(1)));
    let page = Arc::new(digest_page(Arc::clone(&api)));
    let spawn_save = |page: &Arc<ConfigPage>| {
        let page = Arc::clone(page);
        tokio::spawn(async move { page.save().await })
    };

    // Act: a second save starts while the first is still in flight
    assert_ok!(page.set("HOUR", "1").await);
    let first = spawn_save(&page);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_ok!(page.set("HOUR", "2").await);
    let second = spawn_save(&page);

    assert_ok!(first.await.expect("first save panicked"));
    assert_ok!(second.await.expect("second save panicked"));

    // Assert: nothing serialised them, the later request is stored
    let saved = api.saved();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].get("HOUR"), Some("1"));
    assert_eq!(saved[1].get("HOUR"), Some("2"));
    assert_eq!(api.stored().get("HOUR"), Some("2"));
}

#[tokio::test(start_paused = true)]
async fn test_save_during_load_submits_markup_defaults() {
    // Arrange
    let api = Arc::new(
        StubConfigApi::new()
            .with_config(stored_config())
            .with_delay(Duration::from_secs(1)),
    );
    let page = Arc::new(digest_page(Arc::clone(&api)));

    // Act: save before the initial load has answered
    let load = {
        let page = Arc::clone(&page);
        tokio::spawn(async move { page.load().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_ok!(page.save().await);
    assert_ok!(load.await.expect("load panicked"));

    // Assert: the server now holds the defaults while the page shows the
    // values fetched before they were overwritten
    let calls = api.calls();
    assert!(matches!(
        calls.as_slice(),
        [StubCall::FetchConfig, StubCall::SaveConfig(_)]
    ));
    assert_eq!(api.stored().get("HOUR"), Some(""));
    assert_eq!(api.stored().get("UNIT_SYSTEM"), Some("METRIC"));
    assert_eq!(page.collect().await.get("HOUR"), Some("6"));
}

#[tokio::test(start_paused = true)]
async fn test_send_email_shows_pending_while_in_flight() {
    // Arrange
    let api = Arc::new(StubConfigApi::new().with_delay(Duration::from_secs(1)));
    let page = Arc::new(digest_page(api));

    // Act
    let task = {
        let page = Arc::clone(&page);
        tokio::spawn(async move { page.send_email().await })
    };
    tokio::time::sleep(Duration::from_millis(500)).await;

    // Assert: pending text while the request runs
    assert_eq!(page.status().text(), EMAIL_PENDING_MESSAGE);

    let message = assert_ok!(task.await.expect("send task panicked"));
    assert_eq!(message, SENT_MESSAGE);
    assert_eq!(page.status().text(), SENT_MESSAGE);
}

#[tokio::test]
async fn test_send_email_without_server_message_uses_default() {
    let api = Arc::new(StubConfigApi::new().with_send_message(None));
    let page = digest_page(api);

    let message = assert_ok!(page.send_email().await);

    assert_eq!(message, EMAIL_SENT_MESSAGE);
}

#[tokio::test(start_paused = true)]
async fn test_send_email_failure_message_is_cleared_after_fade() {
    // Arrange
    let api = Arc::new(StubConfigApi::new());
    api.fail_send(Some(ApiError::Status {
        status: 500,
        reason: None,
    }));
    let page = digest_page(api);

    // Act
    assert_err!(page.send_email().await);

    // Assert
    assert_eq!(page.status().text(), EMAIL_FAILED_MESSAGE);
    tokio::time::sleep(Duration::from_millis(5100)).await;
    assert_eq!(page.status().phase(), StatusPhase::FadingOut);
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(page.status().text(), "");
}

#[tokio::test]
async fn test_login_with_password() {
    let api = Arc::new(StubConfigApi::new().with_password("letmein"));
    let page = digest_page(Arc::clone(&api));

    assert_eq!(
        page.login("nope").await,
        LoginOutcome::Failed("Invalid password".to_string())
    );
    assert_eq!(
        page.login("letmein").await,
        LoginOutcome::Redirect("/".to_string())
    );
    assert_eq!(
        api.calls(),
        vec![
            StubCall::Login("nope".to_string()),
            StubCall::Login("letmein".to_string()),
        ]
    );
}
