//! formsync: headless client for the digest mailer's configuration page.
//!
//! Loads the configuration page's form from a layout, fills it from the
//! server, and drives the same actions a user would in the browser.
//!
//! # Usage
//!
//! ```text
//! formsync [OPTIONS] <COMMAND>
//!
//! Commands:
//!   show                 Load and print the collected configuration as JSON
//!   set KEY=VALUE...     Load, edit through the widgets, then save
//!   send-email           Trigger the send-email action
//!   login                Check the password against /login
//!
//! Options:
//!   --server   <URL>   Configuration server [default: http://127.0.0.1:5000]
//!   --layout   <PATH>  Layout TOML file [default: built-in digest layout]
//!   --password <PW>    Log in before running the command
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable            | Default                  | Description              |
//! |---------------------|--------------------------|--------------------------|
//! | `FORMSYNC_SERVER`   | `http://127.0.0.1:5000`  | Configuration server URL |
//! | `FORMSYNC_LAYOUT`   | (built-in)               | Layout TOML file         |
//! | `FORMSYNC_PASSWORD` | (none)                   | Login password           |
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use formsync_client::application::{ConfigPage, LoginOutcome};
use formsync_client::domain::ClientConfig;
use formsync_client::infrastructure::{resolve_layout, HttpConfigApi};
use formsync_core::FieldSpec;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Headless client for the digest mailer's configuration page.
#[derive(Debug, Parser)]
#[command(
    name = "formsync",
    about = "Headless client for the digest mailer's configuration page",
    version
)]
struct Cli {
    /// Base URL of the configuration server.
    #[arg(long, default_value = "http://127.0.0.1:5000", env = "FORMSYNC_SERVER")]
    server: String,

    /// Layout TOML file describing the page's fields.
    ///
    /// Without it the built-in digest layout is used.
    #[arg(long, env = "FORMSYNC_LAYOUT")]
    layout: Option<PathBuf>,

    /// Password to log in with before running the command.
    #[arg(long, env = "FORMSYNC_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Command {
    /// Load the configuration and print it as JSON.
    Show,
    /// Load, set each KEY to VALUE through its widget, then save.
    Set {
        #[arg(required = true, value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
    },
    /// Ask the server to send the digest email now.
    SendEmail,
    /// Check the password against the login endpoint.
    Login,
}

/// Parses `KEY=VALUE`.  The value may itself contain `=`.
fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--server` is not an absolute http(s) URL.
    fn into_client_config(&self) -> anyhow::Result<ClientConfig> {
        let url = reqwest::Url::parse(&self.server)
            .with_context(|| format!("invalid server URL: '{}'", self.server))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("server URL must use http or https: '{}'", self.server);
        }
        Ok(ClientConfig::new(&self.server))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.into_client_config()?;
    let layout = resolve_layout(cli.layout.as_deref()).context("failed to load layout")?;

    info!(
        "formsync starting, server={}, layout={} ({} fields)",
        config.server_url,
        layout.form_id,
        layout.fields.len()
    );

    let timings = config.status_timings;
    let api = HttpConfigApi::new(config).context("failed to build HTTP client")?;
    let page = ConfigPage::from_layout(Arc::new(api), &layout, timings)
        .context("failed to build the form from the layout")?;

    if cli.command == Command::Login {
        let Some(password) = cli.password.as_deref() else {
            bail!("login needs --password or FORMSYNC_PASSWORD");
        };
        return match page.login(password).await {
            LoginOutcome::Redirect(to) => {
                println!("login ok, continue to {to}");
                Ok(())
            }
            LoginOutcome::Failed(reason) => bail!("login failed: {reason}"),
        };
    }

    if let Some(password) = cli.password.as_deref() {
        if let LoginOutcome::Failed(reason) = page.login(password).await {
            bail!("login failed: {reason}");
        }
    }

    match cli.command {
        Command::Show => {
            page.load().await.context("failed to fetch configuration")?;
            let collected = page.collect().await;
            println!("{}", serde_json::to_string_pretty(&collected)?);
        }
        Command::Set { pairs } => {
            page.load().await.context("failed to fetch configuration")?;
            for (key, value) in &pairs {
                page.set(key, value).await.with_context(|| {
                    let name = layout.field(key).map_or(key.as_str(), FieldSpec::display_name);
                    format!("cannot set {name} ({key}) to '{value}'")
                })?;
            }
            let message = page.save().await.context("failed to save configuration")?;
            println!("{message}");
        }
        Command::SendEmail => {
            let message = page.send_email().await.context("failed to send email")?;
            println!("{message}");
        }
        Command::Login => {}
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
