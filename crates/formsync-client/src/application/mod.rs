//! Application layer for formsync-client.
//!
//! The application layer orchestrates the page: it knows *what* happens when
//! the user loads the page, flips a toggle, or presses Save, but delegates
//! *how* requests reach the server to a [`ConfigApi`] implementation from
//! the infrastructure layer.
//!
//! - **`api`** – the `ConfigApi` port and its error type.
//! - **`status_board`** – the cancellable status message scheduler.
//! - **`config_page`** – the page controller tying the form, the
//!   synchronizer, the API and the status line together.

pub mod api;
pub mod config_page;
pub mod status_board;

pub use api::{ApiError, ConfigApi};
pub use config_page::{ConfigPage, LoginOutcome, PageError};
pub use status_board::StatusBoard;
