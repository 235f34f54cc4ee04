//! formsync-client library crate.
//!
//! This crate drives the digest mailer's configuration page without a
//! browser: it fetches the configuration, applies it to an in-memory form
//! through the `formsync-core` synchronizer, lets the user edit widgets,
//! and posts the collected form back.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! formsync CLI (main.rs)
//!         ↕
//! [formsync-client]
//!   ├── domain/           Pure types: wire DTOs, endpoint paths, ClientConfig
//!   ├── application/      ConfigPage controller, StatusBoard, ConfigApi port
//!   └── infrastructure/
//!         ├── http_api/    reqwest implementation of ConfigApi
//!         ├── stub_api/    scripted in-memory ConfigApi for tests
//!         └── layout_file/ loads form layouts from TOML files
//!         ↕
//! configuration server (/api/config, /api/save-config, /api/send-email, /login)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain`, `formsync-core`, and the `ConfigApi`
//!   trait it defines; it never names reqwest.
//! - `infrastructure` implements the port and owns file and network access.

/// Domain layer: wire types and client configuration (no I/O).
pub mod domain;

/// Application layer: page controller and status scheduling.
pub mod application;

/// Infrastructure layer: HTTP adapter, test stub, layout files.
pub mod infrastructure;
