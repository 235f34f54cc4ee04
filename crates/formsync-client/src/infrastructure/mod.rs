//! Infrastructure layer for formsync-client.
//!
//! Contains the adapters that touch the outside world: the HTTP
//! implementation of `ConfigApi`, a scripted in-memory implementation for
//! tests, and the loader for layout files.
//!
//! **Dependency rule**: this layer may depend on `application`, `domain` and
//! `formsync_core`, but MUST NOT be imported by the `application` or
//! `domain` layers.
//!
//! # Sub-modules
//!
//! - **`http_api`** – `HttpConfigApi`, a `reqwest` client with a cookie store
//!   so the session cookie set by `/login` is sent on later calls.
//!
//! - **`stub_api`** – `StubConfigApi`, an in-memory server that records every
//!   call and replies from scripted results.
//!
//! - **`layout_file`** – reads a `FormLayout` from a TOML file, or falls back
//!   to the built-in digest layout.

pub mod http_api;
pub mod layout_file;
pub mod stub_api;

pub use http_api::HttpConfigApi;
pub use layout_file::{load_layout, resolve_layout, LayoutFileError};
pub use stub_api::StubConfigApi;
