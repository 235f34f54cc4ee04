//! Domain layer for formsync-client.
//!
//! Contains only plain data: the JSON bodies exchanged with the
//! configuration server, the endpoint paths, and [`ClientConfig`].
//! Nothing here performs I/O.

pub mod config;
pub mod messages;

pub use config::ClientConfig;
pub use messages::{LoginRequest, LoginResponse, MessageResponse};
