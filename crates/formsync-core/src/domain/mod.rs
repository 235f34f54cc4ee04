//! Domain entities for the configuration form.
//!
//! - **`config_map`** – the flat string → string configuration object.
//! - **`form`** – form elements, the [`form::FormDocument`] trait, and the
//!   in-memory implementation used by tests and the headless client.
//! - **`binding`** – the explicit table mapping config keys to elements.

pub mod binding;
pub mod config_map;
pub mod form;
