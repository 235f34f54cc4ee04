//! # formsync-core
//!
//! Shared library for the configuration page containing the form model, the
//! binding table, the bidirectional form synchronizer, and the status-line
//! state machine.
//!
//! This crate has zero dependencies on network sockets, async runtimes, or a
//! browser.  Every type here can be exercised from a plain `#[test]`.
//!
//! # Architecture overview (for beginners)
//!
//! The configuration page shows a set of form widgets that mirror a flat
//! key → value configuration object kept by the server.  Three kinds of
//! widget exist:
//!
//! - **Direct** – a text or select input whose value *is* the config value.
//! - **Toggle** – a checkbox backed by a hidden "carrier" field that holds
//!   the literal string `"True"` or `"False"`.
//! - **Segmented** – a group of radio-like choices backed by a hidden carrier
//!   that holds the literal value of the selected choice.
//!
//! The crate is split into:
//!
//! - **`domain`** – `ConfigMap`, the form document abstraction
//!   ([`FormDocument`] + the in-memory [`MemoryForm`]) and the
//!   [`BindingTable`] that ties config keys to elements.
//!
//! - **`sync`** – the [`FormSynchronizer`]: config → widgets on load,
//!   widget change events → carriers, and widgets → config on submit.
//!
//! - **`status`** – the transient status message line and its fade timings.
//!
//! - **`layout`** – a declarative description of a form page (TOML) that
//!   generates both the form document and the binding table.

pub mod domain;
pub mod layout;
pub mod status;
pub mod sync;

// Re-export the most-used types at the crate root so callers can write
// `formsync_core::FormSynchronizer` instead of the full module path.
pub use domain::binding::{Binding, BindingKind, BindingTable};
pub use domain::config_map::ConfigMap;
pub use domain::form::{Element, ElementId, ElementKind, FormDocument, MemoryForm};
pub use layout::{FieldKind, FieldSpec, FormLayout, LayoutError};
pub use status::{StatusLine, StatusPhase, StatusTimings};
pub use sync::{EditError, FormEvent, FormSynchronizer};
