//! Loading form layouts from TOML files.
//!
//! A layout file lists the fields of one configuration page:
//!
//! ```toml
//! form_id = "config-form"
//!
//! [[field]]
//! key = "HOUR"
//! kind = "direct"
//!
//! [[field]]
//! key = "QOTD"
//! kind = "toggle"
//! default = "False"
//!
//! [[field]]
//! key = "UNIT_SYSTEM"
//! kind = "segmented"
//! choices = ["METRIC", "IMPERIAL"]
//! default = "METRIC"
//! ```
//!
//! Without a file the built-in digest layout is used.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use formsync_core::{FormLayout, LayoutError};

/// Error type for layout file operations.
#[derive(Debug, Error)]
pub enum LayoutFileError {
    /// The file could not be read.
    #[error("I/O error reading layout at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid layout.
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
}

/// Reads and validates the layout at `path`.
///
/// # Errors
///
/// Returns [`LayoutFileError::Io`] if the file cannot be read, or
/// [`LayoutFileError::Layout`] if it does not parse or validate.
pub fn load_layout(path: &Path) -> Result<FormLayout, LayoutFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| LayoutFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let layout = FormLayout::from_toml_str(&text)?;
    info!(
        "loaded layout '{}' from {} ({} fields)",
        layout.form_id,
        path.display(),
        layout.fields.len()
    );
    Ok(layout)
}

/// The layout at `path`, or the built-in digest layout when `path` is `None`.
///
/// # Errors
///
/// Same as [`load_layout`].
pub fn resolve_layout(path: Option<&Path>) -> Result<FormLayout, LayoutFileError> {
    match path {
        Some(p) => load_layout(p),
        None => {
            debug!("no layout file given, using the digest layout");
            Ok(FormLayout::digest()?)
        }
    }
}
