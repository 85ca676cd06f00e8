//! Typed error types for fontweft-fonts.
//!
//! Only conditions a caller can act on surface as `FontError`. Unresolved
//! names degrade to the default font inside the registry and slot exhaustion
//! is reported as `None` by `slot_for_font`; contract violations panic.

use std::path::PathBuf;

use fontweft_config::ConfigError;
use thiserror::Error;

/// Errors produced while loading or registering font resources.
#[derive(Debug, Error)]
pub enum FontError {
    /// A font file could not be read from disk.
    #[error("Font file read failed for '{path}': {source}")]
    Io {
        /// Path of the font file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The rasterizer could not parse the font data.
    #[error("Malformed font '{name}': {reason}")]
    MalformedFont {
        /// File path or registration name of the font.
        name: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// No physical or logical resource matches the requested name.
    #[error("Font not found: {0}")]
    NotFound(String),

    /// Not even the default logical font could be resolved, so the registry
    /// has nothing to degrade to.
    #[error("No usable default font: the platform directory resolved no family for '{0}'")]
    NoDefaultFont(String),

    /// The configuration handed to the registry was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
