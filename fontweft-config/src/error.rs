//! Typed error variants for the fontweft-config crate.
//!
//! Callers that only need a message can rely on `Display`; callers that want
//! to react to a particular failure can match on the variant.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading, saving or validating a [`FontConfig`].
///
/// [`FontConfig`]: crate::FontConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("I/O error on config file '{path}': {source}")]
    Io {
        /// Path of the file being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file contained YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string names the field and the reason.
    #[error("Config validation error: {0}")]
    Validation(String),
}
