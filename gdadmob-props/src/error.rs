//! Error types for property and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Property loading errors.
#[derive(Debug, Error)]
pub enum PropsError {
    /// A required input file does not exist.
    #[error("property file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error while reading an input file.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line could not be parsed.
    #[error("malformed property at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// A key the build needs is absent.
    #[error("missing required property '{0}'")]
    MissingKey(String),

    /// The version catalog is not valid TOML.
    #[error("catalog parse error: {0}")]
    CatalogParse(#[from] toml::de::Error),

    /// The version catalog parsed but references something undefined.
    #[error("invalid catalog entry '{alias}': {reason}")]
    CatalogInvalid { alias: String, reason: String },
}

/// Result type for property operations.
pub type PropsResult<T> = Result<T, PropsError>;
