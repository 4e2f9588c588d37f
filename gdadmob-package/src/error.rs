//! Error types for the packaging crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),

    #[error(transparent)]
    Source(#[from] gdadmob_template::TemplateError),

    #[error("missing required entry: {0}")]
    MissingEntry(String),
}

pub type PackageResult<T> = Result<T, PackageError>;
