//! Error types for the SDK adapters.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::AdError;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Consent form not loaded")]
    FormNotLoaded,

    #[error("invalid {what}: {reason}")]
    InvalidData { what: &'static str, reason: String },

    #[error("SDK error {}: {}", .0.code, .0.message)]
    Sdk(AdError),

    #[error("settings store {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
