use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediationError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Props(#[from] gdadmob_props::PropsError),
}

impl MediationError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type MediationResult<T> = Result<T, MediationError>;
