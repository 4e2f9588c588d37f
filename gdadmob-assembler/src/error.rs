//! Error types for the assembler.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("required input not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("invalid pipeline config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error("task '{task}' references unknown task '{reference}'")]
    UnknownReference { task: String, reference: String },

    #[error("task dependency cycle among: {}", .0.join(", "))]
    Cycle(Vec<String>),

    #[error("{count} unresolved token(s) in plugin output, first: @{first}@ in {}", file.display())]
    Unresolved {
        count: usize,
        first: String,
        file: PathBuf,
    },

    #[error(transparent)]
    Props(#[from] gdadmob_props::PropsError),

    #[error(transparent)]
    Template(#[from] gdadmob_template::TemplateError),

    #[error(transparent)]
    Mediation(#[from] gdadmob_mediation::MediationError),

    #[error(transparent)]
    Package(#[from] gdadmob_package::PackageError),
}

impl AssemblerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type AssemblerResult<T> = Result<T, AssemblerError>;
