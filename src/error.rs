//! Error taxonomy for image creation.
//!
//! Startup-class errors ([`Error::is_startup`]) abort before any image is
//! persisted. [`Error::ReadEntry`] is the one recoverable variant: the build
//! loop logs it and moves on to the next entry.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("working directory does not exist: '{}'", path.display())]
    MissingWorkingDirectory { path: PathBuf },

    #[error("not a directory: '{}'", path.display())]
    NotADirectory { path: PathBuf },

    #[error(
        "cannot find configuration file '{file}' in working directory '{}'",
        dir.display()
    )]
    MissingConfig { file: String, dir: PathBuf },

    #[error("invalid configuration file '{}': {source}", path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing mandatory parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("invalid {field} pattern '{glob}': {source}")]
    InvalidPattern {
        field: &'static str,
        glob: String,
        #[source]
        source: regex::Error,
    },

    /// A single input file could not be read. Never aborts the run.
    #[error("failed to read '{}': {source}", path.display())]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write image: {0}")]
    WriteImage(#[source] io::Error),

    #[error("{context} '{}': {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            context,
            path: path.into(),
            source,
        }
    }

    /// Whether this error belongs to the configuration/startup class.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            Error::MissingWorkingDirectory { .. }
                | Error::NotADirectory { .. }
                | Error::MissingConfig { .. }
                | Error::InvalidConfig { .. }
                | Error::MissingParameter(_)
                | Error::InvalidPattern { .. }
        )
    }
}
