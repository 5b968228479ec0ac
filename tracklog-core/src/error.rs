use crate::hash::ContentHash;
use crate::integrity::Checksum;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Repository initialization failed at {path}: {source}")]
    Init {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Not a repository: {0}")]
    NotARepository(PathBuf),

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    ConfigSerialization(#[from] toml::ser::Error),

    #[error("Record not found for file: {0}")]
    NotFound(String),

    #[error("No previous versions available for file {0}")]
    NoHistory(String),

    #[error("Malformed commit log at line {line}: {reason}")]
    MalformedLog { line: usize, reason: String },

    #[error("Previous version of {0} not found in commit log")]
    PriorNotFound(String),

    #[error("Hash mismatch for {file} - expected: {expected}, actual: {actual}")]
    RevertMismatch {
        file: String,
        expected: ContentHash,
        actual: ContentHash,
    },

    #[error("Duplicate records found in commit log ({distinct} distinct of {total})")]
    DuplicateRecords { total: usize, distinct: usize },

    #[error("Commit log checksum mismatch - expected: {expected}, actual: {actual}")]
    ChecksumMismatch { expected: Checksum, actual: Checksum },
}

impl Error {
    pub(crate) fn read(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
        move |source| Error::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
        move |source| Error::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for the variants that mean the history itself is unusable,
    /// as opposed to an I/O or input failure.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            Error::MalformedLog { .. }
                | Error::DuplicateRecords { .. }
                | Error::ChecksumMismatch { .. }
        )
    }
}
