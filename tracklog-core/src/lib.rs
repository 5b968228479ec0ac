//! # tracklog-core
//!
//! Core library for tracklog - content hashing, the append-only commit log,
//! hash-gated reverts and commit log integrity checks.
//!
//! The history of every tracked file in a repository lives in a single text
//! log, one line per commit. A revert only proceeds when the file on disk
//! still hashes to what the log expects.

pub mod config;
pub mod diff;
pub mod error;
pub mod hash;
pub mod integrity;
pub mod log;
pub mod models;
pub mod repository;
pub mod revert;

pub use config::Config;
pub use error::{Error, Result};
pub use hash::{ContentHash, ContentHasher, HashAlgorithm};
pub use integrity::{Checksum, ChecksumMode, IntegrityChecker, IntegrityReport};
pub use log::CommitLog;
pub use models::CommitRecord;
pub use repository::Repository;
pub use revert::{RevertPlan, RevertResolver, RevertTarget};
