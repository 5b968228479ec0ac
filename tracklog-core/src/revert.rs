use crate::error::{Error, Result};
use crate::hash::{ContentHash, ContentHasher};
use crate::log::CommitLog;
use crate::models::CommitRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Which earlier record of a file supplies the hash the on-disk content
/// must match before a revert is allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevertTarget {
    /// First record of the file in the log.
    #[default]
    Earliest,
    /// Record immediately preceding the file's latest one.
    MostRecent,
}

impl RevertTarget {
    pub fn as_str(&self) -> &str {
        match self {
            RevertTarget::Earliest => "earliest",
            RevertTarget::MostRecent => "most-recent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "earliest" => Some(RevertTarget::Earliest),
            "most-recent" => Some(RevertTarget::MostRecent),
            _ => None,
        }
    }
}

/// A revert that passed every check and can be applied.
#[derive(Debug, Clone)]
pub struct RevertPlan {
    pub file_name: String,
    pub latest: CommitRecord,
    pub prior: CommitRecord,
    pub current_hash: ContentHash,
}

pub struct RevertResolver<'a> {
    log: &'a CommitLog,
    hasher: ContentHasher,
    target: RevertTarget,
}

impl<'a> RevertResolver<'a> {
    pub fn new(log: &'a CommitLog, hasher: ContentHasher, target: RevertTarget) -> Self {
        Self {
            log,
            hasher,
            target,
        }
    }

    /// Validates that `file_name`, stored at `file_path`, can be reverted.
    /// Nothing is written.
    pub fn plan(&self, file_name: &str, file_path: &Path) -> Result<RevertPlan> {
        let lines = self.log.read_lines()?;
        if lines.len() < 2 {
            return Err(Error::NoHistory(file_name.to_string()));
        }

        let tail_number = lines.len();
        let latest = CommitRecord::parse_line(&lines[tail_number - 1], tail_number)?;
        if !latest.is_for(file_name) {
            return Err(Error::MalformedLog {
                line: tail_number,
                reason: format!(
                    "latest commit is for {}, not {}",
                    latest.file_name, file_name
                ),
            });
        }

        let prior = Self::prior_match(&lines[..tail_number - 1], file_name, self.target)
            .ok_or_else(|| Error::PriorNotFound(file_name.to_string()))?;
        debug!(
            "Revert target for {} is {} ({})",
            file_name, prior.content_hash, prior.timestamp
        );

        let current_hash = self.hasher.hash_file(file_path)?;
        if current_hash != prior.content_hash {
            return Err(Error::RevertMismatch {
                file: file_name.to_string(),
                expected: prior.content_hash,
                actual: current_hash,
            });
        }

        Ok(RevertPlan {
            file_name: file_name.to_string(),
            latest,
            prior,
            current_hash,
        })
    }

    /// Checks the revert and, if allowed, overwrites `file_path` with
    /// `baseline`. The revert itself is not logged.
    pub fn revert(&self, file_name: &str, file_path: &Path, baseline: &[u8]) -> Result<RevertPlan> {
        let plan = self.plan(file_name, file_path)?;
        Self::write_atomically(file_path, baseline)?;
        info!("Reverted {} to its baseline content", file_name);
        Ok(plan)
    }

    /// Scans the history before the tail in the order `target` implies.
    /// Unparseable lines are skipped for either target.
    fn prior_match(
        lines: &[String],
        file_name: &str,
        target: RevertTarget,
    ) -> Option<CommitRecord> {
        let parse = |(i, line): (usize, &String)| match CommitRecord::parse_line(line, i + 1) {
            Ok(record) if record.is_for(file_name) => Some(record),
            Ok(_) => None,
            Err(e) => {
                warn!("Skipping unreadable history entry: {}", e);
                None
            }
        };

        match target {
            RevertTarget::Earliest => lines.iter().enumerate().find_map(parse),
            RevertTarget::MostRecent => lines.iter().enumerate().rev().find_map(parse),
        }
    }

    /// Writes `content` next to `path` and renames it into place, so a failed
    /// write never leaves a half-written file behind.
    fn write_atomically(path: &Path, content: &[u8]) -> Result<()> {
        let staging = Self::staging_path(path);

        let write_result = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&staging)?;
            file.write_all(content)?;
            file.sync_all()
        })();
        if let Err(e) = write_result {
            let _ = fs::remove_file(&staging);
            return Err(Error::write(&staging)(e));
        }

        if let Err(e) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(Error::write(path)(e));
        }
        Ok(())
    }

    fn staging_path(path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!(".{}.tmp", name))
    }
}
