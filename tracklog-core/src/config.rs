use crate::error::{Error, Result};
use crate::hash::HashAlgorithm;
use crate::integrity::ChecksumMode;
use crate::models::validate_file_name;
use crate::revert::RevertTarget;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const CONFIG_FILE: &str = "tracklog.toml";
pub const DEFAULT_LOG_FILE: &str = "commit_log.txt";
pub const DEFAULT_BASELINE_TEMPLATE: &str = "This is a simple content for {file}\n";

/// Per-repository settings, stored as `tracklog.toml` in the repository
/// directory. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_file: String,
    pub hash: HashAlgorithm,
    pub checksum: ChecksumMode,
    pub revert_target: RevertTarget,
    /// Content written by `add` and restored by `revert`. `{file}` is
    /// replaced with the file name.
    pub baseline_template: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: DEFAULT_LOG_FILE.to_string(),
            hash: HashAlgorithm::default(),
            checksum: ChecksumMode::default(),
            revert_target: RevertTarget::default(),
            baseline_template: DEFAULT_BASELINE_TEMPLATE.to_string(),
        }
    }
}

impl Config {
    /// Loads `tracklog.toml` from `repo_dir`, falling back to defaults when
    /// the file does not exist.
    pub fn load(repo_dir: &Path) -> Result<Self> {
        let path = repo_dir.join(CONFIG_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::read(&path)(e)),
        };

        let config: Config = toml::from_str(&content)?;
        validate_file_name(&config.log_file)?;
        // The checksum sidecar is the log path with a `.sum` extension.
        if config.log_file == CONFIG_FILE || config.log_file.ends_with(".sum") {
            return Err(Error::InvalidFileName(config.log_file));
        }
        Ok(config)
    }

    pub fn save(&self, repo_dir: &Path) -> Result<()> {
        let path = repo_dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content).map_err(Error::write(&path))
    }

    pub fn baseline_content(&self, file_name: &str) -> Vec<u8> {
        self.baseline_template
            .replace("{file}", file_name)
            .into_bytes()
    }

    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_checksum(mut self, checksum: ChecksumMode) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn with_revert_target(mut self, revert_target: RevertTarget) -> Self {
        self.revert_target = revert_target;
        self
    }
}
