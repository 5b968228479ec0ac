use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::hash::ContentHasher;
use crate::integrity::{IntegrityChecker, IntegrityReport};
use crate::log::CommitLog;
use crate::models::{validate_file_name, CommitRecord};
use crate::revert::{RevertPlan, RevertResolver};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A tracked directory: its files, its commit log and its settings.
///
/// Every operation goes through an explicit `Repository` value; nothing is
/// process-global.
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
    config: Config,
    log: CommitLog,
    hasher: ContentHasher,
}

impl Repository {
    /// Creates the repository directory, which must not exist yet, along
    /// with its config and an empty commit log.
    pub fn init<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir(&root).map_err(|source| Error::Init {
            path: root.clone(),
            source,
        })?;

        config.save(&root)?;
        let repo = Self::with_config(root, config);
        repo.log.create()?;

        info!("Repository initialized in {:?}", repo.root);
        Ok(repo)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::NotARepository(root));
        }

        let config = Config::load(&root)?;
        let repo = Self::with_config(root, config);
        if !repo.root.join(CONFIG_FILE).exists() && !repo.log.path().exists() {
            return Err(Error::NotARepository(repo.root));
        }

        debug!("Opened repository {:?}", repo.root);
        Ok(repo)
    }

    fn with_config(root: PathBuf, config: Config) -> Self {
        let log = CommitLog::new(root.join(&config.log_file));
        let hasher = ContentHasher::new(config.hash);
        Self {
            root,
            config,
            log,
            hasher,
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn log(&self) -> &CommitLog {
        &self.log
    }

    pub fn hasher(&self) -> ContentHasher {
        self.hasher
    }

    pub fn file_path(&self, file_name: &str) -> Result<PathBuf> {
        validate_file_name(file_name)?;
        if self.is_internal(file_name) {
            return Err(Error::InvalidFileName(file_name.to_string()));
        }
        Ok(self.root.join(file_name))
    }

    /// Writes the baseline content for `file_name`.
    pub fn add_file(&self, file_name: &str) -> Result<()> {
        self.write_file(file_name, &self.config.baseline_content(file_name))?;
        info!("File added to repository: {}", file_name);
        Ok(())
    }

    pub fn write_file(&self, file_name: &str, content: &[u8]) -> Result<()> {
        let path = self.file_path(file_name)?;
        fs::write(&path, content).map_err(Error::write(&path))
    }

    pub fn read_file(&self, file_name: &str) -> Result<Vec<u8>> {
        let path = self.file_path(file_name)?;
        fs::read(&path).map_err(Error::read(&path))
    }

    /// Names of the regular files in the repository directory, sorted,
    /// without the log, its checksum and the config.
    pub fn list_files(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(Error::read(&self.root))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(Error::read(&self.root))?;
            let is_file = entry
                .file_type()
                .map_err(Error::read(&entry.path()))?
                .is_file();
            let name = entry.file_name().to_string_lossy().into_owned();

            if is_file && !self.is_internal(&name) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    /// Records the current on-disk content of `file_name` in the log.
    pub fn commit(&self, file_name: &str) -> Result<CommitRecord> {
        let path = self.file_path(file_name)?;
        let content_hash = self.hasher.hash_file(&path)?;
        let record = CommitRecord::new(file_name.to_string(), content_hash);

        self.log.append(&record)?;
        info!(
            "Changes committed for file: {} ({})",
            file_name, record.content_hash
        );
        Ok(record)
    }

    /// Every record in commit order, optionally restricted to one file.
    pub fn history(&self, file_name: Option<&str>) -> Result<Vec<CommitRecord>> {
        let records = self.log.read_all()?;
        Ok(match file_name {
            Some(name) => records.into_iter().filter(|r| r.is_for(name)).collect(),
            None => records,
        })
    }

    pub fn plan_revert(&self, file_name: &str) -> Result<RevertPlan> {
        let path = self.file_path(file_name)?;
        self.resolver().plan(file_name, &path)
    }

    pub fn revert(&self, file_name: &str) -> Result<RevertPlan> {
        let path = self.file_path(file_name)?;
        let baseline = self.config.baseline_content(file_name);
        self.resolver().revert(file_name, &path, &baseline)
    }

    pub fn check_integrity(&self) -> Result<IntegrityReport> {
        IntegrityChecker::new(self.config.checksum).check(&self.log)
    }

    fn resolver(&self) -> RevertResolver<'_> {
        RevertResolver::new(&self.log, self.hasher, self.config.revert_target)
    }

    fn is_internal(&self, name: &str) -> bool {
        let named = |path: &Path| path.file_name().is_some_and(|n| n == name);
        name == CONFIG_FILE || named(self.log.path()) || named(self.log.checksum_path())
    }
}
