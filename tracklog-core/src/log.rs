use crate::error::{Error, Result};
use crate::integrity::Checksum;
use crate::models::CommitRecord;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Append-only commit history stored as one text line per record.
///
/// A sidecar file next to the log holds the XOR fold of every appended line
/// so [`crate::integrity::IntegrityChecker`] can tell whether the log was
/// edited behind its back.
#[derive(Debug, Clone)]
pub struct CommitLog {
    path: PathBuf,
    checksum_path: PathBuf,
}

impl CommitLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let checksum_path = path.with_extension("sum");
        Self {
            path,
            checksum_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn checksum_path(&self) -> &Path {
        &self.checksum_path
    }

    /// Creates an empty log with a zero checksum, truncating nothing that
    /// already exists.
    pub fn create(&self) -> Result<()> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(Error::write(&self.path))?;

        if !self.checksum_path.exists() {
            self.store_checksum(Checksum::ZERO)?;
        }
        Ok(())
    }

    pub fn append(&self, record: &CommitRecord) -> Result<()> {
        let line = record.to_line();
        // An unreadable sidecar must fail the append before the log grows.
        let checksum = self.stored_checksum()? ^ Checksum::of_line(&line);

        {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(Error::write(&self.path))?;
            writeln!(file, "{}", line).map_err(Error::write(&self.path))?;
        }
        self.store_checksum(checksum)?;

        debug!("Appended to {:?}: {}", self.path, line);
        Ok(())
    }

    /// Raw lines in file order. A log that was never written reads as empty.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::read(&self.path)(e)),
        };

        Ok(content.lines().map(str::to_string).collect())
    }

    pub fn read_all(&self) -> Result<Vec<CommitRecord>> {
        self.read_lines()?
            .iter()
            .enumerate()
            .map(|(i, line)| CommitRecord::parse_line(line, i + 1))
            .collect()
    }

    /// Returns the record for `file_name` that precedes its last
    /// `excluding_last` records in log order.
    pub fn find_most_recent_prior(
        &self,
        file_name: &str,
        excluding_last: usize,
    ) -> Result<CommitRecord> {
        let mut matching: Vec<CommitRecord> = self
            .read_all()?
            .into_iter()
            .filter(|record| record.is_for(file_name))
            .collect();

        if matching.len() <= excluding_last {
            return Err(Error::NotFound(file_name.to_string()));
        }

        let index = matching.len() - 1 - excluding_last;
        Ok(matching.swap_remove(index))
    }

    pub fn stored_checksum(&self) -> Result<Checksum> {
        let content = match fs::read_to_string(&self.checksum_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Checksum::ZERO),
            Err(e) => return Err(Error::read(&self.checksum_path)(e)),
        };

        content.parse().map_err(|e| Error::MalformedLog {
            line: 1,
            reason: format!("unreadable checksum in {:?}: {}", self.checksum_path, e),
        })
    }

    fn store_checksum(&self, checksum: Checksum) -> Result<()> {
        fs::write(&self.checksum_path, format!("{}\n", checksum))
            .map_err(Error::write(&self.checksum_path))
    }
}
