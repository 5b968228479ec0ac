use crate::error::{Error, Result};
use crate::hash::ContentHash;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal second field of every commit line.
pub const COMMIT_MARKER: &str = "Commit:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub timestamp: DateTime<Utc>,
    pub file_name: String,
    pub content_hash: ContentHash,
}

impl CommitRecord {
    pub fn new(file_name: String, content_hash: ContentHash) -> Self {
        Self::at(Utc::now(), file_name, content_hash)
    }

    /// Builds a record at `timestamp`, truncated to whole seconds.
    pub fn at(timestamp: DateTime<Utc>, file_name: String, content_hash: ContentHash) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(0),
            file_name,
            content_hash,
        }
    }

    pub fn is_for(&self, file_name: &str) -> bool {
        self.file_name == file_name
    }

    /// The persisted form, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            COMMIT_MARKER,
            self.file_name,
            self.content_hash
        )
    }

    /// Parses one log line. `line_number` is 1-based and only used in errors.
    pub fn parse_line(line: &str, line_number: usize) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedLog {
            line: line_number,
            reason,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[timestamp, marker, file_name, content_hash] = fields.as_slice() else {
            return Err(malformed(format!(
                "expected 4 fields, found {}",
                fields.len()
            )));
        };

        if marker != COMMIT_MARKER {
            return Err(malformed(format!("not a commit entry: {:?}", marker)));
        }

        let timestamp = DateTime::parse_from_rfc3339(timestamp)
            .map_err(|e| malformed(format!("bad timestamp {:?}: {}", timestamp, e)))?
            .with_timezone(&Utc);
        let content_hash = content_hash.parse::<ContentHash>().map_err(malformed)?;

        Ok(Self {
            timestamp,
            file_name: file_name.to_string(),
            content_hash,
        })
    }
}

impl fmt::Display for CommitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// File names are stored as a single whitespace-delimited field and joined
/// onto the repository directory, so they must be plain, non-empty names.
pub fn validate_file_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\');

    if invalid {
        return Err(Error::InvalidFileName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hash(s: &str) -> ContentHash {
        s.parse().unwrap()
    }

    #[test]
    fn test_record_line_format() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let record = CommitRecord::at(timestamp, "notes.txt".to_string(), hash("42"));

        assert_eq!(record.to_line(), "2024-03-09T14:05:00Z Commit: notes.txt 42");
        assert_eq!(record.to_string(), record.to_line());
    }

    #[test]
    fn test_record_parse_line() {
        let record = CommitRecord::parse_line("2024-03-09T14:05:00Z Commit: notes.txt 42", 1)
            .unwrap();

        assert_eq!(
            record.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
        );
        assert_eq!(record.file_name, "notes.txt");
        assert_eq!(record.content_hash, hash("42"));
        assert!(record.is_for("notes.txt"));
    }

    #[test]
    fn test_record_truncates_subseconds() {
        let record = CommitRecord::new("a.txt".to_string(), hash("1"));
        assert_eq!(record.timestamp.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        let cases = [
            "",
            "2024-03-09T14:05:00Z Commit: notes.txt",
            "2024-03-09T14:05:00Z Revert: notes.txt 42",
            "yesterday Commit: notes.txt 42",
            "2024-03-09T14:05:00Z Commit: notes.txt 42 extra",
        ];

        for line in cases {
            match CommitRecord::parse_line(line, 7) {
                Err(Error::MalformedLog { line: 7, .. }) => {}
                other => panic!("expected MalformedLog for {:?}, got {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("notes.txt").is_ok());
        assert!(validate_file_name(".hidden").is_ok());

        for name in ["", ".", "..", "my notes.txt", "dir/notes.txt", "a\\b", "tab\there"] {
            assert!(
                matches!(validate_file_name(name), Err(Error::InvalidFileName(_))),
                "{:?} should be rejected",
                name
            );
        }
    }
}
