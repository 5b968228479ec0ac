//! Self-consistency checks over the commit log.
//!
//! Two checks run in order:
//!
//! 1. **Duplicates**: every line of the log must be distinct.
//! 2. **Checksum**: the hashes of all lines are folded with XOR and the
//!    result is compared with an expected value. In [`ChecksumMode::Stored`]
//!    the expected value is the checksum the log maintained on every append;
//!    in [`ChecksumMode::Literal`] it is zero.
//!
//! Neither check is a tamper-proof guarantee. Anyone able to rewrite the log
//! can rewrite the checksum sidecar as well.

use crate::error::{Error, Result};
use crate::hash::fast_hash;
use crate::log::CommitLog;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::BitXor;
use std::str::FromStr;
use tracing::{debug, info};

/// XOR fold of record line hashes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Checksum(u64);

impl Checksum {
    pub const ZERO: Checksum = Checksum(0);

    pub fn of_line(line: &str) -> Self {
        Checksum(fast_hash(line.as_bytes()))
    }

    pub fn fold<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .fold(Checksum::ZERO, |acc, line| acc ^ Checksum::of_line(line.as_ref()))
    }
}

impl BitXor for Checksum {
    type Output = Checksum;

    fn bitxor(self, rhs: Checksum) -> Checksum {
        Checksum(self.0 ^ rhs.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Checksum {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        u64::from_str_radix(s.trim(), 16).map(Checksum)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecksumMode {
    /// Compare against the checksum accumulated on append.
    #[default]
    Stored,
    /// Require the fold to cancel out to zero.
    Literal,
}

impl ChecksumMode {
    pub fn as_str(&self) -> &str {
        match self {
            ChecksumMode::Stored => "stored",
            ChecksumMode::Literal => "literal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stored" => Some(ChecksumMode::Stored),
            "literal" => Some(ChecksumMode::Literal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub records: usize,
    pub checksum: Checksum,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrityChecker {
    mode: ChecksumMode,
}

impl IntegrityChecker {
    pub fn new(mode: ChecksumMode) -> Self {
        Self { mode }
    }

    pub fn check(&self, log: &CommitLog) -> Result<IntegrityReport> {
        let lines = log.read_lines()?;
        let expected = match self.mode {
            ChecksumMode::Stored => log.stored_checksum()?,
            ChecksumMode::Literal => Checksum::ZERO,
        };

        let report = Self::check_lines(&lines, expected)?;
        info!(records = report.records, checksum = %report.checksum, "Integrity check passed");
        Ok(report)
    }

    pub fn check_lines<S: AsRef<str>>(lines: &[S], expected: Checksum) -> Result<IntegrityReport> {
        let distinct: HashSet<&str> = lines.iter().map(AsRef::as_ref).collect();
        if distinct.len() < lines.len() {
            return Err(Error::DuplicateRecords {
                total: lines.len(),
                distinct: distinct.len(),
            });
        }

        let checksum = Checksum::fold(lines);
        debug!(%checksum, %expected, "Computed commit log checksum");
        if checksum != expected {
            return Err(Error::ChecksumMismatch {
                expected,
                actual: checksum,
            });
        }

        Ok(IntegrityReport {
            records: lines.len(),
            checksum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINES: [&str; 3] = [
        "2024-03-09T14:05:00Z Commit: notes.txt 1",
        "2024-03-09T14:05:01Z Commit: notes.txt 2",
        "2024-03-09T14:05:02Z Commit: todo.txt 3",
    ];

    #[test]
    fn test_fold_is_order_independent() {
        let reversed: Vec<&str> = LINES.iter().rev().copied().collect();
        assert_eq!(Checksum::fold(LINES), Checksum::fold(reversed));
    }

    #[test]
    fn test_fold_pairs_cancel() {
        assert_eq!(Checksum::fold([LINES[0], LINES[0]]), Checksum::ZERO);
        assert_eq!(Checksum::fold(Vec::<String>::new()), Checksum::ZERO);
    }

    #[test]
    fn test_checksum_text_round_trip() {
        let checksum = Checksum::fold(LINES);
        assert_eq!(checksum.to_string().parse::<Checksum>().unwrap(), checksum);
        assert_eq!(Checksum::ZERO.to_string(), "0000000000000000");
    }

    #[test]
    fn test_duplicate_lines_rejected() {
        let lines = [LINES[0], LINES[1], LINES[0]];

        match IntegrityChecker::check_lines(&lines, Checksum::fold(lines)) {
            Err(Error::DuplicateRecords { total, distinct }) => {
                assert_eq!(total, 3);
                assert_eq!(distinct, 2);
            }
            other => panic!("expected DuplicateRecords, got {:?}", other),
        }
    }

    #[test]
    fn test_distinct_lines_with_matching_checksum_pass() {
        let report = IntegrityChecker::check_lines(&LINES, Checksum::fold(LINES)).unwrap();

        assert_eq!(report.records, 3);
        assert_eq!(report.checksum, Checksum::fold(LINES));
    }

    #[test]
    fn test_checksum_mismatch() {
        let result = IntegrityChecker::check_lines(&LINES[..2], Checksum::fold(LINES));
        assert!(matches!(result, Err(Error::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_literal_mode_expects_zero() {
        assert!(IntegrityChecker::check_lines::<&str>(&[], Checksum::ZERO).is_ok());
        assert!(matches!(
            IntegrityChecker::check_lines(&LINES, Checksum::ZERO),
            Err(Error::ChecksumMismatch { .. })
        ));
    }
}
