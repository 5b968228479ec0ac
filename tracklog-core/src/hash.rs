use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    /// BLAKE3, rendered as lowercase hex.
    #[default]
    Fast,
    /// SHA-256, rendered as lowercase hex.
    Sha256,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &str {
        match self {
            HashAlgorithm::Fast => "fast",
            HashAlgorithm::Sha256 => "sha256",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fast" => Some(HashAlgorithm::Fast),
            "sha256" => Some(HashAlgorithm::Sha256),
            _ => None,
        }
    }
}

/// Token identifying a file's content. Never empty and never contains
/// whitespace, so it can be stored as one field of a log line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentHash {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty content hash".to_string());
        }
        if s.chars().any(char::is_whitespace) {
            return Err(format!("content hash contains whitespace: {:?}", s));
        }
        Ok(ContentHash(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHasher {
    algorithm: HashAlgorithm,
}

impl ContentHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn hash(&self, content: &[u8]) -> ContentHash {
        match self.algorithm {
            HashAlgorithm::Fast => ContentHash(blake3::hash(content).to_hex().to_string()),
            HashAlgorithm::Sha256 => {
                use sha2::{Digest, Sha256};
                let mut hasher = Sha256::new();
                hasher.update(content);
                ContentHash(hex::encode(hasher.finalize()))
            }
        }
    }

    pub fn hash_file(&self, path: &Path) -> Result<ContentHash> {
        let content = std::fs::read(path).map_err(Error::read(path))?;
        Ok(self.hash(&content))
    }
}

/// First eight bytes of the BLAKE3 digest, little-endian. The value is
/// persisted in checksum files, so it must not depend on the toolchain.
pub(crate) fn fast_hash(content: &[u8]) -> u64 {
    let digest = blake3::hash(content);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hash_is_deterministic() {
        for algorithm in [HashAlgorithm::Fast, HashAlgorithm::Sha256] {
            let hasher = ContentHasher::new(algorithm);
            let content = b"Updated content for notes.txt\n";

            assert_eq!(hasher.hash(content), hasher.hash(content));
            assert_eq!(hasher.hash(b""), hasher.hash(b""));
        }
    }

    #[test]
    fn test_hash_distinguishes_content() {
        let hasher = ContentHasher::default();
        assert_ne!(hasher.hash(b"first"), hasher.hash(b"second"));
    }

    #[test]
    fn test_token_formats() {
        let fast = ContentHasher::new(HashAlgorithm::Fast).hash(b"");
        assert_eq!(
            fast.as_str(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );

        let sha = ContentHasher::new(HashAlgorithm::Sha256).hash(b"Hello");
        assert_eq!(
            sha.as_str(),
            "185f8db32271fe25f561a6fc938b2e264306ec304eda518007d1764826381969"
        );
    }

    #[test]
    fn test_fast_hash_is_fixed_across_builds() {
        // Persisted checksums are folded from this value.
        assert_eq!(fast_hash(b""), 0xa6a1_f9f5_b949_13af);
    }

    #[test]
    fn test_hash_file_matches_hash() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, b"some bytes").unwrap();

        let hasher = ContentHasher::default();
        assert_eq!(hasher.hash_file(&path).unwrap(), hasher.hash(b"some bytes"));
    }

    #[test]
    fn test_hash_missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = ContentHasher::default().hash_file(&temp_dir.path().join("missing"));

        assert!(matches!(result, Err(Error::Read { .. })));
    }

    #[test]
    fn test_content_hash_parse() {
        assert!("12345".parse::<ContentHash>().is_ok());
        assert!("".parse::<ContentHash>().is_err());
        assert!("12 34".parse::<ContentHash>().is_err());
    }

    #[test]
    fn test_algorithm_names() {
        for algorithm in [HashAlgorithm::Fast, HashAlgorithm::Sha256] {
            assert_eq!(HashAlgorithm::parse(algorithm.as_str()), Some(algorithm));
        }
        assert_eq!(HashAlgorithm::parse("md5"), None);
    }
}
