//! SHA256 digest utilities for manifest files
//!
//! Manifests are content addressed by the SHA256 of their exact bytes. The
//! [`ManifestDigester`] streams the file in fixed-size chunks so that memory use
//! does not depend on manifest size.

use crate::error::{RegistryError, Result};
use crate::logging::Logger;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Default read size used while hashing
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Lowercase hex SHA256 digest, without the `sha256:` algorithm prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    pub fn hex(&self) -> &str {
        &self.0
    }
}

/// Renders in registry form, `sha256:<hex>`
impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.0)
    }
}

/// Utilities for working with SHA256 digests in registry context
pub struct DigestUtils;

impl DigestUtils {
    /// Compute SHA256 digest from byte data
    pub fn compute_sha256(data: &[u8]) -> Sha256Digest {
        Sha256Digest(hex::encode(Sha256::digest(data)))
    }

    /// Truncate digest for display
    pub fn format_digest_short(digest: &Sha256Digest) -> String {
        format!("sha256:{}...", &digest.hex()[..12])
    }
}

/// Computes manifest digests by streaming file content
#[derive(Debug, Clone)]
pub struct ManifestDigester {
    logger: Logger,
    chunk_size: usize,
}

impl ManifestDigester {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Hash the raw bytes of the file at `path`.
    ///
    /// A file that vanished or became unreadable since discovery is reported as
    /// [`RegistryError::Digest`]; no digest is ever guessed.
    pub fn digest_file(&self, path: &Path) -> Result<Sha256Digest> {
        let mut file = File::open(path).map_err(|e| RegistryError::digest(path, e))?;
        let mut hasher = Sha256::new();
        let mut chunk = vec![0u8; self.chunk_size];
        let mut total = 0u64;

        loop {
            let n = match file.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(RegistryError::digest(path, e)),
            };
            hasher.update(&chunk[..n]);
            total += n as u64;
        }

        let digest = Sha256Digest(hex::encode(hasher.finalize()));
        self.logger.debug(&format!(
            "Computed {} over {} bytes of {}",
            digest,
            total,
            path.display()
        ));
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HELLO_WORLD: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_compute_sha256() {
        let digest = DigestUtils::compute_sha256(b"hello world");
        assert_eq!(digest.hex(), HELLO_WORLD);
        assert_eq!(digest.to_string(), format!("sha256:{}", HELLO_WORLD));
    }

    #[test]
    fn test_format_digest_short() {
        let digest = DigestUtils::compute_sha256(b"hello world");
        assert_eq!(DigestUtils::format_digest_short(&digest), "sha256:b94d27b9934d...");
    }

    #[test]
    fn test_file_digest_matches_in_memory_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let content = "x".repeat(10_000);
        fs::write(&path, &content).unwrap();

        let digester = ManifestDigester::new(Logger::new_quiet());
        let from_file = digester.digest_file(&path).unwrap();
        assert_eq!(from_file, DigestUtils::compute_sha256(content.as_bytes()));
    }

    #[test]
    fn test_chunk_size_does_not_change_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, "hello world").unwrap();

        for chunk_size in [1, 3, 4096, 1 << 20] {
            let digester = ManifestDigester::new(Logger::new_quiet()).with_chunk_size(chunk_size);
            assert_eq!(digester.digest_file(&path).unwrap().hex(), HELLO_WORLD);
        }
    }

    #[test]
    fn test_single_byte_change_changes_digest() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        fs::write(&a, br#"{"schemaVersion": 2}"#).unwrap();
        fs::write(&b, br#"{"schemaVersion": 3}"#).unwrap();

        let digester = ManifestDigester::new(Logger::new_quiet());
        assert_ne!(digester.digest_file(&a).unwrap(), digester.digest_file(&b).unwrap());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let digester = ManifestDigester::new(Logger::new_quiet());
        let err = digester
            .digest_file(&dir.path().join("vanished.json"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Digest { .. }));
    }
}
