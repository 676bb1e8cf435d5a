//! Persistence for the set of outstanding redemption codes.
//!
//! The durable form is a plain-text file with one integer per line,
//! rewritten in full on every consumption. Invariant: the persisted
//! set always equals the codes not yet consumed.

use std::path::PathBuf;

use async_trait::async_trait;
use contracts::domain::redemption::RedemptionCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeStoreError {
    #[error("codes file not found: {0}")]
    Missing(String),
    #[error("codes file contains an invalid entry: {0:?}")]
    Malformed(String),
    #[error("codes file io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage abstraction over the outstanding-code set, so the workflow
/// can run against an in-memory substitute in tests.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// All codes that have not been consumed yet, in file order.
    async fn load_all(&self) -> Result<Vec<RedemptionCode>, CodeStoreError>;

    /// Removes `code` from the set and persists the remainder.
    /// `false` means the code was not in the set (already used, or
    /// lost a race to a concurrent consumer).
    async fn consume(&self, code: RedemptionCode) -> Result<bool, CodeStoreError>;
}

/// File-backed implementation. Every call re-reads the file; the
/// read-modify-write in `consume` is not atomic across processes
/// (single-writer assumed, low volume).
pub struct FileCodeStore {
    path: PathBuf,
}

impl FileCodeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_codes(&self) -> Result<Vec<RedemptionCode>, CodeStoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CodeStoreError::Missing(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut codes = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value: u32 = line
                .parse()
                .map_err(|_| CodeStoreError::Malformed(line.to_string()))?;
            let code = RedemptionCode::new(value)
                .map_err(|_| CodeStoreError::Malformed(line.to_string()))?;
            codes.push(code);
        }
        Ok(codes)
    }

    fn write_codes(&self, codes: &[RedemptionCode]) -> Result<(), CodeStoreError> {
        let mut contents = String::with_capacity(codes.len() * 5);
        for code in codes {
            contents.push_str(&code.to_string());
            contents.push('\n');
        }
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[async_trait]
impl CodeStore for FileCodeStore {
    async fn load_all(&self) -> Result<Vec<RedemptionCode>, CodeStoreError> {
        self.read_codes()
    }

    async fn consume(&self, code: RedemptionCode) -> Result<bool, CodeStoreError> {
        let mut codes = self.read_codes()?;
        let Some(position) = codes.iter().position(|c| *c == code) else {
            return Ok(false);
        };
        codes.remove(position);
        self.write_codes(&codes)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(contents: &str) -> (tempfile::TempDir, FileCodeStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.txt");
        std::fs::write(&path, contents).unwrap();
        (dir, FileCodeStore::new(path))
    }

    #[tokio::test]
    async fn missing_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCodeStore::new(dir.path().join("nope.txt"));
        assert!(matches!(
            store.load_all().await,
            Err(CodeStoreError::Missing(_))
        ));
    }

    #[tokio::test]
    async fn loads_codes_skipping_blank_lines() {
        let (_dir, store) = store_with("1234\n\n5678\n   \n");
        let codes = store.load_all().await.unwrap();
        assert_eq!(
            codes,
            vec!["1234".parse().unwrap(), "5678".parse().unwrap()]
        );
    }

    #[tokio::test]
    async fn rejects_garbage_lines() {
        let (_dir, store) = store_with("1234\nhello\n");
        assert!(matches!(
            store.load_all().await,
            Err(CodeStoreError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn consume_removes_the_code_and_persists() {
        let (_dir, store) = store_with("1234\n5678\n");
        assert!(store.consume("1234".parse().unwrap()).await.unwrap());

        let remaining = store.load_all().await.unwrap();
        assert_eq!(remaining, vec!["5678".parse().unwrap()]);

        // Second consumption of the same code must fail.
        assert!(!store.consume("1234".parse().unwrap()).await.unwrap());
        assert_eq!(store.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn consume_keeps_leading_zero_codes_round_trippable() {
        let (_dir, store) = store_with("0042\n5678\n");
        assert!(store.consume("5678".parse().unwrap()).await.unwrap());
        let remaining = store.load_all().await.unwrap();
        assert_eq!(remaining, vec!["0042".parse().unwrap()]);
    }
}
