//! Append-only record of redemption events.
//!
//! One CSV line per issuance: `timestamp,code,name,identifier`.
//! Records are never mutated or deleted. No locking; interleaved
//! appends from concurrent writers are accepted at this volume.

use std::path::PathBuf;

use async_trait::async_trait;
use contracts::domain::redemption::IssuanceRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IssuanceLogError {
    #[error("log io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("log write failed: {0}")]
    Csv(#[from] csv::Error),
}

#[async_trait]
pub trait IssuanceLog: Send + Sync {
    /// Appends one record, creating the log on first write.
    async fn append(&self, record: &IssuanceRecord) -> Result<(), IssuanceLogError>;

    /// All well-formed records in write order. Rows with a field
    /// count other than 4 are skipped, never an error.
    async fn read_all(&self) -> Result<Vec<IssuanceRecord>, IssuanceLogError>;
}

pub struct FileIssuanceLog {
    path: PathBuf,
}

impl FileIssuanceLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl IssuanceLog for FileIssuanceLog {
    async fn append(&self, record: &IssuanceRecord) -> Result<(), IssuanceLogError> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<IssuanceRecord>, IssuanceLogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    tracing::debug!("skipping unreadable log line: {e}");
                    continue;
                }
            };
            if row.len() != 4 {
                tracing::debug!("skipping log line with {} fields", row.len());
                continue;
            }
            match row.deserialize::<IssuanceRecord>(None) {
                Ok(record) => records.push(record),
                Err(e) => tracing::debug!("skipping malformed log line: {e}"),
            }
        }
        Ok(records)
    }
}
