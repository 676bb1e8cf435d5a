//! The redemption workflow: validate the submission, consume the
//! code, record the issuance, render the certificate.
//!
//! Validation never mutates state; the first write is the code
//! consumption. Consumption and the log append are not transactional:
//! a crash between them loses the log line while the code stays
//! spent, which is accepted for this volume. Nothing is retried; the
//! user resubmits after an error.

use contracts::domain::redemption::{IssuanceRecord, RedemptionCode, RedemptionRequest};
use thiserror::Error;

use crate::domain::code_store::{CodeStore, CodeStoreError};
use crate::domain::issuance_log::{IssuanceLog, IssuanceLogError};
use crate::shared::certificate::{CertificateRenderer, RenderError};

#[derive(Debug, Error)]
pub enum RedemptionError {
    #[error("please enter a valid 4-digit code")]
    InvalidCodeFormat,
    #[error("invalid or already used code")]
    CodeNotFound,
    #[error("please enter both your name and roll number")]
    MissingIdentity,
    /// The codes file is gone; no redemption can proceed.
    #[error("code storage unavailable: {0}")]
    Configuration(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl RedemptionError {
    /// Errors the user can fix by resubmitting the form.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCodeFormat | Self::CodeNotFound | Self::MissingIdentity
        )
    }
}

impl From<CodeStoreError> for RedemptionError {
    fn from(e: CodeStoreError) -> Self {
        match e {
            CodeStoreError::Missing(path) => Self::Configuration(path),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<IssuanceLogError> for RedemptionError {
    fn from(e: IssuanceLogError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<RenderError> for RedemptionError {
    fn from(e: RenderError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// Runs one redemption end to end and returns the certificate bytes.
pub async fn redeem(
    codes: &dyn CodeStore,
    log: &dyn IssuanceLog,
    renderer: &CertificateRenderer,
    request: &RedemptionRequest,
) -> Result<Vec<u8>, RedemptionError> {
    let code: RedemptionCode = request
        .code
        .parse()
        .map_err(|_| RedemptionError::InvalidCodeFormat)?;

    let outstanding = codes.load_all().await?;
    if !outstanding.contains(&code) {
        return Err(RedemptionError::CodeNotFound);
    }

    if request.holder_name.trim().is_empty() || request.holder_id.trim().is_empty() {
        return Err(RedemptionError::MissingIdentity);
    }

    // First mutation. A `false` here means another request spent the
    // code between our membership check and now.
    if !codes.consume(code).await? {
        return Err(RedemptionError::CodeNotFound);
    }

    let record = IssuanceRecord::now(code, &request.holder_name, &request.holder_id);
    log.append(&record).await?;

    let pdf = renderer.render(&record.holder_name, &record.holder_id)?;
    tracing::info!(code = %code, holder = %record.holder_name, "certificate issued");
    Ok(pdf)
}
