use std::sync::Arc;

use crate::domain::code_store::CodeStore;
use crate::domain::issuance_log::IssuanceLog;
use crate::shared::certificate::CertificateRenderer;

/// Shared handler state. Storage is held behind trait objects so the
/// file-backed implementations can be swapped for in-memory ones.
#[derive(Clone)]
pub struct AppState {
    pub codes: Arc<dyn CodeStore>,
    pub log: Arc<dyn IssuanceLog>,
    pub renderer: Arc<CertificateRenderer>,
}
