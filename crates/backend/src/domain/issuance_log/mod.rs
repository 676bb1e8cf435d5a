pub mod repository;

pub use repository::{FileIssuanceLog, IssuanceLog, IssuanceLogError};
