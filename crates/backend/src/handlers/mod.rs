pub mod issuance_log;
pub mod redemption;
