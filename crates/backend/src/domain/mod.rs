pub mod code_store;
pub mod issuance_log;
pub mod redemption;
