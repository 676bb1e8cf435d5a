pub mod certificate;
pub mod config;
pub mod state;
