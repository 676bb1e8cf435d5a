pub mod service;

pub use service::RedemptionError;
