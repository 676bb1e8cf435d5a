//! Shared contracts between the backend and its clients.

pub mod domain;
