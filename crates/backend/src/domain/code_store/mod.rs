pub mod repository;

pub use repository::{CodeStore, CodeStoreError, FileCodeStore};
