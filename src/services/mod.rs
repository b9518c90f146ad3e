//! Filesystem-facing services: library scanning and result persistence

pub mod library_scanner;
pub mod result_store;

pub use library_scanner::{scan, Library, ScanError};
pub use result_store::{ResultStore, StoreError};
