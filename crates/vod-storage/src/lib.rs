//! Object storage for published artifacts.
//!
//! This crate provides:
//! - The `ObjectStore` capability
//! - An S3-compatible client (endpoint/credentials from the environment)
//! - An in-memory store for tests
//! - The best-effort `Publisher` used by the pipeline
//! - Prefix cleanup for artifact namespaces

pub mod error;
pub mod memory;
pub mod publisher;
pub mod s3;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryObjectStore;
pub use publisher::{content_type_for, Publisher};
pub use s3::{S3ObjectStore, StorageConfig};
pub use store::{delete_prefix, download_text, ObjectStore};
