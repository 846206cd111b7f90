//! Object storage for notice attachments using Apache OpenDAL.
//!
//! Vendor-agnostic file persistence with support for:
//! - S3-compatible object stores (production)
//! - Local filesystem (development)
//!
//! The [`FileStore`] trait is the seam the notice service depends on; the
//! OpenDAL-backed [`ObjectStore`] is the production implementation.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{FileStore, ObjectStore, StoredFile, UploadFile};
