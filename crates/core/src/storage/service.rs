//! File store implementation using Apache OpenDAL.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use opendal::{Operator, services};
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// An uploaded file received from the HTTP layer, held in memory.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original filename as sent by the client.
    pub file_name: String,
    /// MIME type of the file.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

/// A file persisted to durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Stored filename (`{uuid}_{sanitized original name}`).
    pub file_name: String,
    /// Stored directory, relative to the storage root.
    pub file_path: String,
}

/// Durable file persistence for notice attachments.
///
/// The notice service only depends on this seam; the production
/// implementation is [`ObjectStore`].
pub trait FileStore: Send + Sync {
    /// Persist a batch of uploaded files, returning the stored name and path
    /// of each. A failure mid-batch aborts the remainder; files already
    /// written are left behind.
    fn save_files(
        &self,
        uploads: &[UploadFile],
    ) -> impl std::future::Future<Output = Result<Vec<StoredFile>, StorageError>> + Send;

    /// Delete stored files by full path (`{file_path}/{file_name}`).
    fn delete_files(
        &self,
        paths: &[String],
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;
}

/// File store backed by an OpenDAL operator.
pub struct ObjectStore {
    operator: Operator,
    config: StorageConfig,
}

impl ObjectStore {
    /// Create a new file store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Validate an upload against config constraints.
    fn validate(&self, upload: &UploadFile) -> Result<(), StorageError> {
        let size = upload.data.len() as u64;
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(size, self.config.max_file_size));
        }
        Ok(())
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

impl FileStore for ObjectStore {
    async fn save_files(&self, uploads: &[UploadFile]) -> Result<Vec<StoredFile>, StorageError> {
        // Reject the whole batch before writing anything.
        for upload in uploads {
            self.validate(upload)?;
        }

        let dir = storage_dir(Utc::now());
        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let name = stored_name(&upload.file_name);
            let key = format!("{dir}/{name}");
            self.operator
                .write(&key, upload.data.clone())
                .await
                .map_err(StorageError::from)?;
            stored.push(StoredFile {
                file_name: name,
                file_path: dir.clone(),
            });
        }
        Ok(stored)
    }

    async fn delete_files(&self, paths: &[String]) -> Result<(), StorageError> {
        for path in paths {
            self.operator.delete(path).await.map_err(StorageError::from)?;
        }
        Ok(())
    }
}

/// Date-based storage directory for new uploads: `notices/{YYYY}/{MM}/{DD}`.
fn storage_dir(now: DateTime<Utc>) -> String {
    format!("notices/{}", now.format("%Y/%m/%d"))
}

/// Unique stored filename: `{uuid}_{sanitized original name}`.
fn stored_name(original: &str) -> String {
    format!("{}_{}", Uuid::new_v4(), sanitize_filename(original))
}

/// Sanitize filename for storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Sanitized filenames only contain characters safe for storage keys.
    proptest! {
        #[test]
        fn prop_sanitized_filename_safe_chars(filename in ".*") {
            let sanitized = sanitize_filename(&filename);

            for c in sanitized.chars() {
                let is_safe = c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_';
                prop_assert!(is_safe, "Unexpected character in sanitized filename: {}", c);
            }
        }
    }

    // A stored name always splits into a parseable UUID and the sanitized
    // original name.
    proptest! {
        #[test]
        fn prop_stored_name_format(filename in "[a-zA-Z0-9 ()]{1,40}\\.[a-z]{2,4}") {
            let name = stored_name(&filename);
            let (prefix, rest) = name.split_once('_').expect("separator present");

            prop_assert!(Uuid::parse_str(prefix).is_ok());
            prop_assert_eq!(rest, sanitize_filename(&filename));
        }
    }
}
