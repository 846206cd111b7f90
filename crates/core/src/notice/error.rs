//! Notice error taxonomy.
//!
//! One kind per operation boundary. Ownership violations are never
//! re-wrapped; every other unexpected failure is caught at the operation
//! boundary and surfaced as the operation-specific kind. `update` is the
//! exception: it wraps everything (including a missing notice) as the
//! generic [`NoticeError::InvalidArgument`], mirroring the behavior this
//! service was specified against.

use thiserror::Error;

/// Opaque persistence failure reported by a repository implementation.
#[derive(Debug, Error)]
#[error("repository error: {0}")]
pub struct RepositoryError(pub String);

impl RepositoryError {
    /// Create a repository error from any displayable cause.
    #[must_use]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Notice operation errors.
#[derive(Debug, Error)]
pub enum NoticeError {
    /// No notice with the given id exists.
    #[error("notice not found: {0}")]
    NotFound(i64),

    /// The caller is not the author of the notice.
    #[error("only the author may modify this notice")]
    UserIdMismatch,

    /// The file store failed while persisting uploads.
    #[error("file save failed: {0}")]
    FileSaveFailed(String),

    /// Unexpected failure while creating a notice.
    #[error("notice creation failed: {0}")]
    CreateFailed(String),

    /// Unexpected failure while deleting a notice.
    #[error("notice deletion failed: {0}")]
    DeleteFailed(String),

    /// Unexpected failure while loading a notice detail.
    #[error("notice detail failed: {0}")]
    DetailFailed(String),

    /// Unexpected failure while searching notices.
    #[error("notice search failed: {0}")]
    SearchFailed(String),

    /// Unexpected failure during update, wrapped generically.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl NoticeError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::UserIdMismatch | Self::InvalidArgument(_) => 400,
            Self::FileSaveFailed(_)
            | Self::CreateFailed(_)
            | Self::DeleteFailed(_)
            | Self::DetailFailed(_)
            | Self::SearchFailed(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOTICE_NOT_FOUND",
            Self::UserIdMismatch => "USER_ID_MISMATCH",
            Self::FileSaveFailed(_) => "FILE_SAVE_ERROR",
            Self::CreateFailed(_) => "NOTICE_CREATE_ERROR",
            Self::DeleteFailed(_) => "NOTICE_DELETE_ERROR",
            Self::DetailFailed(_) => "NOTICE_DETAIL_ERROR",
            Self::SearchFailed(_) => "NOTICE_SEARCH_ERROR",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(NoticeError::NotFound(1).status_code(), 404);
        assert_eq!(NoticeError::UserIdMismatch.status_code(), 400);
        assert_eq!(NoticeError::InvalidArgument(String::new()).status_code(), 400);
        assert_eq!(NoticeError::FileSaveFailed(String::new()).status_code(), 500);
        assert_eq!(NoticeError::CreateFailed(String::new()).status_code(), 500);
        assert_eq!(NoticeError::DeleteFailed(String::new()).status_code(), 500);
        assert_eq!(NoticeError::DetailFailed(String::new()).status_code(), 500);
        assert_eq!(NoticeError::SearchFailed(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(NoticeError::NotFound(1).error_code(), "NOTICE_NOT_FOUND");
        assert_eq!(NoticeError::UserIdMismatch.error_code(), "USER_ID_MISMATCH");
        assert_eq!(
            NoticeError::FileSaveFailed(String::new()).error_code(),
            "FILE_SAVE_ERROR"
        );
        assert_eq!(
            NoticeError::CreateFailed(String::new()).error_code(),
            "NOTICE_CREATE_ERROR"
        );
        assert_eq!(
            NoticeError::DeleteFailed(String::new()).error_code(),
            "NOTICE_DELETE_ERROR"
        );
        assert_eq!(
            NoticeError::DetailFailed(String::new()).error_code(),
            "NOTICE_DETAIL_ERROR"
        );
        assert_eq!(
            NoticeError::SearchFailed(String::new()).error_code(),
            "NOTICE_SEARCH_ERROR"
        );
        assert_eq!(
            NoticeError::InvalidArgument(String::new()).error_code(),
            "INVALID_ARGUMENT"
        );
    }
}
