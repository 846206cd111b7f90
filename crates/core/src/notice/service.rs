//! Notice service implementation.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use bulletin_shared::{PageRequest, PageResponse};

use super::error::{NoticeError, RepositoryError};
use super::types::{
    CreateNoticeInput, FileAttachment, NewAttachment, Notice, NoticeCreated, NoticeDetail,
    NoticeSummary, NoticeUpdated, SearchType, UpdateNoticeInput,
};
use crate::storage::{FileStore, UploadFile};

/// Repository trait for notice persistence.
///
/// Implemented by the db crate. Mutations that touch the notice row and its
/// attachment rows together are expected to be atomic.
pub trait NoticeRepository: Send + Sync {
    /// Find a notice (with its attachments) by id.
    fn find_by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Notice>, RepositoryError>> + Send;

    /// Persist a new notice together with its attachment rows.
    fn create(
        &self,
        input: CreateNoticeInput,
        files: Vec<NewAttachment>,
    ) -> impl std::future::Future<Output = Result<Notice, RepositoryError>> + Send;

    /// Apply field updates and insert replacement attachment rows.
    fn update(
        &self,
        input: UpdateNoticeInput,
        files: Vec<NewAttachment>,
    ) -> impl std::future::Future<Output = Result<Notice, RepositoryError>> + Send;

    /// Delete the notice row.
    fn delete(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Persist a new view-counter value.
    fn save_views(
        &self,
        id: i64,
        views: i64,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Keyword search with pagination. Returns the matching page of notices
    /// and the total match count across all pages.
    fn search(
        &self,
        search_type: SearchType,
        keyword: &str,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<(Vec<Notice>, u64), RepositoryError>> + Send;
}

/// Repository trait for attachment metadata rows.
pub trait FileMetadataRepository: Send + Sync {
    /// Delete the given attachment rows.
    fn delete_all(
        &self,
        files: &[FileAttachment],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Failure modes of loading a notice, before any operation-specific wrapping.
#[derive(Debug, Error)]
enum LoadError {
    #[error("notice not found: {0}")]
    NotFound(i64),
    #[error(transparent)]
    Repository(RepositoryError),
}

/// Notice service orchestrating notice + attachment lifecycle.
pub struct NoticeService<R, F, S> {
    notices: Arc<R>,
    file_rows: Arc<F>,
    store: Arc<S>,
}

impl<R, F, S> NoticeService<R, F, S>
where
    R: NoticeRepository,
    F: FileMetadataRepository,
    S: FileStore,
{
    /// Create a new notice service.
    #[must_use]
    pub fn new(notices: Arc<R>, file_rows: Arc<F>, store: Arc<S>) -> Self {
        Self {
            notices,
            file_rows,
            store,
        }
    }

    /// Create a notice, optionally storing uploaded files first.
    ///
    /// Files are written to storage before the notice row exists; if the row
    /// insert then fails the stored files are left behind.
    ///
    /// # Errors
    ///
    /// - [`NoticeError::FileSaveFailed`] if the file store fails
    /// - [`NoticeError::CreateFailed`] if persistence fails
    pub async fn create(
        &self,
        input: CreateNoticeInput,
        uploads: Vec<UploadFile>,
    ) -> Result<NoticeCreated, NoticeError> {
        let files = self.store_uploads(&uploads).await?;

        let notice = self.notices.create(input, files).await.map_err(|e| {
            error!(error = %e, "failed to persist notice");
            NoticeError::CreateFailed(e.to_string())
        })?;

        info!(notice_id = notice.id, user_id = %notice.user_id, "notice created");
        Ok(NoticeCreated::from(&notice))
    }

    /// Delete a notice, its attachment rows, and its stored files.
    ///
    /// # Errors
    ///
    /// - [`NoticeError::NotFound`] if the id has no matching notice
    /// - [`NoticeError::UserIdMismatch`] if the caller is not the author;
    ///   never re-wrapped
    /// - [`NoticeError::DeleteFailed`] for any other failure
    pub async fn delete(&self, id: i64, user_id: &str) -> Result<(), NoticeError> {
        let notice = self.load(id).await.map_err(|e| match e {
            LoadError::NotFound(id) => NoticeError::NotFound(id),
            LoadError::Repository(e) => NoticeError::DeleteFailed(e.to_string()),
        })?;
        Self::check_owner(&notice, user_id)?;

        if !notice.files.is_empty() {
            self.file_rows.delete_all(&notice.files).await.map_err(|e| {
                error!(notice_id = id, error = %e, "failed to delete attachment rows");
                NoticeError::DeleteFailed(e.to_string())
            })?;

            let paths: Vec<String> = notice.files.iter().map(FileAttachment::full_path).collect();
            self.store.delete_files(&paths).await.map_err(|e| {
                error!(notice_id = id, error = %e, "failed to delete stored files");
                NoticeError::DeleteFailed(e.to_string())
            })?;
        }

        self.notices.delete(id).await.map_err(|e| {
            error!(notice_id = id, error = %e, "failed to delete notice row");
            NoticeError::DeleteFailed(e.to_string())
        })?;

        info!(notice_id = id, "notice deleted");
        Ok(())
    }

    /// Load a notice detail, incrementing and persisting its view counter.
    ///
    /// # Errors
    ///
    /// - [`NoticeError::NotFound`] if the id has no matching notice
    /// - [`NoticeError::DetailFailed`] for any other failure
    pub async fn detail(&self, id: i64) -> Result<NoticeDetail, NoticeError> {
        let mut notice = self.load(id).await.map_err(|e| match e {
            LoadError::NotFound(id) => NoticeError::NotFound(id),
            LoadError::Repository(e) => NoticeError::DetailFailed(e.to_string()),
        })?;

        notice.views += 1;
        self.notices
            .save_views(notice.id, notice.views)
            .await
            .map_err(|e| {
                error!(notice_id = id, error = %e, "failed to persist view counter");
                NoticeError::DetailFailed(e.to_string())
            })?;

        Ok(NoticeDetail::from(&notice))
    }

    /// Keyword search with pagination, mapped to summary views.
    ///
    /// A keyword matching nothing yields an empty page with correct totals,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`NoticeError::SearchFailed`] if the repository fails.
    pub async fn search(
        &self,
        search_type: SearchType,
        keyword: &str,
        page: PageRequest,
    ) -> Result<PageResponse<NoticeSummary>, NoticeError> {
        let (notices, total) = self
            .notices
            .search(search_type, keyword, page)
            .await
            .map_err(|e| {
                error!(error = %e, "notice search failed");
                NoticeError::SearchFailed(e.to_string())
            })?;

        Ok(
            PageResponse::new(notices, page.page, page.effective_per_page(), total)
                .map(NoticeSummary::from),
        )
    }

    /// Update a notice, replacing its attachment set wholesale.
    ///
    /// Existing attachments are deleted unconditionally (metadata rows and
    /// stored files), then any newly uploaded files are stored and attached.
    ///
    /// # Errors
    ///
    /// - [`NoticeError::UserIdMismatch`] if the caller is not the author;
    ///   never re-wrapped
    /// - [`NoticeError::InvalidArgument`] for any other failure, a missing
    ///   notice included
    pub async fn update(
        &self,
        input: UpdateNoticeInput,
        uploads: Vec<UploadFile>,
    ) -> Result<NoticeUpdated, NoticeError> {
        match self.update_inner(input, uploads).await {
            Ok(updated) => Ok(updated),
            Err(NoticeError::UserIdMismatch) => Err(NoticeError::UserIdMismatch),
            Err(e) => {
                error!(error = %e, "notice update failed");
                Err(NoticeError::InvalidArgument(e.to_string()))
            }
        }
    }

    async fn update_inner(
        &self,
        input: UpdateNoticeInput,
        uploads: Vec<UploadFile>,
    ) -> Result<NoticeUpdated, NoticeError> {
        let notice = self.load(input.notice_id).await.map_err(|e| match e {
            LoadError::NotFound(id) => NoticeError::NotFound(id),
            LoadError::Repository(e) => NoticeError::InvalidArgument(e.to_string()),
        })?;
        Self::check_owner(&notice, &input.user_id)?;

        if !notice.files.is_empty() {
            self.file_rows
                .delete_all(&notice.files)
                .await
                .map_err(|e| NoticeError::InvalidArgument(e.to_string()))?;

            let paths: Vec<String> = notice.files.iter().map(FileAttachment::full_path).collect();
            self.store
                .delete_files(&paths)
                .await
                .map_err(|e| NoticeError::InvalidArgument(e.to_string()))?;
            info!(
                notice_id = notice.id,
                removed = notice.files.len(),
                "existing attachments removed"
            );
        }

        let files = self.store_uploads(&uploads).await?;

        let updated = self
            .notices
            .update(input, files)
            .await
            .map_err(|e| NoticeError::InvalidArgument(e.to_string()))?;

        info!(notice_id = updated.id, "notice updated");
        Ok(NoticeUpdated::from(&updated))
    }

    /// Store uploads and convert the results to attachment rows.
    async fn store_uploads(&self, uploads: &[UploadFile]) -> Result<Vec<NewAttachment>, NoticeError> {
        if uploads.is_empty() {
            return Ok(Vec::new());
        }

        let stored = self.store.save_files(uploads).await.map_err(|e| {
            error!(error = %e, "failed to store uploaded files");
            NoticeError::FileSaveFailed(e.to_string())
        })?;

        Ok(stored.into_iter().map(NewAttachment::from).collect())
    }

    async fn load(&self, id: i64) -> Result<Notice, LoadError> {
        self.notices
            .find_by_id(id)
            .await
            .map_err(LoadError::Repository)?
            .ok_or(LoadError::NotFound(id))
    }

    fn check_owner(notice: &Notice, user_id: &str) -> Result<(), NoticeError> {
        if notice.user_id != user_id {
            warn!(
                notice_id = notice.id,
                caller = user_id,
                "rejected modification by non-author"
            );
            return Err(NoticeError::UserIdMismatch);
        }
        Ok(())
    }
}
