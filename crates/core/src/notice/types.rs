//! Notice domain types and data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::StoredFile;

/// Notice domain model.
#[derive(Debug, Clone)]
pub struct Notice {
    /// Unique identifier.
    pub id: i64,
    /// Notice title.
    pub title: String,
    /// Notice body.
    pub content: String,
    /// Author identifier. Immutable after creation; the sole authorization
    /// key for update and delete.
    pub user_id: String,
    /// View counter, incremented on every detail view.
    pub views: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Attached files, owned exclusively by this notice.
    pub files: Vec<FileAttachment>,
}

/// Metadata row describing one stored file belonging to exactly one notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    /// Unique identifier.
    pub id: i64,
    /// Owning notice.
    pub notice_id: i64,
    /// Stored filename.
    pub file_name: String,
    /// Stored directory.
    pub file_path: String,
}

impl FileAttachment {
    /// Full storage path of the file: `{file_path}/{file_name}`.
    #[must_use]
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.file_path, self.file_name)
    }
}

/// Metadata for an attachment row that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    /// Stored filename as reported by the file store.
    pub file_name: String,
    /// Stored directory as reported by the file store.
    pub file_path: String,
}

impl From<StoredFile> for NewAttachment {
    fn from(stored: StoredFile) -> Self {
        Self {
            file_name: stored.file_name,
            file_path: stored.file_path,
        }
    }
}

/// Input for creating a notice.
#[derive(Debug, Clone)]
pub struct CreateNoticeInput {
    /// Notice title.
    pub title: String,
    /// Notice body.
    pub content: String,
    /// Author identifier.
    pub user_id: String,
}

/// Input for updating a notice.
#[derive(Debug, Clone)]
pub struct UpdateNoticeInput {
    /// Notice to update.
    pub notice_id: i64,
    /// New title.
    pub title: String,
    /// New body.
    pub content: String,
    /// Caller identity, checked against the notice author.
    pub user_id: String,
}

/// Which columns a keyword search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    /// Match against the title only.
    Title,
    /// Match against the body only.
    Content,
    /// Match against title or body.
    #[default]
    TitleContent,
    /// Match against the author identifier.
    Writer,
}

impl SearchType {
    /// String form used in query parameters.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::TitleContent => "title_content",
            Self::Writer => "writer",
        }
    }

    /// Parse from a query-parameter value. Unknown values fall back to the
    /// broadest search.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "title" => Self::Title,
            "content" => Self::Content,
            "writer" => Self::Writer,
            _ => Self::TitleContent,
        }
    }
}

/// View of one attachment in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentView {
    /// Stored filename.
    pub file_name: String,
    /// Stored directory.
    pub file_path: String,
}

impl From<&FileAttachment> for AttachmentView {
    fn from(file: &FileAttachment) -> Self {
        Self {
            file_name: file.file_name.clone(),
            file_path: file.file_path.clone(),
        }
    }
}

/// Creation result returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeCreated {
    /// Assigned identifier.
    pub id: i64,
    /// Notice title.
    pub title: String,
    /// Author identifier.
    pub user_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Notice> for NoticeCreated {
    fn from(notice: &Notice) -> Self {
        Self {
            id: notice.id,
            title: notice.title.clone(),
            user_id: notice.user_id.clone(),
            created_at: notice.created_at,
        }
    }
}

/// Update result returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeUpdated {
    /// Notice identifier.
    pub id: i64,
    /// Updated title.
    pub title: String,
    /// Updated body.
    pub content: String,
    /// Author identifier.
    pub user_id: String,
    /// Update timestamp.
    pub updated_at: DateTime<Utc>,
    /// The attachment set after replacement.
    pub files: Vec<AttachmentView>,
}

impl From<&Notice> for NoticeUpdated {
    fn from(notice: &Notice) -> Self {
        Self {
            id: notice.id,
            title: notice.title.clone(),
            content: notice.content.clone(),
            user_id: notice.user_id.clone(),
            updated_at: notice.updated_at,
            files: notice.files.iter().map(AttachmentView::from).collect(),
        }
    }
}

/// Detail view, returned with the view counter already incremented.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeDetail {
    /// Notice identifier.
    pub id: i64,
    /// Notice title.
    pub title: String,
    /// Notice body.
    pub content: String,
    /// Author identifier.
    pub user_id: String,
    /// View count including this view.
    pub views: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Attached files.
    pub files: Vec<AttachmentView>,
}

impl From<&Notice> for NoticeDetail {
    fn from(notice: &Notice) -> Self {
        Self {
            id: notice.id,
            title: notice.title.clone(),
            content: notice.content.clone(),
            user_id: notice.user_id.clone(),
            views: notice.views,
            created_at: notice.created_at,
            updated_at: notice.updated_at,
            files: notice.files.iter().map(AttachmentView::from).collect(),
        }
    }
}

/// One row of a paginated search result.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeSummary {
    /// Notice identifier.
    pub id: i64,
    /// Notice title.
    pub title: String,
    /// Author identifier.
    pub user_id: String,
    /// View count.
    pub views: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Notice> for NoticeSummary {
    fn from(notice: Notice) -> Self {
        Self {
            id: notice.id,
            title: notice.title,
            user_id: notice.user_id,
            views: notice.views,
            created_at: notice.created_at,
        }
    }
}
