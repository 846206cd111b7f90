//! Notice lifecycle orchestration.
//!
//! The [`NoticeService`] coordinates the notice repository, the attachment
//! metadata repository, and the file store across create, update, delete,
//! detail-view, and search operations.

mod error;
mod service;
mod types;

pub use error::{NoticeError, RepositoryError};
pub use service::{FileMetadataRepository, NoticeRepository, NoticeService};
pub use types::{
    AttachmentView, CreateNoticeInput, FileAttachment, NewAttachment, Notice, NoticeCreated,
    NoticeDetail, NoticeSummary, NoticeUpdated, SearchType, UpdateNoticeInput,
};
