//! Repository implementations of the core persistence traits.
//!
//! Repositories hide the `SeaORM` implementation details from the rest of
//! the application; the service layer only sees the traits defined in
//! `bulletin-core`.

pub mod notice;

pub use notice::{PgNoticeFileRepository, PgNoticeRepository};
