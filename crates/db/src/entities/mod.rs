//! `SeaORM` entity definitions.

pub mod notice_files;
pub mod notices;
