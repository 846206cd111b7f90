//! Core business logic for Bulletin.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, the notice service, and the file store live here.
//!
//! # Modules
//!
//! - `notice` - Notice lifecycle orchestration and error taxonomy
//! - `storage` - Object storage abstraction for attached files

pub mod notice;
pub mod storage;
