//! Embedded record store for user-authored notes.
//!
//! This crate is the data-access core of a local record-management tool:
//! it persists notes (title, content, category, creation timestamp) in
//! SQLite and exposes CRUD, filtered listing, substring search, aggregate
//! statistics and JSON export/import. Any front end (CLI menu, web form,
//! API handler) holds one [`RecordStore`] and calls it directly.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod transfer;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging};
pub use model::record::{
    NewRecord, Record, RecordId, RecordPatch, RecordValidationError, DEFAULT_CATEGORY,
};
pub use repo::record_repo::{
    DailyCount, ListQuery, RecordRepository, RepoError, RepoResult, SqliteRecordRepository,
    StoreStats, DEFAULT_LIST_LIMIT,
};
pub use service::store::{RecordStore, StoreError, StoreResult, EXPORT_LIMIT};
pub use transfer::{ExportRecord, ImportOutcome, IMPORT_CATEGORY};

/// Returns the crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
