//! Record store facade.
//!
//! # Responsibility
//! - Own one SQLite connection and expose every store operation behind it.
//! - Orchestrate JSON export/import on top of repository CRUD.
//!
//! # Invariants
//! - Every operation completes synchronously on the owned connection.
//! - Validation and not-found conditions are ordinary values; storage
//!   failures propagate as errors.
//! - Import never raises for a malformed file; it reports a diagnostic.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::record::{NewRecord, Record, RecordId, RecordPatch, RecordValidationError};
use crate::repo::record_repo::{
    ListQuery, RecordRepository, RepoError, SqliteRecordRepository, StoreStats,
};
use crate::transfer::{
    default_export_filename, parse_import_payload, ExportRecord, ImportOutcome,
};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Cap on records written by one export.
pub const EXPORT_LIMIT: u32 = 10_000;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for record operations and JSON transfer.
#[derive(Debug)]
pub enum StoreError {
    /// Caller-supplied input is invalid. No side effect occurred.
    Validation(RecordValidationError),
    /// Storage-engine failure. Fatal to the operation, never retried.
    Db(DbError),
    /// Filesystem failure while writing an export file.
    Io(std::io::Error),
    /// Persisted state did not decode into a record.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "export file error: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Db(err) => Self::Db(err),
            RepoError::InvalidData(message) => Self::InvalidData(message),
        }
    }
}

/// Durable store for user-authored records.
///
/// Owns a single serialized connection; a front end holds one instance and
/// calls it directly. All operations are synchronous and independently
/// transactional.
#[derive(Debug)]
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Opens (creating when absent) a file-backed store and ensures the
    /// schema exists. Safe to call on every startup.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = open_db(path)?;
        Ok(Self { conn })
    }

    /// Opens a throwaway in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self { conn })
    }

    /// Wraps an already-bootstrapped connection.
    ///
    /// The connection must have the record schema applied, e.g. via
    /// [`open_db`].
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Adds one record and returns its new id.
    ///
    /// # Errors
    /// - `StoreError::Validation` when the title is empty.
    pub fn add(&self, draft: &NewRecord) -> StoreResult<RecordId> {
        let id = self.repo().create_record(draft)?;
        Ok(id)
    }

    /// Gets one record by id; `None` when no record has that id.
    pub fn get(&self, id: RecordId) -> StoreResult<Option<Record>> {
        let record = self.repo().get_record(id)?;
        Ok(record)
    }

    /// Lists records newest-first with optional category/search filters.
    pub fn list(&self, query: &ListQuery) -> StoreResult<Vec<Record>> {
        let records = self.repo().list_records(query)?;
        Ok(records)
    }

    /// Applies a partial update.
    ///
    /// Returns `false` when the patch carries no fields or no record has
    /// that id; `true` after any applied change.
    pub fn update(&self, id: RecordId, patch: &RecordPatch) -> StoreResult<bool> {
        let changed = self.repo().update_record(id, patch)?;
        Ok(changed)
    }

    /// Hard-deletes one record. Deleting an unknown id returns `false`.
    pub fn delete(&self, id: RecordId) -> StoreResult<bool> {
        let deleted = self.repo().delete_record(id)?;
        Ok(deleted)
    }

    /// Distinct category values, alphabetically sorted.
    pub fn categories(&self) -> StoreResult<Vec<String>> {
        let categories = self.repo().list_categories()?;
        Ok(categories)
    }

    /// Aggregate counts over one consistent snapshot.
    pub fn stats(&self) -> StoreResult<StoreStats> {
        let stats = self.repo().stats()?;
        Ok(stats)
    }

    /// Serializes up to [`EXPORT_LIMIT`] most-recent records to a
    /// pretty-printed JSON array at `path`.
    ///
    /// When `path` is `None` a timestamped filename in the current
    /// directory is used. An existing file is overwritten. Returns the
    /// path written.
    pub fn export_to_file(&self, path: Option<&Path>) -> StoreResult<PathBuf> {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(default_export_filename()),
        };

        let records = self.list(&ListQuery::default().limit(EXPORT_LIMIT))?;
        let exported: Vec<ExportRecord> = records.iter().map(ExportRecord::from).collect();

        let payload = serde_json::to_vec_pretty(&exported)
            .map_err(|err| StoreError::InvalidData(format!("export serialization: {err}")))?;
        fs::write(&target, payload).map_err(StoreError::Io)?;

        info!(
            "event=export module=store status=ok records={} path={}",
            exported.len(),
            target.display()
        );
        Ok(target)
    }

    /// Imports records from a JSON array file.
    ///
    /// Objects without a usable `title` are skipped; `content` defaults to
    /// empty and `category` to `"import"` when absent. An unreadable or
    /// malformed file yields `ImportOutcome { imported: 0, diagnostic }`
    /// without an error. Storage failures while inserting do propagate.
    pub fn import_from_file(&self, path: &Path) -> StoreResult<ImportOutcome> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                let diagnostic = format!("cannot read import file `{}`: {err}", path.display());
                warn!("event=import module=store status=rejected reason=unreadable error={err}");
                return Ok(ImportOutcome::failed(diagnostic));
            }
        };

        let drafts = match parse_import_payload(&bytes) {
            Ok(drafts) => drafts,
            Err(diagnostic) => {
                warn!("event=import module=store status=rejected reason=parse error={diagnostic}");
                return Ok(ImportOutcome::failed(diagnostic));
            }
        };

        let repo = self.repo();
        let mut imported = 0usize;
        for draft in &drafts {
            repo.create_record(draft)?;
            imported += 1;
        }

        info!(
            "event=import module=store status=ok records={} path={}",
            imported,
            path.display()
        );
        Ok(ImportOutcome::imported(imported))
    }

    fn repo(&self) -> SqliteRecordRepository<'_> {
        SqliteRecordRepository::new(&self.conn)
    }
}
