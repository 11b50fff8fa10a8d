//! Record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD, listing and aggregate APIs over the `records`
//!   table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate caller input before any SQL mutation.
//! - List results are ordered `created_at DESC, id DESC` (newest first,
//!   insertion order breaking same-second ties).
//! - `created_at` is never touched by update statements.

use crate::db::DbError;
use crate::model::record::{NewRecord, Record, RecordId, RecordPatch, RecordValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    category,
    created_at
FROM records";

/// Default cap on list results when the caller does not choose one.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Number of distinct activity dates reported by [`StoreStats`].
pub const RECENT_ACTIVITY_DAYS: u32 = 7;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing records.
///
/// `category` and `search` are independent filters and are ANDed when both
/// are present. `search` matches as a substring of title or content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Exact category match.
    pub category: Option<String>,
    /// Substring filter over title OR content.
    pub search: Option<String>,
    /// Whether `search` matches case-sensitively. Defaults to `false`,
    /// mirroring SQLite's ASCII-insensitive `LIKE` collation.
    pub match_case: bool,
    /// Maximum rows to return, newest first.
    pub limit: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            match_case: false,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl ListQuery {
    /// Restricts results to one category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Adds a substring filter over title and content.
    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    /// Makes the substring filter case-sensitive.
    pub fn match_case(mut self) -> Self {
        self.match_case = true;
        self
    }

    /// Caps the number of returned rows.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// One calendar date with its record count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    /// UTC calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub count: u64,
}

/// Aggregate snapshot over the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreStats {
    /// Count of all stored records.
    pub total: u64,
    /// Per-category counts for every category currently in use.
    pub by_category: BTreeMap<String, u64>,
    /// The 7 most recent distinct creation dates with activity, most
    /// recent first.
    pub recent_activity: Vec<DailyCount>,
}

/// Repository interface for record CRUD and aggregate operations.
pub trait RecordRepository {
    /// Inserts one record and returns its storage-assigned id.
    fn create_record(&self, draft: &NewRecord) -> RepoResult<RecordId>;
    /// Gets one record by id. `None` when no record has that id.
    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>>;
    /// Lists records with optional filters, newest first.
    fn list_records(&self, query: &ListQuery) -> RepoResult<Vec<Record>>;
    /// Applies a partial update. `false` when the patch is empty or the id
    /// is unknown.
    fn update_record(&self, id: RecordId, patch: &RecordPatch) -> RepoResult<bool>;
    /// Hard-deletes one record. `false` when the id is unknown.
    fn delete_record(&self, id: RecordId) -> RepoResult<bool>;
    /// Distinct category values, alphabetically sorted.
    fn list_categories(&self) -> RepoResult<Vec<String>>;
    /// Aggregate counts over one consistent snapshot.
    fn stats(&self) -> RepoResult<StoreStats>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn create_record(&self, draft: &NewRecord) -> RepoResult<RecordId> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO records (title, content, category) VALUES (?1, ?2, ?3);",
            params![
                draft.title.as_str(),
                draft.content.as_str(),
                draft.category.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }

    fn list_records(&self, query: &ListQuery) -> RepoResult<Vec<Record>> {
        let mut sql = format!("{RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category.as_ref() {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.clone()));
        }

        if let Some(needle) = query.search.as_ref() {
            if query.match_case {
                // instr() compares bytes, which keeps the match
                // case-sensitive without touching connection-wide pragmas.
                sql.push_str(" AND (instr(title, ?) > 0 OR instr(content, ?) > 0)");
                bind_values.push(Value::Text(needle.clone()));
                bind_values.push(Value::Text(needle.clone()));
            } else {
                let pattern = format!("%{}%", escape_like_pattern(needle));
                sql.push_str(" AND (title LIKE ? ESCAPE '\\' OR content LIKE ? ESCAPE '\\')");
                bind_values.push(Value::Text(pattern.clone()));
                bind_values.push(Value::Text(pattern));
            }
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(query.limit)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn update_record(&self, id: RecordId, patch: &RecordPatch) -> RepoResult<bool> {
        if patch.is_empty() {
            return Ok(false);
        }
        patch.validate()?;

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = patch.title.as_ref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(content) = patch.content.as_ref() {
            assignments.push("content = ?");
            bind_values.push(Value::Text(content.clone()));
        }
        if let Some(category) = patch.category.as_ref() {
            assignments.push("category = ?");
            bind_values.push(Value::Text(category.clone()));
        }

        let sql = format!(
            "UPDATE records SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Integer(id));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed > 0)
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn list_categories(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT category FROM records ORDER BY category ASC;")?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(row.get(0)?);
        }
        Ok(categories)
    }

    fn stats(&self) -> RepoResult<StoreStats> {
        // One transaction so total, per-category and per-date counts all
        // observe the same snapshot. The repository holds a shared borrow,
        // so this goes through `unchecked_transaction`; the connection is
        // not used concurrently within the store.
        let tx = self.conn.unchecked_transaction()?;

        let total: u64 = tx.query_row("SELECT COUNT(*) FROM records;", [], |row| row.get(0))?;

        let mut by_category = BTreeMap::new();
        {
            let mut stmt =
                tx.prepare("SELECT category, COUNT(*) FROM records GROUP BY category;")?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let category: String = row.get(0)?;
                let count: u64 = row.get(1)?;
                by_category.insert(category, count);
            }
        }

        let mut recent_activity = Vec::new();
        {
            let mut stmt = tx.prepare(
                "SELECT DATE(created_at) AS day, COUNT(*)
                 FROM records
                 GROUP BY day
                 ORDER BY day DESC
                 LIMIT ?1;",
            )?;
            let mut rows = stmt.query([RECENT_ACTIVITY_DAYS])?;
            while let Some(row) = rows.next()? {
                recent_activity.push(DailyCount {
                    date: row.get(0)?,
                    count: row.get(1)?,
                });
            }
        }

        tx.commit()?;

        Ok(StoreStats {
            total,
            by_category,
            recent_activity,
        })
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let record = Record {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        category: row.get("category")?,
        created_at: row.get("created_at")?,
    };

    // The schema cannot express the non-empty-title rule; reject rows that
    // were tampered with outside the store instead of masking them.
    if record.title.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "record {} has an empty title",
            record.id
        )));
    }

    Ok(record)
}

/// Escapes `LIKE` wildcards so user input matches literally.
fn escape_like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like_pattern;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("a_b"), "a\\_b");
        assert_eq!(escape_like_pattern(r"back\slash"), r"back\\slash");
        assert_eq!(escape_like_pattern("plain"), "plain");
    }
}
