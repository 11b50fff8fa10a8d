//! JSON export/import shapes and payload parsing.
//!
//! # Responsibility
//! - Define the on-disk JSON shape for exported records.
//! - Parse import payloads leniently: invalid entries are skipped, a
//!   malformed file is a diagnostic, never a raised error.
//!
//! # Invariants
//! - Exported objects always carry all five record fields.
//! - Import requires only `title` per object; unknown keys are ignored.
//! - Parsing performs no storage access.

use crate::model::record::{NewRecord, Record};
use chrono::Local;
use serde::Serialize;

/// Category assigned to imported records that carry none.
pub const IMPORT_CATEGORY: &str = "import";

/// One record as written to / read from an export file.
///
/// `id` and `created_at` are informational on import: re-importing assigns
/// fresh ids and timestamps. Import deliberately does not parse through
/// this struct — it reads lenient [`serde_json::Value`] objects so foreign
/// files with missing or extra keys stay importable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: String,
}

impl From<&Record> for ExportRecord {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            content: record.content.clone(),
            category: record.category.clone(),
            created_at: record.created_at.clone(),
        }
    }
}

/// Result of one import run.
///
/// A malformed file is an expected, recoverable condition: it yields zero
/// imports plus a diagnostic instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Number of records actually inserted.
    pub imported: usize,
    /// Human-readable reason when the file could not be used at all.
    pub diagnostic: Option<String>,
}

impl ImportOutcome {
    pub fn imported(count: usize) -> Self {
        Self {
            imported: count,
            diagnostic: None,
        }
    }

    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            imported: 0,
            diagnostic: Some(diagnostic.into()),
        }
    }
}

/// Generates the default export filename from local time,
/// e.g. `export_20260825_143015.json`.
pub fn default_export_filename() -> String {
    format!("export_{}.json", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Parses an import payload into insertable drafts.
///
/// Objects without a usable title (missing key, non-string value, or a
/// title that fails validation) are skipped silently. Returns `Err` with a
/// parse diagnostic when the payload is not a JSON array of objects.
pub fn parse_import_payload(bytes: &[u8]) -> Result<Vec<NewRecord>, String> {
    let entries: Vec<serde_json::Value> = serde_json::from_slice(bytes)
        .map_err(|err| format!("invalid JSON import payload: {err}"))?;

    let mut drafts = Vec::new();
    for entry in &entries {
        let Some(object) = entry.as_object() else {
            continue;
        };
        let Some(title) = object.get("title").and_then(|value| value.as_str()) else {
            continue;
        };

        let content = object
            .get("content")
            .and_then(|value| value.as_str())
            .unwrap_or_default();
        let category = object
            .get("category")
            .and_then(|value| value.as_str())
            .unwrap_or(IMPORT_CATEGORY);

        let draft = NewRecord::new(title)
            .with_content(content)
            .with_category(category);
        if draft.validate().is_err() {
            continue;
        }
        drafts.push(draft);
    }

    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::{default_export_filename, parse_import_payload, IMPORT_CATEGORY};

    #[test]
    fn parse_skips_entries_without_title() {
        let payload = br#"[
            {"content": "orphan body"},
            {"title": "kept", "content": "body"},
            {"title": 42},
            {"title": "   "},
            "not an object"
        ]"#;

        let drafts = parse_import_payload(payload).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "kept");
        assert_eq!(drafts[0].content, "body");
        assert_eq!(drafts[0].category, IMPORT_CATEGORY);
    }

    #[test]
    fn parse_keeps_explicit_category_and_ignores_extra_keys() {
        let payload = br#"[{"title": "t", "category": "work", "extra": true}]"#;
        let drafts = parse_import_payload(payload).unwrap();
        assert_eq!(drafts[0].category, "work");
    }

    #[test]
    fn parse_rejects_non_array_payload() {
        let err = parse_import_payload(b"{\"title\": \"t\"}").unwrap_err();
        assert!(err.contains("invalid JSON import payload"));

        let err = parse_import_payload(b"not json at all").unwrap_err();
        assert!(err.contains("invalid JSON import payload"));
    }

    #[test]
    fn default_filename_shape() {
        let name = default_export_filename();
        assert!(name.starts_with("export_"));
        assert!(name.ends_with(".json"));
        // export_YYYYMMDD_HHMMSS.json
        assert_eq!(name.len(), "export_20260825_143015.json".len());
    }
}
