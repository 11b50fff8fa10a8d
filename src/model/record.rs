//! Record domain model.
//!
//! # Responsibility
//! - Define the canonical `Record` read model and the `NewRecord` /
//!   `RecordPatch` write models.
//! - Provide title validation shared by create and update paths.
//!
//! # Invariants
//! - `id` is assigned by storage, never reused, and monotonically increasing.
//! - `created_at` is set once at insertion and never modified.
//! - `title` contains at least one non-whitespace character.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable storage-assigned identifier for a record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = i64;

/// Category assigned when the caller does not supply one.
pub const DEFAULT_CATEGORY: &str = "general";

/// A stored note as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Storage-assigned id, unique for the lifetime of the store.
    pub id: RecordId,
    /// Non-empty note title.
    pub title: String,
    /// Free-form body text. May be empty.
    pub content: String,
    /// Free-text grouping label. Not an enforced entity, just a string.
    pub category: String,
    /// UTC insertion timestamp, `YYYY-MM-DD HH:MM:SS`. Immutable.
    pub created_at: String,
}

/// Validation failure for caller-supplied record fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "record title must not be empty"),
        }
    }
}

impl Error for RecordValidationError {}

/// Input for creating one record.
///
/// Defaults mirror the store contract: empty content and the `"general"`
/// category when the caller supplies neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl NewRecord {
    /// Creates a draft with default content and category.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Replaces the body text.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Replaces the category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Checks caller-supplied fields before any SQL mutation.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_title(&self.title)
    }
}

/// Partial update for one record.
///
/// Each field is independently optional so "absent" and "empty string" stay
/// distinguishable: `content: Some(String::new())` clears the body, while
/// `content: None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl RecordPatch {
    /// Sets a new title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets new body text. An empty string clears the body.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets a new category label.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.category.is_none()
    }

    /// Checks supplied fields before any SQL mutation.
    ///
    /// Only the title carries a constraint: an update may replace it but
    /// never clear it.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if let Some(title) = self.title.as_deref() {
            validate_title(title)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), RecordValidationError> {
    if title.trim().is_empty() {
        return Err(RecordValidationError::EmptyTitle);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NewRecord, RecordPatch, RecordValidationError, DEFAULT_CATEGORY};

    #[test]
    fn new_record_defaults() {
        let draft = NewRecord::new("groceries");
        assert_eq!(draft.title, "groceries");
        assert_eq!(draft.content, "");
        assert_eq!(draft.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn new_record_rejects_blank_title() {
        assert_eq!(
            NewRecord::new("   ").validate(),
            Err(RecordValidationError::EmptyTitle)
        );
        assert_eq!(
            NewRecord::new("").validate(),
            Err(RecordValidationError::EmptyTitle)
        );
    }

    #[test]
    fn patch_empty_and_validation() {
        assert!(RecordPatch::default().is_empty());

        let patch = RecordPatch::default().content("");
        assert!(!patch.is_empty());
        assert!(patch.validate().is_ok());

        let patch = RecordPatch::default().title("");
        assert_eq!(patch.validate(), Err(RecordValidationError::EmptyTitle));
    }
}
