//! Note domain model.
//!
//! # Invariants
//! - `owner_id` never changes after creation.
//! - `title` is non-empty after trimming and bounded in length.
//! - `note_date` is a plain calendar date; notes without one never show up
//!   on the calendar.

use crate::calendar::{MAX_YEAR, MIN_YEAR};
use crate::model::user::UserId;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Maximum title length in characters.
pub const NOTE_TITLE_MAX_CHARS: usize = 200;

/// Stable identifier of a note.
pub type NoteId = Uuid;

/// Write model for `notes` rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub owner_id: UserId,
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Plain-text summary derived from `content`.
    pub preview_text: Option<String>,
    pub note_date: Option<NaiveDate>,
}

/// Read model returned by note queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: NoteId,
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    pub preview_text: Option<String>,
    pub note_date: Option<NaiveDate>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

/// Rejection reasons for note write input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    TitleTooLong { max_chars: usize },
    DateOutOfRange(NaiveDate),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title cannot be empty"),
            Self::TitleTooLong { max_chars } => {
                write!(f, "note title must be at most {max_chars} characters")
            }
            Self::DateOutOfRange(date) => write!(
                f,
                "note date {date} must fall within years {MIN_YEAR}..={MAX_YEAR}"
            ),
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Creates an undated note with a generated id.
    pub fn new(owner_id: UserId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            content: content.into(),
            preview_text: None,
            note_date: None,
        }
    }

    /// Builder-style setter for the calendar date.
    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.note_date = Some(date);
        self
    }

    pub fn validate(&self) -> Result<(), NoteValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        if title.chars().count() > NOTE_TITLE_MAX_CHARS {
            return Err(NoteValidationError::TitleTooLong {
                max_chars: NOTE_TITLE_MAX_CHARS,
            });
        }
        if let Some(date) = self.note_date {
            if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
                return Err(NoteValidationError::DateOutOfRange(date));
            }
        }
        Ok(())
    }
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Self {
            id: record.id,
            owner_id: record.owner_id,
            title: record.title,
            content: record.content,
            preview_text: record.preview_text,
            note_date: record.note_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteValidationError, NOTE_TITLE_MAX_CHARS};
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn blank_title_is_rejected() {
        let note = Note::new(Uuid::new_v4(), "   ", "body");
        assert_eq!(note.validate(), Err(NoteValidationError::EmptyTitle));
    }

    #[test]
    fn title_length_is_counted_in_chars() {
        let owner = Uuid::new_v4();
        let at_limit = Note::new(owner, "é".repeat(NOTE_TITLE_MAX_CHARS), "");
        assert!(at_limit.validate().is_ok());

        let over = Note::new(owner, "é".repeat(NOTE_TITLE_MAX_CHARS + 1), "");
        assert!(matches!(
            over.validate(),
            Err(NoteValidationError::TitleTooLong { .. })
        ));
    }

    #[test]
    fn dates_beyond_four_digit_years_are_rejected() {
        let far = NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap();
        let note = Note::new(Uuid::new_v4(), "later", "").on_date(far);
        assert_eq!(note.validate(), Err(NoteValidationError::DateOutOfRange(far)));

        let near = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert!(Note::new(Uuid::new_v4(), "leap", "").on_date(near).validate().is_ok());
    }
}
