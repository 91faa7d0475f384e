//! Note use-case service.
//!
//! # Responsibility
//! - Owner-scoped create/update/get/delete/list for notes.
//! - Derive `preview_text` from markdown content on every content write.
//!
//! # Invariants
//! - A note is only ever visible to, and mutable by, its owner.
//! - List results report the limit that was actually applied.

use crate::model::note::{Note, NoteId, NoteRecord, NoteValidationError};
use crate::model::user::UserId;
use crate::repo::note_repo::{normalize_note_limit, NoteListQuery, NoteRepository};
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PREVIEW_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    Invalid(NoteValidationError),
    NoteNotFound(NoteId),
    OwnerNotFound(UserId),
    Repo(RepoError),
    /// A write succeeded but the read-back did not find the row.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::OwnerNotFound(id) => write!(f, "owner not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::InvalidNote(err) => Self::Invalid(err),
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `Some(None)` clears the date.
    pub note_date: Option<Option<NaiveDate>>,
}

/// List result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResult {
    /// Sorted by `updated_at DESC, uuid ASC`.
    pub items: Vec<NoteRecord>,
    pub applied_limit: u32,
}

/// Note service facade over a repository implementation.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a note for `owner_id` and returns the stored record.
    pub fn create_note(
        &self,
        owner_id: UserId,
        title: impl Into<String>,
        content: impl Into<String>,
        note_date: Option<NaiveDate>,
    ) -> Result<NoteRecord, NoteServiceError> {
        let mut note = Note::new(owner_id, title, content);
        note.note_date = note_date;
        note.preview_text = derive_preview_text(&note.content);

        let id = self.repo.create_note(&note).map_err(|err| match err {
            RepoError::NotFound(missing) if missing == owner_id => {
                NoteServiceError::OwnerNotFound(owner_id)
            }
            other => other.into(),
        })?;
        info!(
            "event=note_create module=service status=ok note_id={id} dated={}",
            note_date.is_some()
        );

        self.repo
            .get_note(owner_id, id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Applies `update` to an owned note; preview follows the new content.
    pub fn update_note(
        &self,
        owner_id: UserId,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<NoteRecord, NoteServiceError> {
        let current = self
            .repo
            .get_note(owner_id, id)?
            .ok_or(NoteServiceError::NoteNotFound(id))?;
        let mut note = Note::from(current);

        if let Some(title) = update.title {
            note.title = title;
        }
        if let Some(content) = update.content {
            note.preview_text = derive_preview_text(&content);
            note.content = content;
        }
        if let Some(note_date) = update.note_date {
            note.note_date = note_date;
        }

        self.repo.update_note(&note)?;
        self.repo
            .get_note(owner_id, id)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    pub fn get_note(
        &self,
        owner_id: UserId,
        id: NoteId,
    ) -> Result<Option<NoteRecord>, NoteServiceError> {
        Ok(self.repo.get_note(owner_id, id)?)
    }

    pub fn delete_note(&self, owner_id: UserId, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete_note(owner_id, id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    /// Lists the owner's notes, most recently updated first.
    pub fn list_notes(
        &self,
        owner_id: UserId,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<NotesListResult, NoteServiceError> {
        let applied_limit = normalize_note_limit(limit);
        let query = NoteListQuery {
            limit: Some(applied_limit),
            offset,
        };
        let items = self.repo.list_notes(owner_id, &query)?;
        Ok(NotesListResult {
            items,
            applied_limit,
        })
    }

    /// Notes the owner attached to `date`, oldest first.
    pub fn notes_on_date(
        &self,
        owner_id: UserId,
        date: NaiveDate,
    ) -> Result<Vec<NoteRecord>, NoteServiceError> {
        Ok(self.repo.list_notes_on_date(owner_id, date)?)
    }
}

/// Plain-text summary of markdown `content`.
///
/// Images are dropped, links keep their label, markdown symbols are removed,
/// whitespace is collapsed, and at most 100 characters are kept. Returns
/// `None` when nothing readable remains.
pub fn derive_preview_text(content: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(content, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::derive_preview_text;

    #[test]
    fn preview_keeps_link_labels_and_drops_images() {
        let preview = derive_preview_text("See [the plan](https://x.test) ![cover](c.png)");
        assert_eq!(preview.as_deref(), Some("See the plan"));
    }

    #[test]
    fn preview_strips_symbols_and_limits_length() {
        let source = format!("# Heading\n\n**bold** `code` {}", "word ".repeat(40));
        let text = derive_preview_text(&source).expect("preview should exist");
        assert!(text.starts_with("Heading bold code"));
        assert!(!text.contains('#'));
        assert!(!text.contains('*'));
        assert_eq!(text.chars().count(), 100);
    }

    #[test]
    fn preview_is_none_for_symbol_only_content() {
        assert_eq!(derive_preview_text("  ## --- ** "), None);
        assert_eq!(derive_preview_text(""), None);
    }
}
