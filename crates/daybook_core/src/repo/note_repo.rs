//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Owner-scoped note CRUD over the `notes` table.
//! - Date-scoped lookups feeding the calendar (`NoteLookup`).
//!
//! # Invariants
//! - Every query filters on `owner_uuid`; another user's note behaves as
//!   missing.
//! - `note_date` is stored as `YYYY-MM-DD` text, so inclusive range filters
//!   compare lexicographically.
//! - List order is `updated_at DESC, uuid ASC`; `updated_at` is strictly
//!   increasing per owner, so the `uuid` tiebreak only covers rows written
//!   outside this repository.

use crate::model::note::{Note, NoteId, NoteRecord};
use crate::model::user::UserId;
use crate::repo::{ensure_schema, parse_uuid, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;

const NOTES_DEFAULT_LIMIT: u32 = 10;
const NOTES_LIMIT_MAX: u32 = 50;
const NOTE_DATE_FORMAT: &str = "%Y-%m-%d";

// Millisecond clock, bumped past the owner's newest stamp so recency order
// is strict even for writes within the same millisecond. `?2` is the owner.
const NEXT_UPDATED_AT_SQL: &str = "MAX(
    CAST(unixepoch('subsec') * 1000 AS INTEGER),
    COALESCE((SELECT MAX(updated_at) + 1 FROM notes WHERE owner_uuid = ?2), 0)
)";

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    owner_uuid,
    title,
    content,
    preview_text,
    note_date,
    created_at,
    updated_at
FROM notes";

/// Pagination options for note lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListQuery {
    /// Defaults to 10 and clamps to 50.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Owner-scoped note persistence.
pub trait NoteRepository {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Replaces title, content, preview and date of an existing note.
    fn update_note(&self, note: &Note) -> RepoResult<()>;
    fn get_note(&self, owner_id: UserId, id: NoteId) -> RepoResult<Option<NoteRecord>>;
    fn list_notes(&self, owner_id: UserId, query: &NoteListQuery) -> RepoResult<Vec<NoteRecord>>;
    /// Notes dated exactly `date`, oldest first.
    fn list_notes_on_date(&self, owner_id: UserId, date: NaiveDate)
        -> RepoResult<Vec<NoteRecord>>;
    fn delete_note(&self, owner_id: UserId, id: NoteId) -> RepoResult<()>;
}

/// Which days carry notes, for calendar rendering.
pub trait NoteLookup {
    /// Distinct note dates of `owner_id` within `[first, last]` inclusive.
    ///
    /// Undated notes never appear. An inverted range yields an empty set.
    fn note_dates_in_range(
        &self,
        owner_id: UserId,
        first: NaiveDate,
        last: NaiveDate,
    ) -> RepoResult<BTreeSet<NaiveDate>>;
}

impl<T: NoteLookup + ?Sized> NoteLookup for &T {
    fn note_dates_in_range(
        &self,
        owner_id: UserId,
        first: NaiveDate,
        last: NaiveDate,
    ) -> RepoResult<BTreeSet<NaiveDate>> {
        (**self).note_dates_in_range(owner_id, first, last)
    }
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(
            conn,
            "notes",
            &[
                "uuid",
                "owner_uuid",
                "title",
                "content",
                "preview_text",
                "note_date",
                "created_at",
                "updated_at",
            ],
        )?;
        Ok(Self { conn })
    }

    fn owner_exists(&self, owner_id: UserId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE uuid = ?1);",
            [owner_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn query_notes<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> RepoResult<Vec<NoteRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;
        if !self.owner_exists(note.owner_id)? {
            return Err(RepoError::NotFound(note.owner_id));
        }

        self.conn.execute(
            &format!(
                "INSERT INTO notes (
                    uuid,
                    owner_uuid,
                    title,
                    content,
                    preview_text,
                    note_date,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, {NEXT_UPDATED_AT_SQL});"
            ),
            params![
                note.id.to_string(),
                note.owner_id.to_string(),
                note.title.trim(),
                note.content.as_str(),
                note.preview_text.as_deref(),
                note.note_date.map(format_note_date),
            ],
        )?;

        Ok(note.id)
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        let changed = self.conn.execute(
            &format!(
                "UPDATE notes
                 SET
                    title = ?3,
                    content = ?4,
                    preview_text = ?5,
                    note_date = ?6,
                    updated_at = {NEXT_UPDATED_AT_SQL}
                 WHERE uuid = ?1
                   AND owner_uuid = ?2;"
            ),
            params![
                note.id.to_string(),
                note.owner_id.to_string(),
                note.title.trim(),
                note.content.as_str(),
                note.preview_text.as_deref(),
                note.note_date.map(format_note_date),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }
        Ok(())
    }

    fn get_note(&self, owner_id: UserId, id: NoteId) -> RepoResult<Option<NoteRecord>> {
        let mut notes = self.query_notes(
            &format!("{NOTE_SELECT_SQL} WHERE uuid = ?1 AND owner_uuid = ?2;"),
            params![id.to_string(), owner_id.to_string()],
        )?;
        Ok(notes.pop())
    }

    fn list_notes(&self, owner_id: UserId, query: &NoteListQuery) -> RepoResult<Vec<NoteRecord>> {
        let limit = normalize_note_limit(query.limit);
        self.query_notes(
            &format!(
                "{NOTE_SELECT_SQL}
                 WHERE owner_uuid = ?1
                 ORDER BY updated_at DESC, uuid ASC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![
                owner_id.to_string(),
                i64::from(limit),
                i64::from(query.offset)
            ],
        )
    }

    fn list_notes_on_date(
        &self,
        owner_id: UserId,
        date: NaiveDate,
    ) -> RepoResult<Vec<NoteRecord>> {
        self.query_notes(
            &format!(
                "{NOTE_SELECT_SQL}
                 WHERE owner_uuid = ?1
                   AND note_date = ?2
                 ORDER BY created_at ASC, uuid ASC;"
            ),
            params![owner_id.to_string(), format_note_date(date)],
        )
    }

    fn delete_note(&self, owner_id: UserId, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE uuid = ?1 AND owner_uuid = ?2;",
            params![id.to_string(), owner_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

impl NoteLookup for SqliteNoteRepository<'_> {
    fn note_dates_in_range(
        &self,
        owner_id: UserId,
        first: NaiveDate,
        last: NaiveDate,
    ) -> RepoResult<BTreeSet<NaiveDate>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT note_date
             FROM notes
             WHERE owner_uuid = ?1
               AND note_date IS NOT NULL
               AND note_date BETWEEN ?2 AND ?3;",
        )?;
        let mut rows = stmt.query(params![
            owner_id.to_string(),
            format_note_date(first),
            format_note_date(last)
        ])?;

        let mut dates = BTreeSet::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            dates.insert(parse_note_date(&text)?);
        }
        Ok(dates)
    }
}

/// Effective page size for a requested limit.
pub fn normalize_note_limit(limit: Option<u32>) -> u32 {
    match limit {
        None | Some(0) => NOTES_DEFAULT_LIMIT,
        Some(value) => value.min(NOTES_LIMIT_MAX),
    }
}

fn format_note_date(date: NaiveDate) -> String {
    date.format(NOTE_DATE_FORMAT).to_string()
}

fn parse_note_date(value: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, NOTE_DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{value}` in notes.note_date"))
    })
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<NoteRecord> {
    let uuid_text: String = row.get("uuid")?;
    let owner_text: String = row.get("owner_uuid")?;
    let note_date = match row.get::<_, Option<String>>("note_date")? {
        Some(text) => Some(parse_note_date(&text)?),
        None => None,
    };

    Ok(NoteRecord {
        id: parse_uuid(&uuid_text, "notes.uuid")?,
        owner_id: parse_uuid(&owner_text, "notes.owner_uuid")?,
        title: row.get("title")?,
        content: row.get("content")?,
        preview_text: row.get("preview_text")?,
        note_date,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::{format_note_date, normalize_note_limit, parse_note_date};
    use chrono::NaiveDate;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(normalize_note_limit(None), 10);
        assert_eq!(normalize_note_limit(Some(0)), 10);
        assert_eq!(normalize_note_limit(Some(25)), 25);
        assert_eq!(normalize_note_limit(Some(500)), 50);
    }

    #[test]
    fn dates_are_zero_padded_so_text_order_matches_date_order() {
        let early = NaiveDate::from_ymd_opt(987, 3, 4).unwrap();
        let late = NaiveDate::from_ymd_opt(2024, 11, 9).unwrap();
        assert_eq!(format_note_date(early), "0987-03-04");
        assert!(format_note_date(early) < format_note_date(late));
        assert_eq!(parse_note_date("2024-11-09").unwrap(), late);
        assert!(parse_note_date("2024-13-01").is_err());
    }
}
