//! Core domain logic for Daybook: owner-scoped notes and a month calendar
//! that surfaces which days carry notes.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::{
    build_calendar_page, CalendarDay, CalendarError, CalendarMonth, CalendarPage, CalendarWeek,
    MonthLink, YearMonth,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, DaybookConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId, NoteRecord, NoteValidationError};
pub use model::user::{User, UserId, UserValidationError};
pub use repo::note_repo::{NoteListQuery, NoteLookup, NoteRepository, SqliteNoteRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::calendar_service::{CalendarService, CalendarServiceError};
pub use service::note_service::{
    derive_preview_text, NoteService, NoteServiceError, NoteUpdate, NotesListResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
