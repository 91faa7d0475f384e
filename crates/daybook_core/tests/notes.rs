use chrono::NaiveDate;
use daybook_core::db::open_db_in_memory;
use daybook_core::{
    NoteService, NoteServiceError, NoteUpdate, NoteValidationError, RepoError,
    SqliteNoteRepository, SqliteUserRepository, User, UserId, UserRepository,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn add_user(conn: &Connection, username: &str) -> UserId {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    repo.create_user(&User::new(username, format!("{username}@example.com")))
        .unwrap()
}

#[test]
fn create_note_derives_preview_and_keeps_date() {
    let conn = open_db_in_memory().unwrap();
    let owner = add_user(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let created = service
        .create_note(
            owner,
            "  Groceries ",
            "- **milk**\n- [bread](https://shop.test)",
            Some(date(2024, 2, 29)),
        )
        .unwrap();

    assert_eq!(created.owner_id, owner);
    assert_eq!(created.title, "Groceries");
    assert_eq!(created.preview_text.as_deref(), Some("milk bread"));
    assert_eq!(created.note_date, Some(date(2024, 2, 29)));
    assert!(created.created_at > 0);
}

#[test]
fn create_note_for_unknown_owner_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let ghost = Uuid::new_v4();

    let err = service.create_note(ghost, "title", "", None).unwrap_err();
    assert!(matches!(err, NoteServiceError::OwnerNotFound(id) if id == ghost));
}

#[test]
fn create_note_rejects_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let owner = add_user(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let err = service.create_note(owner, "  ", "body", None).unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Invalid(NoteValidationError::EmptyTitle)
    ));
}

#[test]
fn update_note_applies_partial_changes() {
    let conn = open_db_in_memory().unwrap();
    let owner = add_user(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let created = service
        .create_note(owner, "Draft", "first body", Some(date(2024, 5, 1)))
        .unwrap();

    let retitled = service
        .update_note(
            owner,
            created.id,
            NoteUpdate {
                title: Some("Final".to_string()),
                ..NoteUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(retitled.title, "Final");
    assert_eq!(retitled.content, "first body");
    assert_eq!(retitled.note_date, Some(date(2024, 5, 1)));

    let rewritten = service
        .update_note(
            owner,
            created.id,
            NoteUpdate {
                content: Some("# second body".to_string()),
                note_date: Some(None),
                ..NoteUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(rewritten.title, "Final");
    assert_eq!(rewritten.preview_text.as_deref(), Some("second body"));
    assert_eq!(rewritten.note_date, None);
}

#[test]
fn notes_are_invisible_to_other_owners() {
    let conn = open_db_in_memory().unwrap();
    let alice = add_user(&conn, "alice");
    let bob = add_user(&conn, "bob");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service.create_note(alice, "private", "", None).unwrap();

    assert!(service.get_note(bob, note.id).unwrap().is_none());
    assert!(service.list_notes(bob, None, 0).unwrap().items.is_empty());

    let update_err = service
        .update_note(bob, note.id, NoteUpdate::default())
        .unwrap_err();
    assert!(matches!(update_err, NoteServiceError::NoteNotFound(_)));

    let delete_err = service.delete_note(bob, note.id).unwrap_err();
    assert!(matches!(delete_err, NoteServiceError::NoteNotFound(_)));

    assert!(service.get_note(alice, note.id).unwrap().is_some());
}

#[test]
fn delete_note_removes_row() {
    let conn = open_db_in_memory().unwrap();
    let owner = add_user(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service.create_note(owner, "temp", "", None).unwrap();

    service.delete_note(owner, note.id).unwrap();
    assert!(service.get_note(owner, note.id).unwrap().is_none());
}

#[test]
fn list_notes_orders_by_recent_update_and_paginates() {
    let conn = open_db_in_memory().unwrap();
    let owner = add_user(&conn, "alice");
    let (first_id, second_id, third_id) = {
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
        let first = service.create_note(owner, "first", "", None).unwrap();
        let second = service.create_note(owner, "second", "", None).unwrap();
        let third = service.create_note(owner, "third", "", None).unwrap();
        (first.id, second.id, third.id)
    };

    for (id, updated_at) in [(first_id, 3000), (second_id, 1000), (third_id, 2000)] {
        conn.execute(
            "UPDATE notes SET updated_at = ?2 WHERE uuid = ?1;",
            params![id.to_string(), updated_at],
        )
        .unwrap();
    }

    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let page = service.list_notes(owner, Some(2), 0).unwrap();
    assert_eq!(page.applied_limit, 2);
    let ids: Vec<_> = page.items.iter().map(|note| note.id).collect();
    assert_eq!(ids, vec![first_id, third_id]);

    let rest = service.list_notes(owner, Some(2), 2).unwrap();
    assert_eq!(rest.items.len(), 1);
    assert_eq!(rest.items[0].id, second_id);
}

#[test]
fn list_notes_limit_defaults_to_10_and_caps_at_50() {
    let conn = open_db_in_memory().unwrap();
    let owner = add_user(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    for idx in 0..60 {
        service
            .create_note(owner, format!("note {idx}"), "", None)
            .unwrap();
    }

    let defaulted = service.list_notes(owner, None, 0).unwrap();
    assert_eq!(defaulted.applied_limit, 10);
    assert_eq!(defaulted.items.len(), 10);

    let capped = service.list_notes(owner, Some(500), 0).unwrap();
    assert_eq!(capped.applied_limit, 50);
    assert_eq!(capped.items.len(), 50);
}

#[test]
fn notes_on_date_returns_only_that_day() {
    let conn = open_db_in_memory().unwrap();
    let owner = add_user(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let morning = service
        .create_note(owner, "morning", "", Some(date(2024, 3, 10)))
        .unwrap();
    let evening = service
        .create_note(owner, "evening", "", Some(date(2024, 3, 10)))
        .unwrap();
    service
        .create_note(owner, "next day", "", Some(date(2024, 3, 11)))
        .unwrap();
    service.create_note(owner, "undated", "", None).unwrap();

    conn.execute(
        "UPDATE notes SET created_at = 1 WHERE uuid = ?1;",
        [morning.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE notes SET created_at = 2 WHERE uuid = ?1;",
        [evening.id.to_string()],
    )
    .unwrap();

    let titles: Vec<_> = service
        .notes_on_date(owner, date(2024, 3, 10))
        .unwrap()
        .into_iter()
        .map(|note| note.title)
        .collect();
    assert_eq!(titles, vec!["morning".to_string(), "evening".to_string()]);
}

#[test]
fn deleting_user_cascades_to_notes() {
    let conn = open_db_in_memory().unwrap();
    let owner = add_user(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    service.create_note(owner, "doomed", "", None).unwrap();

    conn.execute("DELETE FROM users WHERE uuid = ?1;", [owner.to_string()])
        .unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn rapid_writes_keep_strict_recency_order() {
    let conn = open_db_in_memory().unwrap();
    let owner = add_user(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let first = service.create_note(owner, "first", "", None).unwrap();
    let second = service.create_note(owner, "second", "", None).unwrap();
    let third = service.create_note(owner, "third", "", None).unwrap();
    assert!(first.updated_at < second.updated_at);
    assert!(second.updated_at < third.updated_at);

    let touched = service
        .update_note(
            owner,
            first.id,
            NoteUpdate {
                content: Some("edited".to_string()),
                ..NoteUpdate::default()
            },
        )
        .unwrap();
    assert!(touched.updated_at > third.updated_at);

    let ids: Vec<_> = service
        .list_notes(owner, None, 0)
        .unwrap()
        .items
        .into_iter()
        .map(|note| note.id)
        .collect();
    assert_eq!(ids, vec![first.id, third.id, second.id]);
}

#[test]
fn get_note_reports_corrupt_rows_as_service_errors() {
    let conn = open_db_in_memory().unwrap();
    let owner = add_user(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service.create_note(owner, "dated", "", None).unwrap();

    conn.execute(
        "UPDATE notes SET note_date = 'someday' WHERE uuid = ?1;",
        [note.id.to_string()],
    )
    .unwrap();

    let err = service.get_note(owner, note.id).unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Repo(RepoError::InvalidData(_))
    ));
}
