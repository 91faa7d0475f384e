//! `daybook` command-line entry point.
//!
//! Every invocation opens its own connection, runs one command and drops
//! the connection on exit.

mod args;
mod render;

use args::{Args, Command, NoteCmd, UserCmd};
use daybook_core::db::open_db;
use daybook_core::logging::normalize_level;
use daybook_core::{
    init_logging, CalendarService, DaybookConfig, NoteService, NoteUpdate, SqliteNoteRepository,
    SqliteUserRepository, SystemClock, User, UserId, UserRepository,
};
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::process::ExitCode;
use structopt::StructOpt;

type CliResult<T> = Result<T, Box<dyn Error>>;

fn main() -> ExitCode {
    let args = Args::from_args();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> CliResult<()> {
    let config = resolve_config(&args)?;
    if let Some(log_dir) = config.log_dir.as_ref() {
        let log_dir = log_dir
            .to_str()
            .ok_or("log directory must be valid UTF-8")?;
        init_logging(config.log_level, log_dir)?;
    }
    info!(
        "event=cli_start module=cli status=ok version={} db={}",
        daybook_core::core_version(),
        config.db_path.display()
    );

    let conn = open_db(&config.db_path)?;
    match args.cmd {
        Command::User(cmd) => run_user(&conn, cmd),
        Command::Note(cmd) => run_note(&conn, cmd),
        Command::Calendar { user, year, month } => {
            let owner = resolve_owner(&conn, &user)?;
            let lookup = SqliteNoteRepository::try_new(&conn)?;
            let calendar = CalendarService::new(lookup, SystemClock);
            let page = match (year, month) {
                (Some(year), Some(month)) => calendar.month_page(owner, year, month)?,
                _ => calendar.current_month_page(owner)?,
            };
            println!("{}", render::MonthView(&page));
            Ok(())
        }
        Command::Day { user, date } => {
            let owner = resolve_owner(&conn, &user)?;
            let notes = NoteService::new(SqliteNoteRepository::try_new(&conn)?);
            let items = notes.notes_on_date(owner, date)?;
            if items.is_empty() {
                println!("no notes on {date}");
            }
            for note in &items {
                println!("{}", render::NoteLine(note));
            }
            Ok(())
        }
    }
}

fn resolve_config(args: &Args) -> CliResult<DaybookConfig> {
    let mut config = DaybookConfig::from_env()?;
    if let Some(db) = args.db.clone() {
        config.db_path = db;
    }
    if let Some(level) = args.log_level.as_deref() {
        config.log_level = normalize_level(level)?;
    }
    if let Some(dir) = args.log_dir.clone() {
        config.log_dir = Some(dir);
    }
    Ok(config)
}

fn resolve_owner(conn: &Connection, username: &str) -> CliResult<UserId> {
    let users = SqliteUserRepository::try_new(conn)?;
    let user = users
        .find_by_username(username)?
        .ok_or_else(|| format!("unknown user `{username}`"))?;
    Ok(user.id)
}

fn run_user(conn: &Connection, cmd: UserCmd) -> CliResult<()> {
    match cmd {
        UserCmd::Add { username, email } => {
            let users = SqliteUserRepository::try_new(conn)?;
            let id = users.create_user(&User::new(username, email))?;
            println!("{id}");
            Ok(())
        }
    }
}

fn run_note(conn: &Connection, cmd: NoteCmd) -> CliResult<()> {
    let notes = NoteService::new(SqliteNoteRepository::try_new(conn)?);
    match cmd {
        NoteCmd::Add {
            user,
            title,
            content,
            date,
        } => {
            let owner = resolve_owner(conn, &user)?;
            let note = notes.create_note(owner, title, content, date)?;
            println!("{}", note.id);
        }
        NoteCmd::List {
            user,
            limit,
            offset,
        } => {
            let owner = resolve_owner(conn, &user)?;
            let page = notes.list_notes(owner, limit, offset)?;
            for note in &page.items {
                println!("{}", render::NoteLine(note));
            }
        }
        NoteCmd::Show { user, id } => {
            let owner = resolve_owner(conn, &user)?;
            let note = notes
                .get_note(owner, id)?
                .ok_or_else(|| format!("note not found: {id}"))?;
            println!("{}", render::NoteDetail(&note));
        }
        NoteCmd::Edit {
            user,
            id,
            title,
            content,
            date,
            clear_date,
        } => {
            let owner = resolve_owner(conn, &user)?;
            let note_date = if clear_date { Some(None) } else { date.map(Some) };
            let note = notes.update_note(
                owner,
                id,
                NoteUpdate {
                    title,
                    content,
                    note_date,
                },
            )?;
            println!("{}", render::NoteLine(&note));
        }
        NoteCmd::Delete { user, id } => {
            let owner = resolve_owner(conn, &user)?;
            notes.delete_note(owner, id)?;
        }
    }
    Ok(())
}
