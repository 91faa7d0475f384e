use chrono::NaiveDate;
use std::path::PathBuf;
use structopt::StructOpt;
use uuid::Uuid;

#[derive(Debug, StructOpt)]
#[structopt(name = "daybook", about = "Daybook - personal notes with a month calendar.")]
pub struct Args {
    #[structopt(
        long = "db",
        help = "path to the SQLite database (overrides DAYBOOK_DB)",
        parse(from_os_str)
    )]
    pub db: Option<PathBuf>,

    #[structopt(long = "log-level", help = "trace|debug|info|warn|error")]
    pub log_level: Option<String>,

    #[structopt(
        long = "log-dir",
        help = "absolute directory for log files (overrides DAYBOOK_LOG_DIR)",
        parse(from_os_str)
    )]
    pub log_dir: Option<PathBuf>,

    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(about = "manage users")]
    User(UserCmd),
    #[structopt(about = "manage notes")]
    Note(NoteCmd),
    #[structopt(about = "show a month grid with note days marked")]
    Calendar {
        #[structopt(short = "u", long = "user")]
        user: String,
        #[structopt(short = "y", long = "year", requires = "month")]
        year: Option<i32>,
        #[structopt(short = "m", long = "month", requires = "year")]
        month: Option<u32>,
    },
    #[structopt(about = "list notes on one date")]
    Day {
        #[structopt(short = "u", long = "user")]
        user: String,
        #[structopt(help = "date as YYYY-MM-DD", parse(try_from_str = parse_date))]
        date: NaiveDate,
    },
}

#[derive(Debug, StructOpt)]
pub enum UserCmd {
    #[structopt(about = "register a note owner")]
    Add { username: String, email: String },
}

#[derive(Debug, StructOpt)]
pub enum NoteCmd {
    #[structopt(about = "create a note")]
    Add {
        #[structopt(short = "u", long = "user")]
        user: String,
        #[structopt(short = "t", long = "title")]
        title: String,
        #[structopt(short = "c", long = "content", default_value = "")]
        content: String,
        #[structopt(short = "d", long = "date", parse(try_from_str = parse_date))]
        date: Option<NaiveDate>,
    },
    #[structopt(about = "list notes, most recently updated first")]
    List {
        #[structopt(short = "u", long = "user")]
        user: String,
        #[structopt(short = "l", long = "limit")]
        limit: Option<u32>,
        #[structopt(short = "o", long = "offset", default_value = "0")]
        offset: u32,
    },
    #[structopt(about = "print one note")]
    Show {
        #[structopt(short = "u", long = "user")]
        user: String,
        id: Uuid,
    },
    #[structopt(about = "change title, content or date of a note")]
    Edit {
        #[structopt(short = "u", long = "user")]
        user: String,
        id: Uuid,
        #[structopt(short = "t", long = "title")]
        title: Option<String>,
        #[structopt(short = "c", long = "content")]
        content: Option<String>,
        #[structopt(
            short = "d",
            long = "date",
            parse(try_from_str = parse_date),
            conflicts_with = "clear-date"
        )]
        date: Option<NaiveDate>,
        #[structopt(long = "clear-date")]
        clear_date: bool,
    },
    #[structopt(about = "delete a note")]
    Delete {
        #[structopt(short = "u", long = "user")]
        user: String,
        id: Uuid,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
}
