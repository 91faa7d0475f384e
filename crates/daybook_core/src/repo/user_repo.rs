//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - Usernames and emails are unique; duplicates surface as
//!   `RepoError::Conflict` rather than a raw constraint error.

use crate::model::user::{User, UserId};
use crate::repo::{ensure_schema, parse_uuid, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT uuid, username, email FROM users";

/// Owner identity lookups.
pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, "users", &["uuid", "username", "email", "created_at"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        user.validate()?;

        let taken: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM users WHERE username = ?1 OR email = ?2
            );",
            params![user.username, user.email],
            |row| row.get(0),
        )?;
        if taken == 1 {
            return Err(RepoError::Conflict(format!(
                "user with username `{}` or email `{}` already exists",
                user.username, user.email
            )));
        }

        self.conn.execute(
            "INSERT INTO users (uuid, username, email) VALUES (?1, ?2, ?3);",
            params![user.id.to_string(), user.username, user.email],
        )?;

        info!("event=user_create module=repo status=ok user_id={}", user.id);
        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                read_user_row,
            )
            .optional()?
            .map(decode_user)
            .transpose()
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE username = ?1;"),
                [username.trim()],
                read_user_row,
            )
            .optional()?
            .map(decode_user)
            .transpose()
    }
}

type RawUser = (String, String, String);

fn read_user_row(row: &Row<'_>) -> rusqlite::Result<RawUser> {
    Ok((row.get("uuid")?, row.get("username")?, row.get("email")?))
}

fn decode_user((uuid, username, email): RawUser) -> RepoResult<User> {
    Ok(User {
        id: parse_uuid(&uuid, "users.uuid")?,
        username,
        email,
    })
}
