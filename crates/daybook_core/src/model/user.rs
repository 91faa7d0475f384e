//! User domain model.
//!
//! A user is only an owner identity here: credentials and sessions live
//! outside this crate.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const USERNAME_MAX_CHARS: usize = 64;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Stable identifier of a note owner.
pub type UserId = Uuid;

/// Owner identity persisted in `users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Rejection reasons for user write input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooLong { max_chars: usize },
    UsernameContainsWhitespace,
    InvalidEmail(String),
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username cannot be empty"),
            Self::UsernameTooLong { max_chars } => {
                write!(f, "username must be at most {max_chars} characters")
            }
            Self::UsernameContainsWhitespace => write!(f, "username cannot contain whitespace"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
        }
    }
}

impl Error for UserValidationError {}

impl User {
    /// Creates a user with a freshly generated id.
    ///
    /// Surrounding whitespace is trimmed; the email is lowercased.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into().trim().to_string(),
            email: email.into().trim().to_lowercase(),
        }
    }

    /// Checks username and email shape.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.username.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if self.username.chars().count() > USERNAME_MAX_CHARS {
            return Err(UserValidationError::UsernameTooLong {
                max_chars: USERNAME_MAX_CHARS,
            });
        }
        if self.username.chars().any(char::is_whitespace) {
            return Err(UserValidationError::UsernameContainsWhitespace);
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(UserValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}
