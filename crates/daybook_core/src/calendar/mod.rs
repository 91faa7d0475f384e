//! Month arithmetic and calendar grid construction.
//!
//! # Responsibility
//! - Validate (year, month) input at the boundary (`YearMonth::new`).
//! - Build week-partitioned month grids for rendering (`grid`).
//!
//! # Invariants
//! - A `YearMonth` always denotes a representable month; the grid builder
//!   never has to fail.
//! - Weeks start on Monday.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod grid;

pub use grid::{build_calendar_page, CalendarDay, CalendarMonth, CalendarPage, CalendarWeek};

/// Smallest accepted year. Keeps ISO date text four digits wide.
pub const MIN_YEAR: i32 = 1;
/// Largest accepted year.
pub const MAX_YEAR: i32 = 9999;

/// Invalid calendar input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarError {
    InvalidMonth(u32),
    YearOutOfRange(i32),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth(month) => write!(f, "month must be within 1..=12, got {month}"),
            Self::YearOutOfRange(year) => {
                write!(f, "year must be within {MIN_YEAR}..={MAX_YEAR}, got {year}")
            }
        }
    }
}

impl Error for CalendarError {}

/// Validated calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl YearMonth {
    /// Validates `(year, month)` and resolves its first and last day.
    ///
    /// The last day is the day before the first of the following month, so
    /// month lengths and leap years come straight from calendar arithmetic.
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CalendarError::YearOutOfRange(year));
        }

        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(CalendarError::YearOutOfRange(year))?;
        let next = MonthLink::new(year, month).next();
        let last_day = NaiveDate::from_ymd_opt(next.year, next.month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .ok_or(CalendarError::YearOutOfRange(year))?;

        Ok(Self {
            first_day,
            last_day,
        })
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Result<Self, CalendarError> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day.day()
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day <= date && date <= self.last_day
    }

    pub fn previous(&self) -> MonthLink {
        MonthLink::new(self.year(), self.month()).previous()
    }

    pub fn next(&self) -> MonthLink {
        MonthLink::new(self.year(), self.month()).next()
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Unvalidated `(year, month)` navigation pointer.
///
/// Links are plain data handed to a rendering layer; following one goes
/// back through `YearMonth::try_from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthLink {
    pub year: i32,
    pub month: u32,
}

impl MonthLink {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Preceding month; January rolls back to December of the prior year.
    pub fn previous(self) -> Self {
        if self.month <= 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// Following month; December rolls over to January of the next year.
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl From<MonthLink> for (i32, u32) {
    fn from(link: MonthLink) -> Self {
        (link.year, link.month)
    }
}

impl From<YearMonth> for MonthLink {
    fn from(value: YearMonth) -> Self {
        Self::new(value.year(), value.month())
    }
}

impl TryFrom<MonthLink> for YearMonth {
    type Error = CalendarError;

    fn try_from(link: MonthLink) -> Result<Self, Self::Error> {
        Self::new(link.year, link.month)
    }
}
