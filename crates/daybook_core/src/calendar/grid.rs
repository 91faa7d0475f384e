//! Week-partitioned month grid.
//!
//! # Invariants
//! - Every week holds exactly `DAYS_PER_WEEK` cells (enforced by the array
//!   type).
//! - Padding cells carry no day number, no date and no flags.
//! - Real cells are contiguous, ascending, and cover `1..=days_in_month`.
//! - Column 0 is Monday, column 6 is Sunday.

use crate::calendar::{MonthLink, YearMonth};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::iter;

pub const DAYS_PER_WEEK: usize = 7;

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// `None` for padding cells.
    pub day_number: Option<u32>,
    pub date: Option<NaiveDate>,
    pub is_today: bool,
    pub has_notes: bool,
}

impl CalendarDay {
    /// Empty cell used to align the first and last week.
    pub fn padding() -> Self {
        Self {
            day_number: None,
            date: None,
            is_today: false,
            has_notes: false,
        }
    }

    fn real(date: NaiveDate, today: NaiveDate, note_days: &BTreeSet<u32>) -> Self {
        Self {
            day_number: Some(date.day()),
            date: Some(date),
            is_today: date == today,
            has_notes: note_days.contains(&date.day()),
        }
    }

    pub fn is_padding(&self) -> bool {
        self.day_number.is_none()
    }
}

/// Seven consecutive cells, Monday through Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarWeek {
    pub days: [CalendarDay; DAYS_PER_WEEK],
}

/// Grid for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub weeks: Vec<CalendarWeek>,
}

impl CalendarMonth {
    /// Non-padding cells in ascending order.
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> + '_ {
        self.weeks
            .iter()
            .flat_map(|week| week.days.iter())
            .filter(|day| !day.is_padding())
    }
}

/// Builder output: the grid plus pointers to the adjacent months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarPage {
    pub month: CalendarMonth,
    pub previous: MonthLink,
    pub next: MonthLink,
}

/// Builds the Monday-first grid for `year_month`.
///
/// `note_days` holds day numbers (1-based) that have at least one note;
/// numbers outside the month are ignored. The result depends only on the
/// arguments.
pub fn build_calendar_page(
    year_month: YearMonth,
    today: NaiveDate,
    note_days: &BTreeSet<u32>,
) -> CalendarPage {
    let first_day = year_month.first_day();
    let leading = first_day.weekday().num_days_from_monday() as usize;

    let mut cells = iter::repeat(CalendarDay::padding())
        .take(leading)
        .chain(
            first_day
                .iter_days()
                .take(year_month.days_in_month() as usize)
                .map(|date| CalendarDay::real(date, today, note_days)),
        )
        .peekable();

    let mut weeks = Vec::new();
    while cells.peek().is_some() {
        // A short final week is topped up with padding.
        let days = std::array::from_fn(|_| cells.next().unwrap_or_else(CalendarDay::padding));
        weeks.push(CalendarWeek { days });
    }

    CalendarPage {
        month: CalendarMonth {
            year: year_month.year(),
            month: year_month.month(),
            first_day,
            last_day: year_month.last_day(),
            weeks,
        },
        previous: year_month.previous(),
        next: year_month.next(),
    }
}
