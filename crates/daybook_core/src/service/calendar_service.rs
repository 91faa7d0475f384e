//! Calendar use-case service.
//!
//! Joins the note lookup, the clock and the grid builder: one call per
//! rendered month.

use crate::calendar::{build_calendar_page, CalendarError, CalendarPage, YearMonth};
use crate::clock::Clock;
use crate::model::user::UserId;
use crate::repo::note_repo::NoteLookup;
use crate::repo::RepoError;
use chrono::{Datelike, NaiveDate};
use log::{error, info};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

#[derive(Debug)]
pub enum CalendarServiceError {
    InvalidMonth(CalendarError),
    Repo(RepoError),
}

impl Display for CalendarServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CalendarServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidMonth(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<CalendarError> for CalendarServiceError {
    fn from(value: CalendarError) -> Self {
        Self::InvalidMonth(value)
    }
}

impl From<RepoError> for CalendarServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct CalendarService<L: NoteLookup, C: Clock> {
    lookup: L,
    clock: C,
}

impl<L: NoteLookup, C: Clock> CalendarService<L, C> {
    pub fn new(lookup: L, clock: C) -> Self {
        Self { lookup, clock }
    }

    /// Grid for `(year, month)` with the owner's note days flagged.
    ///
    /// # Errors
    /// - `InvalidMonth` when `(year, month)` is not a representable month;
    ///   no lookup is performed in that case.
    /// - `Repo` when the note lookup fails.
    pub fn month_page(
        &self,
        owner_id: UserId,
        year: i32,
        month: u32,
    ) -> Result<CalendarPage, CalendarServiceError> {
        let year_month = YearMonth::new(year, month)?;
        self.page_for(owner_id, year_month, self.clock.today())
    }

    /// Grid for the month containing today.
    pub fn current_month_page(
        &self,
        owner_id: UserId,
    ) -> Result<CalendarPage, CalendarServiceError> {
        let today = self.clock.today();
        let year_month = YearMonth::of(today)?;
        self.page_for(owner_id, year_month, today)
    }

    /// `today` is read once by the caller so month choice and flags agree.
    fn page_for(
        &self,
        owner_id: UserId,
        year_month: YearMonth,
        today: NaiveDate,
    ) -> Result<CalendarPage, CalendarServiceError> {
        let started_at = Instant::now();
        let dates = self
            .lookup
            .note_dates_in_range(owner_id, year_month.first_day(), year_month.last_day())
            .map_err(|err| {
                error!(
                    "event=calendar_month module=service status=error month={year_month} error={err}"
                );
                err
            })?;

        let note_days: BTreeSet<u32> = dates
            .into_iter()
            .filter(|date| year_month.contains(*date))
            .map(|date| date.day())
            .collect();

        let page = build_calendar_page(year_month, today, &note_days);
        info!(
            "event=calendar_month module=service status=ok month={year_month} weeks={} note_days={} duration_ms={}",
            page.month.weeks.len(),
            note_days.len(),
            started_at.elapsed().as_millis()
        );
        Ok(page)
    }
}
