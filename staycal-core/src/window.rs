//! The loaded window of whole months.
//!
//! The calendar pages through months in both directions. A window always
//! covers whole months and grows one month at a time, and each growth
//! step tells the caller which date range still needs fetching.

use chrono::{Datelike, Local, Months, NaiveDate};

use crate::constants::DEFAULT_WINDOW_MONTHS;
use crate::error::{StayCalError, StayCalResult};

/// Inclusive range of whole months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    first: NaiveDate,
    last: NaiveDate,
}

impl DateWindow {
    /// Window covering a single month.
    pub fn month(year: i32, month: u32) -> StayCalResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| StayCalError::InvalidDate(format!("{:04}-{:02}", year, month)))?;
        Ok(DateWindow {
            first,
            last: end_of_month(first)?,
        })
    }

    /// Window starting `months_before` months before the month of `date`
    /// and ending `months_after` months after it.
    pub fn around(date: NaiveDate, months_before: u32, months_after: u32) -> StayCalResult<Self> {
        let mut window = Self::month(date.year(), date.month())?;
        for _ in 0..months_before {
            window.grow_previous()?;
        }
        for _ in 0..months_after {
            window.grow_next()?;
        }
        Ok(window)
    }

    /// Parse CLI-style arguments.
    /// - `from`: YYYY-MM or YYYY-MM-DD (only the month is used), defaults to the current month
    /// - `months`: number of months, defaults to DEFAULT_WINDOW_MONTHS
    pub fn from_args(from: Option<&str>, months: Option<u32>) -> StayCalResult<Self> {
        let start = match from {
            Some(s) => parse_month(s)?,
            None => Local::now().date_naive(),
        };
        let months = months.unwrap_or(DEFAULT_WINDOW_MONTHS).max(1);
        Self::around(start, 0, months - 1)
    }

    pub fn first(&self) -> NaiveDate {
        self.first
    }

    pub fn last(&self) -> NaiveDate {
        self.last
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// Extend by one month into the past. Returns the range to fetch.
    pub fn grow_previous(&mut self) -> StayCalResult<(NaiveDate, NaiveDate)> {
        let end = self.first.pred_opt().ok_or_else(|| out_of_range(self.first))?;
        let start = self
            .first
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| out_of_range(self.first))?;
        self.first = start;
        Ok((start, end))
    }

    /// Extend by one month into the future. Returns the range to fetch.
    pub fn grow_next(&mut self) -> StayCalResult<(NaiveDate, NaiveDate)> {
        let start = self.last.succ_opt().ok_or_else(|| out_of_range(self.last))?;
        let end = end_of_month(start)?;
        self.last = end;
        Ok((start, end))
    }

    /// `(year, month)` pairs covered, oldest first.
    pub fn months(&self) -> Vec<(i32, u32)> {
        let mut months = Vec::new();
        let mut cursor = Some(self.first);
        while let Some(date) = cursor.filter(|d| *d <= self.last) {
            months.push((date.year(), date.month()));
            cursor = date.checked_add_months(Months::new(1));
        }
        months
    }
}

/// Parse YYYY-MM or YYYY-MM-DD into the first day of that month.
fn parse_month(s: &str) -> StayCalResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d"))
        .map_err(|_| StayCalError::InvalidDate(s.to_string()))?;
    Ok(date.with_day(1).unwrap_or(date))
}

fn end_of_month(date: NaiveDate) -> StayCalResult<NaiveDate> {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

fn out_of_range(date: NaiveDate) -> StayCalError {
    StayCalError::InvalidDate(format!("{} is out of the supported range", date))
}
