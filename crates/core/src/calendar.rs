//! Calendar generation for a physician's schedule year.
//!
//! Produces every date of a calendar year in chronological order, each
//! classified as a workday or a non-workday. Classification is purely a
//! weekday rule: Saturday and Sunday are non-workdays, everything else is
//! a workday. There is no holiday calendar.

use crate::error::{SlotError, SlotResult};
use chrono::{Datelike, NaiveDate, Weekday};

/// Binary classification of a calendar date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayKind {
    Workday,
    NonWorkday,
}

/// A date together with its workday classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub kind: DayKind,
}

/// Classify a date by its weekday: Saturday and Sunday are non-workdays.
pub fn classify(date: NaiveDate) -> DayKind {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => DayKind::NonWorkday,
        _ => DayKind::Workday,
    }
}

/// Every date of `year` from January 1st through December 31st, in
/// chronological order, classified via [`classify`].
///
/// Yields 365 or 366 days depending on leap-year rules.
///
/// # Errors
///
/// Returns `SlotError::InvalidInput` if `year` lies outside the
/// representable date range.
pub fn year_days(year: i32) -> SlotResult<impl Iterator<Item = CalendarDay>> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| SlotError::InvalidInput(format!("year {year} is out of range")))?;

    Ok(first
        .iter_days()
        .take_while(move |date| date.year() == year)
        .map(|date| CalendarDay {
            date,
            kind: classify(date),
        }))
}
