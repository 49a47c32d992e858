//! Week windows for the date filter. Weeks start on Sunday.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::domain::model::DateRange;

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

pub fn this_week(today: NaiveDate) -> Window {
    let start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
    Window {
        start,
        end: start + Duration::days(6),
    }
}

pub fn next_week(today: NaiveDate) -> Window {
    let start = this_week(today).end + Duration::days(1);
    Window {
        start,
        end: start + Duration::days(6),
    }
}

/// Local calendar date right now.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Window a range constrains dates to. `None` means every date is in
/// range: `all`, `today` (narrowed by the backend only) and unknown codes.
pub fn window_for(range: &DateRange, today: NaiveDate) -> Option<Window> {
    match range {
        DateRange::ThisWeek => Some(this_week(today)),
        DateRange::NextWeek => Some(next_week(today)),
        DateRange::All | DateRange::Today | DateRange::Other(_) => None,
    }
}

/// Whether `date` falls inside `range` as seen from `today`.
pub fn is_in_range_on(date: NaiveDate, range: &DateRange, today: NaiveDate) -> bool {
    window_for(range, today).map_or(true, |window| window.contains(date))
}

/// Same as [`is_in_range_on`] against the wall clock.
pub fn is_in_range(date: NaiveDate, range: &DateRange) -> bool {
    is_in_range_on(date, range, today())
}
