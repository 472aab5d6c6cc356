//! Date range filtering for attendance displays: default and custom
//! windows, quick-select presets, and the visible-date computation.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Days covered by the window used when the caller supplies no range.
pub const DEFAULT_WINDOW_DAYS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The window is well-formed but no recorded date falls inside it.
    /// Callers must render "no data", not an error.
    #[error("no attendance data in the requested date range")]
    NoDataInRange,
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Inclusive calendar-day window: `d` is visible iff `start <= d <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FilterError> {
        if start > end {
            return Err(FilterError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// `[today - 30 days, today]`, applied when no explicit range is given.
    pub fn default_window(today: NaiveDate) -> Self {
        Self {
            start: today - Days::new(DEFAULT_WINDOW_DAYS),
            end: today,
        }
    }
}

/// Quick-select windows. Presets resolve against the most recent date
/// present in the data set rather than wall-clock today, so a historical
/// batch whose last event is months old still gets meaningful presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    LastSevenDays,
    LastThirtyDays,
    CurrentMonth,
    PreviousMonth,
}

impl RangePreset {
    /// Resolve against the newest date in `dates`. `None` when the set is
    /// empty: there is nothing for a preset to anchor on.
    pub fn resolve_for(self, dates: &BTreeSet<NaiveDate>) -> Option<DateRange> {
        dates.iter().next_back().map(|&anchor| self.resolve(anchor))
    }

    pub fn resolve(self, anchor: NaiveDate) -> DateRange {
        match self {
            RangePreset::LastSevenDays => DateRange {
                start: anchor - Days::new(7),
                end: anchor,
            },
            RangePreset::LastThirtyDays => DateRange {
                start: anchor - Days::new(30),
                end: anchor,
            },
            RangePreset::CurrentMonth => DateRange {
                start: first_of_month(anchor),
                end: anchor,
            },
            RangePreset::PreviousMonth => {
                let first_this_month = first_of_month(anchor);
                DateRange {
                    start: first_this_month - Months::new(1),
                    end: first_this_month - Days::new(1),
                }
            }
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 exists in every month")
}

/// Dates to display, newest first. `None` means the default window around
/// `today`. An empty result is reported as [`FilterError::NoDataInRange`]
/// so the caller can distinguish it from any transport failure.
pub fn visible_dates(
    dates: &BTreeSet<NaiveDate>,
    range: Option<DateRange>,
    today: NaiveDate,
) -> Result<Vec<NaiveDate>, FilterError> {
    let window = range.unwrap_or_else(|| DateRange::default_window(today));
    let mut visible: Vec<NaiveDate> = dates
        .iter()
        .copied()
        .filter(|d| window.contains(*d))
        .collect();
    if visible.is_empty() {
        return Err(FilterError::NoDataInRange);
    }
    visible.reverse(); // BTreeSet iterates ascending
    Ok(visible)
}
