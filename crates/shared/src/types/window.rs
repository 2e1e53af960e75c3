//! Report date windows with optional bounds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building a [`DateWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// End date precedes start date.
    #[error("Invalid date range: start {start} is after end {end}")]
    Inverted {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

/// Inclusive date window. A missing bound leaves that side open.
///
/// Opening balances cover everything strictly before `start`; the window
/// itself covers `start <= date <= end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct DateWindow {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

/// Unchecked wire form of a [`DateWindow`].
#[derive(Deserialize)]
struct RawWindow {
    #[serde(default)]
    start: Option<NaiveDate>,
    #[serde(default)]
    end: Option<NaiveDate>,
}

impl TryFrom<RawWindow> for DateWindow {
    type Error = WindowError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateWindow {
    /// Creates a window, rejecting `end < start`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, WindowError> {
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Re-checks the bound ordering.
    pub fn validate(&self) -> Result<(), WindowError> {
        Self::new(self.start, self.end).map(|_| ())
    }

    /// Window with neither bound.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Inclusive start date, if bounded.
    #[must_use]
    pub const fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Inclusive end date, if bounded.
    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// True when `date` belongs to the opening-balance segment.
    #[must_use]
    pub fn is_before_start(&self, date: NaiveDate) -> bool {
        self.start.is_some_and(|start| date < start)
    }

    /// True when `date` is past the end bound and must be ignored.
    #[must_use]
    pub fn is_after_end(&self, date: NaiveDate) -> bool {
        self.end.is_some_and(|end| date > end)
    }

    /// True when `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        !self.is_before_start(date) && !self.is_after_end(date)
    }
}
