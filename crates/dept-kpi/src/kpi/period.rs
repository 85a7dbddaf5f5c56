use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Errors raised before any computation starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KpiError {
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
}

/// Fiscal quarter, always in `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quarter(u8);

impl Quarter {
    pub const FIRST: Self = Self(1);
    pub const LAST: Self = Self(4);
    pub const ALL: [Self; 4] = [Self(1), Self(2), Self(3), Self(4)];

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn from_month(month: u32) -> Result<Self, KpiError> {
        match month {
            1..=12 => Ok(Self(((month - 1) / 3 + 1) as u8)),
            other => Err(KpiError::InvalidPeriod(format!(
                "month must be in 1..=12, got {other}"
            ))),
        }
    }
}

impl TryFrom<u8> for Quarter {
    type Error = KpiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=4 => Ok(Self(value)),
            other => Err(KpiError::InvalidPeriod(format!(
                "quarter must be in 1..=4, got {other}"
            ))),
        }
    }
}

impl From<Quarter> for u8 {
    fn from(value: Quarter) -> Self {
        value.0
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// A `(year, quarter)` pair. Field order gives chronological ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub quarter: Quarter,
}

impl Period {
    pub fn new(year: i32, quarter: u8) -> Result<Self, KpiError> {
        Ok(Self {
            year,
            quarter: Quarter::try_from(quarter)?,
        })
    }

    pub fn containing(date: NaiveDate) -> Self {
        // chrono months are always 1..=12
        let quarter = Quarter(((date.month0() / 3) + 1) as u8);
        Self {
            year: date.year(),
            quarter,
        }
    }

    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    /// The quarter before this one, or `None` when the year would underflow.
    pub fn previous(self) -> Option<Self> {
        if self.quarter == Quarter::FIRST {
            Some(Self {
                year: self.year.checked_sub(1)?,
                quarter: Quarter::LAST,
            })
        } else {
            Some(Self {
                year: self.year,
                quarter: Quarter(self.quarter.0 - 1),
            })
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.quarter)
    }
}

/// Prior quarters covered by a metric's evaluation, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuarterWindow {
    periods: Vec<Period>,
}

impl QuarterWindow {
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Period> {
        self.periods.iter()
    }

    pub fn contains(&self, period: &Period) -> bool {
        self.periods.contains(period)
    }

    /// Distinct calendar years touched by the window, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.periods
            .iter()
            .map(|period| period.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Walk back `duration` quarters from the one preceding `target`.
///
/// The target quarter itself is never part of the window.
pub fn resolve_window(target: Period, duration: u32) -> Result<QuarterWindow, KpiError> {
    if duration == 0 {
        return Err(KpiError::InvalidPeriod(
            "metric duration must be at least one quarter".to_string(),
        ));
    }

    let mut periods = Vec::with_capacity(duration as usize);
    let mut cursor = target;
    for _ in 0..duration {
        cursor = cursor.previous().ok_or_else(|| {
            KpiError::InvalidPeriod(format!(
                "a {duration}-quarter window before {target} precedes the earliest supported year"
            ))
        })?;
        periods.push(cursor);
    }

    Ok(QuarterWindow { periods })
}
