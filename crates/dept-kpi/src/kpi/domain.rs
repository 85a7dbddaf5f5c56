use super::period::{KpiError, Period, Quarter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricId(pub u32);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A KPI as configured for a quarter, including its look-back duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub id: MetricId,
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnumber: Option<String>,
    pub description: String,
    pub duration: u32,
}

impl MetricDefinition {
    /// Display number such as `3` or `3.1`.
    pub fn label(&self) -> String {
        match self.subnumber.as_deref().map(str::trim) {
            Some(sub) if !sub.is_empty() => format!("{}{}", self.number, sub),
            _ => self.number.to_string(),
        }
    }
}

/// Working-day count for a single calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub working_days: u32,
}

impl CalendarMonth {
    pub fn period(&self) -> Result<Period, KpiError> {
        Ok(Period {
            year: self.year,
            quarter: Quarter::from_month(self.month)?,
        })
    }
}

/// Monthly attendance row for one employee under one job title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub employee_id: EmployeeId,
    pub department_id: DepartmentId,
    pub job_title: String,
    pub year: i32,
    pub month: u32,
    pub days_worked: u32,
}

impl AttendanceRecord {
    pub fn period(&self) -> Result<Period, KpiError> {
        Ok(Period {
            year: self.year,
            quarter: Quarter::from_month(self.month)?,
        })
    }

    pub fn entry(&self) -> AttendanceEntry {
        AttendanceEntry {
            days_worked: self.days_worked,
            job_title: self.job_title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub days_worked: u32,
    pub job_title: String,
}

/// Evaluator-assigned raw score for one metric in one quarter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricScore {
    pub employee_id: EmployeeId,
    pub year: i32,
    pub quarter: Quarter,
    pub metric_id: MetricId,
    pub value: f64,
}

impl MetricScore {
    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            quarter: self.quarter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub patronymic: String,
}

impl Employee {
    pub fn full_name(&self) -> String {
        [&self.last_name, &self.first_name, &self.patronymic]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Calendar working days per quarter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuarterCalendar {
    days: HashMap<Period, u32>,
}

impl QuarterCalendar {
    pub fn from_months<'a, I>(months: I) -> Result<Self, KpiError>
    where
        I: IntoIterator<Item = &'a CalendarMonth>,
    {
        let mut calendar = Self::default();
        for month in months {
            calendar.add(month.period()?, month.working_days);
        }
        Ok(calendar)
    }

    pub fn add(&mut self, period: Period, working_days: u32) {
        let days = self.days.entry(period).or_default();
        *days = days.saturating_add(working_days);
    }

    pub fn working_days(&self, period: &Period) -> Option<u32> {
        self.days.get(period).copied()
    }
}

/// Attendance entries of a single employee in a single department, per quarter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceLookup {
    entries: HashMap<Period, Vec<AttendanceEntry>>,
}

impl AttendanceLookup {
    pub fn from_records<'a, I>(records: I) -> Result<Self, KpiError>
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        let mut lookup = Self::default();
        for record in records {
            lookup.push(record.period()?, record.entry());
        }
        Ok(lookup)
    }

    pub fn push(&mut self, period: Period, entry: AttendanceEntry) {
        self.entries.entry(period).or_default().push(entry);
    }

    pub fn entries(&self, period: &Period) -> &[AttendanceEntry] {
        self.entries.get(period).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Raw scores of a single employee for a single quarter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreLookup {
    values: HashMap<MetricId, f64>,
}

impl ScoreLookup {
    pub fn from_scores<'a, I>(scores: I) -> Self
    where
        I: IntoIterator<Item = &'a MetricScore>,
    {
        let values = scores
            .into_iter()
            .map(|score| (score.metric_id, score.value))
            .collect();
        Self { values }
    }

    pub fn insert(&mut self, metric_id: MetricId, value: f64) {
        self.values.insert(metric_id, value);
    }

    /// Missing scores count as zero.
    pub fn value(&self, metric_id: MetricId) -> f64 {
        self.values.get(&metric_id).copied().unwrap_or(0.0)
    }
}
