use crate::kpi::dataset::{MetricDescription, PlannedMetric};
use crate::kpi::domain::{
    AttendanceRecord, CalendarMonth, DepartmentId, Employee, EmployeeId, MetricId, MetricScore,
};
use crate::kpi::period::{KpiError, Quarter};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Deserialized rows tagged with the CSV line they came from.
pub(crate) fn read_rows<R, T>(reader: R) -> Result<Vec<(u64, T)>, csv::Error>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        rows.push((line, record.deserialize(Some(&headers))?));
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetricRow {
    metric_id: u32,
    number: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    subnumber: Option<String>,
    description: String,
}

impl From<MetricRow> for MetricDescription {
    fn from(row: MetricRow) -> Self {
        Self {
            id: MetricId(row.metric_id),
            number: row.number,
            subnumber: row.subnumber,
            description: row.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlanRow {
    quarter: u8,
    metric_id: u32,
    duration: u32,
}

impl TryFrom<PlanRow> for PlannedMetric {
    type Error = KpiError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        if row.duration == 0 {
            return Err(KpiError::InvalidPeriod(format!(
                "metric {} has zero duration",
                row.metric_id
            )));
        }
        Ok(Self {
            quarter: Quarter::try_from(row.quarter)?,
            metric_id: MetricId(row.metric_id),
            duration: row.duration,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CalendarRow {
    year: i32,
    month: u32,
    working_days: u32,
}

impl TryFrom<CalendarRow> for CalendarMonth {
    type Error = KpiError;

    fn try_from(row: CalendarRow) -> Result<Self, Self::Error> {
        Quarter::from_month(row.month)?;
        Ok(Self {
            year: row.year,
            month: row.month,
            working_days: row.working_days,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttendanceRow {
    employee_id: u32,
    department_id: u32,
    job_title: String,
    year: i32,
    month: u32,
    days_worked: u32,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = KpiError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Quarter::from_month(row.month)?;
        Ok(Self {
            employee_id: EmployeeId(row.employee_id),
            department_id: DepartmentId(row.department_id),
            job_title: row.job_title,
            year: row.year,
            month: row.month,
            days_worked: row.days_worked,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRow {
    employee_id: u32,
    year: i32,
    quarter: u8,
    metric_id: u32,
    value: f64,
}

impl TryFrom<ScoreRow> for MetricScore {
    type Error = KpiError;

    fn try_from(row: ScoreRow) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: EmployeeId(row.employee_id),
            year: row.year,
            quarter: Quarter::try_from(row.quarter)?,
            metric_id: MetricId(row.metric_id),
            value: row.value,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmployeeRow {
    employee_id: u32,
    first_name: String,
    last_name: String,
    #[serde(default)]
    patronymic: String,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: EmployeeId(row.employee_id),
            first_name: row.first_name,
            last_name: row.last_name,
            patronymic: row.patronymic,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
