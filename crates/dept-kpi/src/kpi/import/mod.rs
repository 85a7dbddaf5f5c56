mod rows;

use super::dataset::{KpiDataset, MetricDescription, PlannedMetric};
use super::domain::{AttendanceRecord, CalendarMonth, Employee, MetricScore};
use super::period::KpiError;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const METRICS_FILE: &str = "metrics.csv";
pub const QUARTER_METRICS_FILE: &str = "quarter_metrics.csv";
pub const CALENDAR_FILE: &str = "calendar.csv";
pub const ATTENDANCE_FILE: &str = "attendance.csv";
pub const SCORES_FILE: &str = "scores.csv";
pub const EMPLOYEES_FILE: &str = "employees.csv";

#[derive(Debug)]
pub enum ImportError {
    Io {
        file: &'static str,
        source: std::io::Error,
    },
    Csv {
        file: &'static str,
        source: csv::Error,
    },
    InvalidRow {
        file: &'static str,
        line: u64,
        source: KpiError,
    },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io { file, source } => write!(f, "failed to read {}: {}", file, source),
            ImportError::Csv { file, source } => write!(f, "invalid CSV in {}: {}", file, source),
            ImportError::InvalidRow { file, line, source } => {
                write!(f, "{} line {}: {}", file, line, source)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io { source, .. } => Some(source),
            ImportError::Csv { source, .. } => Some(source),
            ImportError::InvalidRow { source, .. } => Some(source),
        }
    }
}

/// Readers for each exported table. The employee directory is optional.
pub struct DatasetReaders<R> {
    pub metrics: R,
    pub quarter_metrics: R,
    pub calendar: R,
    pub attendance: R,
    pub scores: R,
    pub employees: Option<R>,
}

pub struct KpiDatasetImporter;

impl KpiDatasetImporter {
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<KpiDataset, ImportError> {
        let dir = dir.as_ref();
        let open = |file: &'static str| {
            File::open(dir.join(file)).map_err(|source| ImportError::Io { file, source })
        };

        let employees_path = dir.join(EMPLOYEES_FILE);
        let employees = if employees_path.exists() {
            Some(open(EMPLOYEES_FILE)?)
        } else {
            None
        };

        Self::from_readers(DatasetReaders {
            metrics: open(METRICS_FILE)?,
            quarter_metrics: open(QUARTER_METRICS_FILE)?,
            calendar: open(CALENDAR_FILE)?,
            attendance: open(ATTENDANCE_FILE)?,
            scores: open(SCORES_FILE)?,
            employees,
        })
    }

    pub fn from_readers<R: Read>(readers: DatasetReaders<R>) -> Result<KpiDataset, ImportError> {
        let metrics: Vec<MetricDescription> =
            load::<_, rows::MetricRow, _, _>(readers.metrics, METRICS_FILE, |row| Ok(row.into()))?;
        let plan: Vec<PlannedMetric> = load::<_, rows::PlanRow, _, _>(
            readers.quarter_metrics,
            QUARTER_METRICS_FILE,
            TryFrom::try_from,
        )?;
        let calendar: Vec<CalendarMonth> =
            load::<_, rows::CalendarRow, _, _>(readers.calendar, CALENDAR_FILE, TryFrom::try_from)?;
        let attendance: Vec<AttendanceRecord> = load::<_, rows::AttendanceRow, _, _>(
            readers.attendance,
            ATTENDANCE_FILE,
            TryFrom::try_from,
        )?;
        let scores: Vec<MetricScore> =
            load::<_, rows::ScoreRow, _, _>(readers.scores, SCORES_FILE, TryFrom::try_from)?;
        let employees: Vec<Employee> = match readers.employees {
            Some(reader) => {
                load::<_, rows::EmployeeRow, _, _>(reader, EMPLOYEES_FILE, |row| Ok(row.into()))?
            }
            None => Vec::new(),
        };

        Ok(KpiDataset {
            metrics,
            plan,
            calendar,
            attendance,
            scores,
            employees,
        })
    }
}

fn load<R, Row, T, F>(reader: R, file: &'static str, convert: F) -> Result<Vec<T>, ImportError>
where
    R: Read,
    Row: DeserializeOwned,
    F: Fn(Row) -> Result<T, KpiError>,
{
    rows::read_rows::<_, Row>(reader)
        .map_err(|source| ImportError::Csv { file, source })?
        .into_iter()
        .map(|(line, row)| {
            convert(row).map_err(|source| ImportError::InvalidRow { file, line, source })
        })
        .collect()
}
