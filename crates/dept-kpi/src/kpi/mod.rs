//! Quarter-spanning KPI normalization.
//!
//! A report walks each configured metric back over its look-back window, sums
//! calendar and attendance days for those quarters, turns them into an
//! attendance coefficient, and scales the evaluator's raw score by it.

pub mod aggregate;
pub mod coefficient;
pub mod correction;
pub mod dataset;
pub mod domain;
pub mod import;
pub mod period;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate, aggregate_periods, WindowTotals};
pub use coefficient::{coefficient, normalize, round_half_even};
pub use correction::CorrectionTable;
pub use dataset::{KpiDataset, MetricDescription, PlannedMetric};
pub use domain::{
    AttendanceEntry, AttendanceLookup, AttendanceRecord, CalendarMonth, DepartmentId, Employee,
    EmployeeId, MetricDefinition, MetricId, MetricScore, QuarterCalendar, ScoreLookup,
};
pub use import::{DatasetReaders, ImportError, KpiDatasetImporter};
pub use period::{resolve_window, KpiError, Period, Quarter, QuarterWindow};
pub use report::{build_report, NormalizedMetricRow, NormalizedReport, ReportInputs, ReportRequest};
pub use repository::{KpiRepository, RepositoryError};
pub use router::kpi_router;
pub use service::{KpiReportService, ReportServiceError, RosterEntry};
