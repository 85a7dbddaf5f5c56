use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::correction::CorrectionTable;
use super::domain::{
    AttendanceLookup, DepartmentId, EmployeeId, MetricDefinition, QuarterCalendar, ScoreLookup,
};
use super::period::{resolve_window, KpiError, Period, Quarter};
use super::report::{build_report, NormalizedReport, ReportInputs, ReportRequest};
use super::repository::{KpiRepository, RepositoryError};

/// Employee selectable for a department report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub employee_id: EmployeeId,
    pub full_name: String,
}

/// Service fetching rows from a repository and running the normalization pipeline.
pub struct KpiReportService<R> {
    repository: Arc<R>,
    corrections: Arc<CorrectionTable>,
}

impl<R> KpiReportService<R>
where
    R: KpiRepository + 'static,
{
    pub fn new(repository: Arc<R>, corrections: CorrectionTable) -> Self {
        Self {
            repository,
            corrections: Arc::new(corrections),
        }
    }

    pub fn metric_plan(
        &self,
        quarter: Quarter,
    ) -> Result<Vec<MetricDefinition>, ReportServiceError> {
        Ok(self.repository.metric_plan(quarter)?)
    }

    /// Build the normalized report for one employee and quarter.
    pub fn report(&self, request: ReportRequest) -> Result<NormalizedReport, ReportServiceError> {
        let metrics = self.repository.metric_plan(request.period.quarter)?;
        let years = window_years(request.period, &metrics)?;

        let calendar = QuarterCalendar::from_months(&self.repository.calendar_months(&years)?)
            .map_err(inconsistent)?;
        let attendance = AttendanceLookup::from_records(&self.repository.attendance(
            Some(request.employee_id),
            request.department_id,
            &years,
        )?)
        .map_err(inconsistent)?;
        let scores = ScoreLookup::from_scores(
            &self
                .repository
                .scores(request.employee_id, request.period)?,
        );

        let inputs = ReportInputs {
            metrics,
            calendar,
            attendance,
            scores,
        };
        let report = build_report(&request, &inputs, &self.corrections)?;

        debug!(
            employee_id = %request.employee_id,
            department_id = %request.department_id,
            period = %request.period,
            rows = report.rows.len(),
            "normalized kpi report built"
        );

        Ok(report)
    }

    /// Employees with attendance in the department during the longest window planned for the quarter.
    pub fn roster(
        &self,
        department_id: DepartmentId,
        period: Period,
    ) -> Result<Vec<RosterEntry>, ReportServiceError> {
        let metrics = self.repository.metric_plan(period.quarter)?;
        let Some(max_duration) = metrics.iter().map(|metric| metric.duration).max() else {
            return Ok(Vec::new());
        };
        let window = resolve_window(period, max_duration)?;

        let mut present = BTreeSet::new();
        for record in self
            .repository
            .attendance(None, department_id, &window.years())?
        {
            if window.contains(&record.period().map_err(inconsistent)?) {
                present.insert(record.employee_id);
            }
        }

        let names: HashMap<EmployeeId, String> = self
            .repository
            .employees()?
            .into_iter()
            .map(|employee| (employee.id, employee.full_name()))
            .collect();

        let mut roster: Vec<RosterEntry> = present
            .into_iter()
            .map(|employee_id| RosterEntry {
                employee_id,
                full_name: names
                    .get(&employee_id)
                    .cloned()
                    .unwrap_or_else(|| format!("#{employee_id}")),
            })
            .collect();
        roster.sort_by(|a, b| {
            a.full_name
                .cmp(&b.full_name)
                .then(a.employee_id.cmp(&b.employee_id))
        });

        debug!(%department_id, %period, employees = roster.len(), "roster resolved");
        Ok(roster)
    }
}

fn window_years(period: Period, metrics: &[MetricDefinition]) -> Result<Vec<i32>, KpiError> {
    let mut years = BTreeSet::new();
    for metric in metrics {
        // zero durations are reported by build_report with the metric label
        if metric.duration == 0 {
            continue;
        }
        years.extend(resolve_window(period, metric.duration)?.years());
    }
    Ok(years.into_iter().collect())
}

fn inconsistent(err: KpiError) -> RepositoryError {
    RepositoryError::Inconsistent(err.to_string())
}

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Period(#[from] KpiError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
