use super::aggregate::aggregate;
use super::coefficient::{coefficient, normalize, round_half_even, PRECISION};
use super::correction::CorrectionTable;
use super::domain::{
    AttendanceLookup, DepartmentId, EmployeeId, MetricDefinition, MetricId, QuarterCalendar,
    ScoreLookup,
};
use super::period::{resolve_window, KpiError, Period, QuarterWindow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub employee_id: EmployeeId,
    pub department_id: DepartmentId,
    pub period: Period,
}

/// Rows already fetched for one report request.
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    pub metrics: Vec<MetricDefinition>,
    pub calendar: QuarterCalendar,
    pub attendance: AttendanceLookup,
    pub scores: ScoreLookup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedMetricRow {
    pub metric_id: MetricId,
    pub label: String,
    pub description: String,
    pub duration: u32,
    pub window: QuarterWindow,
    pub calendar_days: u32,
    pub employee_days: u32,
    pub weighted_employee_days: f64,
    pub coefficient: f64,
    pub raw_score: f64,
    pub normalized_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedReport {
    pub employee_id: EmployeeId,
    pub department_id: DepartmentId,
    pub period: Period,
    pub rows: Vec<NormalizedMetricRow>,
}

impl NormalizedReport {
    pub fn total_normalized_score(&self) -> f64 {
        let total = self.rows.iter().map(|row| row.normalized_score).sum::<f64>();
        round_half_even(total, PRECISION)
    }

    pub fn row(&self, metric_id: MetricId) -> Option<&NormalizedMetricRow> {
        self.rows.iter().find(|row| row.metric_id == metric_id)
    }
}

/// Resolve, aggregate, and normalize every metric configured for the request.
///
/// All windows are resolved before any row is computed, so one invalid duration
/// rejects the whole request.
pub fn build_report(
    request: &ReportRequest,
    inputs: &ReportInputs,
    corrections: &CorrectionTable,
) -> Result<NormalizedReport, KpiError> {
    let windows = inputs
        .metrics
        .iter()
        .map(|metric| {
            if metric.duration == 0 {
                return Err(KpiError::InvalidPeriod(format!(
                    "metric {} has duration 0, expected at least 1",
                    metric.label()
                )));
            }
            resolve_window(request.period, metric.duration)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rows = inputs
        .metrics
        .iter()
        .zip(windows)
        .map(|(metric, window)| {
            let totals = aggregate(&window, &inputs.calendar, &inputs.attendance, corrections);
            let coefficient = coefficient(totals.calendar_days, totals.weighted_employee_days);
            let raw_score = inputs.scores.value(metric.id);

            NormalizedMetricRow {
                metric_id: metric.id,
                label: metric.label(),
                description: metric.description.clone(),
                duration: metric.duration,
                window,
                calendar_days: totals.calendar_days,
                employee_days: totals.employee_days,
                weighted_employee_days: totals.weighted_employee_days,
                coefficient,
                raw_score,
                normalized_score: normalize(raw_score, coefficient),
            }
        })
        .collect();

    Ok(NormalizedReport {
        employee_id: request.employee_id,
        department_id: request.department_id,
        period: request.period,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpi::domain::AttendanceEntry;

    fn period(year: i32, quarter: u8) -> Period {
        Period::new(year, quarter).expect("valid period")
    }

    fn metric(id: u32, duration: u32) -> MetricDefinition {
        MetricDefinition {
            id: MetricId(id),
            number: id,
            subnumber: None,
            description: format!("metric {id}"),
            duration,
        }
    }

    fn request() -> ReportRequest {
        ReportRequest {
            employee_id: EmployeeId(11),
            department_id: DepartmentId(3),
            period: period(2024, 1),
        }
    }

    fn inputs() -> ReportInputs {
        let mut calendar = QuarterCalendar::default();
        calendar.add(period(2023, 4), 20);
        calendar.add(period(2023, 3), 22);
        let mut attendance = AttendanceLookup::default();
        attendance.push(
            period(2023, 4),
            AttendanceEntry {
                days_worked: 10,
                job_title: "ИО".to_string(),
            },
        );
        let mut scores = ScoreLookup::default();
        scores.insert(MetricId(1), 80.0);

        ReportInputs {
            metrics: vec![metric(1, 2), metric(2, 1)],
            calendar,
            attendance,
            scores,
        }
    }

    #[test]
    fn computes_normalized_rows_in_metric_order() {
        let report =
            build_report(&request(), &inputs(), &CorrectionTable::default()).expect("report");

        assert_eq!(report.rows.len(), 2);
        let first = &report.rows[0];
        assert_eq!(first.metric_id, MetricId(1));
        assert_eq!(first.window.periods(), &[period(2023, 4), period(2023, 3)]);
        assert_eq!(first.calendar_days, 42);
        assert_eq!(first.weighted_employee_days, 5.0);
        assert_eq!(first.coefficient, 0.12);
        assert_eq!(first.normalized_score, 9.6);

        let second = &report.rows[1];
        assert_eq!(second.calendar_days, 20);
        assert_eq!(second.coefficient, 0.25);
        assert_eq!(second.raw_score, 0.0);
        assert_eq!(second.normalized_score, 0.0);
    }

    #[test]
    fn missing_calendar_zeroes_scores_but_keeps_rows() {
        let mut inputs = inputs();
        inputs.calendar = QuarterCalendar::default();
        let report =
            build_report(&request(), &inputs, &CorrectionTable::default()).expect("report");

        assert_eq!(report.rows.len(), 2);
        assert!(report
            .rows
            .iter()
            .all(|row| row.coefficient == 0.0 && row.normalized_score == 0.0));
    }

    #[test]
    fn zero_duration_rejects_whole_request() {
        let mut inputs = inputs();
        inputs.metrics.push(metric(3, 0));
        let err = build_report(&request(), &inputs, &CorrectionTable::default())
            .expect_err("invalid duration");
        assert!(matches!(err, KpiError::InvalidPeriod(_)));
    }

    #[test]
    fn rows_do_not_depend_on_metric_order() {
        let forward =
            build_report(&request(), &inputs(), &CorrectionTable::default()).expect("report");
        let mut reversed_inputs = inputs();
        reversed_inputs.metrics.reverse();
        let reversed = build_report(&request(), &reversed_inputs, &CorrectionTable::default())
            .expect("report");

        for row in &forward.rows {
            assert_eq!(reversed.row(row.metric_id), Some(row));
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let first =
            build_report(&request(), &inputs(), &CorrectionTable::default()).expect("report");
        let second =
            build_report(&request(), &inputs(), &CorrectionTable::default()).expect("report");
        assert_eq!(first, second);
        assert_eq!(first.total_normalized_score(), 9.6);
    }
}
