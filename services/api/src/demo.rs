use crate::infra::{load_dataset, parse_date, parse_quarter, resolve_period};
use chrono::NaiveDate;
use clap::Args;
use dept_kpi::config::AppConfig;
use dept_kpi::error::AppError;
use dept_kpi::kpi::{
    DepartmentId, EmployeeId, KpiDataset, KpiReportService, NormalizedReport, Quarter,
    ReportRequest,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Employee to report on
    #[arg(long)]
    pub(crate) employee_id: u32,
    /// Department the attendance rows are filtered by
    #[arg(long)]
    pub(crate) department_id: u32,
    /// Target year (defaults to the year of --as-of or today)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Target quarter, 1-4 or Q1-Q4 (defaults to the quarter of --as-of or today)
    #[arg(long, value_parser = parse_quarter)]
    pub(crate) quarter: Option<Quarter>,
    /// Reference date (YYYY-MM-DD) used when year or quarter is omitted
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Directory of CSV exports (overrides APP_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Print the report as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Department whose roster is reported
    #[arg(long, default_value_t = 1)]
    pub(crate) department_id: u32,
    /// Target year
    #[arg(long, default_value_t = 2025)]
    pub(crate) year: i32,
    /// Target quarter, 1-4 or Q1-Q4
    #[arg(long, value_parser = parse_quarter, default_value = "1")]
    pub(crate) quarter: Quarter,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        employee_id,
        department_id,
        year,
        quarter,
        as_of,
        data_dir,
        json,
    } = args;

    let config = AppConfig::load()?;
    let data_dir = data_dir.or(config.kpi.data_dir.clone());
    let dataset = load_dataset(data_dir.as_deref())?;
    let service = KpiReportService::new(Arc::new(dataset), config.kpi.corrections());

    let report = service.report(ReportRequest {
        employee_id: EmployeeId(employee_id),
        department_id: DepartmentId(department_id),
        period: resolve_period(year, quarter, as_of),
    })?;

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Report payload unavailable: {err}"),
        }
    } else {
        render_report(&report, None);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        department_id,
        year,
        quarter,
    } = args;

    let config = AppConfig::load()?;
    let period = resolve_period(Some(year), Some(quarter), None);
    let department_id = DepartmentId(department_id);
    let service = KpiReportService::new(Arc::new(KpiDataset::sample()), config.kpi.corrections());

    println!("Department KPI demo (sample dataset)");
    println!("Department {department_id}, target {period}");

    let plan = service.metric_plan(period.quarter)?;
    println!("\nPlanned metrics");
    for metric in &plan {
        println!(
            "- {} {}: {} quarter(s)",
            metric.label(),
            metric.description,
            metric.duration
        );
    }

    let roster = service.roster(department_id, period)?;
    if roster.is_empty() {
        println!("\nRoster: nobody worked in the department during the metric windows");
        return Ok(());
    }

    for entry in roster {
        let report = service.report(ReportRequest {
            employee_id: entry.employee_id,
            department_id,
            period,
        })?;
        println!();
        render_report(&report, Some(&entry.full_name));
    }

    Ok(())
}

pub(crate) fn render_report(report: &NormalizedReport, full_name: Option<&str>) {
    match full_name {
        Some(name) => println!("{} (#{})", name, report.employee_id),
        None => println!("Employee #{}", report.employee_id),
    }
    println!(
        "Department {} | target {}",
        report.department_id, report.period
    );

    if report.rows.is_empty() {
        println!("No metrics planned for {}", report.period.quarter);
        return;
    }

    for row in &report.rows {
        let window = match (row.window.periods().first(), row.window.periods().last()) {
            (Some(newest), Some(oldest)) if newest != oldest => format!("{oldest} .. {newest}"),
            (Some(newest), _) => newest.to_string(),
            _ => "-".to_string(),
        };
        println!(
            "- {} {} [{}]: days {}/{} (weighted {:.1}) | k={:.2} | score {:.2} -> {:.2}",
            row.label,
            row.description,
            window,
            row.employee_days,
            row.calendar_days,
            row.weighted_employee_days,
            row.coefficient,
            row.raw_score,
            row.normalized_score
        );
    }
    println!("Total normalized score: {:.2}", report.total_normalized_score());
}
