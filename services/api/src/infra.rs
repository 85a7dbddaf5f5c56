use chrono::NaiveDate;
use dept_kpi::error::AppError;
use dept_kpi::kpi::{KpiDataset, KpiDatasetImporter, Period, Quarter};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// CSV exports from `data_dir`, or the built-in sample department.
pub(crate) fn load_dataset(data_dir: Option<&Path>) -> Result<KpiDataset, AppError> {
    match data_dir {
        Some(dir) => {
            let dataset = KpiDatasetImporter::from_dir(dir)?;
            info!(
                data_dir = %dir.display(),
                metrics = dataset.metrics.len(),
                attendance_rows = dataset.attendance.len(),
                "kpi dataset imported"
            );
            Ok(dataset)
        }
        None => {
            info!("no data directory configured, using sample dataset");
            Ok(KpiDataset::sample())
        }
    }
}

/// Explicit year/quarter wins; otherwise the quarter containing `as_of` (or today).
pub(crate) fn resolve_period(
    year: Option<i32>,
    quarter: Option<Quarter>,
    as_of: Option<NaiveDate>,
) -> Period {
    let base = as_of.map(Period::containing).unwrap_or_else(Period::current);
    Period {
        year: year.unwrap_or(base.year),
        quarter: quarter.unwrap_or(base.quarter),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_quarter(raw: &str) -> Result<Quarter, String> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('Q')
        .or_else(|| trimmed.strip_prefix('q'))
        .unwrap_or(trimmed);
    let value = digits
        .parse::<u8>()
        .map_err(|err| format!("failed to parse '{raw}' as a quarter ({err})"))?;
    Quarter::try_from(value).map_err(|err| err.to_string())
}
