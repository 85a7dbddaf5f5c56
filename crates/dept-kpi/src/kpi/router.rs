use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{DepartmentId, EmployeeId};
use super::period::{KpiError, Period, Quarter};
use super::report::ReportRequest;
use super::repository::KpiRepository;
use super::service::{KpiReportService, ReportServiceError};

#[derive(Debug, Deserialize)]
pub(crate) struct ReportQuery {
    employee_id: u32,
    department_id: u32,
    year: i32,
    quarter: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetricsQuery {
    quarter: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RosterQuery {
    department_id: u32,
    year: i32,
    quarter: u8,
}

/// Router builder exposing the normalized KPI report endpoints.
pub fn kpi_router<R>(service: Arc<KpiReportService<R>>) -> Router
where
    R: KpiRepository + 'static,
{
    Router::new()
        .route("/api/v1/kpi/report", get(report_handler::<R>))
        .route("/api/v1/kpi/metrics", get(metrics_handler::<R>))
        .route("/api/v1/kpi/employees", get(roster_handler::<R>))
        .with_state(service)
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<KpiReportService<R>>>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    R: KpiRepository + 'static,
{
    let period = match Period::new(query.year, query.quarter) {
        Ok(period) => period,
        Err(err) => return invalid_period(err),
    };
    let request = ReportRequest {
        employee_id: EmployeeId(query.employee_id),
        department_id: DepartmentId(query.department_id),
        period,
    };

    match service.report(request) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn metrics_handler<R>(
    State(service): State<Arc<KpiReportService<R>>>,
    Query(query): Query<MetricsQuery>,
) -> Response
where
    R: KpiRepository + 'static,
{
    let quarter = match Quarter::try_from(query.quarter) {
        Ok(quarter) => quarter,
        Err(err) => return invalid_period(err),
    };

    match service.metric_plan(quarter) {
        Ok(metrics) => {
            let payload: Vec<_> = metrics
                .iter()
                .map(|metric| {
                    json!({
                        "id": metric.id,
                        "label": metric.label(),
                        "description": metric.description,
                        "duration": metric.duration,
                    })
                })
                .collect();
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => service_error(err),
    }
}

pub(crate) async fn roster_handler<R>(
    State(service): State<Arc<KpiReportService<R>>>,
    Query(query): Query<RosterQuery>,
) -> Response
where
    R: KpiRepository + 'static,
{
    let period = match Period::new(query.year, query.quarter) {
        Ok(period) => period,
        Err(err) => return invalid_period(err),
    };

    match service.roster(DepartmentId(query.department_id), period) {
        Ok(roster) => (StatusCode::OK, axum::Json(roster)).into_response(),
        Err(err) => service_error(err),
    }
}

fn invalid_period(err: KpiError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn service_error(err: ReportServiceError) -> Response {
    match err {
        ReportServiceError::Period(err) => invalid_period(err),
        ReportServiceError::Repository(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
