use super::common::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use crate::kpi::{kpi_router, CorrectionTable, KpiReportService};

async fn get(router: axum::Router, uri: &str) -> axum::response::Response {
    router
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("router responds")
}

#[tokio::test]
async fn report_endpoint_returns_normalized_rows() {
    let response = get(
        router(),
        "/api/v1/kpi/report?employee_id=11&department_id=3&year=2024&quarter=1",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["period"]["year"], 2024);
    assert_eq!(payload["period"]["quarter"], 1);
    let rows = payload["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["label"], "4.2");
    assert_eq!(rows[0]["coefficient"], 0.12);
    assert_eq!(rows[0]["normalized_score"], 9.6);
    assert_eq!(rows[0]["window"][0]["year"], 2023);
    assert_eq!(rows[0]["window"][0]["quarter"], 4);
}

#[tokio::test]
async fn report_endpoint_rejects_invalid_quarter() {
    let response = get(
        router(),
        "/api/v1/kpi/report?employee_id=11&department_id=3&year=2024&quarter=5",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("quarter"));
}

#[tokio::test]
async fn report_endpoint_surfaces_repository_failures() {
    let service = KpiReportService::new(Arc::new(UnavailableRepository), CorrectionTable::default());
    let response = get(
        kpi_router(Arc::new(service)),
        "/api/v1/kpi/report?employee_id=11&department_id=3&year=2024&quarter=1",
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn metrics_endpoint_lists_plan_for_quarter() {
    let response = get(router(), "/api/v1/kpi/metrics?quarter=1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    let metrics = payload.as_array().expect("metrics array");
    assert_eq!(metrics.len(), 2);
    assert_eq!(metrics[0]["label"], "4.2");
    assert_eq!(metrics[0]["duration"], 2);
    assert_eq!(metrics[1]["label"], "5");
}

#[tokio::test]
async fn employees_endpoint_returns_roster() {
    let response = get(
        router(),
        "/api/v1/kpi/employees?department_id=3&year=2024&quarter=1",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    let roster = payload.as_array().expect("roster array");
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[1]["employee_id"], 11);
    assert_eq!(roster[1]["full_name"], "Иванова Анна Петровна");
}

#[tokio::test]
async fn employees_endpoint_rejects_quarter_zero() {
    let response = get(
        router(),
        "/api/v1/kpi/employees?department_id=3&year=2024&quarter=0",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn report_endpoint_rejects_window_before_earliest_year() {
    let response = get(
        router(),
        "/api/v1/kpi/report?employee_id=11&department_id=3&year=-2147483648&quarter=1",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let roster = get(
        router(),
        "/api/v1/kpi/employees?department_id=3&year=-2147483648&quarter=1",
    )
    .await;
    assert_eq!(roster.status(), StatusCode::BAD_REQUEST);
}
