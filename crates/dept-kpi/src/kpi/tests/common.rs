use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::kpi::dataset::{KpiDataset, MetricDescription, PlannedMetric};
use crate::kpi::domain::{
    AttendanceRecord, CalendarMonth, DepartmentId, Employee, EmployeeId, MetricDefinition,
    MetricId, MetricScore,
};
use crate::kpi::period::{Period, Quarter};
use crate::kpi::repository::{KpiRepository, RepositoryError};
use crate::kpi::{kpi_router, CorrectionTable, KpiReportService};

pub(super) const EMPLOYEE: EmployeeId = EmployeeId(11);
pub(super) const DEPARTMENT: DepartmentId = DepartmentId(3);

pub(super) fn period(year: i32, quarter: u8) -> Period {
    Period::new(year, quarter).expect("valid period")
}

fn month(year: i32, month: u32, working_days: u32) -> CalendarMonth {
    CalendarMonth {
        year,
        month,
        working_days,
    }
}

fn attendance(employee: u32, title: &str, year: i32, month: u32, days: u32) -> AttendanceRecord {
    AttendanceRecord {
        employee_id: EmployeeId(employee),
        department_id: DEPARTMENT,
        job_title: title.to_string(),
        year,
        month,
        days_worked: days,
    }
}

/// Two metrics planned for Q1: metric 1 looks back two quarters, metric 2 one quarter.
///
/// Calendar: 2023 Q3 = 22 days, 2023 Q4 = 20 days. Employee 11 worked 10 days
/// as acting head in 2023 Q4 only and was scored 80 on metric 1 for 2024 Q1.
pub(super) fn dataset() -> KpiDataset {
    KpiDataset {
        metrics: vec![
            MetricDescription {
                id: MetricId(1),
                number: 4,
                subnumber: Some(".2".to_string()),
                description: "Methodological publications".to_string(),
            },
            MetricDescription {
                id: MetricId(2),
                number: 5,
                subnumber: None,
                description: "Student supervision".to_string(),
            },
        ],
        plan: vec![
            PlannedMetric {
                quarter: Quarter::FIRST,
                metric_id: MetricId(1),
                duration: 2,
            },
            PlannedMetric {
                quarter: Quarter::FIRST,
                metric_id: MetricId(2),
                duration: 1,
            },
        ],
        calendar: vec![
            month(2023, 7, 10),
            month(2023, 8, 12),
            month(2023, 10, 20),
            month(2024, 1, 17),
        ],
        attendance: vec![
            attendance(11, "ИО", 2023, 11, 10),
            attendance(11, "Доцент", 2024, 1, 17),
            attendance(12, "Профессор", 2023, 9, 5),
            attendance(13, "Ассистент", 2022, 12, 20),
        ],
        scores: vec![MetricScore {
            employee_id: EMPLOYEE,
            year: 2024,
            quarter: Quarter::FIRST,
            metric_id: MetricId(1),
            value: 80.0,
        }],
        employees: vec![
            Employee {
                id: EMPLOYEE,
                first_name: "Анна".to_string(),
                last_name: "Иванова".to_string(),
                patronymic: "Петровна".to_string(),
            },
            Employee {
                id: EmployeeId(12),
                first_name: "Борис".to_string(),
                last_name: "Абрамов".to_string(),
                patronymic: "Олегович".to_string(),
            },
        ],
    }
}

pub(super) fn service() -> KpiReportService<KpiDataset> {
    KpiReportService::new(Arc::new(dataset()), CorrectionTable::default())
}

pub(super) fn router() -> axum::Router {
    kpi_router(Arc::new(service()))
}

pub(super) struct UnavailableRepository;

impl KpiRepository for UnavailableRepository {
    fn metric_plan(&self, _quarter: Quarter) -> Result<Vec<MetricDefinition>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn calendar_months(&self, _years: &[i32]) -> Result<Vec<CalendarMonth>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn attendance(
        &self,
        _employee_id: Option<EmployeeId>,
        _department_id: DepartmentId,
        _years: &[i32],
    ) -> Result<Vec<AttendanceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn scores(
        &self,
        _employee_id: EmployeeId,
        _period: Period,
    ) -> Result<Vec<MetricScore>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
