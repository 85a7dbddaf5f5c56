use super::domain::{
    AttendanceRecord, CalendarMonth, DepartmentId, Employee, EmployeeId, MetricDefinition,
    MetricScore,
};
use super::period::{Period, Quarter};

/// Source of the reference and attendance rows a report is computed from.
pub trait KpiRepository: Send + Sync {
    /// Metrics configured for `quarter`, in display order.
    fn metric_plan(&self, quarter: Quarter) -> Result<Vec<MetricDefinition>, RepositoryError>;
    fn calendar_months(&self, years: &[i32]) -> Result<Vec<CalendarMonth>, RepositoryError>;
    fn attendance(
        &self,
        employee_id: Option<EmployeeId>,
        department_id: DepartmentId,
        years: &[i32],
    ) -> Result<Vec<AttendanceRecord>, RepositoryError>;
    fn scores(
        &self,
        employee_id: EmployeeId,
        period: Period,
    ) -> Result<Vec<MetricScore>, RepositoryError>;
    fn employees(&self) -> Result<Vec<Employee>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("inconsistent data: {0}")]
    Inconsistent(String),
}
