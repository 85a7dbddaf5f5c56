use super::domain::{
    AttendanceRecord, CalendarMonth, DepartmentId, Employee, EmployeeId, MetricDefinition,
    MetricId, MetricScore,
};
use super::period::{Period, Quarter};
use super::repository::{KpiRepository, RepositoryError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Description of a metric independent of the quarter it is planned for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDescription {
    pub id: MetricId,
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnumber: Option<String>,
    pub description: String,
}

/// One entry of the per-quarter metric plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMetric {
    pub quarter: Quarter,
    pub metric_id: MetricId,
    pub duration: u32,
}

/// In-memory rows backing [`KpiRepository`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KpiDataset {
    pub metrics: Vec<MetricDescription>,
    pub plan: Vec<PlannedMetric>,
    pub calendar: Vec<CalendarMonth>,
    pub attendance: Vec<AttendanceRecord>,
    pub scores: Vec<MetricScore>,
    pub employees: Vec<Employee>,
}

impl KpiRepository for KpiDataset {
    fn metric_plan(&self, quarter: Quarter) -> Result<Vec<MetricDefinition>, RepositoryError> {
        let descriptions: HashMap<MetricId, &MetricDescription> = self
            .metrics
            .iter()
            .map(|metric| (metric.id, metric))
            .collect();

        self.plan
            .iter()
            .filter(|planned| planned.quarter == quarter)
            .map(|planned| {
                let description = descriptions.get(&planned.metric_id).ok_or_else(|| {
                    RepositoryError::Inconsistent(format!(
                        "metric {} is planned for {} but has no description",
                        planned.metric_id.0, quarter
                    ))
                })?;
                Ok(MetricDefinition {
                    id: planned.metric_id,
                    number: description.number,
                    subnumber: description.subnumber.clone(),
                    description: description.description.clone(),
                    duration: planned.duration,
                })
            })
            .collect()
    }

    fn calendar_months(&self, years: &[i32]) -> Result<Vec<CalendarMonth>, RepositoryError> {
        Ok(self
            .calendar
            .iter()
            .filter(|month| years.contains(&month.year))
            .copied()
            .collect())
    }

    fn attendance(
        &self,
        employee_id: Option<EmployeeId>,
        department_id: DepartmentId,
        years: &[i32],
    ) -> Result<Vec<AttendanceRecord>, RepositoryError> {
        Ok(self
            .attendance
            .iter()
            .filter(|record| record.department_id == department_id)
            .filter(|record| employee_id.map_or(true, |id| record.employee_id == id))
            .filter(|record| years.contains(&record.year))
            .cloned()
            .collect())
    }

    fn scores(
        &self,
        employee_id: EmployeeId,
        period: Period,
    ) -> Result<Vec<MetricScore>, RepositoryError> {
        Ok(self
            .scores
            .iter()
            .filter(|score| score.employee_id == employee_id && score.period() == period)
            .copied()
            .collect())
    }

    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(self.employees.clone())
    }
}

const SAMPLE_WORKING_DAYS: [(i32, [u32; 12]); 2] = [
    (2024, [17, 20, 20, 21, 20, 19, 23, 22, 21, 23, 20, 21]),
    (2025, [17, 20, 21, 22, 18, 19, 23, 21, 22, 23, 19, 22]),
];

impl KpiDataset {
    /// Small department used by the CLI demo and when no data directory is configured.
    pub fn sample() -> Self {
        let metrics = vec![
            sample_metric(1, 1, None, "Учебно-методическая работа"),
            sample_metric(2, 2, Some(".1"), "Публикации в рецензируемых изданиях"),
            sample_metric(3, 2, Some(".2"), "Участие в конференциях"),
            sample_metric(4, 3, None, "Привлечённое финансирование"),
        ];

        let plan = Quarter::ALL
            .into_iter()
            .flat_map(|quarter| {
                [(1, 1), (2, 2), (3, 1), (4, 4)]
                    .into_iter()
                    .map(move |(metric, duration)| PlannedMetric {
                        quarter,
                        metric_id: MetricId(metric),
                        duration,
                    })
            })
            .collect();

        let calendar = SAMPLE_WORKING_DAYS
            .iter()
            .flat_map(|(year, days)| {
                days.iter()
                    .enumerate()
                    .map(move |(index, working_days)| CalendarMonth {
                        year: *year,
                        month: index as u32 + 1,
                        working_days: *working_days,
                    })
            })
            .collect::<Vec<_>>();

        let department = DepartmentId(1);
        let mut attendance = Vec::new();
        for month in &calendar {
            // Full attendance.
            attendance.push(sample_attendance(1, department, "Заведующий кафедрой", month, 0));
            // Acting head during the autumn of 2024, regular role otherwise.
            let title = if month.year == 2024 && month.month >= 9 {
                "ИО"
            } else {
                "Доцент"
            };
            attendance.push(sample_attendance(2, department, title, month, 0));
            // Part-time schedule with a few missed days each month.
            if month.year == 2025 {
                attendance.push(sample_attendance(
                    3,
                    department,
                    "Старший преподаватель",
                    month,
                    4,
                ));
            }
        }
        attendance.push(AttendanceRecord {
            employee_id: EmployeeId(4),
            department_id: DepartmentId(2),
            job_title: "Профессор".to_string(),
            year: 2025,
            month: 1,
            days_worked: 17,
        });

        let mut scores = Vec::new();
        for (employee, values) in [
            (1, [85.0, 70.0, 40.0, 100.0]),
            (2, [90.0, 55.0, 65.0, 30.0]),
            (3, [60.0, 20.0, 35.0, 0.0]),
        ] {
            for quarter in [Quarter::ALL[0], Quarter::ALL[1]] {
                for (index, value) in values.iter().enumerate() {
                    scores.push(MetricScore {
                        employee_id: EmployeeId(employee),
                        year: 2025,
                        quarter,
                        metric_id: MetricId(index as u32 + 1),
                        value: *value,
                    });
                }
            }
        }

        let employees = vec![
            sample_employee(1, "Ольга", "Смирнова", "Викторовна"),
            sample_employee(2, "Андрей", "Кузнецов", "Павлович"),
            sample_employee(3, "Мария", "Лебедева", "Игоревна"),
            sample_employee(4, "Илья", "Соколов", "Андреевич"),
        ];

        Self {
            metrics,
            plan,
            calendar,
            attendance,
            scores,
            employees,
        }
    }
}

fn sample_metric(
    id: u32,
    number: u32,
    subnumber: Option<&str>,
    description: &str,
) -> MetricDescription {
    MetricDescription {
        id: MetricId(id),
        number,
        subnumber: subnumber.map(str::to_string),
        description: description.to_string(),
    }
}

fn sample_attendance(
    employee: u32,
    department_id: DepartmentId,
    job_title: &str,
    month: &CalendarMonth,
    missed: u32,
) -> AttendanceRecord {
    AttendanceRecord {
        employee_id: EmployeeId(employee),
        department_id,
        job_title: job_title.to_string(),
        year: month.year,
        month: month.month,
        days_worked: month.working_days.saturating_sub(missed),
    }
}

fn sample_employee(id: u32, first_name: &str, last_name: &str, patronymic: &str) -> Employee {
    Employee {
        id: EmployeeId(id),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        patronymic: patronymic.to_string(),
    }
}
