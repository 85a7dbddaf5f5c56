use super::correction::CorrectionTable;
use super::domain::{AttendanceLookup, QuarterCalendar};
use super::period::{Period, QuarterWindow};
use serde::Serialize;

/// Calendar and attendance totals across a whole window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WindowTotals {
    pub calendar_days: u32,
    pub employee_days: u32,
    pub weighted_employee_days: f64,
}

/// Sum calendar days and weighted employee days over every period of the window.
pub fn aggregate(
    window: &QuarterWindow,
    calendar: &QuarterCalendar,
    attendance: &AttendanceLookup,
    corrections: &CorrectionTable,
) -> WindowTotals {
    aggregate_periods(window.iter(), calendar, attendance, corrections)
}

/// Fold any set of periods into totals.
///
/// Periods absent from either lookup contribute nothing. Day counts saturate at
/// `u32::MAX` instead of overflowing on corrupt rows.
pub fn aggregate_periods<'a, I>(
    periods: I,
    calendar: &QuarterCalendar,
    attendance: &AttendanceLookup,
    corrections: &CorrectionTable,
) -> WindowTotals
where
    I: IntoIterator<Item = &'a Period>,
{
    periods
        .into_iter()
        .fold(WindowTotals::default(), |mut totals, period| {
            totals.calendar_days = totals
                .calendar_days
                .saturating_add(calendar.working_days(period).unwrap_or(0));
            for entry in attendance.entries(period) {
                totals.employee_days = totals.employee_days.saturating_add(entry.days_worked);
                totals.weighted_employee_days +=
                    f64::from(entry.days_worked) * corrections.factor(&entry.job_title);
            }
            totals
        })
}
