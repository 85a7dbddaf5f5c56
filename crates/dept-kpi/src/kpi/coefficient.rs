/// Decimal places kept for coefficients and normalized scores.
pub const PRECISION: usize = 2;

/// Round to `places` decimals, resolving ties to the even neighbour.
///
/// Works on the exact binary expansion of `value`: `0.025_f64` is stored just above
/// the tie and becomes `0.03`.
pub fn round_half_even(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// Attendance ratio for a window. A window without calendar days yields `0.0`.
pub fn coefficient(calendar_days: u32, weighted_employee_days: f64) -> f64 {
    if calendar_days == 0 {
        return 0.0;
    }
    round_half_even(weighted_employee_days / f64::from(calendar_days), PRECISION)
}

pub fn normalize(raw_score: f64, coefficient: f64) -> f64 {
    round_half_even(raw_score * coefficient, PRECISION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficient_is_rounded_once_after_division() {
        assert_eq!(coefficient(42, 5.0), 0.12);
        assert_eq!(coefficient(60, 60.0), 1.0);
        assert_eq!(coefficient(3, 1.0), 0.33);
    }

    #[test]
    fn zero_calendar_days_yield_zero_coefficient() {
        for weighted in [0.0, 5.0, 120.5] {
            assert_eq!(coefficient(0, weighted), 0.0);
        }
    }

    #[test]
    fn normalize_scales_raw_score() {
        assert_eq!(normalize(80.0, 0.12), 9.6);
        assert_eq!(normalize(80.0, 0.0), 0.0);
        assert_eq!(normalize(-15.0, 0.0), 0.0);
        assert_eq!(normalize(12.345678, 1.0), round_half_even(12.345678, 2));
        assert_eq!(normalize(7.0, 1.0), 7.0);
    }

    #[test]
    fn ratios_round_on_their_stored_value() {
        assert_eq!(coefficient(20, 0.5), 0.03);
        assert_eq!(coefficient(20, 1.5), 0.07);
        assert_eq!(round_half_even(2.675, 2), 2.67);
        assert_eq!(round_half_even(1.005, 2), 1.0);
    }

    #[test]
    fn non_finite_values_pass_through() {
        assert!(round_half_even(f64::NAN, 2).is_nan());
        assert_eq!(round_half_even(f64::INFINITY, 2), f64::INFINITY);
    }

    #[test]
    fn ties_round_to_even() {
        assert_eq!(round_half_even(0.125, 2), 0.12);
        assert_eq!(round_half_even(0.375, 2), 0.38);
        assert_eq!(round_half_even(2.5, 0), 2.0);
        assert_eq!(round_half_even(3.5, 0), 4.0);
    }
}
