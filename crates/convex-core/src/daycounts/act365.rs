//! Actual/365 Fixed day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/365 Fixed day count convention.
///
/// The day count is the actual number of days between dates.
/// The year basis is always 365 days (ignoring leap years).
///
/// This convention is commonly used for:
/// - UK Gilts
/// - AUD and NZD markets
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{365}$$
#[derive(Debug, Clone, Copy, Default)]
pub struct Act365;

impl DayCount for Act365 {
    fn name(&self) -> &'static str {
        "ACT/365"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        let days = start.days_between(&end);
        Decimal::from(days) / Decimal::from(365)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/365 Fixed day count convention.
///
/// Identical arithmetic to [`Act365`], named separately because market
/// convention distinguishes "ACT/365" (ambiguous) from "ACT/365 Fixed" (the
/// denominator is always 365, even in leap years). Used by UK Gilts and
/// AUD/NZD money markets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        let days = start.days_between(&end);
        Decimal::from(days) / Decimal::from(365)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/365 Leap day count convention.
///
/// Actual days over 365, except the denominator becomes 366 when the
/// accrual period contains a 29 February.
#[derive(Debug, Clone, Copy, Default)]
pub struct Act365Leap;

impl Act365Leap {
    fn period_contains_leap_day(start: Date, end: Date) -> bool {
        (start.year()..=end.year()).any(|year| {
            crate::types::Date::from_ymd(year, 2, 29)
                .map(|leap_day| leap_day >= start && leap_day < end)
                .unwrap_or(false)
        })
    }
}

impl DayCount for Act365Leap {
    fn name(&self) -> &'static str {
        "ACT/365L"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        let days = start.days_between(&end);
        let basis = if Self::period_contains_leap_day(start, end) {
            366
        } else {
            365
        };
        Decimal::from(days) / Decimal::from(basis)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_act365_year_fraction() {
        let dc = Act365;
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2026, 1, 1).unwrap();

        // Exactly 1 year for 365-day year
        assert_eq!(dc.year_fraction(start, end), dec!(1));
    }

    #[test]
    fn test_act365_leap_year() {
        let dc = Act365;
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 1, 1).unwrap();

        // 366 days / 365 > 1 in leap year
        let yf = dc.year_fraction(start, end);
        assert!(yf > Decimal::ONE);
        assert_eq!(dc.day_count(start, end), 366);
    }
}
