//! Settlement date and amount calculations.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Calculate settlement date from trade date.
///
/// # Arguments
///
/// * `trade_date` - The trade date
/// * `settlement_days` - Number of business days to settlement (e.g., 1 for T+1, 2 for T+2)
/// * `is_business_day` - Function to check if a date is a business day
///
/// # Returns
///
/// The settlement date
pub fn calculate_settlement_date<F>(
    trade_date: NaiveDate,
    settlement_days: u32,
    is_business_day: F,
) -> NaiveDate
where
    F: Fn(NaiveDate) -> bool,
{
    let mut date = trade_date;
    let mut business_days = 0;

    while business_days < settlement_days {
        date = date.succ_opt().unwrap_or(date);
        if is_business_day(date) {
            business_days += 1;
        }
    }

    date
}

/// Calculate proceeds from a bond sale.
///
/// # Arguments
///
/// * `face_value` - Face value of the bond
/// * `clean_price` - Clean price as percentage of par
/// * `accrued_interest` - Accrued interest as percentage of par
///
/// # Returns
///
/// Total proceeds
pub fn calculate_proceeds(
    face_value: Decimal,
    clean_price: Decimal,
    accrued_interest: Decimal,
) -> Decimal {
    let principal = face_value * clean_price / Decimal::ONE_HUNDRED;
    let accrued = face_value * accrued_interest / Decimal::ONE_HUNDRED;
    principal + accrued
}

/// Calculate the dollar amount of accrued interest.
///
/// # Arguments
///
/// * `face_value` - Face value of the bond
/// * `coupon_rate` - Annual coupon rate as decimal
/// * `accrued_fraction` - Day count fraction for accrued period
///
/// # Returns
///
/// Dollar amount of accrued interest
pub fn calculate_accrued_amount(
    face_value: Decimal,
    coupon_rate: Decimal,
    accrued_fraction: Decimal,
) -> Decimal {
    face_value * coupon_rate * accrued_fraction
}
