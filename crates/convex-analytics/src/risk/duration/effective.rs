//! Effective duration calculation.
//!
//! Effective duration is the finite-difference analogue of modified
//! duration, computed by repricing the instrument at bumped yields rather
//! than differentiating the cash-flow discounting formula analytically.
//! It is the correct measure for instruments whose cash flows themselves
//! change with the yield (e.g. callable or floating-rate bonds), and is
//! used as a cross-check for modified duration on plain fixed-rate bonds.

use super::Duration;
use crate::error::{AnalyticsError, AnalyticsResult};

/// Calculates effective duration from prices repriced at a bumped-up and
/// bumped-down yield.
///
/// # Arguments
///
/// * `price_up` - Price when the yield increases by `bump_size`.
/// * `price_down` - Price when the yield decreases by `bump_size`.
/// * `price_base` - Price at the unbumped yield.
/// * `bump_size` - The yield bump applied in each direction, as a decimal
///   (e.g. `0.0001` for 1bp).
pub fn effective_duration(
    price_up: f64,
    price_down: f64,
    price_base: f64,
    bump_size: f64,
) -> AnalyticsResult<Duration> {
    if price_base.abs() < 1e-10 {
        return Err(AnalyticsError::CalculationFailed(
            "base price is zero in effective duration calculation".to_string(),
        ));
    }
    if bump_size.abs() < 1e-12 {
        return Err(AnalyticsError::InvalidInput(
            "bump size too small".to_string(),
        ));
    }

    let ed = (price_down - price_up) / (2.0 * price_base * bump_size);
    Ok(Duration::from(ed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn effective_duration_matches_modified_for_option_free_bond() {
        let price_base = 100.0;
        let bump = 0.0001;
        let price_up = 99.981;
        let price_down = 100.019;

        let dur = effective_duration(price_up, price_down, price_base, bump).unwrap();
        assert_relative_eq!(dur.as_f64(), 1.9, epsilon = 0.01);
    }

    #[test]
    fn effective_duration_rejects_zero_base_price() {
        assert!(effective_duration(1.0, 1.0, 0.0, 0.0001).is_err());
    }
}
