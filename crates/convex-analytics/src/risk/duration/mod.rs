//! Duration calculations: Macaulay, modified, effective, key rate, and
//! spread duration.
//!
//! ## Formulas
//!
//! ```text
//! D_mac = Σ t_i · PV(c_i) / P
//! D_mod = D_mac / (1 + y/f)
//! ```
//!
//! where `PV(c_i) = c_i × (1 + y/f)^(-t_i·f)`.

mod effective;
mod key_rate;
mod modified;
mod spread_duration;

pub use effective::effective_duration;
pub use key_rate::{key_rate_duration_at_tenor, KeyRateDuration, KeyRateDurations, STANDARD_KEY_RATE_TENORS};
pub use modified::{modified_duration, modified_from_macaulay, price_change_from_duration};
pub use spread_duration::spread_duration;

use crate::error::{AnalyticsError, AnalyticsResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default yield bump used for finite-difference (effective) duration and
/// convexity, in decimal terms (1 basis point).
pub const DEFAULT_BUMP_SIZE: f64 = 0.0001;

/// A smaller bump, used when the default bump is numerically unstable for
/// very short-dated or near-zero-yield instruments.
pub const SMALL_BUMP_SIZE: f64 = 0.00001;

/// A duration value, in years.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Duration(f64);

impl Duration {
    /// Creates a duration value directly.
    #[must_use]
    pub fn new(years: f64) -> Self {
        Self(years)
    }

    /// Returns the duration as a plain `f64`, in years.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.0
    }

    /// Returns the duration as a `Decimal`, in years.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from_f64_retain(self.0).unwrap_or(Decimal::ZERO)
    }
}

impl From<f64> for Duration {
    fn from(years: f64) -> Self {
        Self(years)
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}y", self.0)
    }
}

/// Calculates Macaulay duration: the cash-flow-time-weighted present value
/// average, invariant to the choice of compounding basis.
///
/// # Arguments
///
/// * `times` - Time to each cash flow, in years from settlement.
/// * `cash_flows` - Amount of each cash flow.
/// * `ytm` - Yield to maturity (as a decimal), under the bond's native
///   compounding frequency.
/// * `frequency` - Compounding frequency per year.
///
/// # Errors
///
/// Returns [`AnalyticsError::CalculationFailed`] if the cash flows discount
/// to zero (Macaulay duration is undefined for a worthless bond), or
/// [`AnalyticsError::InvalidInput`] if `times` and `cash_flows` differ in
/// length or are empty.
pub fn macaulay_duration(
    times: &[f64],
    cash_flows: &[f64],
    ytm: f64,
    frequency: u32,
) -> AnalyticsResult<Duration> {
    if times.len() != cash_flows.len() {
        return Err(AnalyticsError::InvalidInput(
            "times and cash_flows must have the same length".to_string(),
        ));
    }
    if times.is_empty() {
        return Err(AnalyticsError::InvalidInput(
            "no cash flows provided".to_string(),
        ));
    }

    let freq = frequency.max(1) as f64;
    let periodic_rate = ytm / freq;
    let discount_base = 1.0 + periodic_rate;

    let mut weighted_sum = 0.0;
    let mut price = 0.0;
    for (t, cf) in times.iter().zip(cash_flows.iter()) {
        let pv = cf * discount_base.powf(-(t * freq));
        weighted_sum += t * pv;
        price += pv;
    }

    if price.abs() < 1e-10 {
        return Err(AnalyticsError::CalculationFailed(
            "price is zero in Macaulay duration calculation".to_string(),
        ));
    }

    Ok(Duration::from(weighted_sum / price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn macaulay_duration_of_par_bond_exceeds_modified() {
        let times = vec![0.5, 1.0, 1.5, 2.0];
        let cash_flows = vec![2.5, 2.5, 2.5, 102.5];

        let mac = macaulay_duration(&times, &cash_flows, 0.05, 2).unwrap();
        let modd = modified_duration(&times, &cash_flows, 0.05, 2).unwrap();

        assert!(mac.as_f64() > modd.as_f64());
        assert_relative_eq!(modd.as_f64(), mac.as_f64() / 1.025, epsilon = 1e-9);
    }

    #[test]
    fn macaulay_duration_rejects_mismatched_lengths() {
        assert!(macaulay_duration(&[1.0, 2.0], &[100.0], 0.05, 2).is_err());
    }

    #[test]
    fn duration_as_decimal_round_trips() {
        let d = Duration::from(4.854);
        assert_relative_eq!(d.as_decimal().to_f64().unwrap(), 4.854, epsilon = 1e-9);
    }
}
