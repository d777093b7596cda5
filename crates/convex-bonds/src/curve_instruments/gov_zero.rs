//! Zero-coupon government bond wrapper for curve construction.

use rust_decimal::prelude::*;

use convex_core::Date;
use convex_curves::{CurveInstrument, InstrumentType, RateCurveDyn};
use convex_curves::CurveResult;

use crate::instruments::ZeroCouponBond;
use crate::traits::Bond;

use super::conventions::{day_count_factor, MarketConvention};

/// A zero-coupon government bond for curve bootstrapping.
///
/// Wraps a [`ZeroCouponBond`] with market data (settlement date and price)
/// to enable curve construction. Supports any market convention.
///
/// # Example
///
/// ```rust,ignore
/// use convex_bonds::prelude::*;
///
/// // UK T-Bill (6-month)
/// let tbill = GovernmentZeroCoupon::new(
///     ZeroCouponBond::new("GB0000123456", maturity, Currency::GBP),
///     settlement,
///     99.50,
///     MarketConvention::UKGilt,
/// );
/// ```
#[derive(Debug, Clone)]
pub struct GovernmentZeroCoupon {
    /// The underlying zero-coupon bond.
    bond: ZeroCouponBond,
    /// Settlement date for pricing.
    settlement: Date,
    /// Market price (clean = dirty for zero coupon).
    price: f64,
    /// Market convention (determines day count).
    convention: MarketConvention,
}

impl GovernmentZeroCoupon {
    /// Creates a new government zero-coupon bond for curve construction.
    ///
    /// # Arguments
    ///
    /// * `bond` - The underlying zero-coupon bond
    /// * `settlement` - Settlement date
    /// * `price` - Market price per 100 face value
    /// * `convention` - Market convention for day count
    #[must_use]
    pub fn new(
        bond: ZeroCouponBond,
        settlement: Date,
        price: f64,
        convention: MarketConvention,
    ) -> Self {
        Self {
            bond,
            settlement,
            price,
            convention,
        }
    }

    /// Creates from a discount rate quote.
    ///
    /// Converts discount rate to price using the formula:
    /// `Price = 100 * (1 - rate * days/360)`
    ///
    /// # Arguments
    ///
    /// * `bond` - The underlying zero-coupon bond
    /// * `settlement` - Settlement date
    /// * `discount_rate` - Annual discount rate as decimal (0.05 = 5%)
    /// * `convention` - Market convention
    #[must_use]
    pub fn from_discount_rate(
        bond: ZeroCouponBond,
        settlement: Date,
        discount_rate: f64,
        convention: MarketConvention,
    ) -> Self {
        let days = settlement.days_between(&bond.maturity_date()) as f64;
        // Discount instruments use 360-day year for rate calculation
        let price = 100.0 * (1.0 - discount_rate * days / 360.0);
        Self::new(bond, settlement, price, convention)
    }

    /// Returns the underlying bond.
    #[must_use]
    pub fn bond(&self) -> &ZeroCouponBond {
        &self.bond
    }

    /// Returns the settlement date.
    #[must_use]
    pub fn settlement(&self) -> Date {
        self.settlement
    }

    /// Returns the market price.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Returns the market convention.
    #[must_use]
    pub fn convention(&self) -> MarketConvention {
        self.convention
    }

    /// Calculates the implied yield (simple rate).
    ///
    /// `yield = (face_value / price - 1) / year_fraction`
    #[must_use]
    pub fn implied_yield(&self) -> f64 {
        let face_value: f64 = self.bond.face_value().to_f64().unwrap_or(100.0);
        let yf = day_count_factor(self.settlement, self.bond.maturity_date(), self.convention);
        if yf > 0.0 && self.price > 0.0 {
            (face_value / self.price - 1.0) / yf
        } else {
            0.0
        }
    }

    /// Calculates the year fraction from settlement to maturity.
    fn year_fraction(&self) -> f64 {
        day_count_factor(self.settlement, self.bond.maturity_date(), self.convention)
    }
}

impl CurveInstrument for GovernmentZeroCoupon {
    fn maturity(&self) -> Date {
        self.bond.maturity_date()
    }

    fn pv(&self, curve: &dyn RateCurveDyn) -> CurveResult<f64> {
        let face_value: f64 = self.bond.face_value().to_f64().unwrap_or(100.0);
        let yf = self.year_fraction();
        let df = curve.discount_factor(yf)?;

        // PV = face_value * DF - price
        // Should be ~0 when curve is calibrated correctly
        Ok(face_value * df - self.price)
    }

    fn implied_df(&self, _curve: &dyn RateCurveDyn, target_pv: f64) -> CurveResult<f64> {
        let face_value: f64 = self.bond.face_value().to_f64().unwrap_or(100.0);

        // PV = face_value * DF - price = target_pv
        // DF = (target_pv + price) / face_value
        Ok((target_pv + self.price) / face_value)
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::GovernmentZeroCoupon
    }

    fn description(&self) -> String {
        format!(
            "{} {} @ {:.4} ({})",
            self.bond.identifier(),
            self.bond.maturity_date(),
            self.price,
            self.convention
        )
    }
}
