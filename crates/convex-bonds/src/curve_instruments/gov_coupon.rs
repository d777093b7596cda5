//! Fixed coupon government bond wrapper for curve construction.

use rust_decimal::prelude::*;

use convex_core::Date;
use convex_curves::instruments::{CashFlow, CurveInstrument, InstrumentType};
use convex_curves::traits::Curve;
use convex_curves::CurveResult;

use crate::instruments::{Bond, FixedBond};

use super::conventions::{day_count_factor, MarketConvention};

/// A fixed coupon government bond for curve bootstrapping.
///
/// Wraps a [`FixedBond`] with market data (settlement date and price)
/// to enable curve construction. Supports any market convention.
///
/// # Pricing
///
/// ```text
/// Dirty Price = Σ Coupon(i) × DF(Ti) + Face × DF(Tn)
/// Clean Price = Dirty Price - Accrued Interest
/// ```
///
/// # Example
///
/// ```rust,ignore
/// use convex_bonds::prelude::*;
///
/// // UK Gilt 10 years, 4% coupon
/// let bond = FixedBondBuilder::new()
///     .isin("GB0009997999")
///     .coupon_rate(dec!(0.04))
///     .maturity(maturity)
///     .frequency(Frequency::SemiAnnual)
///     .currency(Currency::GBP)
///     .build()
///     .unwrap();
///
/// let gilt = GovernmentCouponBond::new(
///     bond,
///     settlement,
///     98.50,
///     MarketConvention::UKGilt,
/// );
/// ```
#[derive(Debug, Clone)]
pub struct GovernmentCouponBond {
    /// The underlying fixed coupon bond.
    bond: FixedBond,
    /// Settlement date for pricing.
    settlement: Date,
    /// Clean price per 100 face value.
    clean_price: f64,
    /// Market convention (determines day count).
    convention: MarketConvention,
}

impl GovernmentCouponBond {
    /// Creates a new government coupon bond for curve construction.
    ///
    /// # Arguments
    ///
    /// * `bond` - The underlying fixed coupon bond
    /// * `settlement` - Settlement date
    /// * `clean_price` - Clean price per 100 face value
    /// * `convention` - Market convention for day count
    #[must_use]
    pub fn new(
        bond: FixedBond,
        settlement: Date,
        clean_price: f64,
        convention: MarketConvention,
    ) -> Self {
        Self {
            bond,
            settlement,
            clean_price,
            convention,
        }
    }

    /// Creates from yield to maturity.
    ///
    /// Converts YTM to clean price using standard bond pricing with the
    /// appropriate compounding frequency for the market.
    ///
    /// # Arguments
    ///
    /// * `bond` - The underlying fixed coupon bond
    /// * `settlement` - Settlement date
    /// * `ytm` - Yield to maturity as decimal (0.05 = 5%)
    /// * `convention` - Market convention
    #[must_use]
    pub fn from_ytm(
        bond: FixedBond,
        settlement: Date,
        ytm: f64,
        convention: MarketConvention,
    ) -> Self {
        // Create temporary bond to get cash flows
        let temp = Self::new(bond.clone(), settlement, 100.0, convention);
        let flows = temp.cash_flows();

        // Use appropriate compounding frequency
        let periods_per_year = convention.coupons_per_year();
        let y_periodic = ytm / f64::from(periods_per_year);

        let mut dirty_price = 0.0;
        for cf in &flows {
            let t = temp.year_fraction(cf.date);
            let n = t * f64::from(periods_per_year);
            let df = (1.0 + y_periodic).powf(-n);
            dirty_price += cf.amount * df;
        }

        let clean_price = dirty_price - temp.accrued_interest();

        Self::new(bond, settlement, clean_price, convention)
    }

    /// Returns the underlying bond.
    #[must_use]
    pub fn bond(&self) -> &FixedBond {
        &self.bond
    }

    /// Returns the settlement date.
    #[must_use]
    pub fn settlement(&self) -> Date {
        self.settlement
    }

    /// Returns the clean price.
    #[must_use]
    pub fn clean_price(&self) -> f64 {
        self.clean_price
    }

    /// Returns the market convention.
    #[must_use]
    pub fn convention(&self) -> MarketConvention {
        self.convention
    }

    /// Returns the face value.
    #[must_use]
    pub fn face_value(&self) -> f64 {
        self.bond.face_value().to_f64().unwrap_or(100.0)
    }

    /// Returns the coupon amount per period.
    #[must_use]
    pub fn coupon_per_period(&self) -> f64 {
        self.bond.coupon_per_period().to_f64().unwrap_or(0.0)
    }

    /// Returns the dirty price (clean + accrued).
    #[must_use]
    pub fn dirty_price(&self) -> f64 {
        self.clean_price + self.accrued_interest()
    }

    /// Calculates accrued interest.
    ///
    /// Uses the appropriate day count convention:
    /// `Accrued = Coupon × (Days since last coupon / Days in period)`
    #[must_use]
    pub fn accrued_interest(&self) -> f64 {
        let (prev_coupon, next_coupon) = self.coupon_dates();

        let days_accrued = prev_coupon.days_between(&self.settlement) as f64;
        let days_in_period = prev_coupon.days_between(&next_coupon) as f64;

        if days_in_period <= 0.0 {
            return 0.0;
        }

        self.coupon_per_period() * (days_accrued / days_in_period)
    }

    /// Generates all cash flows after settlement.
    #[must_use]
    pub fn cash_flows(&self) -> Vec<CashFlow> {
        let coupon = self.coupon_per_period();
        let face = self.face_value();
        let maturity = self.bond.maturity();
        let months_per_period = self.bond.frequency().months_per_period() as i32;

        let mut flows = Vec::new();
        let mut date = maturity;

        // Walk backwards from maturity
        while date > self.settlement {
            let amount = if date == maturity {
                coupon + face
            } else {
                coupon
            };
            flows.push(CashFlow::new(date, amount));

            if let Ok(prev) = date.add_months(-months_per_period) {
                date = prev;
            } else {
                break;
            }
        }

        flows.reverse();
        flows
    }

    /// Finds the previous and next coupon dates relative to settlement.
    fn coupon_dates(&self) -> (Date, Date) {
        let months_per_period = self.bond.frequency().months_per_period() as i32;
        let mut next_coupon = self.bond.maturity();

        // Walk back from maturity to find the next coupon after settlement
        while next_coupon > self.settlement {
            if let Ok(prev) = next_coupon.add_months(-months_per_period) {
                if prev <= self.settlement {
                    break;
                }
                next_coupon = prev;
            } else {
                break;
            }
        }

        let prev_coupon = next_coupon
            .add_months(-months_per_period)
            .unwrap_or(self.settlement);

        (prev_coupon, next_coupon)
    }

    /// Calculates year fraction from settlement to date using the convention.
    fn year_fraction(&self, date: Date) -> f64 {
        day_count_factor(self.settlement, date, self.convention)
    }
}

impl CurveInstrument for GovernmentCouponBond {
    fn maturity(&self) -> Date {
        self.bond.maturity()
    }

    fn pillar_date(&self) -> Date {
        self.bond.maturity()
    }

    fn pv(&self, curve: &dyn Curve) -> CurveResult<f64> {
        // Theoretical price = Σ CF(i) × DF(Ti)
        let mut theoretical = 0.0;

        for cf in self.cash_flows() {
            let t = self.year_fraction(cf.date);
            let df = curve.discount_factor(t)?;
            theoretical += cf.amount * df;
        }

        // PV = Theoretical - Dirty Price
        Ok(theoretical - self.dirty_price())
    }

    fn implied_df(&self, curve: &dyn Curve, _target_pv: f64) -> CurveResult<f64> {
        // Solve for DF at maturity given known DFs for earlier coupons
        // Dirty = Known_PV + Final_CF × DF(maturity)
        // DF(maturity) = (Dirty - Known_PV) / Final_CF

        let flows = self.cash_flows();
        if flows.is_empty() {
            return Ok(self.dirty_price() / self.face_value());
        }

        let dirty = self.dirty_price();

        // PV of all flows except the last one
        let mut known_pv = 0.0;
        for cf in flows.iter().take(flows.len() - 1) {
            let t = self.year_fraction(cf.date);
            let df = curve.discount_factor(t)?;
            known_pv += cf.amount * df;
        }

        let final_cf = flows.last().unwrap().amount;
        if final_cf <= 0.0 {
            return Ok(0.0);
        }

        Ok((dirty - known_pv) / final_cf)
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::GovernmentCouponBond
    }

    fn description(&self) -> String {
        let coupon_pct = self.bond.coupon_rate().to_f64().unwrap_or(0.0) * 100.0;
        format!(
            "{} {:.3}% @ {:.3} ({})",
            self.bond.identifier(),
            coupon_pct,
            self.clean_price,
            self.convention
        )
    }
}
