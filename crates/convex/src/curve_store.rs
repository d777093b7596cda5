//! Treasury curve storage: builds a par-yield curve into a zero curve and
//! publishes it behind an atomically-swappable snapshot for concurrent
//! readers.

use std::sync::Arc;

use parking_lot::RwLock;

use convex_core::traits::YieldCurve;
use convex_core::types::Date;
use convex_curves::bootstrap::{bootstrap_curve, BootstrapInstrument};
use convex_curves::curves::ZeroCurve;
use convex_curves::interpolation::InterpolationMethod;

use crate::error::{FacadeError, FacadeResult};
use crate::types::CurvePoint;

/// An immutable, fully bootstrapped treasury curve snapshot.
#[derive(Debug, Clone)]
pub struct TreasurySnapshot {
    curve: ZeroCurve,
    par_points: Vec<CurvePoint>,
}

impl TreasurySnapshot {
    /// Builds a snapshot from an ordered sequence of (tenor, par-yield)
    /// points, bootstrapping them into continuously-compounded zero rates
    /// and interpolating with monotone-convex (Hagan-West) on the zero
    /// curve, matching the treatment U.S. Treasury par curves receive in
    /// practice.
    ///
    /// Par yields are treated as semi-annual coupon-bearing par bonds: this
    /// is the correct convention for U.S. Treasury notes/bonds, which are
    /// the curve's primary use case.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::DataSourceError`] if fewer than two points are
    /// supplied, tenors are non-positive or not strictly increasing, or the
    /// underlying bootstrap/interpolation fails.
    pub fn build(reference_date: Date, points: &[CurvePoint]) -> FacadeResult<Self> {
        if points.len() < 2 {
            return Err(FacadeError::DataSourceError(
                "treasury curve requires at least two tenor points".to_string(),
            ));
        }

        let mut sorted: Vec<CurvePoint> = points.to_vec();
        for point in &mut sorted {
            point.par_yield = point.par_yield.max(rust_decimal::Decimal::ZERO);
        }
        sorted.sort_by(|a, b| a.tenor_years.cmp(&b.tenor_years));

        let mut last_tenor = rust_decimal::Decimal::ZERO;
        let mut instruments = Vec::with_capacity(sorted.len());
        for point in &sorted {
            if point.tenor_years <= rust_decimal::Decimal::ZERO || point.tenor_years <= last_tenor
            {
                return Err(FacadeError::DataSourceError(format!(
                    "curve tenors must be positive and strictly increasing, got {}",
                    point.tenor_years
                )));
            }
            last_tenor = point.tenor_years;

            let days = (point.tenor_years * rust_decimal::Decimal::from(365))
                .round()
                .try_into()
                .unwrap_or(0i64);
            let maturity = reference_date.add_days(days);
            instruments.push(BootstrapInstrument::Swap {
                maturity,
                rate: point.par_yield,
                frequency: 2,
            });
        }

        let curve = bootstrap_curve(reference_date, &instruments, InterpolationMethod::MonotoneConvex)
            .map_err(|e| FacadeError::DataSourceError(e.to_string()))?;

        Ok(Self {
            curve,
            par_points: sorted,
        })
    }

    /// Returns the continuously-compounded discount factor to `date`.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::DataSourceError`] if `date` falls outside the
    /// curve's range.
    pub fn discount_factor(&self, date: Date) -> FacadeResult<rust_decimal::Decimal> {
        self.curve
            .discount_factor(date)
            .map_err(|e| FacadeError::DataSourceError(e.to_string()))
    }

    /// Returns the continuously-compounded zero rate to `date`.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::DataSourceError`] if `date` falls outside the
    /// curve's range.
    pub fn zero_rate(&self, date: Date) -> FacadeResult<rust_decimal::Decimal> {
        self.curve
            .zero_rate(date)
            .map_err(|e| FacadeError::DataSourceError(e.to_string()))
    }

    /// The curve's valuation date.
    #[must_use]
    pub fn reference_date(&self) -> Date {
        self.curve.reference_date()
    }

    /// The last date with market-implied data.
    #[must_use]
    pub fn max_date(&self) -> Date {
        self.curve.max_date()
    }

    /// Interpolates the on-the-run par yield at `tenor_years`, for use as the
    /// benchmark leg of a G-spread calculation. Uses linear interpolation
    /// between the two bracketing tenor points the curve was built from,
    /// with flat extrapolation beyond the first or last point.
    #[must_use]
    pub fn par_yield(&self, tenor_years: rust_decimal::Decimal) -> rust_decimal::Decimal {
        let points = &self.par_points;
        if tenor_years <= points[0].tenor_years {
            return points[0].par_yield;
        }
        let last = points.len() - 1;
        if tenor_years >= points[last].tenor_years {
            return points[last].par_yield;
        }

        for window in points.windows(2) {
            let (lo, hi) = (window[0], window[1]);
            if tenor_years >= lo.tenor_years && tenor_years <= hi.tenor_years {
                let span = hi.tenor_years - lo.tenor_years;
                if span.is_zero() {
                    return lo.par_yield;
                }
                let weight = (tenor_years - lo.tenor_years) / span;
                return lo.par_yield + weight * (hi.par_yield - lo.par_yield);
            }
        }

        points[last].par_yield
    }
}

/// A shared, hot-swappable treasury curve store.
///
/// Readers clone the `Arc<TreasurySnapshot>` once per request and never hold
/// the lock while pricing; publishers replace the whole snapshot atomically.
/// This mirrors the curve caching pattern in `convex-engine`'s reactive
/// calculation cache, which guards its entries the same way with
/// `parking_lot::RwLock`.
#[derive(Default)]
pub struct TreasuryCurveStore {
    snapshot: RwLock<Option<Arc<TreasurySnapshot>>>,
}

impl TreasuryCurveStore {
    /// Creates an empty store with no published curve.
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(None),
        }
    }

    /// Atomically replaces the published curve snapshot.
    pub fn publish(&self, snapshot: TreasurySnapshot) {
        *self.snapshot.write() = Some(Arc::new(snapshot));
        log::debug!("published new treasury curve snapshot");
    }

    /// Returns the currently published snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::DataSourceError`] if no curve has been
    /// published yet.
    pub fn current(&self) -> FacadeResult<Arc<TreasurySnapshot>> {
        self.snapshot
            .read()
            .clone()
            .ok_or_else(|| FacadeError::DataSourceError("no treasury curve published".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_points() -> Vec<CurvePoint> {
        vec![
            CurvePoint {
                tenor_years: dec!(2),
                par_yield: dec!(0.045),
            },
            CurvePoint {
                tenor_years: dec!(5),
                par_yield: dec!(0.043),
            },
            CurvePoint {
                tenor_years: dec!(10),
                par_yield: dec!(0.042),
            },
            CurvePoint {
                tenor_years: dec!(30),
                par_yield: dec!(0.044),
            },
        ]
    }

    #[test]
    fn builds_and_publishes_a_curve() {
        let reference_date = Date::from_ymd(2025, 1, 15).unwrap();
        let snapshot = TreasurySnapshot::build(reference_date, &sample_points()).unwrap();
        let store = TreasuryCurveStore::new();
        store.publish(snapshot);

        let current = store.current().unwrap();
        let mid_date = Date::from_ymd(2030, 1, 15).unwrap();
        let df = current.discount_factor(mid_date).unwrap();
        assert!(df > dec!(0) && df < dec!(1));
    }

    #[test]
    fn rejects_fewer_than_two_points() {
        let reference_date = Date::from_ymd(2025, 1, 15).unwrap();
        let one_point = vec![sample_points()[0]];
        assert!(TreasurySnapshot::build(reference_date, &one_point).is_err());
    }

    #[test]
    fn empty_store_errors_before_publish() {
        let store = TreasuryCurveStore::new();
        assert!(store.current().is_err());
    }

    #[test]
    fn par_yield_interpolates_between_tenors() {
        let reference_date = Date::from_ymd(2025, 1, 15).unwrap();
        let snapshot = TreasurySnapshot::build(reference_date, &sample_points()).unwrap();

        assert_eq!(snapshot.par_yield(dec!(2)), dec!(0.045));
        assert_eq!(snapshot.par_yield(dec!(10)), dec!(0.042));

        let mid = snapshot.par_yield(dec!(7.5));
        assert!(mid > dec!(0.042) && mid < dec!(0.043));
    }

    #[test]
    fn negative_par_yields_are_clamped_to_zero_on_ingest() {
        let reference_date = Date::from_ymd(2025, 1, 15).unwrap();
        let points = vec![
            CurvePoint { tenor_years: dec!(1), par_yield: dec!(-0.001) },
            CurvePoint { tenor_years: dec!(2), par_yield: dec!(0.01) },
        ];
        let snapshot = TreasurySnapshot::build(reference_date, &points).unwrap();

        assert_eq!(snapshot.par_yield(dec!(0.5)), dec!(0));
        assert!(snapshot.par_yield(dec!(10)) >= dec!(0));
    }

    #[test]
    fn par_yield_flat_extrapolates_outside_range() {
        let reference_date = Date::from_ymd(2025, 1, 15).unwrap();
        let snapshot = TreasurySnapshot::build(reference_date, &sample_points()).unwrap();

        assert_eq!(snapshot.par_yield(dec!(0.25)), dec!(0.045));
        assert_eq!(snapshot.par_yield(dec!(50)), dec!(0.044));
    }
}
