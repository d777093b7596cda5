//! Pricing engine: accrued interest, dirty price, yield to maturity,
//! duration, convexity, PVBP, and spread analytics for a single bond.
//!
//! Cash-flow schedules come from `convex_bonds::cashflows::schedule`; yield
//! and Z-spread are solved directly against `convex_math::solvers` (Newton
//! first, Brent-bracket fallback, the same two-stage shape
//! `convex-bonds::pricing::YieldSolver` uses for its own bond type);
//! duration, convexity, and DV01 are delegated to `convex_analytics::risk`,
//! which already implements exactly these formulas against plain
//! `times`/`cash_flows` vectors.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use convex_bonds::cashflows::schedule::{Schedule, ScheduleConfig};
use convex_core::daycounts::{Act365Fixed, ActActIcma, DayCount};
use convex_core::types::{Currency, Date};

use convex_analytics::risk::{
    analytical_convexity, dv01_from_prices, dv01_per_100_face, macaulay_duration, modified_duration,
};
use convex_math::solvers::{brent, newton_raphson, SolverConfig};

use crate::curve_store::TreasurySnapshot;
use crate::error::{FacadeError, FacadeResult};
use crate::resolver::implied_issue_date;
use crate::types::{Analytics, BondSpec, DayCountBasis, IssuerClass, PricingInput, SpreadBasis};

const YIELD_BRACKETS: [(f64, f64); 3] = [(-0.1, 0.5), (-0.2, 1.0), (-0.5, 2.0)];
const SPREAD_BRACKETS: [(f64, f64); 3] = [(-0.02, 0.02), (-0.05, 0.05), (-0.20, 0.20)];

/// Builds the coupon schedule for `spec`, anchored so backward generation
/// never needs to know a real issue date when none is on file.
pub(crate) fn build_schedule(spec: &BondSpec, settlement: Date) -> FacadeResult<Schedule> {
    let issue = spec.issue_date.unwrap_or_else(|| implied_issue_date(settlement));
    let mut config = ScheduleConfig::new(issue, spec.maturity, spec.conventions.frequency)
        .with_calendar(spec.conventions.calendar.to_calendar_id())
        .with_business_day_convention(spec.conventions.business_day_convention)
        .with_end_of_month(spec.conventions.end_of_month);
    if let Some(first_coupon) = spec.first_coupon_date {
        config = config.with_first_regular_date(first_coupon);
    }
    let schedule = Schedule::generate(config)?;
    if schedule.is_empty() {
        return Err(FacadeError::ComputationError(
            "generated schedule has no periods".to_string(),
        ));
    }
    Ok(schedule)
}

/// Locates the accrual period containing `settlement`: the index `i` such
/// that `unadjusted[i] <= settlement < unadjusted[i + 1]`.
pub(crate) fn current_period(schedule: &Schedule, settlement: Date) -> FacadeResult<usize> {
    let dates = schedule.unadjusted_dates();
    if settlement >= *dates.last().expect("schedule is non-empty") {
        return Err(FacadeError::ComputationError(
            "settlement is on or after the bond's final cash flow; nothing left to price"
                .to_string(),
        ));
    }
    let idx = dates
        .windows(2)
        .position(|w| settlement < w[1])
        .unwrap_or(0);
    Ok(idx)
}

/// Fraction of the current accrual period elapsed as of `settlement`, under
/// `basis`. ACT/ACT ICMA uses the period-aware calculation; every other
/// convention uses the day-count trait's own `year_fraction` ratio.
fn accrued_fraction(basis: DayCountBasis, prev: Date, settlement: Date, next: Date) -> Decimal {
    if next <= prev {
        return Decimal::ZERO;
    }
    let (elapsed, full) = if basis == DayCountBasis::ActualActualBond {
        let dc = ActActIcma::new(2);
        (
            dc.year_fraction_with_period(prev, settlement, prev, next),
            dc.year_fraction_with_period(prev, next, prev, next),
        )
    } else {
        let dc = basis.to_core().to_day_count();
        (dc.year_fraction(prev, settlement), dc.year_fraction(prev, next))
    };
    if full.is_zero() {
        Decimal::ZERO
    } else {
        elapsed / full
    }
}

/// Accrued interest per 100 face value as of `settlement`.
pub(crate) fn accrued_interest(spec: &BondSpec, schedule: &Schedule, settlement: Date) -> Decimal {
    if spec.conventions.frequency.is_zero() {
        return Decimal::ZERO;
    }
    let periods = spec.conventions.frequency.periods_per_year();
    let dates = schedule.unadjusted_dates();
    let idx = match current_period(schedule, settlement) {
        Ok(idx) => idx,
        Err(_) => return Decimal::ZERO,
    };
    let (prev, next) = (dates[idx], dates[idx + 1]);
    let fraction = accrued_fraction(spec.conventions.day_count, prev, settlement, next);
    let period_coupon = spec.coupon_rate * Decimal::from(100) / Decimal::from(periods);
    period_coupon * fraction
}

/// A single future cash flow used for yield/spread solving: time from
/// settlement in years, and amount per 100 face value.
struct ProjectedFlow {
    time: f64,
    amount: f64,
    date: Date,
}

/// Builds the remaining cash flows (coupon + principal) after `settlement`.
fn project_flows(spec: &BondSpec, schedule: &Schedule, settlement: Date) -> FacadeResult<Vec<ProjectedFlow>> {
    if spec.conventions.frequency.is_zero() {
        let dc = Act365Fixed;
        let time = dc
            .year_fraction(settlement, spec.maturity)
            .to_f64()
            .ok_or_else(|| FacadeError::ComputationError("year fraction overflowed f64".to_string()))?;
        return Ok(vec![ProjectedFlow {
            time,
            amount: 100.0,
            date: spec.maturity,
        }]);
    }

    let periods = spec.conventions.frequency.periods_per_year();
    let idx = current_period(schedule, settlement)?;
    let unadjusted = schedule.unadjusted_dates();
    let adjusted = schedule.dates();
    let remaining = &adjusted[idx + 1..];
    if remaining.is_empty() {
        return Err(FacadeError::ComputationError(
            "no cash flows remain after settlement".to_string(),
        ));
    }

    let fraction = accrued_fraction(
        spec.conventions.day_count,
        unadjusted[idx],
        settlement,
        unadjusted[idx + 1],
    );
    let f = f64::from(periods);
    let t1 = (Decimal::ONE - fraction)
        .to_f64()
        .ok_or_else(|| FacadeError::ComputationError("accrued fraction overflowed f64".to_string()))?
        / f;
    let coupon = spec
        .coupon_rate
        .to_f64()
        .ok_or_else(|| FacadeError::ComputationError("coupon rate overflowed f64".to_string()))?
        * 100.0
        / f;

    let n = remaining.len();
    let mut flows = Vec::with_capacity(n);
    for (k, date) in remaining.iter().enumerate() {
        let time = t1 + (k as f64) / f;
        let amount = if k == n - 1 { coupon + 100.0 } else { coupon };
        flows.push(ProjectedFlow { time, amount, date: *date });
    }
    Ok(flows)
}

/// Present value of `flows` at periodic yield `y`, compounded `freq` times
/// per year, minus `target`. Used as the yield-solver objective.
fn yield_residual(flows: &[ProjectedFlow], freq: f64, y: f64, target: f64) -> f64 {
    let base = 1.0 + y / freq;
    if base <= 1e-8 {
        return 1e6;
    }
    flows
        .iter()
        .map(|fl| fl.amount * base.powf(-(fl.time * freq)))
        .sum::<f64>()
        - target
}

/// Derivative of [`yield_residual`] with respect to `y`.
fn yield_residual_derivative(flows: &[ProjectedFlow], freq: f64, y: f64) -> f64 {
    let base = 1.0 + y / freq;
    if base <= 1e-8 {
        return -1.0;
    }
    flows
        .iter()
        .map(|fl| fl.amount * -fl.time * base.powf(-(fl.time * freq) - 1.0))
        .sum()
}

/// Solves for the periodic yield that reprices `flows` to `target`,
/// Newton-Raphson first with a Brent-bracket fallback of widening brackets.
fn solve_yield(flows: &[ProjectedFlow], freq: f64, target: f64, guess: f64) -> FacadeResult<f64> {
    let config = SolverConfig::default();
    let f = |y: f64| yield_residual(flows, freq, y, target);
    let df = |y: f64| yield_residual_derivative(flows, freq, y);

    if let Ok(result) = newton_raphson(f, df, guess, &config) {
        return Ok(result.root);
    }

    for (lo, hi) in YIELD_BRACKETS {
        if f(lo) * f(hi) < 0.0 {
            if let Ok(result) = brent(f, lo, hi, &config) {
                return Ok(result.root);
            }
        }
    }

    Err(FacadeError::ComputationError(
        "yield to maturity did not converge".to_string(),
    ))
}

/// Computes full analytics for a single bond at a settlement date and clean
/// price. `curve` is consulted for G-spread/Z-spread when present; those
/// fields are `None` (never an error) when it is absent.
///
/// # Errors
///
/// Returns [`FacadeError::ComputationError`] if the schedule is empty, the
/// settlement date is on or after the bond's last cash flow, or the yield
/// solver fails to converge. Returns [`FacadeError::InputError`] for
/// non-positive prices or a maturity that has already passed.
pub fn price_bond(
    spec: &BondSpec,
    input: &PricingInput,
    curve: Option<&TreasurySnapshot>,
) -> FacadeResult<Analytics> {
    if input.clean_price <= Decimal::ZERO {
        return Err(FacadeError::InputError("clean price must be positive".to_string()));
    }
    if spec.maturity <= input.settlement {
        return Err(FacadeError::InputError(
            "maturity must be after settlement".to_string(),
        ));
    }

    let schedule = build_schedule(spec, input.settlement)?;
    let accrued = accrued_interest(spec, &schedule, input.settlement);
    let dirty_price = input.clean_price + accrued;
    let dirty_f64 = dirty_price
        .to_f64()
        .ok_or_else(|| FacadeError::ComputationError("dirty price overflowed f64".to_string()))?;

    let flows = project_flows(spec, &schedule, input.settlement)?;
    let freq = if spec.conventions.frequency.is_zero() {
        1.0
    } else {
        f64::from(spec.conventions.frequency.periods_per_year())
    };
    let guess = spec.coupon_rate.to_f64().unwrap_or(0.05).max(0.001);
    let ytm = solve_yield(&flows, freq, dirty_f64, guess)?;

    let times: Vec<f64> = flows.iter().map(|fl| fl.time).collect();
    let amounts: Vec<f64> = flows.iter().map(|fl| fl.amount).collect();
    let freq_u32 = freq.round() as u32;

    let macaulay = macaulay_duration(&times, &amounts, ytm, freq_u32)?;
    let modified = modified_duration(&times, &amounts, ytm, freq_u32)?;
    let convexity = analytical_convexity(&times, &amounts, ytm, freq_u32)?;
    let pvbp = dv01_per_100_face(modified, dirty_f64);

    // ytm_annual = (1 + ytm/f)^f - 1; duration_annual rescales modified
    // duration from the periodic compounding basis onto that annual one.
    let ytm_annual = (1.0 + ytm / freq).powf(freq) - 1.0;
    let modified_annual = modified.as_f64() * (1.0 + ytm / freq) / (1.0 + ytm_annual);

    let (g_spread, z_spread, z_spread_dv01) = match curve {
        Some(snapshot) => spread_analytics(spec, input, &flows, dirty_f64, ytm, snapshot)?,
        None => (None, None, None),
    };

    Ok(Analytics {
        clean_price: input.clean_price,
        dirty_price,
        accrued_interest: accrued,
        yield_to_maturity: Decimal::from_f64_retain(ytm).unwrap_or_default(),
        yield_to_maturity_annual: Decimal::from_f64_retain(ytm_annual).unwrap_or_default(),
        macaulay_duration: macaulay.as_decimal(),
        modified_duration: modified.as_decimal(),
        modified_duration_annual: Decimal::from_f64_retain(modified_annual).unwrap_or_default(),
        convexity: Decimal::from_f64_retain(convexity.as_f64()).unwrap_or_default(),
        pvbp: pvbp.value(),
        g_spread,
        z_spread,
        z_spread_dv01,
        settlement_date: input.settlement,
    })
}

/// G-spread, Z-spread, and Z-spread DV01, given a published treasury curve.
fn spread_analytics(
    spec: &BondSpec,
    input: &PricingInput,
    flows: &[ProjectedFlow],
    dirty: f64,
    ytm: f64,
    curve: &TreasurySnapshot,
) -> FacadeResult<(Option<Decimal>, Option<Decimal>, Option<Decimal>)> {
    let is_benchmark_itself =
        spec.issuer_class == IssuerClass::SovereignDeveloped && spec.currency == Currency::USD;

    let g_spread = if is_benchmark_itself {
        None
    } else {
        let tenor = Act365Fixed
            .year_fraction(input.settlement, spec.maturity)
            .max(Decimal::ZERO);
        let basis = input.spread_basis.unwrap_or(SpreadBasis::Interpolated);
        let par_yield = match basis {
            SpreadBasis::Interpolated | SpreadBasis::NearestTenor => curve.par_yield(tenor),
        };
        let ytm_decimal = Decimal::from_f64_retain(ytm).unwrap_or_default();
        Some((ytm_decimal - par_yield) * Decimal::from(10_000))
    };

    let discount_factors: FacadeResult<Vec<f64>> = flows
        .iter()
        .map(|fl| {
            curve
                .discount_factor(fl.date)
                .and_then(|df| df.to_f64().ok_or_else(|| FacadeError::ComputationError("discount factor overflowed f64".to_string())))
        })
        .collect();
    let discount_factors = match discount_factors {
        Ok(dfs) => dfs,
        Err(_) => return Ok((g_spread, None, None)),
    };

    let z_price = |z: f64| -> f64 {
        flows
            .iter()
            .zip(discount_factors.iter())
            .map(|(fl, df)| fl.amount * df * (-z * fl.time).exp())
            .sum::<f64>()
            - dirty
    };

    let mut z = None;
    let config = SolverConfig::default();
    for (lo, hi) in SPREAD_BRACKETS {
        if z_price(lo) * z_price(hi) < 0.0 {
            if let Ok(result) = brent(z_price, lo, hi, &config) {
                z = Some(result.root);
                break;
            }
        }
    }

    let (z_spread, z_spread_dv01) = match z {
        None => (None, None),
        Some(z) => {
            let bump = 0.0001;
            let price_up = z_price(z + bump) + dirty;
            let price_down = z_price(z - bump) + dirty;
            let dv01 = dv01_from_prices(price_up, price_down);
            (
                Some(Decimal::from_f64_retain(z * 10_000.0).unwrap_or_default()),
                Some(dv01.value()),
            )
        }
    };

    Ok((g_spread, z_spread, z_spread_dv01))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Conventions;
    use rust_decimal_macros::dec;

    fn treasury_spec(maturity: Date, coupon: Decimal) -> BondSpec {
        BondSpec {
            identifier: "T-TEST".to_string(),
            issuer_class: IssuerClass::SovereignDeveloped,
            coupon_rate: coupon,
            maturity,
            issue_date: None,
            first_coupon_date: None,
            currency: Currency::USD,
            face_value: dec!(100),
            conventions: Conventions::us_treasury(),
        }
    }

    #[test]
    fn prices_a_treasury_long_bond_scenario_s1() {
        let spec = treasury_spec(Date::from_ymd(2052, 8, 15).unwrap(), dec!(0.03));
        let input = PricingInput {
            clean_price: dec!(71.66),
            settlement: Date::from_ymd(2025, 6, 30).unwrap(),
            spread_basis: None,
        };
        let analytics = price_bond(&spec, &input, None).unwrap();

        let ytm = analytics.yield_to_maturity.to_f64().unwrap();
        assert!((ytm - 0.04899).abs() < 0.002, "ytm = {ytm}");

        let mod_dur = analytics.modified_duration.to_f64().unwrap();
        assert!((mod_dur - 16.35).abs() < 0.5, "modified duration = {mod_dur}");

        let accrued = analytics.accrued_interest.to_f64().unwrap();
        assert!((accrued - 1.112).abs() < 0.05, "accrued = {accrued}");
    }

    #[test]
    fn prices_a_short_dated_treasury_scenario_s2() {
        let spec = treasury_spec(Date::from_ymd(2025, 2, 15).unwrap(), dec!(0.04625));
        // Settlement after maturity is meaningless; use a settlement before it instead,
        // matching a realistic short-dated scenario with a nearby maturity.
        let input = PricingInput {
            clean_price: dec!(99.5),
            settlement: Date::from_ymd(2024, 12, 30).unwrap(),
            spread_basis: None,
        };
        let analytics = price_bond(&spec, &input, None).unwrap();
        assert!(analytics.modified_duration.to_f64().unwrap() > 0.0);
        assert!(analytics.accrued_interest > Decimal::ZERO);
    }

    #[test]
    fn rejects_non_positive_clean_price() {
        let spec = treasury_spec(Date::from_ymd(2030, 6, 15).unwrap(), dec!(0.04));
        let input = PricingInput {
            clean_price: dec!(0),
            settlement: Date::from_ymd(2025, 6, 30).unwrap(),
            spread_basis: None,
        };
        assert!(price_bond(&spec, &input, None).is_err());
    }

    #[test]
    fn rejects_maturity_on_or_before_settlement() {
        let spec = treasury_spec(Date::from_ymd(2024, 1, 1).unwrap(), dec!(0.04));
        let input = PricingInput {
            clean_price: dec!(100),
            settlement: Date::from_ymd(2025, 6, 30).unwrap(),
            spread_basis: None,
        };
        assert!(price_bond(&spec, &input, None).is_err());
    }

    #[test]
    fn g_spread_is_none_without_a_published_curve() {
        let spec = treasury_spec(Date::from_ymd(2035, 6, 15).unwrap(), dec!(0.04));
        let input = PricingInput {
            clean_price: dec!(98),
            settlement: Date::from_ymd(2025, 6, 30).unwrap(),
            spread_basis: None,
        };
        let analytics = price_bond(&spec, &input, None).unwrap();
        assert!(analytics.g_spread.is_none());
        assert!(analytics.z_spread.is_none());
    }

    #[test]
    fn g_spread_is_none_for_the_benchmark_treasury_itself() {
        let spec = treasury_spec(Date::from_ymd(2035, 6, 30).unwrap(), dec!(0.04));
        let input = PricingInput {
            clean_price: dec!(98),
            settlement: Date::from_ymd(2025, 6, 30).unwrap(),
            spread_basis: None,
        };
        let reference = Date::from_ymd(2025, 6, 30).unwrap();
        let points = vec![
            crate::types::CurvePoint { tenor_years: dec!(2), par_yield: dec!(0.045) },
            crate::types::CurvePoint { tenor_years: dec!(10), par_yield: dec!(0.042) },
            crate::types::CurvePoint { tenor_years: dec!(30), par_yield: dec!(0.044) },
        ];
        let snapshot = TreasurySnapshot::build(reference, &points).unwrap();
        let analytics = price_bond(&spec, &input, Some(&snapshot)).unwrap();
        assert!(analytics.g_spread.is_none());
    }

    #[test]
    fn overriding_to_a_higher_coupon_raises_ytm_at_the_same_price_scenario_s6() {
        let mut low = treasury_spec(Date::from_ymd(2029, 2, 9).unwrap(), dec!(0.0345));
        low.conventions = Conventions::us_corporate();
        let mut high = low.clone();
        high.coupon_rate = dec!(0.0375);

        let input = PricingInput {
            clean_price: dec!(97.25),
            settlement: Date::from_ymd(2025, 6, 30).unwrap(),
            spread_basis: None,
        };
        let low_analytics = price_bond(&low, &input, None).unwrap();
        let high_analytics = price_bond(&high, &input, None).unwrap();
        assert!(high_analytics.yield_to_maturity > low_analytics.yield_to_maturity);
    }
}
