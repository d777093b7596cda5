//! Forward cash-flow projection, filtered by settlement-relative windows.
//!
//! Built directly on `convex_bonds::cashflows::schedule::Schedule` for
//! period boundaries; the `all`/`next`/`period(days)` filter logic and the
//! portfolio-level merge-by-date have no existing equivalent elsewhere in
//! the workspace, so they fold per-holding flows the same plain,
//! `itertools`-free way `convex_portfolio::analytics`'s weighting functions
//! do.

use rust_decimal::Decimal;

use convex_bonds::cashflows::schedule::Schedule;
use convex_core::types::Date;

use crate::error::FacadeResult;
use crate::pricing::{build_schedule, current_period};
use crate::types::{BondSpec, CashFlow, CashFlowFilter, PortfolioCashFlows};

/// Projects the remaining cash flows of `spec` after `settlement`, per 100
/// face value, applying `filter`.
///
/// # Errors
///
/// Propagates schedule-construction failures from [`build_schedule`].
pub fn project(spec: &BondSpec, settlement: Date, filter: CashFlowFilter) -> FacadeResult<Vec<CashFlow>> {
    let schedule = build_schedule(spec, settlement)?;
    let flows = remaining_flows(spec, &schedule, settlement)?;
    Ok(apply_filter(flows, settlement, filter))
}

/// The full remaining cash-flow list, unfiltered, per 100 face value.
fn remaining_flows(spec: &BondSpec, schedule: &Schedule, settlement: Date) -> FacadeResult<Vec<CashFlow>> {
    if spec.conventions.frequency.is_zero() {
        return Ok(vec![CashFlow {
            date: spec.maturity,
            amount: Decimal::from(100),
            coupon: Decimal::ZERO,
            principal: Decimal::from(100),
        }]);
    }

    let periods = spec.conventions.frequency.periods_per_year();
    let idx = current_period(schedule, settlement)?;
    let dates = &schedule.dates()[idx + 1..];
    let coupon = spec.coupon_rate * Decimal::from(100) / Decimal::from(periods);

    let n = dates.len();
    let flows = dates
        .iter()
        .enumerate()
        .map(|(k, date)| {
            let principal = if k == n - 1 { Decimal::from(100) } else { Decimal::ZERO };
            CashFlow {
                date: *date,
                amount: coupon + principal,
                coupon,
                principal,
            }
        })
        .collect();
    Ok(flows)
}

/// Applies an `all`/`next`/`period(days)` filter to an already-sorted,
/// strictly-future flow list.
fn apply_filter(mut flows: Vec<CashFlow>, settlement: Date, filter: CashFlowFilter) -> Vec<CashFlow> {
    match filter {
        CashFlowFilter::All => flows,
        CashFlowFilter::Next => {
            flows.truncate(1);
            flows
        }
        CashFlowFilter::Period(days) => {
            let cutoff = settlement.add_days(i64::from(days));
            flows.retain(|flow| flow.date <= cutoff);
            flows
        }
    }
}

/// Merges per-holding cash flows (already scaled to each holding's nominal
/// amount) into a single date-sorted, same-date-summed portfolio stream.
#[must_use]
pub fn merge_portfolio_flows(holdings: &[Vec<CashFlow>]) -> PortfolioCashFlows {
    let mut merged = PortfolioCashFlows::new();
    for flows in holdings {
        for flow in flows {
            *merged.entry(flow.date).or_insert(Decimal::ZERO) += flow.amount;
        }
    }
    merged
}

/// Merges per-holding cash flows into a single date-sorted list, summing
/// `amount`/`coupon`/`principal` when the same date recurs across holdings.
/// Unlike [`merge_portfolio_flows`], this preserves the coupon/principal
/// breakdown the facade's `CashFlowResponse` reports per flow.
#[must_use]
pub fn merge_detailed(holdings: &[Vec<CashFlow>]) -> Vec<CashFlow> {
    use std::collections::BTreeMap;

    let mut merged: BTreeMap<Date, CashFlow> = BTreeMap::new();
    for flows in holdings {
        for flow in flows {
            merged
                .entry(flow.date)
                .and_modify(|existing| {
                    existing.amount += flow.amount;
                    existing.coupon += flow.coupon;
                    existing.principal += flow.principal;
                })
                .or_insert_with(|| flow.clone());
        }
    }
    merged.into_values().collect()
}

/// Scales a per-100-face-value cash-flow list to a holding's par amount.
#[must_use]
pub fn scale_to_par(flows: &[CashFlow], par_amount: Decimal) -> Vec<CashFlow> {
    let factor = par_amount / Decimal::from(100);
    flows
        .iter()
        .map(|flow| CashFlow {
            date: flow.date,
            amount: flow.amount * factor,
            coupon: flow.coupon * factor,
            principal: flow.principal * factor,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Conventions, IssuerClass};
    use rust_decimal_macros::dec;

    fn semi_annual_spec() -> BondSpec {
        BondSpec {
            identifier: "T-TEST".to_string(),
            issuer_class: IssuerClass::SovereignDeveloped,
            coupon_rate: dec!(0.04625),
            maturity: Date::from_ymd(2025, 2, 15).unwrap(),
            issue_date: None,
            first_coupon_date: None,
            currency: convex_core::types::Currency::USD,
            face_value: dec!(100),
            conventions: Conventions::us_treasury(),
        }
    }

    #[test]
    fn next_filter_returns_exactly_one_flow_scenario_s5() {
        let spec = BondSpec {
            maturity: Date::from_ymd(2028, 2, 15).unwrap(),
            ..semi_annual_spec()
        };
        let settlement = Date::from_ymd(2025, 6, 30).unwrap();
        let flows = project(&spec, settlement, CashFlowFilter::Next).unwrap();
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].date, Date::from_ymd(2025, 8, 15).unwrap());
        assert_eq!(flows[0].coupon, dec!(2.3125));
    }

    #[test]
    fn period_filter_excludes_flows_past_the_window() {
        let spec = BondSpec {
            maturity: Date::from_ymd(2030, 2, 15).unwrap(),
            ..semi_annual_spec()
        };
        let settlement = Date::from_ymd(2025, 6, 30).unwrap();
        let flows = project(&spec, settlement, CashFlowFilter::Period(60)).unwrap();
        assert_eq!(flows.len(), 1);
    }

    #[test]
    fn all_filter_includes_final_principal_repayment() {
        let spec = BondSpec {
            maturity: Date::from_ymd(2026, 2, 15).unwrap(),
            ..semi_annual_spec()
        };
        let settlement = Date::from_ymd(2025, 6, 30).unwrap();
        let flows = project(&spec, settlement, CashFlowFilter::All).unwrap();
        let last = flows.last().unwrap();
        assert_eq!(last.principal, dec!(100));
    }

    #[test]
    fn merges_and_sums_same_date_flows_across_holdings() {
        let a = vec![CashFlow {
            date: Date::from_ymd(2025, 8, 15).unwrap(),
            amount: dec!(2.3125),
            coupon: dec!(2.3125),
            principal: Decimal::ZERO,
        }];
        let b = vec![CashFlow {
            date: Date::from_ymd(2025, 8, 15).unwrap(),
            amount: dec!(1.5),
            coupon: dec!(1.5),
            principal: Decimal::ZERO,
        }];
        let merged = merge_portfolio_flows(&[a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[&Date::from_ymd(2025, 8, 15).unwrap()], dec!(3.8125));
    }

    #[test]
    fn merge_detailed_sums_coupon_and_principal_per_date() {
        let a = vec![CashFlow {
            date: Date::from_ymd(2026, 2, 15).unwrap(),
            amount: dec!(102.3125),
            coupon: dec!(2.3125),
            principal: dec!(100),
        }];
        let b = vec![CashFlow {
            date: Date::from_ymd(2026, 2, 15).unwrap(),
            amount: dec!(1.5),
            coupon: dec!(1.5),
            principal: Decimal::ZERO,
        }];
        let merged = merge_detailed(&[a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].amount, dec!(103.8125));
        assert_eq!(merged[0].coupon, dec!(3.8125));
        assert_eq!(merged[0].principal, dec!(100));
    }

    #[test]
    fn scale_to_par_applies_the_nominal_factor() {
        let flows = vec![CashFlow {
            date: Date::from_ymd(2025, 8, 15).unwrap(),
            amount: dec!(2.3125),
            coupon: dec!(2.3125),
            principal: Decimal::ZERO,
        }];
        let scaled = scale_to_par(&flows, dec!(1_000_000));
        assert_eq!(scaled[0].amount, dec!(23125.00));
    }
}
