//! Portfolio-level roll-up: per-holding pricing with failure isolation,
//! plus market-value-weighted averages across the successes.
//!
//! The weighting arithmetic (`Σ weight · metric / Σ weight`, holdings
//! without a value excluded) follows the shape of
//! `convex_portfolio::analytics::yields::weighted_ytm` and its siblings,
//! but the per-holding `Result` isolation and renormalization-across-
//! successes loop have no equivalent there: `convex_portfolio::Portfolio`
//! assumes every holding already carries complete analytics, not that
//! resolution or pricing might fail holding-by-holding.

use rust_decimal::Decimal;

use crate::pricing::price_bond;
use crate::resolver::IdentifierResolver;
use crate::types::{Holding, HoldingOutcome, PortfolioAnalytics, PricingInput};

/// Resolves and prices every holding in `holdings`, isolating failures so
/// one bad identifier or unpriceable bond does not discard the rest.
#[must_use]
pub fn price_portfolio(
    resolver: &IdentifierResolver,
    holdings: &[Holding],
    settlement: convex_core::types::Date,
    curve: Option<&crate::curve_store::TreasurySnapshot>,
) -> PortfolioAnalytics {
    let mut outcomes = Vec::with_capacity(holdings.len());
    for holding in holdings {
        let outcome = price_holding(resolver, holding, settlement, curve);
        outcomes.push((holding.id.clone(), outcome));
    }
    summarize(holdings, outcomes)
}

fn price_holding(
    resolver: &IdentifierResolver,
    holding: &Holding,
    settlement: convex_core::types::Date,
    curve: Option<&crate::curve_store::TreasurySnapshot>,
) -> HoldingOutcome {
    let resolution = match resolver.resolve(&holding.identifier) {
        Ok(result) => result,
        Err(e) => return HoldingOutcome::Failed(e.to_string()),
    };
    let input = PricingInput {
        clean_price: holding.clean_price,
        settlement,
        spread_basis: None,
    };
    match price_bond(&resolution.spec, &input, curve) {
        Ok(analytics) => HoldingOutcome::Priced(analytics),
        Err(e) => HoldingOutcome::Failed(e.to_string()),
    }
}

/// Market value of a holding, per its own face-value convention: `par_amount
/// * dirty_price / 100`. Falls back to clean price when a holding failed to
/// price, so weights stay sane even while it's excluded from every average.
fn market_value(par_amount: Decimal, price: Decimal) -> Decimal {
    par_amount * price / Decimal::from(100)
}

fn summarize(holdings: &[Holding], outcomes: Vec<(String, HoldingOutcome)>) -> PortfolioAnalytics {
    let total = outcomes.len();

    let mut weighted_yield_sum = Decimal::ZERO;
    let mut weighted_duration_sum = Decimal::ZERO;
    let mut weighted_convexity_sum = Decimal::ZERO;
    let mut weight_sum = Decimal::ZERO;
    let mut total_market_value = Decimal::ZERO;
    let mut successes = 0usize;

    for (holding, (_, outcome)) in holdings.iter().zip(outcomes.iter()) {
        if let HoldingOutcome::Priced(analytics) = outcome {
            successes += 1;
            let weight = market_value(holding.par_amount, analytics.dirty_price);
            weighted_yield_sum += weight * analytics.yield_to_maturity;
            weighted_duration_sum += weight * analytics.modified_duration;
            weighted_convexity_sum += weight * analytics.convexity;
            weight_sum += weight;
            total_market_value += weight;
        }
    }

    let weighted_yield = non_zero_average(weighted_yield_sum, weight_sum);
    let weighted_modified_duration = non_zero_average(weighted_duration_sum, weight_sum);
    let weighted_convexity = non_zero_average(weighted_convexity_sum, weight_sum);

    PortfolioAnalytics {
        holdings: outcomes,
        successes,
        total,
        weighted_yield,
        weighted_modified_duration,
        weighted_convexity,
        total_market_value,
    }
}

fn non_zero_average(sum: Decimal, weight: Decimal) -> Option<Decimal> {
    if weight.is_zero() {
        None
    } else {
        Some(sum / weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{OrderedReferenceStore, StaticReferenceStore};
    use crate::types::{BondSpec, Conventions, IssuerClass};
    use convex_core::types::{Currency, Date};
    use rust_decimal_macros::dec;

    fn treasury(identifier: &str, maturity: Date, coupon: Decimal) -> BondSpec {
        BondSpec {
            identifier: identifier.to_string(),
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

    fn resolver_with(specs: Vec<BondSpec>) -> IdentifierResolver {
        let mut store = StaticReferenceStore::new(crate::config::ReferenceStoreConfig::validated("primary"));
        for spec in specs {
            store.insert(spec);
        }
        IdentifierResolver::new(OrderedReferenceStore::new().with_store(Box::new(store)))
    }

    #[test]
    fn prices_every_holding_and_computes_weighted_averages_scenario_s4() {
        let resolver = resolver_with(vec![
            treasury("T 3 15/08/52", Date::from_ymd(2052, 8, 15).unwrap(), dec!(0.03)),
            treasury("T 4.1 02/15/28", Date::from_ymd(2028, 2, 15).unwrap(), dec!(0.041)),
        ]);
        let holdings = vec![
            Holding {
                id: "lot-1".to_string(),
                identifier: "T 3 15/08/52".to_string(),
                par_amount: dec!(500_000),
                clean_price: dec!(71.66),
            },
            Holding {
                id: "lot-2".to_string(),
                identifier: "T 4.1 02/15/28".to_string(),
                par_amount: dec!(500_000),
                clean_price: dec!(99.5),
            },
        ];
        let settlement = Date::from_ymd(2025, 6, 30).unwrap();

        let result = price_portfolio(&resolver, &holdings, settlement, None);

        assert_eq!(result.successes, 2);
        assert_eq!(result.total, 2);
        assert!(result.weighted_yield.is_some());
    }

    #[test]
    fn isolates_a_single_unresolvable_holding_without_failing_the_rest() {
        let resolver = resolver_with(vec![treasury(
            "T 3 15/08/52",
            Date::from_ymd(2052, 8, 15).unwrap(),
            dec!(0.03),
        )]);
        let holdings = vec![
            Holding {
                id: "lot-1".to_string(),
                identifier: "T 3 15/08/52".to_string(),
                par_amount: dec!(500_000),
                clean_price: dec!(71.66),
            },
            Holding {
                id: "lot-2".to_string(),
                identifier: "NONEXISTENT".to_string(),
                par_amount: dec!(500_000),
                clean_price: dec!(99.0),
            },
        ];
        let settlement = Date::from_ymd(2025, 6, 30).unwrap();

        let result = price_portfolio(&resolver, &holdings, settlement, None);

        assert_eq!(result.total, 2);
        assert_eq!(result.successes, 1);
        assert!(matches!(result.holdings[1].1, HoldingOutcome::Failed(_)));
        assert!(result.weighted_yield.is_some());
    }

    #[test]
    fn reports_no_weighted_averages_when_every_holding_fails() {
        let resolver = resolver_with(vec![]);
        let holdings = vec![Holding {
            id: "lot-1".to_string(),
            identifier: "NONEXISTENT".to_string(),
            par_amount: dec!(500_000),
            clean_price: dec!(99.0),
        }];
        let settlement = Date::from_ymd(2025, 6, 30).unwrap();

        let result = price_portfolio(&resolver, &holdings, settlement, None);

        assert_eq!(result.successes, 0);
        assert!(result.weighted_yield.is_none());
        assert_eq!(result.total_market_value, Decimal::ZERO);
    }
}
