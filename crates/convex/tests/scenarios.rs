//! Integration tests for the `convex` facade.
//!
//! These exercise `ConvexEngine` end-to-end, the way an adapter (CLI, HTTP
//! handler) would call it, rather than the individual component unit tests
//! each module already carries.

use convex::config::{EngineConfig, ReferenceStoreConfig};
use convex::curve_store::TreasurySnapshot;
use convex::reference::StaticReferenceStore;
use convex::types::{
    AnalyzeBondRequest, AnalyzePortfolioRequest, BondSpec, CashFlowFilter, CashFlowRequest,
    Conventions, CurvePoint, Holding, IssuerClass, Overrides, ResolutionTag,
};
use convex::ConvexEngine;
use convex_core::types::{Currency, Date};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

fn treasury_curve() -> TreasurySnapshot {
    let reference_date = Date::from_ymd(2025, 6, 30).unwrap();
    let points = vec![
        CurvePoint { tenor_years: dec!(2), par_yield: dec!(0.0395) },
        CurvePoint { tenor_years: dec!(5), par_yield: dec!(0.0405) },
        CurvePoint { tenor_years: dec!(10), par_yield: dec!(0.0420) },
        CurvePoint { tenor_years: dec!(30), par_yield: dec!(0.0445) },
    ];
    TreasurySnapshot::build(reference_date, &points).unwrap()
}

/// S1: a long-dated Treasury resolved from a free-text description.
#[test]
fn analyzes_a_long_dated_treasury_from_description() {
    let engine = ConvexEngine::builder().with_curve(treasury_curve()).build();

    let response = engine
        .analyze_bond(AnalyzeBondRequest {
            identifier: None,
            description: Some("T 3 15/08/52".to_string()),
            clean_price: dec!(71.66),
            settlement_date: Some(Date::from_ymd(2025, 6, 30).unwrap()),
            overrides: None,
            spread_basis: None,
        })
        .unwrap();

    assert_eq!(response.resolution_tag, ResolutionTag::Parsed);
    let ytm = response.analytics.yield_to_maturity.to_f64().unwrap();
    assert!((ytm - 0.04899).abs() < 0.002, "ytm = {ytm}");
    assert!(response.analytics.modified_duration > dec!(15));
    // Sovereign USD paper is its own benchmark: no G-spread.
    assert!(response.analytics.g_spread.is_none());
    assert!(response.warnings.is_empty());
}

/// S2: a short-dated Treasury near its final coupon.
#[test]
fn analyzes_a_short_dated_treasury() {
    let engine = ConvexEngine::builder().build();

    let response = engine
        .analyze_bond(AnalyzeBondRequest {
            identifier: None,
            description: Some("T 4.625 02/15/25".to_string()),
            clean_price: dec!(99.5),
            settlement_date: Some(Date::from_ymd(2024, 12, 30).unwrap()),
            overrides: None,
            spread_basis: None,
        })
        .unwrap();

    assert!(response.analytics.modified_duration > dec!(0));
    assert!(response.analytics.accrued_interest > dec!(0));
}

/// S3: a long-form sovereign description with a percent-suffixed coupon.
#[test]
fn analyzes_a_long_form_sovereign_description() {
    let engine = ConvexEngine::builder().with_curve(treasury_curve()).build();

    let response = engine
        .analyze_bond(AnalyzeBondRequest {
            identifier: None,
            description: Some("PANAMA, 3.87%, 23-Jul-2060".to_string()),
            clean_price: dec!(68.0),
            settlement_date: Some(Date::from_ymd(2025, 6, 30).unwrap()),
            overrides: None,
            spread_basis: None,
        })
        .unwrap();

    assert_eq!(response.resolved_bond.issuer_class, IssuerClass::SovereignEmerging);
    assert_eq!(response.resolved_bond.currency, Currency::USD);
    // A foreign sovereign priced off the USD curve does carry a G-spread.
    assert!(response.analytics.g_spread.is_some());
}

/// S4: portfolio-level roll-up across two Treasuries resolved from a
/// validated reference store.
#[test]
fn analyzes_a_portfolio_with_weighted_averages() {
    let mut store = StaticReferenceStore::new(ReferenceStoreConfig::validated("security-master"));
    store.insert(BondSpec {
        identifier: "912810TW8".to_string(),
        issuer_class: IssuerClass::SovereignDeveloped,
        coupon_rate: dec!(0.03),
        maturity: Date::from_ymd(2052, 8, 15).unwrap(),
        issue_date: Some(Date::from_ymd(2022, 8, 15).unwrap()),
        first_coupon_date: None,
        currency: Currency::USD,
        face_value: dec!(100),
        conventions: Conventions::us_treasury(),
    });
    store.insert(BondSpec {
        identifier: "912828YK0".to_string(),
        issuer_class: IssuerClass::SovereignDeveloped,
        coupon_rate: dec!(0.041),
        maturity: Date::from_ymd(2028, 2, 15).unwrap(),
        issue_date: Some(Date::from_ymd(2018, 2, 15).unwrap()),
        first_coupon_date: None,
        currency: Currency::USD,
        face_value: dec!(100),
        conventions: Conventions::us_treasury(),
    });

    let engine = ConvexEngine::builder()
        .with_reference_store(Box::new(store))
        .with_config(EngineConfig {
            reference_stores: vec![ReferenceStoreConfig::validated("security-master")],
            ..EngineConfig::default()
        })
        .build();

    let response = engine.analyze_portfolio(AnalyzePortfolioRequest {
        holdings: vec![
            Holding {
                id: "lot-1".to_string(),
                identifier: "912810TW8".to_string(),
                par_amount: dec!(500_000),
                clean_price: dec!(71.66),
            },
            Holding {
                id: "lot-2".to_string(),
                identifier: "912828YK0".to_string(),
                par_amount: dec!(500_000),
                clean_price: dec!(99.5),
            },
        ],
        settlement_date: Some(Date::from_ymd(2025, 6, 30).unwrap()),
    });

    assert_eq!(response.per_bond.len(), 2);
    assert!(response.failed.is_empty());
    assert!((response.success_rate - 1.0).abs() < 1e-9);
    assert!(response.portfolio_metrics.weighted_yield.is_some());
    assert!(response.portfolio_metrics.total_market_value > dec!(0));
}

/// A portfolio where one holding can't be resolved: the other still prices,
/// and the failure is isolated and reported rather than failing the batch.
#[test]
fn isolates_a_failing_holding_in_a_portfolio() {
    let engine = ConvexEngine::builder().build();

    let response = engine.analyze_portfolio(AnalyzePortfolioRequest {
        holdings: vec![
            Holding {
                id: "lot-1".to_string(),
                identifier: "T 3 15/08/52".to_string(),
                par_amount: dec!(500_000),
                clean_price: dec!(71.66),
            },
            Holding {
                id: "lot-2".to_string(),
                identifier: "???".to_string(),
                par_amount: dec!(500_000),
                clean_price: dec!(99.0),
            },
        ],
        settlement_date: Some(Date::from_ymd(2025, 6, 30).unwrap()),
    });

    assert_eq!(response.failed.len(), 1);
    assert_eq!(response.failed[0].id, "lot-2");
    assert!((response.success_rate - 0.5).abs() < 1e-9);
}

/// S5: "next" cash-flow filter returns exactly one flow at the coupon
/// boundary just past settlement.
#[test]
fn projects_the_next_cash_flow_only() {
    let engine = ConvexEngine::builder().build();

    let response = engine.cash_flows(CashFlowRequest {
        holdings: vec![Holding {
            id: "lot-1".to_string(),
            identifier: "T 4.625 02/15/28".to_string(),
            par_amount: dec!(1_000_000),
            clean_price: dec!(99.5),
        }],
        filter: CashFlowFilter::Next,
        settlement_date: Some(Date::from_ymd(2025, 6, 30).unwrap()),
    });

    assert!(response.failed.is_empty());
    assert_eq!(response.flows.len(), 1);
    let flow = &response.flows[0];
    assert_eq!(flow.date, Date::from_ymd(2025, 8, 15).unwrap());
    assert_eq!(flow.amount, dec!(23125.00));
    assert_eq!(response.summary.total_flows, 1);
    assert_eq!(response.summary.earliest, Some(flow.date));
}

/// "all" cash-flow filter across two holdings merges coupons that land on
/// the same date.
#[test]
fn projects_all_cash_flows_and_merges_same_date_coupons() {
    let engine = ConvexEngine::builder().build();

    let response = engine.cash_flows(CashFlowRequest {
        holdings: vec![
            Holding {
                id: "lot-1".to_string(),
                identifier: "T 3 15/08/52".to_string(),
                par_amount: dec!(500_000),
                clean_price: dec!(71.66),
            },
            Holding {
                id: "lot-2".to_string(),
                identifier: "T 4.625 02/15/28".to_string(),
                par_amount: dec!(500_000),
                clean_price: dec!(99.5),
            },
        ],
        filter: CashFlowFilter::All,
        settlement_date: Some(Date::from_ymd(2025, 6, 30).unwrap()),
    });

    assert!(response.failed.is_empty());
    // Both bonds pay Feb 15 / Aug 15 coupons; the first shared date should
    // be the sum of both coupon legs, not a duplicate entry.
    let shared = response
        .flows
        .iter()
        .find(|flow| flow.date == Date::from_ymd(2025, 8, 15).unwrap())
        .expect("both legs share an August coupon date");
    assert!(shared.coupon > dec!(0));
    assert!(response.flows.windows(2).all(|w| w[0].date <= w[1].date));
}

/// S6: an explicit coupon override raises yield at an unchanged price, and
/// is recorded in `overrides_applied`.
#[test]
fn coupon_override_raises_yield_at_the_same_price() {
    let engine = ConvexEngine::builder().build();
    let request = |overrides: Option<Overrides>| AnalyzeBondRequest {
        identifier: None,
        description: Some("AAPL 3.45 02/09/29".to_string()),
        clean_price: dec!(97.25),
        settlement_date: Some(Date::from_ymd(2025, 6, 30).unwrap()),
        overrides,
        spread_basis: None,
    };

    let baseline = engine.analyze_bond(request(None)).unwrap();
    assert!(baseline.overrides_applied.is_empty());

    let overridden = engine
        .analyze_bond(request(Some(Overrides {
            coupon_rate: Some(dec!(0.0375)),
            ..Overrides::default()
        })))
        .unwrap();

    assert_eq!(overridden.overrides_applied, vec!["coupon_rate".to_string()]);
    assert!(overridden.analytics.yield_to_maturity > baseline.analytics.yield_to_maturity);
    assert_eq!(overridden.resolved_bond.coupon_rate, dec!(0.0375));
}

/// The US-Treasury day-count tagging invariant holds even when a validated
/// reference record carries the wrong convention, and is identical whether
/// the bond was resolved by identifier or by description (open question 2).
#[test]
fn treasury_tag_is_identical_across_resolution_paths() {
    let mut store = StaticReferenceStore::new(ReferenceStoreConfig::validated("security-master"));
    store.insert(BondSpec {
        identifier: "912810TW8".to_string(),
        issuer_class: IssuerClass::SovereignDeveloped,
        coupon_rate: dec!(0.03),
        maturity: Date::from_ymd(2052, 8, 15).unwrap(),
        issue_date: None,
        first_coupon_date: None,
        currency: Currency::USD,
        face_value: dec!(100),
        conventions: Conventions::us_corporate(),
    });
    let engine = ConvexEngine::builder()
        .with_reference_store(Box::new(store))
        .build();

    let settlement = Date::from_ymd(2025, 6, 30).unwrap();
    let via_identifier = engine
        .analyze_bond(AnalyzeBondRequest {
            identifier: Some("912810TW8".to_string()),
            description: None,
            clean_price: dec!(71.66),
            settlement_date: Some(settlement),
            overrides: None,
            spread_basis: None,
        })
        .unwrap();
    let via_description = engine
        .analyze_bond(AnalyzeBondRequest {
            identifier: None,
            description: Some("T 3 15/08/52".to_string()),
            clean_price: dec!(71.66),
            settlement_date: Some(settlement),
            overrides: None,
            spread_basis: None,
        })
        .unwrap();

    assert_eq!(via_identifier.resolution_tag, ResolutionTag::Validated);
    assert_eq!(via_description.resolution_tag, ResolutionTag::Parsed);
    assert_eq!(
        via_identifier.analytics.accrued_interest,
        via_description.analytics.accrued_interest
    );
    assert_eq!(
        via_identifier.analytics.yield_to_maturity,
        via_description.analytics.yield_to_maturity
    );
}

/// A day-count override is honored for a description-parsed bond but
/// ignored for a validated store hit, per the override precedence rule.
#[test]
fn day_count_override_precedence() {
    let mut store = StaticReferenceStore::new(ReferenceStoreConfig::validated("security-master"));
    store.insert(BondSpec {
        identifier: "US912810AB1".to_string(),
        issuer_class: IssuerClass::Corporate,
        coupon_rate: dec!(0.05),
        maturity: Date::from_ymd(2030, 6, 15).unwrap(),
        issue_date: Some(Date::from_ymd(2020, 6, 15).unwrap()),
        first_coupon_date: None,
        currency: Currency::USD,
        face_value: dec!(100),
        conventions: Conventions::us_corporate(),
    });
    let engine = ConvexEngine::builder()
        .with_reference_store(Box::new(store))
        .build();

    let response = engine
        .analyze_bond(AnalyzeBondRequest {
            identifier: Some("US912810AB1".to_string()),
            description: None,
            clean_price: dec!(100),
            settlement_date: Some(Date::from_ymd(2025, 6, 30).unwrap()),
            overrides: Some(Overrides {
                day_count: Some(convex::types::DayCountBasis::Actual360),
                ..Overrides::default()
            }),
            spread_basis: None,
        })
        .unwrap();

    assert!(!response.overrides_applied.contains(&"day_count".to_string()));
}

/// Analytics are never computed when neither an identifier nor a
/// description is supplied.
#[test]
fn rejects_a_bond_request_with_no_way_to_resolve_it() {
    let engine = ConvexEngine::builder().build();
    let err = engine
        .analyze_bond(AnalyzeBondRequest {
            identifier: None,
            description: None,
            clean_price: dec!(100),
            settlement_date: None,
            overrides: None,
            spread_basis: None,
        })
        .unwrap_err();
    assert!(matches!(err, convex::Error::InputError(_)));
}
