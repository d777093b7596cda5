//! # Convex
//!
//! Facade crate for the Convex fixed income analytics library: resolves a
//! bond from either a reference-data identifier or a free-text description,
//! prices it at a caller-supplied clean price and settlement date, and rolls
//! per-bond analytics up into portfolio-level and cash-flow-projection
//! results.
//!
//! This crate re-exports and orchestrates the public API of
//! `convex-core`, `convex-math`, `convex-curves`, `convex-bonds`, and
//! `convex-analytics`; it adds no pricing mathematics of its own beyond
//! identifier resolution, description parsing, and the holding-level
//! failure isolation a portfolio roll-up needs. Everything here is stateless
//! and re-entrant except [`ConvexEngine`]'s reference store chain and
//! published treasury curve snapshot, both of which are read-only from the
//! perspective of a single request (see `§5` of the design notes: request-
//! scoped computation, one atomically-published curve snapshot per request).
//!
//! ## Example
//!
//! ```rust
//! use convex::{ConvexEngine, types::AnalyzeBondRequest};
//! use convex_core::types::Date;
//! use rust_decimal_macros::dec;
//!
//! let engine = ConvexEngine::builder().build();
//! let response = engine
//!     .analyze_bond(AnalyzeBondRequest {
//!         identifier: None,
//!         description: Some("T 3 15/08/52".to_string()),
//!         clean_price: dec!(71.66),
//!         settlement_date: Some(Date::from_ymd(2025, 6, 30).unwrap()),
//!         overrides: None,
//!         spread_basis: None,
//!     })
//!     .unwrap();
//! assert!(response.analytics.modified_duration > dec!(15));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cashflow_projector;
pub mod config;
pub mod curve_store;
pub mod description;
pub mod error;
pub mod pricing;
pub mod reference;
pub mod resolver;
pub mod portfolio;
pub mod types;

use rust_decimal::Decimal;

use convex_core::types::Date;

use config::EngineConfig;
use curve_store::{TreasuryCurveStore, TreasurySnapshot};
use error::{FacadeError, FacadeResult};
use reference::{OrderedReferenceStore, ReferenceStore};
use resolver::IdentifierResolver;
use types::{
    AnalyzeBondRequest, AnalyzeBondResponse, AnalyzePortfolioRequest, AnalyzePortfolioResponse,
    CashFlowRequest, CashFlowResponse, CashFlowSummary, HoldingOutcome, PerBondOutcome,
    PortfolioMetrics, PricingInput, ProjectedCashFlow, ResolutionResult,
};

pub use error::{FacadeError as Error, FacadeResult as Result};

/// Computes the default settlement date used when a request omits one: the
/// last calendar day of the month prior to today (§6: "the prior month-end
/// date in the engine's calendar").
#[must_use]
pub fn default_settlement_date() -> Date {
    let today = Date::today();
    let first_of_month = Date::from_ymd(today.year(), today.month(), 1)
        .expect("first of an already-valid month is always valid");
    first_of_month.add_days(-1)
}

/// Builder for [`ConvexEngine`], matching the `with_*`/`build()` fluent
/// pattern every instrument builder in `convex-bonds` uses (e.g.
/// `FixedRateBondBuilder`).
#[derive(Default)]
pub struct ConvexEngineBuilder {
    stores: OrderedReferenceStore,
    curve: Option<TreasurySnapshot>,
    config: EngineConfig,
}

impl ConvexEngineBuilder {
    /// Creates a builder with no reference stores, no published curve, and
    /// the default [`EngineConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a reference store to the resolver's priority chain.
    #[must_use]
    pub fn with_reference_store(mut self, store: Box<dyn ReferenceStore>) -> Self {
        self.stores = self.stores.with_store(store);
        self
    }

    /// Publishes an initial treasury curve snapshot.
    #[must_use]
    pub fn with_curve(mut self, curve: TreasurySnapshot) -> Self {
        self.curve = Some(curve);
        self
    }

    /// Overrides the default [`EngineConfig`].
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the engine. Always succeeds: every field has a sane empty
    /// default (no reference stores, no published curve), matching the
    /// spec's requirement that curve/store absence is a per-request
    /// recoverable condition, never a construction-time failure.
    #[must_use]
    pub fn build(self) -> ConvexEngine {
        let curve_store = TreasuryCurveStore::new();
        if let Some(curve) = self.curve {
            curve_store.publish(curve);
        }
        ConvexEngine {
            resolver: IdentifierResolver::new(self.stores),
            curve_store,
            config: self.config,
        }
    }
}

/// The core facade: typed entry points consumed by adapters (HTTP handlers,
/// a CLI, an MCP tool, Python/WASM bindings), none of which are this crate's
/// concern (§1). Holds the reference store chain and the published treasury
/// curve snapshot; every other component it calls into is stateless.
pub struct ConvexEngine {
    resolver: IdentifierResolver,
    curve_store: TreasuryCurveStore,
    config: EngineConfig,
}

impl ConvexEngine {
    /// Starts building a new engine.
    #[must_use]
    pub fn builder() -> ConvexEngineBuilder {
        ConvexEngineBuilder::new()
    }

    /// The engine's ambient configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Publishes a new treasury curve snapshot, replacing any previously
    /// published one atomically. Readers mid-request continue to see their
    /// own already-acquired snapshot (§5).
    pub fn publish_curve(&self, curve: TreasurySnapshot) {
        self.curve_store.publish(curve);
    }

    fn resolve_request(
        &self,
        identifier: Option<&str>,
        description: Option<&str>,
    ) -> FacadeResult<ResolutionResult> {
        match (identifier, description) {
            (Some(id), _) => match self.resolver.resolve(id) {
                Ok(result) => Ok(result),
                Err(identifier_err) => match description {
                    Some(desc) => self.resolver.resolve(desc),
                    None => Err(identifier_err),
                },
            },
            (None, Some(desc)) => self.resolver.resolve(desc),
            (None, None) => Err(FacadeError::InputError(
                "must supply an identifier or a description".to_string(),
            )),
        }
    }

    /// Resolves, prices, and computes risk/spread analytics for a single
    /// bond.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::InputError`] if neither `identifier` nor
    /// `description` is supplied, or the clean price is non-positive.
    /// Returns [`FacadeError::ResolutionError`]/[`FacadeError::ParseError`]
    /// if the bond cannot be identified. Returns
    /// [`FacadeError::ComputationError`] if pricing fails (e.g. the yield
    /// solver does not converge).
    pub fn analyze_bond(&self, request: AnalyzeBondRequest) -> FacadeResult<AnalyzeBondResponse> {
        if request.clean_price <= Decimal::ZERO {
            return Err(FacadeError::InputError(
                "clean price must be positive".to_string(),
            ));
        }
        let settlement = request.settlement_date.unwrap_or_else(default_settlement_date);

        let mut resolution =
            self.resolve_request(request.identifier.as_deref(), request.description.as_deref())?;
        log::debug!(
            "analyze_bond resolved identifier={:?} description={:?} via {:?}",
            request.identifier,
            request.description,
            resolution.path
        );

        if let Some(overrides) = &request.overrides {
            resolver::apply_overrides(&mut resolution, overrides);
        }

        let mut warnings = Vec::new();
        let curve = match self.curve_store.current() {
            Ok(snapshot) => Some(snapshot),
            Err(_) => {
                log::warn!("treasury curve unavailable; spreads will be omitted from analytics");
                warnings.push(
                    "treasury curve unavailable; g_spread/z_spread omitted".to_string(),
                );
                None
            }
        };

        let pricing_input = PricingInput {
            clean_price: request.clean_price,
            settlement,
            spread_basis: request.spread_basis,
        };
        let analytics = pricing::price_bond(&resolution.spec, &pricing_input, curve.as_deref())?;

        Ok(AnalyzeBondResponse {
            resolved_bond: resolution.spec,
            analytics,
            resolution_tag: resolution.path.into(),
            overrides_applied: resolution.overrides_applied,
            warnings,
        })
    }

    /// Resolves and prices every holding in a portfolio, isolating failures
    /// so one bad identifier or unpriceable bond does not discard the rest
    /// (§4.H).
    #[must_use]
    pub fn analyze_portfolio(&self, request: AnalyzePortfolioRequest) -> AnalyzePortfolioResponse {
        let settlement = request.settlement_date.unwrap_or_else(default_settlement_date);
        let curve = self.curve_store.current().ok();

        let result = portfolio::price_portfolio(
            &self.resolver,
            &request.holdings,
            settlement,
            curve.as_deref(),
        );

        let per_bond: Vec<PerBondOutcome> = result
            .holdings
            .into_iter()
            .map(|(id, outcome)| {
                if let HoldingOutcome::Failed(reason) = &outcome {
                    log::warn!("holding '{id}' failed to price: {reason}");
                }
                PerBondOutcome { id, outcome }
            })
            .collect();
        let failed: Vec<PerBondOutcome> = per_bond
            .iter()
            .filter(|outcome| matches!(outcome.outcome, HoldingOutcome::Failed(_)))
            .cloned()
            .collect();
        let success_rate = if result.total == 0 {
            0.0
        } else {
            result.successes as f64 / result.total as f64
        };

        AnalyzePortfolioResponse {
            portfolio_metrics: PortfolioMetrics {
                weighted_yield: result.weighted_yield,
                weighted_modified_duration: result.weighted_modified_duration,
                weighted_convexity: result.weighted_convexity,
                total_market_value: result.total_market_value,
            },
            per_bond,
            success_rate,
            failed,
        }
    }

    /// Projects the forward cash-flow stream for a set of holdings, merged
    /// across holdings and filtered per §4.I. Holdings that fail to resolve
    /// are reported in `CashFlowResponse::failed` and excluded from `flows`
    /// rather than failing the whole request.
    #[must_use]
    pub fn cash_flows(&self, request: CashFlowRequest) -> CashFlowResponse {
        let settlement = request.settlement_date.unwrap_or_else(default_settlement_date);

        let mut per_holding_flows = Vec::with_capacity(request.holdings.len());
        let mut failed = Vec::new();

        for holding in &request.holdings {
            let outcome = self
                .resolver
                .resolve(&holding.identifier)
                .and_then(|resolution| {
                    cashflow_projector::project(&resolution.spec, settlement, request.filter)
                });
            match outcome {
                Ok(flows) => {
                    per_holding_flows.push(cashflow_projector::scale_to_par(&flows, holding.par_amount));
                }
                Err(e) => {
                    log::warn!("holding '{}' cash-flow projection failed: {e}", holding.id);
                    failed.push(PerBondOutcome {
                        id: holding.id.clone(),
                        outcome: HoldingOutcome::Failed(e.to_string()),
                    });
                }
            }
        }

        let mut flows: Vec<ProjectedCashFlow> = cashflow_projector::merge_detailed(&per_holding_flows)
            .into_iter()
            .map(|flow| ProjectedCashFlow {
                date: flow.date,
                amount: flow.amount,
                coupon: flow.coupon,
                principal: flow.principal,
                days_from_settlement: settlement.days_between(&flow.date),
            })
            .collect();
        flows.sort_by_key(|flow| flow.date);

        let summary = CashFlowSummary {
            total_flows: flows.len(),
            total_amount: flows.iter().map(|flow| flow.amount).sum(),
            earliest: flows.first().map(|flow| flow.date),
            latest: flows.last().map(|flow| flow.date),
        };

        CashFlowResponse {
            flows,
            summary,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReferenceStoreConfig;
    use crate::reference::StaticReferenceStore;
    use crate::types::{
        AnalyzeBondRequest, AnalyzePortfolioRequest, CashFlowFilter, CashFlowRequest, Conventions,
        Holding, IssuerClass, Overrides, ResolutionTag,
    };
    use convex_core::types::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn analyze_bond_from_description_scenario_s1() {
        let engine = ConvexEngine::builder().build();
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
        let ytm = response.analytics.yield_to_maturity;
        assert!((ytm - dec!(0.04899)).abs() < dec!(0.002));
        assert!(response.analytics.modified_duration > dec!(15));
    }

    #[test]
    fn analyze_bond_requires_identifier_or_description() {
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
        assert!(matches!(err, FacadeError::InputError(_)));
    }

    #[test]
    fn analyze_bond_applies_coupon_override_scenario_s6() {
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
        let overridden = engine
            .analyze_bond(request(Some(Overrides {
                coupon_rate: Some(dec!(0.0375)),
                ..Overrides::default()
            })))
            .unwrap();

        assert_eq!(
            overridden.overrides_applied,
            vec!["coupon_rate".to_string()]
        );
        assert!(overridden.analytics.yield_to_maturity > baseline.analytics.yield_to_maturity);
    }

    #[test]
    fn analyze_bond_identical_for_validated_and_description_path_open_question_2() {
        let mut store = StaticReferenceStore::new(ReferenceStoreConfig::validated("validated"));
        store.insert(crate::types::BondSpec {
            identifier: "912810TW8".to_string(),
            issuer_class: IssuerClass::SovereignDeveloped,
            coupon_rate: dec!(0.03),
            maturity: Date::from_ymd(2052, 8, 15).unwrap(),
            issue_date: None,
            first_coupon_date: None,
            currency: Currency::USD,
            face_value: dec!(100),
            conventions: Conventions::us_corporate(), // deliberately wrong, see the open-question invariant
        });
        let engine = ConvexEngine::builder()
            .with_reference_store(Box::new(store))
            .build();

        let settlement = Date::from_ymd(2025, 6, 30).unwrap();
        let via_isin = engine
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

        assert_eq!(
            via_isin.analytics.accrued_interest,
            via_description.analytics.accrued_interest
        );
    }

    #[test]
    fn analyze_portfolio_scenario_s4() {
        let engine = ConvexEngine::builder().build();
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
        let response = engine.analyze_portfolio(AnalyzePortfolioRequest {
            holdings,
            settlement_date: Some(Date::from_ymd(2025, 6, 30).unwrap()),
        });

        assert!((response.success_rate - 1.0).abs() < 1e-9);
        assert!(response.portfolio_metrics.weighted_yield.is_some());
        assert!(response.failed.is_empty());
    }

    #[test]
    fn analyze_portfolio_isolates_one_failure() {
        let engine = ConvexEngine::builder().build();
        let holdings = vec![
            Holding {
                id: "lot-1".to_string(),
                identifier: "T 3 15/08/52".to_string(),
                par_amount: dec!(500_000),
                clean_price: dec!(71.66),
            },
            Holding {
                id: "lot-2".to_string(),
                identifier: "not a bond at all !!".to_string(),
                par_amount: dec!(500_000),
                clean_price: dec!(99.0),
            },
        ];
        let response = engine.analyze_portfolio(AnalyzePortfolioRequest {
            holdings,
            settlement_date: Some(Date::from_ymd(2025, 6, 30).unwrap()),
        });

        assert_eq!(response.failed.len(), 1);
        assert!((response.success_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn cash_flows_next_filter_scenario_s5() {
        let engine = ConvexEngine::builder().build();
        let holdings = vec![Holding {
            id: "lot-1".to_string(),
            identifier: "T 4.625 02/15/28".to_string(),
            par_amount: dec!(1_000_000),
            clean_price: dec!(99.5),
        }];
        let response = engine.cash_flows(CashFlowRequest {
            holdings,
            filter: CashFlowFilter::Next,
            settlement_date: Some(Date::from_ymd(2025, 6, 30).unwrap()),
        });

        assert_eq!(response.flows.len(), 1);
        let flow = &response.flows[0];
        assert_eq!(flow.date, Date::from_ymd(2025, 8, 15).unwrap());
        assert_eq!(flow.amount, dec!(23125.00));
        assert!(response.failed.is_empty());
    }

    #[test]
    fn default_settlement_date_is_a_month_end() {
        let settlement = default_settlement_date();
        assert!(settlement.is_end_of_month());
    }
}
