//! Yield analytics for portfolios.
//!
//! Provides weighted average yield calculations including YTM, YTW, YTC,
//! and current yield. Supports configurable weighting methods and
//! optional parallel processing.

use crate::analytics::parallel::maybe_parallel_fold;
use crate::types::{AnalyticsConfig, Holding, WeightingMethod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregated yield metrics for a portfolio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YieldMetrics {
    /// Weighted average yield to maturity.
    pub ytm: Option<f64>,

    /// Weighted average yield to worst.
    pub ytw: Option<f64>,

    /// Weighted average yield to call.
    pub ytc: Option<f64>,

    /// Weighted average current yield.
    pub current_yield: Option<f64>,

    /// Best available yield (prefers YTW over YTM).
    pub best_yield: Option<f64>,

    /// Number of holdings with YTM data.
    pub ytm_coverage: usize,

    /// Number of holdings with YTW data.
    pub ytw_coverage: usize,

    /// Total number of holdings.
    pub total_holdings: usize,
}

impl YieldMetrics {
    /// Returns the YTM coverage as a percentage.
    #[must_use]
    pub fn ytm_coverage_pct(&self) -> f64 {
        if self.total_holdings > 0 {
            self.ytm_coverage as f64 / self.total_holdings as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Returns the YTW coverage as a percentage.
    #[must_use]
    pub fn ytw_coverage_pct(&self) -> f64 {
        if self.total_holdings > 0 {
            self.ytw_coverage as f64 / self.total_holdings as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Calculates weighted average yield to maturity.
///
/// ## Formula
///
/// ```text
/// YTM_portfolio = Σ(w_i × YTM_i) / Σ(w_i)
/// ```
///
/// Where:
/// - `w_i` = weight of holding i (based on weighting method)
/// - `YTM_i` = yield to maturity of holding i
///
/// Holdings without YTM are excluded from the calculation.
///
/// # Returns
///
/// Returns `None` if no holdings have YTM data.
#[must_use]
pub fn weighted_ytm(holdings: &[Holding], config: &AnalyticsConfig) -> Option<f64> {
    weighted_metric(holdings, config, |h| h.analytics.ytm)
}

/// Calculates weighted average yield to worst.
///
/// Yield to worst is the lower of YTM and yield to all call dates,
/// used for callable bonds.
///
/// # Returns
///
/// Returns `None` if no holdings have YTW data.
#[must_use]
pub fn weighted_ytw(holdings: &[Holding], config: &AnalyticsConfig) -> Option<f64> {
    weighted_metric(holdings, config, |h| h.analytics.ytw)
}

/// Calculates weighted average yield to call.
///
/// # Returns
///
/// Returns `None` if no holdings have YTC data.
#[must_use]
pub fn weighted_ytc(holdings: &[Holding], config: &AnalyticsConfig) -> Option<f64> {
    weighted_metric(holdings, config, |h| h.analytics.ytc)
}

/// Calculates weighted average current yield.
///
/// Current yield = Annual Coupon / Clean Price
///
/// # Returns
///
/// Returns `None` if no holdings have current yield data.
#[must_use]
pub fn weighted_current_yield(holdings: &[Holding], config: &AnalyticsConfig) -> Option<f64> {
    weighted_metric(holdings, config, |h| h.analytics.current_yield)
}

/// Calculates weighted best yield (prefers YTW over YTM).
///
/// For each holding, uses YTW if available, otherwise YTM.
///
/// # Returns
///
/// Returns `None` if no holdings have yield data.
#[must_use]
pub fn weighted_best_yield(holdings: &[Holding], config: &AnalyticsConfig) -> Option<f64> {
    weighted_metric(holdings, config, |h| h.analytics.best_yield())
}

/// Calculates all yield metrics for a portfolio.
///
/// # Example
///
/// ```ignore
/// let metrics = calculate_yield_metrics(&portfolio.holdings, &config);
/// println!("Portfolio YTM: {:?}", metrics.ytm);
/// println!("YTM coverage: {:.1}%", metrics.ytm_coverage_pct());
/// ```
#[must_use]
pub fn calculate_yield_metrics(holdings: &[Holding], config: &AnalyticsConfig) -> YieldMetrics {
    let ytm_coverage = holdings
        .iter()
        .filter(|h| h.analytics.ytm.is_some())
        .count();
    let ytw_coverage = holdings
        .iter()
        .filter(|h| h.analytics.ytw.is_some())
        .count();

    YieldMetrics {
        ytm: weighted_ytm(holdings, config),
        ytw: weighted_ytw(holdings, config),
        ytc: weighted_ytc(holdings, config),
        current_yield: weighted_current_yield(holdings, config),
        best_yield: weighted_best_yield(holdings, config),
        ytm_coverage,
        ytw_coverage,
        total_holdings: holdings.len(),
    }
}

/// Internal helper to calculate weighted average of any metric.
fn weighted_metric<F>(holdings: &[Holding], config: &AnalyticsConfig, get_value: F) -> Option<f64>
where
    F: Fn(&Holding) -> Option<f64> + Sync,
{
    let (sum_weighted, sum_weights) = maybe_parallel_fold(
        holdings,
        config,
        (0.0_f64, 0.0_f64),
        |(sum_w, sum_wt), h| {
            if let Some(value) = get_value(h) {
                let weight = weight_for_holding(h, config.weighting);
                (sum_w + value * weight, sum_wt + weight)
            } else {
                (sum_w, sum_wt)
            }
        },
        |(a, b), (c, d)| (a + c, b + d),
    );

    if sum_weights > 0.0 {
        Some(sum_weighted / sum_weights)
    } else {
        None
    }
}

/// Returns the weight for a holding as f64.
fn weight_for_holding(holding: &Holding, method: WeightingMethod) -> f64 {
    let weight_dec = holding.weight_value(method);
    decimal_to_f64(weight_dec)
}

/// Converts Decimal to f64.
fn decimal_to_f64(d: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    d.to_f64().unwrap_or(0.0)
}
