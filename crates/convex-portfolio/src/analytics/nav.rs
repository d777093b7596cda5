//! NAV (Net Asset Value) analytics.
//!
//! Provides detailed NAV breakdown and component analysis for portfolios.

use crate::Portfolio;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Detailed NAV breakdown showing all components.
///
/// NAV = Securities Market Value + Accrued Interest + Cash - Liabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavBreakdown {
    /// Total market value of securities (clean price × par × FX rate).
    pub securities_market_value: Decimal,

    /// Total accrued interest on all holdings.
    pub accrued_interest: Decimal,

    /// Total cash across all currencies (converted to base).
    pub total_cash: Decimal,

    /// Total liabilities.
    pub liabilities: Decimal,

    /// Net Asset Value = MV + Accrued + Cash - Liabilities.
    pub nav: Decimal,

    /// Shares outstanding (if applicable).
    pub shares_outstanding: Option<Decimal>,

    /// NAV per share (if shares_outstanding is set).
    pub nav_per_share: Option<Decimal>,
}

impl NavBreakdown {
    /// Creates a NAV breakdown from a portfolio.
    #[must_use]
    pub fn from_portfolio(portfolio: &Portfolio) -> Self {
        let securities_market_value = portfolio.securities_market_value();
        let accrued_interest = portfolio.total_accrued_interest();
        let total_cash = portfolio.total_cash();
        let liabilities = portfolio.total_liabilities();

        let nav = securities_market_value + accrued_interest + total_cash - liabilities;

        let nav_per_share = portfolio.shares_outstanding.and_then(|shares| {
            if shares > Decimal::ZERO {
                Some(nav / shares)
            } else {
                None
            }
        });

        Self {
            securities_market_value,
            accrued_interest,
            total_cash,
            liabilities,
            nav,
            shares_outstanding: portfolio.shares_outstanding,
            nav_per_share,
        }
    }

    /// Returns the securities portion as a percentage of NAV.
    #[must_use]
    pub fn securities_pct(&self) -> Decimal {
        if self.nav > Decimal::ZERO {
            self.securities_market_value / self.nav * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    }

    /// Returns the cash portion as a percentage of NAV.
    #[must_use]
    pub fn cash_pct(&self) -> Decimal {
        if self.nav > Decimal::ZERO {
            self.total_cash / self.nav * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    }

    /// Returns the accrued interest as a percentage of NAV.
    #[must_use]
    pub fn accrued_pct(&self) -> Decimal {
        if self.nav > Decimal::ZERO {
            self.accrued_interest / self.nav * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    }
}

/// Calculates detailed NAV breakdown for a portfolio.
///
/// # Example
///
/// ```ignore
/// let breakdown = calculate_nav_breakdown(&portfolio);
/// println!("NAV: {}", breakdown.nav);
/// println!("Securities: {}%", breakdown.securities_pct());
/// ```
#[must_use]
pub fn calculate_nav_breakdown(portfolio: &Portfolio) -> NavBreakdown {
    NavBreakdown::from_portfolio(portfolio)
}
