//! Cash position representation.

use convex_core::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cash position with currency and FX rate.
///
/// Represents cash held in a portfolio, potentially in a different currency
/// than the portfolio's base currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashPosition {
    /// Amount in the cash currency.
    pub amount: Decimal,

    /// Currency of the cash.
    pub currency: Currency,

    /// FX rate to convert to portfolio base currency.
    /// A rate of 1.0 means the cash is in the base currency.
    /// Rate is expressed as: 1 unit of cash currency = fx_rate units of base currency.
    pub fx_rate: Decimal,
}

impl CashPosition {
    /// Creates a new cash position.
    ///
    /// # Arguments
    ///
    /// * `amount` - Amount of cash
    /// * `currency` - Currency of the cash
    #[must_use]
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount,
            currency,
            fx_rate: Decimal::ONE,
        }
    }

    /// Creates a cash position with an FX rate.
    ///
    /// # Arguments
    ///
    /// * `amount` - Amount of cash
    /// * `currency` - Currency of the cash
    /// * `fx_rate` - Rate to convert to base currency
    #[must_use]
    pub fn with_fx_rate(amount: Decimal, currency: Currency, fx_rate: Decimal) -> Self {
        Self {
            amount,
            currency,
            fx_rate,
        }
    }

    /// Sets the FX rate.
    #[must_use]
    pub fn fx_rate(mut self, rate: Decimal) -> Self {
        self.fx_rate = rate;
        self
    }

    /// Returns the value in the portfolio's base currency.
    #[must_use]
    pub fn value_in_base(&self) -> Decimal {
        self.amount * self.fx_rate
    }

    /// Returns true if this is in the base currency (fx_rate == 1).
    #[must_use]
    pub fn is_base_currency(&self) -> bool {
        self.fx_rate == Decimal::ONE
    }
}

impl Default for CashPosition {
    fn default() -> Self {
        Self {
            amount: Decimal::ZERO,
            currency: Currency::USD,
            fx_rate: Decimal::ONE,
        }
    }
}
