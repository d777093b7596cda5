//! Convexity calculations: analytical and effective (finite-difference).
//!
//! Convexity captures the curvature of the price/yield relationship that
//! duration, a linear measure, misses. Combining both gives a
//! second-order price approximation:
//!
//! ```text
//! ΔP/P ≈ -D_mod × Δy + ½ × C × Δy²
//! ```

mod analytical;
mod effective;

pub use analytical::analytical_convexity;
pub use effective::effective_convexity;

use serde::{Deserialize, Serialize};

/// A convexity value, in years².
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Convexity(f64);

impl Convexity {
    /// Creates a convexity value directly.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the convexity as a plain `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Convexity {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Convexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Calculates the second-order price change approximation from modified
/// duration and convexity together.
///
/// # Arguments
///
/// * `mod_duration` - Modified duration, in years.
/// * `convexity` - Convexity.
/// * `price` - Current price.
/// * `yield_change` - Change in yield, as a decimal (e.g. `0.01` for 100bps).
pub fn price_change_with_convexity(
    mod_duration: f64,
    convexity: Convexity,
    price: f64,
    yield_change: f64,
) -> f64 {
    let duration_term = -mod_duration * price * yield_change;
    let convexity_term = 0.5 * convexity.as_f64() * price * yield_change.powi(2);
    duration_term + convexity_term
}
