//! Risk analytics for fixed income instruments.
//!
//! This module provides the risk calculations this workspace's pricing
//! facade and portfolio aggregator actually consume:
//!
//! - **Duration**: Macaulay, Modified, Effective, Key Rate, Spread
//! - **Convexity**: Analytical and Effective
//! - **DV01/PV01**: Dollar value of a basis point
//!
//! VaR, hedging, and the calculator/invoice layer that used to live here
//! were never referenced by `convex-portfolio` or the `convex` facade and
//! are not part of this workspace's current scope; they were dropped in
//! the consolidation pass (see the root `DESIGN.md`).

pub mod convexity;
pub mod duration;
pub mod dv01;

// Re-export main types and functions
pub use convexity::{
    analytical_convexity, effective_convexity, price_change_with_convexity, Convexity,
};
pub use duration::{
    effective_duration, key_rate_duration_at_tenor, macaulay_duration, modified_duration,
    modified_from_macaulay, price_change_from_duration, spread_duration, Duration, KeyRateDuration,
    KeyRateDurations, DEFAULT_BUMP_SIZE, SMALL_BUMP_SIZE, STANDARD_KEY_RATE_TENORS,
};
pub use dv01::{dv01_from_duration, dv01_from_prices, dv01_per_100_face, notional_from_dv01, DV01};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::convexity::*;
    pub use super::duration::*;
    pub use super::dv01::*;
}
