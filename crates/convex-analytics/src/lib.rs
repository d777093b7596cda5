//! # Convex Analytics
//!
//! Risk analytics for fixed income securities: duration, convexity, and
//! DV01.
//!
//! ## Architecture
//!
//! `convex-analytics` depends on `convex-bonds` for instrument definitions,
//! but `convex-bonds` does NOT depend on this crate. This separation ensures
//! that bond types remain lightweight and calculation-free.
//!
//! Yield-to-maturity, spreads, and cash-flow generation live in the
//! `convex` facade crate, which composes `convex-bonds` schedules with
//! `convex-math` root finding directly rather than through a standalone
//! yield-engine layer. See the root `DESIGN.md` for the consolidation
//! rationale.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use convex_analytics::prelude::*;
//!
//! let duration = modified_duration(&times, &cash_flows, ytm, 2)?;
//! let convexity = analytical_convexity(&times, &cash_flows, ytm, 2)?;
//! let dv01 = dv01_from_duration(duration, dirty_price, face_value);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;

pub use error::{AnalyticsError, AnalyticsResult};

pub mod risk;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use convex_analytics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{AnalyticsError, AnalyticsResult};

    pub use crate::risk::{
        analytical_convexity, dv01_from_duration, dv01_from_prices, dv01_per_100_face,
        effective_convexity, effective_duration, key_rate_duration_at_tenor, macaulay_duration,
        modified_duration, modified_from_macaulay, notional_from_dv01, price_change_from_duration,
        price_change_with_convexity, spread_duration, Convexity, Duration, KeyRateDuration,
        KeyRateDurations, DEFAULT_BUMP_SIZE, DV01, SMALL_BUMP_SIZE, STANDARD_KEY_RATE_TENORS,
    };
}
