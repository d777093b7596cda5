//! Error types for the facade crate.

use thiserror::Error;

/// Result type used throughout the facade.
pub type FacadeResult<T> = Result<T, FacadeError>;

/// Errors surfaced by the [`crate::ConvexEngine`] facade.
///
/// This enum sits above the per-crate errors (`BondError`, `AnalyticsError`,
/// `MathError`) and adds the facade's own concerns:
/// identifier resolution, description parsing, and partial-failure reporting
/// for batch operations.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// A request field was missing or out of range.
    #[error("invalid input: {0}")]
    InputError(String),

    /// The identifier resolution hierarchy could not locate a bond.
    #[error("could not resolve identifier '{identifier}': {reason}")]
    ResolutionError {
        /// The identifier that failed to resolve.
        identifier: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A free-text bond description could not be parsed.
    #[error("could not parse description '{description}': {reason}")]
    ParseError {
        /// The description that failed to parse.
        description: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A pricing or risk computation failed.
    #[error("computation failed: {0}")]
    ComputationError(String),

    /// A reference or curve data source is unavailable or stale.
    #[error("data source error: {0}")]
    DataSourceError(String),

    /// A batch operation (portfolio pricing) failed outright rather than
    /// isolating the failure to individual holdings — reserved for the case
    /// where every holding fails for the same underlying reason (e.g. no
    /// reference store is reachable at all). The ordinary per-holding
    /// failure path does not raise this: see
    /// [`crate::ConvexEngine::analyze_portfolio`], which always returns a
    /// response enumerating successes and failures instead.
    #[error("{failed} of {total} holdings failed: {first_reason}")]
    PartialFailure {
        /// Number of holdings that failed.
        failed: usize,
        /// Total number of holdings attempted.
        total: usize,
        /// The first failure's reason, for quick diagnosis.
        first_reason: String,
    },

    /// Wraps a lower-level bond construction/cash-flow error.
    #[error(transparent)]
    Bond(#[from] convex_bonds::error::BondError),

    /// Wraps a lower-level analytics (yield/spread/risk) error.
    #[error(transparent)]
    Analytics(#[from] convex_analytics::error::AnalyticsError),

    /// Wraps a lower-level math (root-finding, interpolation) error.
    #[error(transparent)]
    Math(#[from] convex_math::error::MathError),

    /// Wraps a core calendar/day-count/date error.
    #[error(transparent)]
    Core(#[from] convex_core::error::ConvexError),
}
