//! Parallel (uniform) curve bumping.
//!
//! A parallel bump shifts the entire curve by a constant amount,
//! useful for calculating DV01, PV01, and parallel sensitivity.

use std::sync::Arc;

use convex_core::types::Date;

use crate::term_structure::TermStructure;
use crate::value_type::ValueType;

/// A parallel (uniform) shift applied to a curve.
///
/// The shift is applied in basis points and affects the entire curve
/// uniformly. This is the standard bump for DV01/PV01 calculations.
///
/// # Example
///
/// ```rust,ignore
/// use convex_curves::bumping::ParallelBump;
///
/// // Create a 1bp upward shift
/// let bump = ParallelBump::new(1.0);
///
/// // Apply to curve (zero-copy)
/// let bumped = bump.apply(&curve);
///
/// // Calculate DV01
/// let dv01 = bond.price(&curve)? - bond.price(&bumped)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParallelBump {
    /// Shift amount in basis points.
    shift_bps: f64,
}

impl ParallelBump {
    /// Creates a new parallel bump.
    ///
    /// # Arguments
    ///
    /// * `shift_bps` - Shift in basis points (1bp = 0.0001 = 0.01%)
    ///
    /// # Example
    ///
    /// ```rust
    /// use convex_curves::bumping::ParallelBump;
    ///
    /// let bump_up = ParallelBump::new(1.0);    // +1bp
    /// let bump_down = ParallelBump::new(-1.0); // -1bp
    /// let bump_25 = ParallelBump::new(25.0);   // +25bp
    /// ```
    #[must_use]
    pub fn new(shift_bps: f64) -> Self {
        Self { shift_bps }
    }

    /// Creates a 1bp upward shift (standard for DV01).
    #[must_use]
    pub fn one_bp_up() -> Self {
        Self::new(1.0)
    }

    /// Creates a 1bp downward shift.
    #[must_use]
    pub fn one_bp_down() -> Self {
        Self::new(-1.0)
    }

    /// Creates symmetric up/down bumps for central difference DV01.
    ///
    /// Returns (up_bump, down_bump) pair.
    #[must_use]
    pub fn symmetric(half_shift_bps: f64) -> (Self, Self) {
        (Self::new(half_shift_bps), Self::new(-half_shift_bps))
    }

    /// Returns the shift in basis points.
    #[must_use]
    pub fn shift_bps(&self) -> f64 {
        self.shift_bps
    }

    /// Returns the shift as a decimal (0.0001 = 1bp).
    #[must_use]
    pub fn shift_decimal(&self) -> f64 {
        self.shift_bps / 10_000.0
    }

    /// Applies the bump to a curve, returning a zero-copy bumped curve.
    ///
    /// The bumped curve computes shifted values on-the-fly without
    /// copying the underlying curve data.
    #[must_use]
    pub fn apply<'a, T: TermStructure>(&self, curve: &'a T) -> BumpedCurve<'a, T> {
        BumpedCurve {
            base: curve,
            shift_decimal: self.shift_decimal(),
        }
    }

    /// Applies the bump to an Arc-wrapped curve.
    #[must_use]
    pub fn apply_arc<T: TermStructure>(self, curve: Arc<T>) -> ArcBumpedCurve<T> {
        ArcBumpedCurve {
            base: curve,
            shift_decimal: self.shift_decimal(),
        }
    }
}

impl Default for ParallelBump {
    fn default() -> Self {
        Self::one_bp_up()
    }
}

/// A curve with a parallel shift applied.
///
/// This is a zero-copy wrapper that applies the shift on-the-fly
/// during value access. The shift is applied differently depending
/// on the underlying curve's value type:
///
/// - **Zero rates**: rate + shift
/// - **Discount factors**: df * exp(-shift * t)
/// - **Forward rates**: forward + shift
/// - **Hazard rates**: hazard + shift
/// - **Survival probabilities**: surv * exp(-shift * t)
#[derive(Debug, Clone, Copy)]
pub struct BumpedCurve<'a, T: TermStructure> {
    /// The base curve.
    base: &'a T,
    /// Shift in decimal form (0.0001 = 1bp).
    shift_decimal: f64,
}

impl<'a, T: TermStructure> BumpedCurve<'a, T> {
    /// Returns a reference to the base curve.
    #[must_use]
    pub fn base(&self) -> &T {
        self.base
    }

    /// Returns the applied shift in decimal form.
    #[must_use]
    pub fn shift_decimal(&self) -> f64 {
        self.shift_decimal
    }

    /// Returns the applied shift in basis points.
    #[must_use]
    pub fn shift_bps(&self) -> f64 {
        self.shift_decimal * 10_000.0
    }
}

impl<T: TermStructure> TermStructure for BumpedCurve<'_, T> {
    fn reference_date(&self) -> Date {
        self.base.reference_date()
    }

    fn value_at(&self, t: f64) -> f64 {
        let base_value = self.base.value_at(t);

        match self.base.value_type() {
            // For rates: add shift directly
            ValueType::ZeroRate { .. }
            | ValueType::ForwardRate { .. }
            | ValueType::InstantaneousForward
            | ValueType::HazardRate
            | ValueType::ParSwapRate { .. } => base_value + self.shift_decimal,

            // For discount factors: df_bumped = df * exp(-shift * t)
            // Derivation: if zero rate increases by shift, then
            // df = exp(-r*t) becomes df' = exp(-(r+shift)*t) = df * exp(-shift*t)
            ValueType::DiscountFactor => {
                base_value * (-self.shift_decimal * t).exp()
            }

            // For survival probability: similar to discount factor
            // S(t) = exp(-h*t) becomes S'(t) = exp(-(h+shift)*t) = S * exp(-shift*t)
            ValueType::SurvivalProbability => {
                base_value * (-self.shift_decimal * t).exp()
            }

            // For credit spreads: add shift to spread
            ValueType::CreditSpread { .. } => base_value + self.shift_decimal,

            // For inflation and FX, shifts don't apply in the same way
            // but we provide additive shift as a reasonable default
            ValueType::InflationIndexRatio | ValueType::FxForwardPoints => {
                base_value + self.shift_decimal
            }
        }
    }

    fn tenor_bounds(&self) -> (f64, f64) {
        self.base.tenor_bounds()
    }

    fn value_type(&self) -> ValueType {
        self.base.value_type()
    }

    fn derivative_at(&self, t: f64) -> Option<f64> {
        // For additive shifts, derivative is unchanged
        // For multiplicative (DF, survival), derivative changes
        match self.base.value_type() {
            ValueType::DiscountFactor | ValueType::SurvivalProbability => {
                // d/dt[f(t) * exp(-s*t)] = f'(t)*exp(-s*t) - s*f(t)*exp(-s*t)
                let base_value = self.base.value_at(t);
                let base_deriv = self.base.derivative_at(t)?;
                let exp_factor = (-self.shift_decimal * t).exp();
                Some(
                    base_deriv * exp_factor
                        - self.shift_decimal * base_value * exp_factor,
                )
            }
            _ => self.base.derivative_at(t),
        }
    }

    fn max_date(&self) -> Date {
        self.base.max_date()
    }
}

/// Arc-owned bumped curve for longer-lived scenarios.
///
/// Unlike `BumpedCurve`, this owns the base curve via Arc,
/// allowing the bumped curve to outlive any particular scope.
#[derive(Debug, Clone)]
pub struct ArcBumpedCurve<T: TermStructure> {
    /// The base curve (Arc-owned).
    base: Arc<T>,
    /// Shift in decimal form.
    shift_decimal: f64,
}

impl<T: TermStructure> ArcBumpedCurve<T> {
    /// Creates a new Arc-owned bumped curve.
    #[must_use]
    pub fn new(base: Arc<T>, shift_bps: f64) -> Self {
        Self {
            base,
            shift_decimal: shift_bps / 10_000.0,
        }
    }

    /// Returns a reference to the base curve.
    #[must_use]
    pub fn base(&self) -> &T {
        &self.base
    }

    /// Returns the shift in basis points.
    #[must_use]
    pub fn shift_bps(&self) -> f64 {
        self.shift_decimal * 10_000.0
    }
}

impl<T: TermStructure> TermStructure for ArcBumpedCurve<T> {
    fn reference_date(&self) -> Date {
        self.base.reference_date()
    }

    fn value_at(&self, t: f64) -> f64 {
        let base_value = self.base.value_at(t);

        match self.base.value_type() {
            ValueType::ZeroRate { .. }
            | ValueType::ForwardRate { .. }
            | ValueType::InstantaneousForward
            | ValueType::HazardRate
            | ValueType::ParSwapRate { .. } => base_value + self.shift_decimal,

            ValueType::DiscountFactor => {
                base_value * (-self.shift_decimal * t).exp()
            }

            ValueType::SurvivalProbability => {
                base_value * (-self.shift_decimal * t).exp()
            }

            ValueType::CreditSpread { .. } => base_value + self.shift_decimal,

            ValueType::InflationIndexRatio | ValueType::FxForwardPoints => {
                base_value + self.shift_decimal
            }
        }
    }

    fn tenor_bounds(&self) -> (f64, f64) {
        self.base.tenor_bounds()
    }

    fn value_type(&self) -> ValueType {
        self.base.value_type()
    }

    fn derivative_at(&self, t: f64) -> Option<f64> {
        match self.base.value_type() {
            ValueType::DiscountFactor | ValueType::SurvivalProbability => {
                let base_value = self.base.value_at(t);
                let base_deriv = self.base.derivative_at(t)?;
                let exp_factor = (-self.shift_decimal * t).exp();
                Some(
                    base_deriv * exp_factor
                        - self.shift_decimal * base_value * exp_factor,
                )
            }
            _ => self.base.derivative_at(t),
        }
    }

    fn max_date(&self) -> Date {
        self.base.max_date()
    }
}
