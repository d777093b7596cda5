//! Identifier resolution: validated store -> description parser -> secondary
//! store -> unresolved.

use convex_core::types::{Currency, Date, Frequency};

use crate::description::parse_description;
use crate::error::{FacadeError, FacadeResult};
use crate::reference::OrderedReferenceStore;
use crate::types::{
    BondSpec, Conventions, DayCountBasis, IssuerClass, Overrides, ResolutionPath, ResolutionResult,
};

/// Resolves identifiers and free-text descriptions to [`BondSpec`]s.
///
/// Resolution order, matching the precedence a trader expects from a
/// terminal lookup:
///
/// 1. A validated hit in the reference store chain wins outright.
/// 2. Otherwise, if the input parses as a free-text description, that wins.
/// 3. Otherwise, an unvalidated (secondary) store hit is used.
/// 4. Otherwise resolution fails.
///
/// After a spec is selected, the US-Treasury day-count tagging invariant is
/// applied unconditionally: any bond classified as
/// [`IssuerClass::SovereignDeveloped`] with [`Currency::USD`] is tagged
/// `ActualActualBond`/`SemiAnnual`, regardless of which path produced it.
/// This guards against reference data or parsed shorthand silently carrying
/// a corporate day-count convention onto a Treasury security. It
/// deliberately does not apply to [`IssuerClass::SovereignEmerging`]: an EM
/// sovereign's USD Eurobond is not the US Treasury, even though it shares
/// the currency.
pub struct IdentifierResolver {
    stores: OrderedReferenceStore,
}

impl IdentifierResolver {
    /// Creates a resolver backed by the given reference store chain.
    #[must_use]
    pub fn new(stores: OrderedReferenceStore) -> Self {
        Self { stores }
    }

    /// Resolves a single identifier or free-text description.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::ResolutionError`] if no store, description
    /// parse, or fallback succeeds.
    pub fn resolve(&self, identifier: &str) -> FacadeResult<ResolutionResult> {
        if let Some((spec, validated)) = self.stores.lookup(identifier) {
            if validated {
                log::debug!("resolved '{identifier}' via validated reference store");
                return Ok(self.finalize(spec, ResolutionPath::ValidatedStore));
            }

            if let Ok(spec_from_description) = parse_description(identifier) {
                log::debug!("resolved '{identifier}' via description parser (over secondary store hit)");
                return Ok(self.finalize(spec_from_description, ResolutionPath::DescriptionParser));
            }

            log::debug!("resolved '{identifier}' via secondary reference store");
            return Ok(self.finalize(spec, ResolutionPath::SecondaryStore));
        }

        if let Ok(spec) = parse_description(identifier) {
            log::debug!("resolved '{identifier}' via description parser");
            return Ok(self.finalize(spec, ResolutionPath::DescriptionParser));
        }

        Err(FacadeError::ResolutionError {
            identifier: identifier.to_string(),
            reason: "no validated store, description parse, or secondary store hit".to_string(),
        })
    }

    /// Builds a [`ResolutionResult`] directly from a caller-supplied spec,
    /// bypassing the store chain and parser. Still applies the Treasury
    /// tagging invariant.
    #[must_use]
    pub fn resolve_direct(spec: BondSpec) -> ResolutionResult {
        let mut result = ResolutionResult {
            spec,
            path: ResolutionPath::Direct,
            overrides_applied: Vec::new(),
        };
        apply_treasury_tag(&mut result);
        result
    }

    fn finalize(&self, spec: BondSpec, path: ResolutionPath) -> ResolutionResult {
        let mut result = ResolutionResult {
            spec,
            path,
            overrides_applied: Vec::new(),
        };
        apply_treasury_tag(&mut result);
        result
    }
}

/// Applies user-supplied overrides to an already-resolved bond, field by
/// field, recording each applied field in `overrides_applied`.
///
/// Coupon and maturity are always overridable. Day-count is only
/// overridable when the resolution path was not [`ResolutionPath::ValidatedStore`]
/// — a validated reference record's convention tagging is authoritative and
/// takes precedence over a caller override (see the tie-break rule in
/// 4.E: validated > user override > parsed > stored).
pub fn apply_overrides(result: &mut ResolutionResult, overrides: &Overrides) {
    if let Some(coupon_rate) = overrides.coupon_rate {
        result.spec.coupon_rate = coupon_rate;
        result.overrides_applied.push("coupon_rate".to_string());
    }
    if let Some(maturity) = overrides.maturity {
        result.spec.maturity = maturity;
        result.overrides_applied.push("maturity".to_string());
    }
    if let Some(day_count) = overrides.day_count {
        if result.path != ResolutionPath::ValidatedStore {
            result.spec.conventions.day_count = day_count;
            result.overrides_applied.push("day_count".to_string());
        } else {
            log::warn!("ignoring day_count override: resolution path was a validated store hit");
        }
    }
}

fn apply_treasury_tag(result: &mut ResolutionResult) {
    if result.spec.issuer_class == IssuerClass::SovereignDeveloped
        && result.spec.currency == Currency::USD
    {
        if result.spec.conventions.day_count != DayCountBasis::ActualActualBond {
            result.spec.conventions.day_count = DayCountBasis::ActualActualBond;
            result.overrides_applied.push("day_count".to_string());
        }
        if result.spec.conventions.frequency != Frequency::SemiAnnual {
            result.spec.conventions.frequency = Frequency::SemiAnnual;
            result.overrides_applied.push("frequency".to_string());
        }
    }
}

/// Derives a conservative placeholder issue date used only to bound
/// backward schedule generation when no issue date is known.
///
/// This is deliberately *not* "maturity minus N years": for an odd-tenor or
/// reopened bond that approach can place the synthesized issue date after
/// the bond's actual dated date, which in turn can make the backward
/// schedule generator skip the bond's true first coupon. Anchoring on
/// settlement instead keeps the placeholder safely in the past without
/// assuming anything about the bond's original tenor.
#[must_use]
pub fn implied_issue_date(settlement: Date) -> Date {
    settlement
        .add_months(-12)
        .unwrap_or(settlement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{ReferenceStore, StaticReferenceStore};
    use crate::config::ReferenceStoreConfig;
    use rust_decimal_macros::dec;

    fn treasury_spec_with_wrong_convention(identifier: &str) -> BondSpec {
        BondSpec {
            identifier: identifier.to_string(),
            issuer_class: IssuerClass::SovereignDeveloped,
            coupon_rate: dec!(0.04),
            maturity: Date::from_ymd(2033, 5, 15).unwrap(),
            issue_date: Some(Date::from_ymd(2023, 5, 15).unwrap()),
            first_coupon_date: None,
            currency: Currency::USD,
            face_value: dec!(100),
            conventions: Conventions::us_corporate(),
        }
    }

    #[test]
    fn treasury_tag_overrides_wrong_day_count() {
        let mut store = StaticReferenceStore::new(ReferenceStoreConfig::validated("primary"));
        store.insert(treasury_spec_with_wrong_convention("912828XX0"));
        let resolver = IdentifierResolver::new(
            crate::reference::OrderedReferenceStore::new().with_store(Box::new(store)),
        );

        let result = resolver.resolve("912828XX0").unwrap();
        assert_eq!(result.spec.conventions.day_count, DayCountBasis::ActualActualBond);
        assert!(result.overrides_applied.contains(&"day_count".to_string()));
    }

    #[test]
    fn falls_back_to_description_parser_when_unresolved() {
        let resolver = IdentifierResolver::new(crate::reference::OrderedReferenceStore::new());
        let result = resolver.resolve("T 4.25 05/15/34").unwrap();
        assert_eq!(result.path, ResolutionPath::DescriptionParser);
        assert_eq!(result.spec.conventions.day_count, DayCountBasis::ActualActualBond);
    }

    #[test]
    fn unresolvable_identifier_errors() {
        let resolver = IdentifierResolver::new(crate::reference::OrderedReferenceStore::new());
        assert!(resolver.resolve("not a bond at all !!").is_err());
    }

    #[test]
    fn coupon_override_is_recorded_and_applied_scenario_s6() {
        let resolver = IdentifierResolver::new(crate::reference::OrderedReferenceStore::new());
        let mut result = resolver.resolve("AAPL 3.45 02/09/29").unwrap();
        let overrides = Overrides {
            coupon_rate: Some(dec!(0.0375)),
            ..Overrides::default()
        };
        apply_overrides(&mut result, &overrides);
        assert_eq!(result.spec.coupon_rate, dec!(0.0375));
        assert!(result.overrides_applied.contains(&"coupon_rate".to_string()));
    }

    #[test]
    fn day_count_override_is_ignored_for_validated_store_hits() {
        let mut store = StaticReferenceStore::new(ReferenceStoreConfig::validated("primary"));
        store.insert(treasury_spec_with_wrong_convention("912828XX0"));
        let resolver = IdentifierResolver::new(
            crate::reference::OrderedReferenceStore::new().with_store(Box::new(store)),
        );
        let mut result = resolver.resolve("912828XX0").unwrap();
        let before = result.spec.conventions.day_count;
        let overrides = Overrides {
            day_count: Some(DayCountBasis::Thirty360BondBasis),
            ..Overrides::default()
        };
        apply_overrides(&mut result, &overrides);
        assert_eq!(result.spec.conventions.day_count, before);
        assert!(!result.overrides_applied.contains(&"day_count".to_string()));
    }
}
