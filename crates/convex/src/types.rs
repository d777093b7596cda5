//! Public data types for the facade: conventions, specs, resolution results,
//! pricing inputs/outputs, and cash-flow projections.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use convex_core::calendars::BusinessDayConvention;
use convex_core::daycounts::DayCountConvention;
use convex_core::types::{Currency, Date, Frequency};

/// Day-count convention as named in bond descriptions and reference data.
///
/// Mirrors the six conventions a description/identifier can request; maps
/// onto `convex_core::daycounts::DayCountConvention` one-to-one except that
/// it hides the core crate's finer-grained variants that this facade never
/// produces on its own (e.g. `Act364`, `Act365L`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayCountBasis {
    /// ICMA Actual/Actual, used by US Treasuries and most sovereign bonds.
    ActualActualBond,
    /// ISDA Actual/Actual, split by calendar year.
    ActualActualIsda,
    /// 30/360 US (bond basis), the US corporate default.
    Thirty360BondBasis,
    /// 30E/360, the European bond-basis variant.
    Thirty360European,
    /// Actual/360, used by money-market instruments.
    Actual360,
    /// Actual/365 Fixed.
    Actual365Fixed,
}

impl DayCountBasis {
    /// Maps to the corresponding `convex-core` day-count convention.
    #[must_use]
    pub fn to_core(self) -> DayCountConvention {
        match self {
            Self::ActualActualBond => DayCountConvention::ActActIcma,
            Self::ActualActualIsda => DayCountConvention::ActActIsda,
            Self::Thirty360BondBasis => DayCountConvention::Thirty360US,
            Self::Thirty360European => DayCountConvention::Thirty360E,
            Self::Actual360 => DayCountConvention::Act360,
            Self::Actual365Fixed => DayCountConvention::Act365Fixed,
        }
    }
}

/// Business-day calendar as named in bond descriptions and reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarBasis {
    /// US Government bond market calendar (SIFMA + Good Friday).
    UsGovernment,
    /// US NYSE / banking calendar.
    UsNyse,
    /// TARGET2 Eurozone calendar.
    Target,
    /// UK bank holiday calendar.
    Uk,
    /// No holidays observed; every day is a business day.
    NullCalendar,
}

impl CalendarBasis {
    /// Maps to the `CalendarId` string the bonds crate dispatches on.
    #[must_use]
    pub fn to_calendar_id(self) -> convex_bonds::types::CalendarId {
        use convex_bonds::types::CalendarId;
        match self {
            Self::UsGovernment => CalendarId::new(CalendarId::US_GOVERNMENT),
            Self::UsNyse => CalendarId::new(CalendarId::NYC),
            Self::Target => CalendarId::new(CalendarId::TARGET2),
            Self::Uk => CalendarId::new(CalendarId::UK),
            Self::NullCalendar => CalendarId::new("NONE"),
        }
    }
}

/// Issuer classification, used by the resolver and description parser to
/// pick sane conventions when explicit ones aren't supplied, and by the
/// pricing engine to decide whether a bond is itself the G-spread benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssuerClass {
    /// A developed-market sovereign issuing in its own currency (US
    /// Treasury, UK Gilt, German Bund). The G-spread benchmark itself when
    /// denominated in USD: [`crate::pricing::price_bond`] reports no
    /// G-spread for these.
    SovereignDeveloped,
    /// A sovereign issuing debt in a currency that is not its own (e.g. a
    /// Latin American or other EM government's USD-denominated Eurobond).
    /// Still priced against the USD treasury curve for G-spread purposes.
    SovereignEmerging,
    /// Investment-grade or high-yield corporate issuer.
    Corporate,
    /// A supranational issuer (World Bank, EIB, and similar), treated like
    /// corporate by default for convention purposes.
    Supranational,
    /// An agency or government-sponsored issuer, treated like corporate by
    /// default for convention purposes.
    Agency,
}

impl IssuerClass {
    /// True for either sovereign variant, used wherever code only needs to
    /// know "this is a government issuer" without caring whether it's the
    /// domestic benchmark or a foreign borrower in that currency.
    #[must_use]
    pub fn is_sovereign(self) -> bool {
        matches!(self, Self::SovereignDeveloped | Self::SovereignEmerging)
    }
}

/// The day-count/frequency/calendar/settlement conventions governing accrual
/// and cash-flow generation for a single bond.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conventions {
    /// Day-count convention for accrual and year-fraction math.
    pub day_count: DayCountBasis,
    /// Coupon payment frequency.
    pub frequency: Frequency,
    /// Business-day calendar for coupon/maturity adjustment.
    pub calendar: CalendarBasis,
    /// Business-day adjustment convention.
    pub business_day_convention: BusinessDayConvention,
    /// Standard settlement lag in business days (T+n).
    pub settlement_days: u32,
    /// End-of-month coupon date rule.
    pub end_of_month: bool,
    /// Ex-dividend period in business days, if the market uses record dates
    /// (e.g. 7 for UK Gilts). `None` means accrued interest is always
    /// computed the standard way.
    pub ex_dividend_days: Option<u32>,
}

impl Conventions {
    /// US Treasury note/bond conventions: ACT/ACT ICMA, semi-annual, T+1,
    /// US Government calendar.
    #[must_use]
    pub fn us_treasury() -> Self {
        Self {
            day_count: DayCountBasis::ActualActualBond,
            frequency: Frequency::SemiAnnual,
            calendar: CalendarBasis::UsGovernment,
            business_day_convention: BusinessDayConvention::Following,
            settlement_days: 1,
            end_of_month: true,
            ex_dividend_days: None,
        }
    }

    /// US corporate bond conventions: 30/360 US, semi-annual, T+2, NYSE
    /// calendar.
    #[must_use]
    pub fn us_corporate() -> Self {
        Self {
            day_count: DayCountBasis::Thirty360BondBasis,
            frequency: Frequency::SemiAnnual,
            calendar: CalendarBasis::UsNyse,
            business_day_convention: BusinessDayConvention::Following,
            settlement_days: 2,
            end_of_month: true,
            ex_dividend_days: None,
        }
    }

    /// UK Gilt conventions: ACT/ACT ICMA, semi-annual, T+1, 7-business-day
    /// ex-dividend period.
    #[must_use]
    pub fn uk_gilt() -> Self {
        Self {
            day_count: DayCountBasis::ActualActualBond,
            frequency: Frequency::SemiAnnual,
            calendar: CalendarBasis::Uk,
            business_day_convention: BusinessDayConvention::Following,
            settlement_days: 1,
            end_of_month: true,
            ex_dividend_days: Some(7),
        }
    }

    /// German Bund conventions: ACT/ACT ICMA, annual, T+2, TARGET2 calendar.
    #[must_use]
    pub fn german_bund() -> Self {
        Self {
            day_count: DayCountBasis::ActualActualBond,
            frequency: Frequency::Annual,
            calendar: CalendarBasis::Target,
            business_day_convention: BusinessDayConvention::Following,
            settlement_days: 2,
            end_of_month: true,
            ex_dividend_days: None,
        }
    }

    /// Conventions implied by a bare issuer class, used when neither a
    /// validated reference record nor a parsed description supplies them.
    #[must_use]
    pub fn for_issuer_class(class: IssuerClass, currency: Currency) -> Self {
        match (class, currency) {
            (IssuerClass::SovereignDeveloped, Currency::GBP) => Self::uk_gilt(),
            (IssuerClass::SovereignDeveloped, Currency::EUR) => Self::german_bund(),
            (IssuerClass::SovereignDeveloped, _) => Self::us_treasury(),
            // An EM sovereign's USD Eurobond still settles and accrues the
            // way the US Treasury market does; it just isn't the benchmark.
            (IssuerClass::SovereignEmerging, _) => Self::us_treasury(),
            (IssuerClass::Corporate | IssuerClass::Supranational | IssuerClass::Agency, _) => {
                Self::us_corporate()
            }
        }
    }
}

/// A fully specified bond: terms plus conventions, independent of any
/// particular resolution path. Constructed by the resolver from a validated
/// reference record, a parsed description, or directly by a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondSpec {
    /// Preferred security identifier (CUSIP, ISIN, or internal id), used
    /// only for display/round-tripping; not re-validated.
    pub identifier: String,
    /// Issuer classification, used to pick a schedule-generation anchor.
    pub issuer_class: IssuerClass,
    /// Annual coupon rate as a decimal (0.05 for 5%).
    pub coupon_rate: Decimal,
    /// Maturity date.
    pub maturity: Date,
    /// Issue date, if known. When absent the schedule builder derives a
    /// conservative placeholder (see [`crate::resolver::implied_issue_date`]).
    pub issue_date: Option<Date>,
    /// First regular coupon date, if known and different from what backward
    /// generation from maturity would otherwise produce (e.g. a reopened
    /// bond with a short first stub). `None` means the schedule has no
    /// stub: every period is regular.
    pub first_coupon_date: Option<Date>,
    /// Settlement currency.
    pub currency: Currency,
    /// Face value per unit (default 100).
    pub face_value: Decimal,
    /// Conventions governing accrual and schedule generation.
    pub conventions: Conventions,
}

/// The path by which a bond was located, reported so callers can audit
/// resolution behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionPath {
    /// Found in the validated primary reference store.
    ValidatedStore,
    /// Parsed from a free-text description.
    DescriptionParser,
    /// Found via a secondary (lower-priority) reference store.
    SecondaryStore,
    /// Supplied directly by the caller, bypassing resolution entirely.
    Direct,
}

/// The outcome of resolving an identifier or description to a [`BondSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// The resolved bond specification.
    pub spec: BondSpec,
    /// How it was found.
    pub path: ResolutionPath,
    /// Convention fields that were overridden after resolution (e.g. the
    /// mandatory Treasury day-count tag), keyed by field name.
    pub overrides_applied: Vec<String>,
}

/// Input to a single-bond pricing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingInput {
    /// Clean market price, as a percentage of par (e.g. 98.50).
    pub clean_price: Decimal,
    /// Settlement date for accrued interest and discounting.
    pub settlement: Date,
    /// Spread basis used when computing the G-spread benchmark. Defaults to
    /// [`SpreadBasis::Interpolated`] when omitted.
    pub spread_basis: Option<SpreadBasis>,
}

/// How the G-spread benchmark yield is selected from the treasury curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpreadBasis {
    /// Interpolate the par curve at the bond's exact maturity tenor.
    #[default]
    Interpolated,
    /// Use the nearest on-the-run tenor point without interpolating.
    NearestTenor,
}

/// Computed analytics for a single bond as of a settlement date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analytics {
    /// Clean price supplied as input.
    pub clean_price: Decimal,
    /// Dirty (full) price: clean price + accrued interest.
    pub dirty_price: Decimal,
    /// Accrued interest per 100 face value.
    pub accrued_interest: Decimal,
    /// Yield to maturity on the bond's native compounding basis (e.g. the
    /// semi-annual periodic rate for a Treasury).
    pub yield_to_maturity: Decimal,
    /// Yield to maturity restated on an annually-compounded basis:
    /// `(1 + ytm/f)^f - 1`. Equal to `yield_to_maturity` when `f == 1`.
    pub yield_to_maturity_annual: Decimal,
    /// Macaulay duration, in years. Invariant to compounding basis.
    pub macaulay_duration: Decimal,
    /// Modified duration on the bond's native compounding basis, in years.
    pub modified_duration: Decimal,
    /// Modified duration restated against the annually-compounded yield:
    /// `modified_duration * (1 + ytm/f) / (1 + ytm_annual)`.
    pub modified_duration_annual: Decimal,
    /// Convexity.
    pub convexity: Decimal,
    /// Price value of a basis point (PVBP/DV01) per 100 face value.
    pub pvbp: Decimal,
    /// G-spread versus the interpolated treasury par curve, in basis points.
    pub g_spread: Option<Decimal>,
    /// Z-spread versus the treasury zero curve, in basis points.
    pub z_spread: Option<Decimal>,
    /// Z-spread DV01: price sensitivity to a 1bp parallel shift of the
    /// Z-spread, per 100 face value.
    pub z_spread_dv01: Option<Decimal>,
    /// Settlement date these analytics were computed as of.
    pub settlement_date: Date,
}

/// A single projected cash flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlow {
    /// Payment date.
    pub date: Date,
    /// Total cash amount per 100 face value (coupon plus any principal).
    pub amount: Decimal,
    /// Coupon portion of the amount.
    pub coupon: Decimal,
    /// Principal portion of the amount (zero except at/after maturity).
    pub principal: Decimal,
}

/// Filter controlling which projected cash flows are returned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum CashFlowFilter {
    /// All remaining cash flows.
    All,
    /// Only the next cash flow.
    Next,
    /// All cash flows within the next `n` days.
    Period(u32),
}

/// A single portfolio holding: a resolved bond plus a position size and
/// market price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    /// Caller-supplied identifier for this position (ticker, internal id,
    /// lot id, etc.). Used only for reporting; need not be unique.
    pub id: String,
    /// Identifier or description used to resolve the bond.
    pub identifier: String,
    /// Par/face amount held.
    pub par_amount: Decimal,
    /// Clean market price, as a percentage of par.
    pub clean_price: Decimal,
}

/// Per-holding pricing outcome within a portfolio valuation, reported
/// whether it succeeded or failed so failures can be isolated without
/// discarding the rest of the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HoldingOutcome {
    /// The holding priced successfully.
    Priced(Analytics),
    /// The holding could not be resolved or priced; the portfolio-level
    /// weights are renormalized across the remaining successes.
    Failed(String),
}

/// Portfolio-level roll-up: market-value-weighted averages of the
/// successfully priced holdings, plus a per-holding breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAnalytics {
    /// Per-holding id and its pricing outcome, in input order.
    pub holdings: Vec<(String, HoldingOutcome)>,
    /// Number of holdings that priced successfully.
    pub successes: usize,
    /// Total number of holdings attempted.
    pub total: usize,
    /// Market-value-weighted average yield to maturity across successes.
    pub weighted_yield: Option<Decimal>,
    /// Market-value-weighted average modified duration across successes.
    pub weighted_modified_duration: Option<Decimal>,
    /// Market-value-weighted average convexity across successes.
    pub weighted_convexity: Option<Decimal>,
    /// Total market value (clean price * par / 100) of successfully priced
    /// holdings, in the portfolio's pricing currency.
    pub total_market_value: Decimal,
}

/// A single (tenor-years, par-yield) point used to build a treasury curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Tenor in years from the curve's reference date.
    pub tenor_years: Decimal,
    /// Par yield at this tenor, as a decimal (0.04 for 4%).
    pub par_yield: Decimal,
}

/// Cash flows merged and summed by date across an entire portfolio.
pub type PortfolioCashFlows = BTreeMap<Date, Decimal>;

/// Caller-supplied overrides applied to a resolved [`BondSpec`] after
/// resolution. Coupon and maturity are always honored; `day_count` is
/// ignored when the resolution path was a validated store hit (see
/// [`crate::resolver::apply_overrides`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Overrides {
    /// Replaces the resolved coupon rate.
    pub coupon_rate: Option<Decimal>,
    /// Replaces the resolved maturity date.
    pub maturity: Option<Date>,
    /// Replaces the resolved day-count convention, unless the bond came
    /// from a validated reference store.
    pub day_count: Option<DayCountBasis>,
}

/// The path by which a bond was located, restated in the wire vocabulary
/// the core facade's response surface uses (`validated`, `parsed`,
/// `primary`, `secondary`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionTag {
    /// Resolved from a validated reference store entry.
    Validated,
    /// Resolved by parsing a free-text description.
    Parsed,
    /// Resolved via the (highest-priority) non-validated reference store.
    Primary,
    /// Resolved via a lower-priority non-validated reference store.
    Secondary,
    /// Supplied directly by the caller, bypassing resolution.
    Direct,
}

impl From<ResolutionPath> for ResolutionTag {
    fn from(path: ResolutionPath) -> Self {
        match path {
            ResolutionPath::ValidatedStore => Self::Validated,
            ResolutionPath::DescriptionParser => Self::Parsed,
            ResolutionPath::SecondaryStore => Self::Secondary,
            ResolutionPath::Direct => Self::Direct,
        }
    }
}

/// Request to [`crate::ConvexEngine::analyze_bond`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeBondRequest {
    /// A security identifier (CUSIP, ISIN, or internal id) to resolve
    /// against the reference store chain. At least one of `identifier` or
    /// `description` must be supplied.
    pub identifier: Option<String>,
    /// A free-text bond description to resolve via the description parser.
    pub description: Option<String>,
    /// Clean market price, as a percentage of par.
    pub clean_price: Decimal,
    /// Settlement date. Defaults to the prior calendar month-end when
    /// omitted (see [`crate::default_settlement_date`]).
    pub settlement_date: Option<Date>,
    /// Field-by-field overrides applied after resolution.
    pub overrides: Option<Overrides>,
    /// G-spread benchmark selection strategy.
    pub spread_basis: Option<SpreadBasis>,
}

/// Response from [`crate::ConvexEngine::analyze_bond`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeBondResponse {
    /// The resolved bond, with any overrides applied.
    pub resolved_bond: BondSpec,
    /// Computed analytics as of the settlement date.
    pub analytics: Analytics,
    /// How the bond was resolved.
    pub resolution_tag: ResolutionTag,
    /// Field names that were overridden after resolution.
    pub overrides_applied: Vec<String>,
    /// Non-fatal advisories (e.g. a requested spread could not be computed
    /// because no treasury curve is published).
    pub warnings: Vec<String>,
}

/// Request to [`crate::ConvexEngine::analyze_portfolio`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzePortfolioRequest {
    /// The portfolio's holdings.
    pub holdings: Vec<Holding>,
    /// Settlement date applied uniformly to every holding. Defaults to the
    /// prior calendar month-end when omitted.
    pub settlement_date: Option<Date>,
}

/// A single holding's outcome, named by its caller-supplied id, within an
/// [`AnalyzePortfolioResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerBondOutcome {
    /// The holding's caller-supplied id.
    pub id: String,
    /// Whether it priced successfully or why it failed.
    pub outcome: HoldingOutcome,
}

/// Portfolio-level weighted roll-up, excluding the per-holding breakdown
/// (reported separately as `per_bond`/`failed` on the response).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Market-value-weighted average yield to maturity across successes.
    pub weighted_yield: Option<Decimal>,
    /// Market-value-weighted average modified duration across successes.
    pub weighted_modified_duration: Option<Decimal>,
    /// Market-value-weighted average convexity across successes.
    pub weighted_convexity: Option<Decimal>,
    /// Total market value of successfully priced holdings.
    pub total_market_value: Decimal,
}

/// Response from [`crate::ConvexEngine::analyze_portfolio`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzePortfolioResponse {
    /// Weighted portfolio-level metrics across successfully priced holdings.
    pub portfolio_metrics: PortfolioMetrics,
    /// Every holding's outcome, in input order.
    pub per_bond: Vec<PerBondOutcome>,
    /// Fraction of holdings that priced successfully, in `[0, 1]`.
    pub success_rate: f64,
    /// The subset of `per_bond` that failed, for quick diagnosis.
    pub failed: Vec<PerBondOutcome>,
}

/// Request to [`crate::ConvexEngine::cash_flows`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowRequest {
    /// Holdings to project cash flows for. `clean_price` is unused by this
    /// request but kept on `Holding` so the same type serves both this and
    /// [`AnalyzePortfolioRequest`].
    pub holdings: Vec<Holding>,
    /// Which flows to include.
    pub filter: CashFlowFilter,
    /// Settlement date applied uniformly to every holding. Defaults to the
    /// prior calendar month-end when omitted.
    pub settlement_date: Option<Date>,
}

/// A single projected cash flow, scaled to a holding's par amount and
/// annotated with its distance from settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectedCashFlow {
    /// Payment date.
    pub date: Date,
    /// Total cash amount (coupon plus any principal), scaled to the
    /// holding's par amount.
    pub amount: Decimal,
    /// Coupon portion of the amount.
    pub coupon: Decimal,
    /// Principal portion of the amount.
    pub principal: Decimal,
    /// Calendar days between settlement and this flow's date.
    pub days_from_settlement: i64,
}

/// Summary statistics over a [`CashFlowResponse`]'s flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowSummary {
    /// Number of flows returned.
    pub total_flows: usize,
    /// Sum of every flow's amount.
    pub total_amount: Decimal,
    /// Earliest flow date, if any.
    pub earliest: Option<Date>,
    /// Latest flow date, if any.
    pub latest: Option<Date>,
}

/// Response from [`crate::ConvexEngine::cash_flows`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowResponse {
    /// Merged, date-sorted, same-date-summed cash flows across every
    /// holding that resolved successfully.
    pub flows: Vec<ProjectedCashFlow>,
    /// Summary statistics over `flows`.
    pub summary: CashFlowSummary,
    /// Holding ids that could not be resolved, excluded from `flows`.
    pub failed: Vec<PerBondOutcome>,
}
