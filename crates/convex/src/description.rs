//! Free-text bond description parsing.
//!
//! Two shorthand families are recognized, matching how each market's desks
//! actually paste these out of a blotter:
//!
//! - **Ticker shorthand** (no commas): `"T 4.25 05/15/34"`, `"UST 4 3/8
//!   02/28/30"`, `"AAPL 3.25 02/23/2032"`, `"UKT 4 1/4 2036"`. The numeric
//!   date field may be `MM/DD` or `DD/MM` order; when ambiguous (both
//!   components ≤ 12) the issuer class decides: US-corporate defaults
//!   `MM/DD`, every other issuer class (including US Treasuries) defaults
//!   `DD/MM`. A component > 12 always resolves the order unambiguously
//!   regardless of issuer class, e.g. `15/08/52` is always 15 August 2052.
//! - **Long-form sovereign** (comma-separated): `"PANAMA, 3.87%, 23-Jul-2060"`
//!   — issuer name, percent-suffixed coupon, and a `DD-Mon-YYYY` maturity.
//!
//! No regex is used, matching the rest of this workspace: both parsers are
//! small hand-written tokenizers.

use convex_core::types::{Currency, Date};

use crate::error::{FacadeError, FacadeResult};
use crate::types::{BondSpec, Conventions, IssuerClass};

/// Parses a free-text bond description into a [`BondSpec`].
///
/// Returns [`FacadeError::ParseError`] if the description does not match
/// any recognized shorthand.
pub fn parse_description(description: &str) -> FacadeResult<BondSpec> {
    let trimmed = description.trim();
    if trimmed.contains(',') {
        parse_long_form_sovereign(trimmed, description)
    } else {
        parse_ticker_shorthand(trimmed, description)
    }
}

fn parse_err(description: &str, reason: &str) -> FacadeError {
    FacadeError::ParseError {
        description: description.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_ticker_shorthand(trimmed: &str, description: &str) -> FacadeResult<BondSpec> {
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(parse_err(description, "expected at least issuer, coupon, maturity"));
    }

    let issuer_token = tokens[0].to_uppercase();
    let issuer_class = classify_issuer(&issuer_token);
    let currency = default_currency(&issuer_token, issuer_class);

    let (coupon_tokens_end, coupon_rate) = parse_coupon(&tokens[1..], description)?;
    let maturity_tokens = &tokens[1 + coupon_tokens_end..];
    if maturity_tokens.is_empty() {
        return Err(parse_err(description, "missing maturity date"));
    }
    let maturity = parse_numeric_maturity(maturity_tokens, issuer_class, currency, description)?;

    let conventions = Conventions::for_issuer_class(issuer_class, currency);

    Ok(BondSpec {
        identifier: trimmed.to_string(),
        issuer_class,
        coupon_rate,
        maturity,
        issue_date: None,
        first_coupon_date: None,
        currency,
        face_value: rust_decimal::Decimal::ONE_HUNDRED,
        conventions,
    })
}

/// Parses `"ISSUER, coupon%, DD-Mon-YYYY"`, the shorthand dollar-denominated
/// sovereigns are quoted in (e.g. Latin American and other EM issuers).
/// Treated as [`IssuerClass::SovereignEmerging`] unconditionally: this
/// format is only ever used for foreign-government USD paper in this
/// workspace's reference data, never the domestic US Treasury itself.
fn parse_long_form_sovereign(trimmed: &str, description: &str) -> FacadeResult<BondSpec> {
    let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    let [issuer, coupon_field, maturity_field] = fields.as_slice() else {
        return Err(parse_err(
            description,
            "expected \"issuer, coupon%, DD-Mon-YYYY\"",
        ));
    };

    let coupon_rate = parse_percent_coupon(coupon_field, description)?;
    let maturity = parse_month_name_maturity(maturity_field, description)?;
    let currency = Currency::USD;
    let issuer_class = IssuerClass::SovereignEmerging;

    Ok(BondSpec {
        identifier: issuer.to_string(),
        issuer_class,
        coupon_rate,
        maturity,
        issue_date: None,
        first_coupon_date: None,
        currency,
        face_value: rust_decimal::Decimal::ONE_HUNDRED,
        conventions: Conventions::for_issuer_class(issuer_class, currency),
    })
}

/// Classifies the issuer token into a broad class used to pick default
/// conventions. Recognizes the shorthand prefixes used by US Treasuries,
/// UK Gilts, and German Bunds; anything else is treated as corporate.
fn classify_issuer(issuer_token: &str) -> IssuerClass {
    match issuer_token {
        "T" | "UST" | "TREASURY" => IssuerClass::SovereignDeveloped,
        "UKT" | "GILT" => IssuerClass::SovereignDeveloped,
        "DBR" | "BUND" => IssuerClass::SovereignDeveloped,
        _ => IssuerClass::Corporate,
    }
}

fn default_currency(issuer_token: &str, _class: IssuerClass) -> Currency {
    match issuer_token {
        "UKT" | "GILT" => Currency::GBP,
        "DBR" | "BUND" => Currency::EUR,
        _ => Currency::USD,
    }
}

/// Parses the coupon field, which may be a plain decimal (`4.25`) or a
/// whole-number-plus-fraction pair (`4 3/8` -> 4.375). Returns the number of
/// tokens consumed (1 or 2) and the coupon as a decimal rate (0.0425, not
/// 4.25).
fn parse_coupon(tokens: &[&str], description: &str) -> FacadeResult<(usize, rust_decimal::Decimal)> {
    use rust_decimal::Decimal;

    let first = tokens
        .first()
        .ok_or_else(|| parse_err(description, "missing coupon"))?;

    // Look ahead for a fraction like "3/8".
    if let Some(second) = tokens.get(1) {
        if let Some((num, den)) = second.split_once('/') {
            if let (Ok(whole), Ok(num), Ok(den)) =
                (first.parse::<i64>(), num.parse::<i64>(), den.parse::<i64>())
            {
                if den != 0 {
                    let whole = Decimal::from(whole);
                    let frac = Decimal::from(num) / Decimal::from(den);
                    let percent = whole + frac;
                    return Ok((2, percent / Decimal::ONE_HUNDRED));
                }
            }
        }
    }

    let percent: Decimal = first
        .parse()
        .map_err(|_| parse_err(description, "coupon is not a number"))?;
    Ok((1, percent / Decimal::ONE_HUNDRED))
}

/// Parses a `"3.87%"`-style coupon field into a decimal rate (0.0387).
fn parse_percent_coupon(field: &str, description: &str) -> FacadeResult<rust_decimal::Decimal> {
    let stripped = field.trim().trim_end_matches('%');
    let percent: rust_decimal::Decimal = stripped
        .parse()
        .map_err(|_| parse_err(description, "coupon is not a percentage"))?;
    Ok(percent / rust_decimal::Decimal::ONE_HUNDRED)
}

/// Parses a numeric maturity field (`MM/DD/YY`, `MM/DD/YYYY`, `DD/MM/YY`,
/// `DD/MM/YYYY`, or a bare four-digit year). `issuer_class`/`currency` break
/// ties when both numeric components are ≤ 12 and the order is genuinely
/// ambiguous.
fn parse_numeric_maturity(
    tokens: &[&str],
    issuer_class: IssuerClass,
    currency: Currency,
    description: &str,
) -> FacadeResult<Date> {
    let field = tokens[0];
    let parts: Vec<&str> = field.split('/').collect();

    match parts.as_slice() {
        [a, b, yy] => {
            let a: u32 = a.parse().map_err(|_| parse_err(description, "bad date field"))?;
            let b: u32 = b.parse().map_err(|_| parse_err(description, "bad date field"))?;
            let year = expand_year(yy, description)?;
            let (month, day) = disambiguate_month_day(a, b, issuer_class, currency);
            Date::from_ymd(year, month, day).map_err(|e| parse_err(description, &e.to_string()))
        }
        [year_only] if year_only.len() == 4 => {
            let year: i32 = year_only
                .parse()
                .map_err(|_| parse_err(description, "bad year"))?;
            Date::from_ymd(year, 6, 30).map_err(|e| parse_err(description, &e.to_string()))
        }
        _ => Err(parse_err(description, "unrecognized maturity format")),
    }
}

/// Resolves two numeric date components into (month, day). A component
/// greater than 12 unambiguously identifies itself as the day; when both
/// are ≤ 12, a US-corporate issuer defaults to `MM/DD`, and every other
/// issuer class — including US Treasuries themselves — defaults to
/// `DD/MM`.
fn disambiguate_month_day(a: u32, b: u32, issuer_class: IssuerClass, currency: Currency) -> (u32, u32) {
    if a > 12 {
        (b, a)
    } else if b > 12 {
        (a, b)
    } else if issuer_class == IssuerClass::Corporate && currency == Currency::USD {
        (a, b)
    } else {
        (b, a)
    }
}

/// Parses a `"23-Jul-2060"`-style maturity field.
fn parse_month_name_maturity(field: &str, description: &str) -> FacadeResult<Date> {
    let parts: Vec<&str> = field.split('-').collect();
    let [day, month_name, year] = parts.as_slice() else {
        return Err(parse_err(description, "expected DD-Mon-YYYY maturity"));
    };
    let day: u32 = day.parse().map_err(|_| parse_err(description, "bad day"))?;
    let month = month_from_name(month_name).ok_or_else(|| parse_err(description, "unrecognized month name"))?;
    let year: i32 = year.parse().map_err(|_| parse_err(description, "bad year"))?;
    Date::from_ymd(year, month, day).map_err(|e| parse_err(description, &e.to_string()))
}

fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

/// Expands a two-digit year to the candidate century whose result lands
/// within `[today-30, today+70]`, the window a blotter paste is expected to
/// fall in. Four-digit years pass through unchanged.
fn expand_year(yy: &str, description: &str) -> FacadeResult<i32> {
    let value: i32 = yy.parse().map_err(|_| parse_err(description, "bad year"))?;
    if yy.len() >= 4 {
        return Ok(value);
    }

    let current = Date::today().year();
    let window = (current - 30)..=(current + 70);
    [1900 + value, 2000 + value, 2100 + value]
        .into_iter()
        .find(|candidate| window.contains(candidate))
        .or_else(|| {
            [1900 + value, 2000 + value, 2100 + value]
                .into_iter()
                .min_by_key(|candidate| (candidate - current).abs())
        })
        .ok_or_else(|| parse_err(description, "could not resolve two-digit year"))
}
