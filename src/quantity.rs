//! Exact amount arithmetic for yields and ingredient quantities.
//!
//! Amounts follow the grammar `NUMBER[-NUMBER][ UNIT]` where a number may use
//! either `.` or `,` as decimal separator (or be a plain `a/b` fraction).
//! Values are held as [`Rational64`] so repeated scaling never drifts; only
//! [`format_decimal`] rounds, to two fractional digits.

use lazy_static::lazy_static;
use log::{debug, warn};
use num_rational::Rational64;
use num_traits::{CheckedMul, One, ToPrimitive, Zero};
use regex::Regex;
use std::fmt;

/// Separates parallel yield tracks, e.g. `4 servings | 2 kg dough`
pub const TRACK_SEPARATOR: char = '|';

lazy_static! {
    static ref AMOUNT_UNIT: Regex = Regex::new(
        r"(?s)^\s*(\d+(?:[.,]\d+)?(?:/\d+)?(?:\s*-\s*\d+(?:[.,]\d+)?(?:/\d+)?)?)(.*)$"
    )
    .unwrap();
}

/// A single value or an inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Single(Rational64),
    Range(Rational64, Rational64),
}

impl Quantity {
    /// Parse `NUMBER` or `NUMBER-NUMBER`
    pub fn parse(text: &str) -> Option<Self> {
        match text.split_once('-') {
            Some((low, high)) => Some(Quantity::Range(parse_number(low)?, parse_number(high)?)),
            None => parse_number(text).map(Quantity::Single),
        }
    }

    /// The single value, or the lower end of a range
    pub fn first(&self) -> Rational64 {
        match *self {
            Quantity::Single(value) | Quantity::Range(value, _) => value,
        }
    }

    /// Multiply every endpoint; `None` on overflow
    pub fn scale(&self, multiplier: Rational64) -> Option<Self> {
        match self {
            Quantity::Single(value) => value.checked_mul(&multiplier).map(Quantity::Single),
            Quantity::Range(low, high) => Some(Quantity::Range(
                low.checked_mul(&multiplier)?,
                high.checked_mul(&multiplier)?,
            )),
        }
    }

    /// Formatted endpoints, one entry for a single value and two for a range
    pub fn endpoints(&self) -> Vec<String> {
        match *self {
            Quantity::Single(value) => vec![format_decimal(value)],
            Quantity::Range(low, high) => vec![format_decimal(low), format_decimal(high)],
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.endpoints().join("-"))
    }
}

/// A parsed quantity with its (possibly empty) unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    pub quantity: Quantity,
    pub unit: String,
}

impl Amount {
    /// Parse an amount-unit expression; `None` when it has no leading number
    pub fn parse(text: &str) -> Option<Self> {
        let captures = AMOUNT_UNIT.captures(text)?;
        Some(Amount {
            quantity: Quantity::parse(&captures[1])?,
            unit: captures[2].trim().to_string(),
        })
    }

    pub fn scale(&self, multiplier: Rational64) -> Option<Self> {
        Some(Amount {
            quantity: self.quantity.scale(multiplier)?,
            unit: self.unit.clone(),
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.quantity)
        } else {
            write!(f, "{} {}", self.quantity, self.unit)
        }
    }
}

/// Split an amount expression into its numeric part and unit.
///
/// Text without a leading number is returned whole as the numeric part with an
/// empty unit, so callers can still display it verbatim.
pub fn split_amount_unit(text: &str) -> (String, String) {
    match AMOUNT_UNIT.captures(text) {
        Some(captures) => (
            captures[1].trim().to_string(),
            captures[2].trim().to_string(),
        ),
        None => (text.trim().to_string(), String::new()),
    }
}

/// Base value of an amount: the single value or the lower end of a range.
///
/// Placeholders such as "to taste" count as 1.
pub fn split_amount(text: &str) -> Rational64 {
    let (numeric, _) = split_amount_unit(text);
    let first = numeric.split('-').next().unwrap_or_default();
    parse_number(first).unwrap_or_else(|| {
        debug!("Amount '{}' is not numeric, assuming 1", text);
        Rational64::one()
    })
}

/// Scale an amount expression, keeping its unit.
///
/// Text without a recognizable quantity is returned unchanged.
pub fn multiply_amount(text: &str, multiplier: Rational64) -> String {
    let Some(amount) = Amount::parse(text) else {
        return text.to_string();
    };
    match amount.scale(multiplier) {
        Some(scaled) => scaled.to_string(),
        None => {
            warn!("Scaling '{}' by {} overflowed, keeping original", text, multiplier);
            text.to_string()
        }
    }
}

/// Split a yields field into its tracks, trimmed, empty tracks dropped
pub fn split_amount_list(yields: &str) -> Vec<String> {
    yields
        .split(TRACK_SEPARATOR)
        .map(str::trim)
        .filter(|track| !track.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a multiplier typed by a user (`1.5`, `1,5`, `3/2`); negative input is rejected
pub fn parse_multiplier(text: &str) -> Option<Rational64> {
    parse_number(text)
}

/// Parse a single non-negative number with `.` or `,` as decimal separator,
/// or a plain fraction `a/b`
pub fn parse_number(text: &str) -> Option<Rational64> {
    let normalized = text.trim().replace(',', ".");
    if let Some((numerator, denominator)) = normalized.split_once('/') {
        let numerator = parse_digits(numerator.trim())?;
        let denominator = parse_digits(denominator.trim())?;
        if denominator.is_zero() {
            return None;
        }
        return Some(Rational64::new(numerator, denominator));
    }

    let (whole, fraction) = normalized
        .split_once('.')
        .unwrap_or((normalized.as_str(), ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let whole = if whole.is_empty() { 0 } else { parse_digits(whole)? };
    if fraction.is_empty() {
        return Some(Rational64::from_integer(whole));
    }
    let scale = 10i64.checked_pow(u32::try_from(fraction.len()).ok()?)?;
    let numerator = whole
        .checked_mul(scale)?
        .checked_add(parse_digits(fraction)?)?;
    Some(Rational64::new(numerator, scale))
}

fn parse_digits(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Render a value with at most two fractional digits, dropping trailing zeros
pub fn format_decimal(value: Rational64) -> String {
    let hundredths = match value.checked_mul(&Rational64::from_integer(100)) {
        Some(scaled) => scaled.round().to_integer(),
        None => {
            let approx = format!("{:.2}", value.to_f64().unwrap_or_default());
            return trim_fraction(&approx);
        }
    };
    let sign = if hundredths < 0 { "-" } else { "" };
    let magnitude = hundredths.unsigned_abs();
    trim_fraction(&format!("{}{}.{:02}", sign, magnitude / 100, magnitude % 100))
}

fn trim_fraction(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}
