//! pt-BR display formatting for amounts, weights and volumes.
//!
//! Every formatter accepts anything implementing [`NumericInput`]: plain
//! numbers, decimals, optional values or raw text read the way a browser
//! reads a form attribute (leading numeric prefix). Values that cannot be
//! read render as [`UNAVAILABLE`] instead of failing.

use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::LazyLock;

/// Sentinel shown for missing or malformed numbers.
pub const UNAVAILABLE: &str = "-";

pub const CURRENCY_PREFIX: &str = "R$ ";

/// Digits a `Decimal` can hold without overflowing.
pub const MAX_CURRENCY_DIGITS: usize = 28;

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("numeric prefix pattern")
});

pub trait NumericInput {
    fn to_decimal(&self) -> Option<Decimal>;
}

impl NumericInput for f64 {
    fn to_decimal(&self) -> Option<Decimal> {
        if !self.is_finite() {
            return None;
        }
        Decimal::from_f64(*self)
    }
}

impl NumericInput for Decimal {
    fn to_decimal(&self) -> Option<Decimal> {
        Some(*self)
    }
}

impl NumericInput for u32 {
    fn to_decimal(&self) -> Option<Decimal> {
        Some(Decimal::from(*self))
    }
}

impl NumericInput for u64 {
    fn to_decimal(&self) -> Option<Decimal> {
        Some(Decimal::from(*self))
    }
}

impl NumericInput for str {
    fn to_decimal(&self) -> Option<Decimal> {
        parse_number(self)
    }
}

impl NumericInput for String {
    fn to_decimal(&self) -> Option<Decimal> {
        parse_number(self)
    }
}

impl<T: NumericInput> NumericInput for Option<T> {
    fn to_decimal(&self) -> Option<Decimal> {
        self.as_ref().and_then(NumericInput::to_decimal)
    }
}

/// 讀取字串開頭的數字部分，例如 "12.5kg" -> 12.5
pub fn parse_number(raw: &str) -> Option<Decimal> {
    let prefix = NUMERIC_PREFIX.find(raw.trim_start())?.as_str();

    let (negative, unsigned) = match prefix.as_bytes()[0] {
        b'-' => (true, &prefix[1..]),
        b'+' => (false, &prefix[1..]),
        _ => (false, prefix),
    };
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(unsigned[at + 1..].trim_start_matches('+'))),
        None => (unsigned, None),
    };
    // "12." and ".5" are valid prefixes but not valid decimals
    let mantissa = mantissa.trim_end_matches('.');
    let mantissa = if mantissa.starts_with('.') {
        format!("0{}", mantissa)
    } else {
        mantissa.to_string()
    };

    let value = match exponent {
        Some(exp) => Decimal::from_scientific(&format!("{}e{}", mantissa, exp)).ok()?,
        None => Decimal::from_str(&mantissa).ok()?,
    };
    Some(if negative { -value } else { value })
}

/// `R$ 1.234,56`; negative amounts as `-R$ 1.234,56`.
pub fn format_brl<T: NumericInput + ?Sized>(value: &T) -> String {
    match value.to_decimal() {
        Some(amount) => {
            let (negative, digits) = group_pt_br(amount, 2);
            if negative {
                format!("-{}{}", CURRENCY_PREFIX, digits)
            } else {
                format!("{}{}", CURRENCY_PREFIX, digits)
            }
        }
        None => UNAVAILABLE.to_string(),
    }
}

pub fn format_number<T: NumericInput + ?Sized>(value: &T, decimal_places: u32) -> String {
    match value.to_decimal() {
        Some(number) => {
            let (negative, digits) = group_pt_br(number, decimal_places);
            if negative {
                format!("-{}", digits)
            } else {
                digits
            }
        }
        None => UNAVAILABLE.to_string(),
    }
}

pub fn format_percentage<T: NumericInput + ?Sized>(value: &T) -> String {
    with_unit(format_number(value, 2), "%")
}

pub fn format_weight<T: NumericInput + ?Sized>(value: &T) -> String {
    with_unit(format_number(value, 2), " kg")
}

pub fn format_volume<T: NumericInput + ?Sized>(value: &T) -> String {
    with_unit(format_number(value, 4), " m³")
}

fn with_unit(formatted: String, unit: &str) -> String {
    if formatted == UNAVAILABLE {
        formatted
    } else {
        formatted + unit
    }
}

/// Rounds half away from zero and applies `.` thousands / `,` decimal separators.
/// Returns the sign separately so callers can place it before a prefix.
fn group_pt_br(value: Decimal, decimal_places: u32) -> (bool, String) {
    let rounded = value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", decimal_places as usize, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push(',');
        grouped.push_str(frac);
    }

    (negative, grouped)
}

/// Parses masked currency text such as `R$ 1.234,56`.
pub fn parse_currency(raw: &str) -> Option<Decimal> {
    let cleaned = raw
        .replace("R$", "")
        .replace('.', "")
        .replace(',', ".");
    Decimal::from_str(cleaned.trim()).ok()
}

/// Reads every digit typed so far as cents: "123456" -> `R$ 1.234,56`.
/// Only the first [`MAX_CURRENCY_DIGITS`] significant digits are kept.
pub fn mask_currency(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }
    let significant = digits.trim_start_matches('0');
    let kept = match significant.char_indices().nth(MAX_CURRENCY_DIGITS) {
        Some((at, _)) => &significant[..at],
        None => significant,
    };
    if kept.is_empty() {
        return format_brl(&Decimal::ZERO);
    }
    match Decimal::from_str(kept) {
        Ok(cents) => format_brl(&(cents / Decimal::ONE_HUNDRED)),
        Err(_) => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedField {
    pub value: String,
    pub cursor: usize,
}

/// Re-masks a currency field after an edit, shifting the caret by the change
/// in length. The caret never lands inside the `R$ ` prefix nor past the end.
pub fn apply_currency_mask(value: &str, cursor: usize) -> MaskedField {
    let masked = mask_currency(value);
    let old_len = value.chars().count() as i64;
    let new_len = masked.chars().count() as i64;
    let prefix_len = CURRENCY_PREFIX.chars().count() as i64;

    let shifted = cursor as i64 + (new_len - old_len);
    let clamped = shifted.min(new_len).max(prefix_len).min(new_len).max(0);

    MaskedField {
        value: masked,
        cursor: clamped as usize,
    }
}
