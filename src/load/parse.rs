//! Lenient float parsing with the same shape as C `atof`: take the longest
//! numeric prefix, ignore whatever follows, and fall back to `0.0` when
//! there is no prefix at all.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref SPECIAL_REGEX: Regex = Regex::new(
        r"^[ \t\n\x0B\x0C\r]*(?P<sign>[+-]?)(?i:(?P<inf>inf(?:inity)?)|(?P<nan>nan(?:\([0-9A-Za-z_]*\))?))"
    ).unwrap();
    static ref HEX_REGEX: Regex = Regex::new(
        r"^[ \t\n\x0B\x0C\r]*(?P<sign>[+-]?)0[xX](?P<int>[0-9a-fA-F]*)(?:\.(?P<frac>[0-9a-fA-F]*))?(?:[pP](?P<exp>[+-]?[0-9]+))?"
    ).unwrap();
    static ref DECIMAL_REGEX: Regex = Regex::new(
        r"^[ \t\n\x0B\x0C\r]*(?P<number>[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)"
    ).unwrap();
}

// Binary exponents past this are already far outside the f64 range.
const HEX_EXPONENT_LIMIT: i64 = 10_000;
// 15 hex digits fit a u64 and already cover the 53 bit f64 mantissa.
const HEX_SIGNIFICANT_DIGITS: u32 = 15;

pub fn lenient_f64(input: &str) -> f64 {
    if let Some(cap) = SPECIAL_REGEX.captures(input) {
        let negative = &cap["sign"] == "-";
        let value = if cap.name("inf").is_some() { f64::INFINITY } else { f64::NAN };
        return if negative { -value } else { value };
    }

    if let Some(cap) = HEX_REGEX.captures(input) {
        if let Some(value) = hex_value(&cap) {
            return value;
        }
    }

    match DECIMAL_REGEX.captures(input) {
        Some(cap) => cap["number"].parse::<f64>().unwrap_or(0.0),
        None => 0.0,
    }
}

/// `None` when the `0x` has no digits after it; `strtod` then only
/// consumes the leading `0`, which the decimal pass takes care of.
fn hex_value(cap: &Captures) -> Option<f64> {
    let int = cap.name("int").map_or("", |m| m.as_str());
    let frac = cap.name("frac").map_or("", |m| m.as_str());
    if int.is_empty() && frac.is_empty() {
        return None;
    }

    // digits past the first few significant ones can't reach the f64 mantissa;
    // dropped integer digits still scale the value by 16 each
    let mut mantissa: u64 = 0;
    let mut significant = 0;
    let mut shift: i64 = 0;
    for (c, in_frac) in int.chars().map(|c| (c, false)).chain(frac.chars().map(|c| (c, true))) {
        let digit = u64::from(c.to_digit(16)?);
        if mantissa == 0 && digit == 0 {
            if in_frac {
                shift -= 4;
            }
        } else if significant < HEX_SIGNIFICANT_DIGITS {
            mantissa = mantissa * 16 + digit;
            significant += 1;
            if in_frac {
                shift -= 4;
            }
        } else if !in_frac {
            shift += 4;
        }
    }

    let binary_exp = match cap.name("exp") {
        Some(m) => m.as_str().parse::<i64>().unwrap_or_else(|_| {
            if m.as_str().starts_with('-') { -HEX_EXPONENT_LIMIT } else { HEX_EXPONENT_LIMIT }
        }),
        None => 0,
    };
    let exp = binary_exp.saturating_add(shift).clamp(-HEX_EXPONENT_LIMIT, HEX_EXPONENT_LIMIT) as i32;

    let magnitude = if mantissa == 0 {
        0.0
    } else {
        // two steps so an intermediate power of two doesn't overflow or flush to zero early
        let half = exp / 2;
        mantissa as f64 * 2f64.powi(half) * 2f64.powi(exp - half)
    };

    Some(if &cap["sign"] == "-" { -magnitude } else { magnitude })
}
