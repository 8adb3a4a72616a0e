//! Arbitrary-precision integer conversion between bases 2 through 64.
use num_bigint::BigUint;
use serde::Serialize;

use crate::error::{Result, ToolError};

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 64;

const DIGITS: &[u8; 64] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ+/";

fn check_base(base: u32) -> Result<()> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(ToolError::configuration(format!(
            "base must be between {MIN_BASE} and {MAX_BASE}, got {base}"
        )));
    }
    Ok(())
}

fn digit_value(ch: char, base: u32) -> Option<u32> {
    // Bases up to 36 only use one letter case, so either case is accepted there.
    let ch = if base <= 36 { ch.to_ascii_lowercase() } else { ch };
    let pos = DIGITS.iter().position(|&d| d as char == ch)? as u32;
    (pos < base).then_some(pos)
}

/// Interprets `value` in `base`. Underscores and surrounding whitespace are ignored.
pub fn parse_in_base(value: &str, base: u32) -> Result<BigUint> {
    check_base(base)?;
    let cleaned: String = value.trim().chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return Err(ToolError::validation("value is empty"));
    }
    let mut acc = BigUint::default();
    for ch in cleaned.chars() {
        let digit = digit_value(ch, base).ok_or_else(|| {
            ToolError::validation(format!("invalid digit \"{ch}\" for base {base}"))
        })?;
        acc = acc * base + digit;
    }
    Ok(acc)
}

pub fn format_in_base(value: &BigUint, base: u32) -> Result<String> {
    check_base(base)?;
    if *value == BigUint::default() {
        return Ok("0".into());
    }
    let digits = value.to_radix_be(base);
    Ok(digits.into_iter().map(|d| DIGITS[d as usize] as char).collect())
}

/// Re-encodes `value` from `from_base` into `to_base`.
///
/// ```
/// use devkit_core::convert::base::convert_base;
/// assert_eq!(convert_base("ff", 16, 10)?, "255");
/// assert!(convert_base("zz", 16, 10).is_err());
/// # Ok::<(), devkit_core::ToolError>(())
/// ```
pub fn convert_base(value: &str, from_base: u32, to_base: u32) -> Result<String> {
    check_base(to_base)?;
    let parsed = parse_in_base(value, from_base)?;
    format_in_base(&parsed, to_base)
}

pub fn is_valid_in_base(value: &str, base: u32) -> bool {
    parse_in_base(value, base).is_ok()
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NumberBases {
    pub binary: String,
    pub octal: String,
    pub decimal: String,
    pub hex: String,
    pub base64: String,
}

/// The fixed set of representations shown by the integer base converter.
pub fn number_bases(value: &str, from_base: u32) -> Result<NumberBases> {
    let num = parse_in_base(value, from_base)?;
    Ok(NumberBases {
        binary: format_in_base(&num, 2)?,
        octal: format_in_base(&num, 8)?,
        decimal: format_in_base(&num, 10)?,
        hex: format_in_base(&num, 16)?.to_uppercase(),
        base64: format_in_base(&num, 64)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_decimal() {
        assert_eq!(convert_base("ff", 16, 10).unwrap(), "255");
        assert_eq!(convert_base("FF", 16, 2).unwrap(), "11111111");
    }

    #[test]
    fn invalid_digit_is_validation_error() {
        let err = convert_base("zz", 16, 10).unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
        assert!(err.message().contains("base 16"));
    }

    #[test]
    fn case_matters_above_base_36() {
        assert_eq!(convert_base("a", 64, 10).unwrap(), "10");
        assert_eq!(convert_base("A", 64, 10).unwrap(), "36");
        assert_eq!(convert_base("/", 64, 10).unwrap(), "63");
    }

    #[test]
    fn out_of_range_base_is_configuration_error() {
        assert!(matches!(
            convert_base("1", 1, 10).unwrap_err(),
            ToolError::Configuration(_)
        ));
        assert!(matches!(
            convert_base("1", 10, 65).unwrap_err(),
            ToolError::Configuration(_)
        ));
    }

    #[test]
    fn zero_and_big_values() {
        assert_eq!(convert_base("0000", 2, 16).unwrap(), "0");
        let big = "340282366920938463463374607431768211455";
        assert_eq!(convert_base(big, 10, 16).unwrap(), "f".repeat(32));
    }

    #[test]
    fn number_bases_summary() {
        let bases = number_bases("100", 10).unwrap();
        assert_eq!(bases.binary, "1100100");
        assert_eq!(bases.octal, "144");
        assert_eq!(bases.hex, "64");
        assert_eq!(bases.base64, "1A");
    }
}
