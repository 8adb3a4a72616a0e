use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, ToolError};

pub const MIN_ARABIC: i64 = 1;
pub const MAX_ARABIC: i64 = 3999;

const NUMERALS: [(u16, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

static ROMAN_GRAMMAR: OnceLock<Regex> = OnceLock::new();

fn roman_grammar() -> &'static Regex {
    ROMAN_GRAMMAR.get_or_init(|| {
        Regex::new(r"^M{0,3}(CM|CD|D?C{0,3})(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})$")
            .expect("roman numeral grammar compiles")
    })
}

/// Greedy subtractive encoding, valid for `1..=3999`.
pub fn arabic_to_roman(value: i64) -> Result<String> {
    if !(MIN_ARABIC..=MAX_ARABIC).contains(&value) {
        return Err(ToolError::validation(format!(
            "roman numerals cover {MIN_ARABIC} to {MAX_ARABIC}, got {value}"
        )));
    }
    let mut remaining = value as u16;
    let mut out = String::new();
    for (amount, symbol) in NUMERALS {
        while remaining >= amount {
            out.push_str(symbol);
            remaining -= amount;
        }
    }
    Ok(out)
}

pub fn is_valid_roman(input: &str) -> bool {
    let normalized = input.trim().to_ascii_uppercase();
    !normalized.is_empty() && roman_grammar().is_match(&normalized)
}

/// Decodes a canonical numeral; anything outside the canonical grammar is rejected.
pub fn roman_to_arabic(input: &str) -> Result<u16> {
    if !is_valid_roman(input) {
        return Err(ToolError::validation(format!(
            "\"{}\" is not a valid roman numeral",
            input.trim()
        )));
    }
    let normalized = input.trim().to_ascii_uppercase();
    let mut rest = normalized.as_str();
    let mut total = 0u16;
    for (amount, symbol) in NUMERALS {
        while let Some(tail) = rest.strip_prefix(symbol) {
            total += amount;
            rest = tail;
        }
    }
    Ok(total)
}
