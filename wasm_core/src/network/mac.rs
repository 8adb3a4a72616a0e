//! MAC address validation, formatting and random generation.
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ToolkitConfig;
use crate::entropy::EntropySource;
use crate::error::{Result, ToolError};

const MAC_BYTES: usize = 6;

static MAC_GRAMMAR: OnceLock<Regex> = OnceLock::new();
static PARTIAL_MAC_GRAMMAR: OnceLock<Regex> = OnceLock::new();

fn mac_grammar() -> &'static Regex {
    MAC_GRAMMAR.get_or_init(|| {
        Regex::new(r"^([0-9A-Fa-f]{2}[:-]){2,5}([0-9A-Fa-f]{2})$").expect("mac regex compiles")
    })
}

fn partial_mac_grammar() -> &'static Regex {
    PARTIAL_MAC_GRAMMAR.get_or_init(|| {
        Regex::new(r"^([0-9a-fA-F]{2}[:\-. ]){0,5}([0-9a-fA-F]{0,2})$")
            .expect("partial mac regex compiles")
    })
}

/// Two to six hex pairs separated by `:` or `-`, nothing else. Empty input is not a MAC address.
pub fn is_valid_mac_address(input: &str) -> bool {
    mac_grammar().is_match(input)
}

/// Prefix grammar used when a MAC prefix is being typed; the empty prefix is accepted.
pub fn is_valid_partial_mac(input: &str) -> bool {
    partial_mac_grammar().is_match(input.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterCase {
    #[default]
    Upper,
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacSeparator {
    #[default]
    Colon,
    Dash,
    /// Cisco style, `aabb.ccdd.eeff`.
    Dot,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MacFormat {
    pub case: LetterCase,
    pub separator: MacSeparator,
}

fn render(hex_digits: &str, format: MacFormat) -> String {
    let digits = match format.case {
        LetterCase::Upper => hex_digits.to_ascii_uppercase(),
        LetterCase::Lower => hex_digits.to_ascii_lowercase(),
    };
    let (group, sep) = match format.separator {
        MacSeparator::Colon => (2, ":"),
        MacSeparator::Dash => (2, "-"),
        MacSeparator::Dot => (4, "."),
        MacSeparator::None => return digits,
    };
    digits
        .as_bytes()
        .chunks(group)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Rewrites a valid MAC address in the requested case and separator style.
pub fn format_mac(input: &str, format: MacFormat) -> Result<String> {
    if !is_valid_mac_address(input) {
        return Err(ToolError::validation(format!(
            "\"{}\" is not a valid MAC address",
            input.trim()
        )));
    }
    let digits: String = input.chars().filter(char::is_ascii_hexdigit).collect();
    Ok(render(&digits, format))
}

/// Generates `count` addresses that start with `prefix` (possibly empty) and end in random bytes.
pub fn generate_mac_addresses(
    count: usize,
    prefix: &str,
    format: MacFormat,
    config: &ToolkitConfig,
    entropy: &mut dyn EntropySource,
) -> Result<Vec<String>> {
    config.check_count(count)?;
    if !is_valid_partial_mac(prefix) {
        return Err(ToolError::configuration(format!(
            "\"{}\" is not a valid MAC prefix",
            prefix.trim()
        )));
    }
    let prefix_digits: String = prefix.chars().filter(char::is_ascii_hexdigit).collect();
    // A dangling half byte cannot be expressed, so generation waits for a full pair.
    if prefix_digits.len() % 2 != 0 {
        return Err(ToolError::configuration("MAC prefix must contain whole bytes"));
    }
    let random_bytes = MAC_BYTES - prefix_digits.len() / 2;
    debug!(count, random_bytes, "generating MAC addresses");
    let mut out = Vec::with_capacity(count);
    let mut buf = vec![0u8; random_bytes];
    for _ in 0..count {
        entropy.fill(&mut buf)?;
        let digits = format!("{prefix_digits}{}", hex::encode(&buf));
        out.push(render(&digits, format));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::SeededEntropy;

    #[test]
    fn grammar_accepts_two_to_six_pairs() {
        assert!(is_valid_mac_address("00:1A:2b:3C:4d:5E"));
        assert!(is_valid_mac_address("00-1a-2b"));
        assert!(is_valid_mac_address("00:1a-2b"));
        assert!(!is_valid_mac_address("00"));
        assert!(!is_valid_mac_address("00:1a:2b:3c:4d:5e:6f"));
        assert!(!is_valid_mac_address("001a2b3c4d5e"));
        assert!(!is_valid_mac_address("0:1a:2b"));
        assert!(!is_valid_mac_address(""));
    }

    #[test]
    fn surrounding_whitespace_is_not_part_of_the_grammar() {
        assert!(!is_valid_mac_address(" 00:11:22 "));
        assert!(!is_valid_mac_address("00:11:22\n"));
        assert!(format_mac(" aa:bb:cc:dd:ee:ff", MacFormat::default()).is_err());
    }

    #[test]
    fn partial_grammar_accepts_prefixes() {
        assert!(is_valid_partial_mac(""));
        assert!(is_valid_partial_mac("64:16:7f"));
        assert!(is_valid_partial_mac("64 16 7"));
        assert!(!is_valid_partial_mac("6416zz"));
    }

    #[test]
    fn formats_each_separator() {
        let mac = "aa:bb:cc:dd:ee:ff";
        let dot = MacFormat {
            case: LetterCase::Lower,
            separator: MacSeparator::Dot,
        };
        assert_eq!(format_mac(mac, dot).unwrap(), "aabb.ccdd.eeff");
        assert_eq!(
            format_mac(mac, MacFormat::default()).unwrap(),
            "AA:BB:CC:DD:EE:FF"
        );
        let bare = MacFormat {
            case: LetterCase::Upper,
            separator: MacSeparator::None,
        };
        assert_eq!(format_mac("aa-bb-cc-dd-ee-ff", bare).unwrap(), "AABBCCDDEEFF");
        assert!(format_mac("not a mac", bare).is_err());
    }

    #[test]
    fn generated_addresses_keep_prefix() {
        let mut entropy = SeededEntropy::new(42);
        let macs = generate_mac_addresses(
            5,
            "64:16:7F",
            MacFormat::default(),
            &ToolkitConfig::default(),
            &mut entropy,
        )
        .unwrap();
        assert_eq!(macs.len(), 5);
        for mac in macs {
            assert!(mac.starts_with("64:16:7F:"), "{mac}");
            assert!(is_valid_mac_address(&mac));
        }
    }

    #[test]
    fn odd_prefix_is_rejected() {
        let mut entropy = SeededEntropy::new(1);
        let err = generate_mac_addresses(
            1,
            "64:1",
            MacFormat::default(),
            &ToolkitConfig::default(),
            &mut entropy,
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::Configuration(_)));
    }
}
