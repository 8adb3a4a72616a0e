//! Text <-> ASCII binary (`01001000 01101001`).
use crate::error::{Result, ToolError};

pub const DEFAULT_SEPARATOR: &str = " ";

pub fn bytes_to_ascii_binary(bytes: &[u8], separator: &str) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:08b}"))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Every character other than `0` and `1` is treated as a separator and dropped.
pub fn ascii_binary_to_bytes(binary: &str) -> Result<Vec<u8>> {
    let bits: Vec<u8> = binary
        .bytes()
        .filter(|b| *b == b'0' || *b == b'1')
        .collect();
    if bits.len() % 8 != 0 {
        return Err(ToolError::validation(format!(
            "binary input has {} bits, expected a multiple of 8",
            bits.len()
        )));
    }
    Ok(bits
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, bit| (acc << 1) | (bit - b'0')))
        .collect())
}

pub fn text_to_ascii_binary(text: &str, separator: &str) -> String {
    bytes_to_ascii_binary(text.as_bytes(), separator)
}

pub fn ascii_binary_to_text(binary: &str) -> Result<String> {
    let bytes = ascii_binary_to_bytes(binary)?;
    String::from_utf8(bytes)
        .map_err(|_| ToolError::validation("binary input does not decode to UTF-8 text"))
}

/// True when `binary` decodes to UTF-8 text.
pub fn is_valid_ascii_binary(binary: &str) -> bool {
    ascii_binary_to_text(binary).is_ok()
}

/// True when `binary` holds whole bytes, whatever they encode.
pub fn is_valid_binary_bytes(binary: &str) -> bool {
    ascii_binary_to_bytes(binary).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_separator() {
        assert_eq!(text_to_ascii_binary("Hi", " "), "01001000 01101001");
        assert_eq!(text_to_ascii_binary("Hi", ""), "0100100001101001");
        assert_eq!(text_to_ascii_binary("", " "), "");
    }

    #[test]
    fn decodes_ignoring_noise() {
        assert_eq!(ascii_binary_to_text("01001000-01101001\n").unwrap(), "Hi");
        assert_eq!(ascii_binary_to_text("").unwrap(), "");
    }

    #[test]
    fn rejects_partial_bytes() {
        assert!(ascii_binary_to_text("0100100").is_err());
        assert!(!is_valid_ascii_binary("1"));
    }

    #[test]
    fn non_utf8_bytes_are_bytes_but_not_text() {
        let encoded = bytes_to_ascii_binary(&[0x80], " ");
        assert_eq!(encoded, "10000000");
        assert!(is_valid_binary_bytes(&encoded));
        assert!(!is_valid_ascii_binary(&encoded));
    }

    #[test]
    fn multibyte_text_round_trips() {
        let encoded = text_to_ascii_binary("é✓", " ");
        assert_eq!(ascii_binary_to_text(&encoded).unwrap(), "é✓");
    }
}
