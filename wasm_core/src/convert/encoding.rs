// Base64, URL and hex text encoders for the "encode / decode" pages.
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};

use crate::error::{Result, ToolError};

pub fn base64_encode(text: &str, url_safe: bool) -> String {
    if url_safe {
        URL_SAFE.encode(text.as_bytes())
    } else {
        STANDARD.encode(text.as_bytes())
    }
}

/// Decodes Base64 text, tolerating missing padding and surrounding whitespace.
pub fn base64_decode_bytes(input: &str, url_safe: bool) -> Result<Vec<u8>> {
    let trimmed: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let unpadded = trimmed.trim_end_matches('=');
    let engine = if url_safe { &URL_SAFE_NO_PAD } else { &STANDARD_NO_PAD };
    engine
        .decode(unpadded.as_bytes())
        .map_err(|err| ToolError::validation(format!("invalid base64: {err}")))
}

pub fn base64_decode(input: &str, url_safe: bool) -> Result<String> {
    let bytes = base64_decode_bytes(input, url_safe)?;
    String::from_utf8(bytes).map_err(|_| ToolError::validation("decoded base64 is not UTF-8 text"))
}

pub fn is_valid_base64(input: &str, url_safe: bool) -> bool {
    base64_decode_bytes(input, url_safe).is_ok()
}

/// Percent-encodes every reserved character (like `encodeURIComponent`).
pub fn url_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

pub fn url_decode(input: &str) -> Result<String> {
    if input.trim().is_empty() {
        return Ok(String::new());
    }
    if has_broken_escape(input) {
        return Err(ToolError::validation("invalid percent escape in URL text"));
    }
    urlencoding::decode(input)
        .map(|cow| cow.into_owned())
        .map_err(|_| ToolError::validation("URL text does not decode to UTF-8"))
}

fn has_broken_escape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.iter().enumerate().any(|(idx, b)| {
        *b == b'%'
            && !(bytes.get(idx + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(idx + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

pub fn hex_encode(text: &str) -> String {
    hex::encode(text.as_bytes())
}

pub fn hex_decode(input: &str) -> Result<String> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    let bytes =
        hex::decode(cleaned).map_err(|err| ToolError::validation(format!("invalid hex: {err}")))?;
    String::from_utf8(bytes).map_err(|_| ToolError::validation("decoded hex is not UTF-8 text"))
}
