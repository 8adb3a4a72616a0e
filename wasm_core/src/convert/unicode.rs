//! Text <-> numeric character references (`&#72;&#105;`).
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{Result, ToolError};

static ENTITY: OnceLock<Regex> = OnceLock::new();
static ENTITY_LIST: OnceLock<Regex> = OnceLock::new();

fn entity() -> &'static Regex {
    ENTITY.get_or_init(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("entity regex compiles"))
}

// Whitespace around entities is tolerated, matching what users paste from HTML sources.
fn entity_list() -> &'static Regex {
    ENTITY_LIST.get_or_init(|| {
        Regex::new(r"^(\s*&#(x[0-9a-fA-F]+|[0-9]+);\s*)*$").expect("entity list regex compiles")
    })
}

pub fn text_to_unicode_entities(text: &str) -> String {
    text.chars().map(|ch| format!("&#{};", ch as u32)).collect()
}

/// Replaces every decimal or hex entity; surrounding text is left untouched.
pub fn unicode_entities_to_text(input: &str) -> Result<String> {
    if input.trim().is_empty() {
        return Ok(String::new());
    }
    let mut failure = None;
    let replaced = entity().replace_all(input, |caps: &Captures<'_>| {
        let raw = &caps[1];
        let code = match raw.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        match code.and_then(char::from_u32) {
            Some(ch) => ch.to_string(),
            None => {
                failure.get_or_insert_with(|| {
                    ToolError::validation(format!("&#{raw}; is not a valid code point"))
                });
                String::new()
            }
        }
    });
    match failure {
        Some(err) => Err(err),
        None => Ok(replaced.into_owned()),
    }
}

pub fn is_valid_unicode_entities(input: &str) -> bool {
    entity_list().is_match(input) && unicode_entities_to_text(input).is_ok()
}
