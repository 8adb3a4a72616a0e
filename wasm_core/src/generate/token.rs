use serde::Deserialize;
use tracing::debug;

use crate::config::ToolkitConfig;
use crate::entropy::EntropySource;
use crate::error::{Result, ToolError};

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &str = "0123456789";
const SYMBOLS: &str = ".,;:!?./-\"'#{([-|\\@)]=}*+";

// Upper bound keeps a single token from ballooning the output area.
const MAX_TOKEN_LENGTH: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenOptions {
    pub length: usize,
    pub with_uppercase: bool,
    pub with_lowercase: bool,
    pub with_numbers: bool,
    pub with_symbols: bool,
}

impl Default for TokenOptions {
    fn default() -> Self {
        Self {
            length: 64,
            with_uppercase: true,
            with_lowercase: true,
            with_numbers: true,
            with_symbols: false,
        }
    }
}

impl TokenOptions {
    pub fn from_config(config: &ToolkitConfig) -> Self {
        Self {
            length: config.default_token_length,
            ..Self::default()
        }
    }

    /// Selected characters, each listed once so every one is equally likely.
    fn alphabet(&self) -> Vec<char> {
        let mut pool: Vec<char> = Vec::new();
        for ch in [
            (self.with_uppercase, UPPERCASE),
            (self.with_lowercase, LOWERCASE),
            (self.with_numbers, NUMBERS),
            (self.with_symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .flat_map(|(_, chars)| chars.chars())
        {
            if !pool.contains(&ch) {
                pool.push(ch);
            }
        }
        pool
    }
}

/// Random token drawn only from the selected character classes.
pub fn generate_token(options: &TokenOptions, entropy: &mut dyn EntropySource) -> Result<String> {
    if options.length == 0 || options.length > MAX_TOKEN_LENGTH {
        return Err(ToolError::configuration(format!(
            "token length must be between 1 and {MAX_TOKEN_LENGTH}"
        )));
    }
    let alphabet = options.alphabet();
    if alphabet.is_empty() {
        return Err(ToolError::configuration(
            "select at least one character class",
        ));
    }
    debug!(length = options.length, pool = alphabet.len(), "generating token");
    let mut token = String::with_capacity(options.length);
    for _ in 0..options.length {
        token.push(alphabet[entropy.index_below(alphabet.len())?]);
    }
    Ok(token)
}
