//! Toolkit-wide settings supplied by the UI shell at startup.
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};
use crate::hash::{BCRYPT_MAX_COST, BCRYPT_MIN_COST};

pub const DEFAULT_FAVORITES_KEY: &str = "devkit:favorites";
pub const DEFAULT_STATE_KEY: &str = "devkit:state";

// Keeps a single generator call from allocating unbounded output in the wasm heap.
const MAX_BATCH_LIMIT: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolkitConfig {
    /// Storage key that holds the serialized favorites list.
    pub favorites_key: String,
    /// Storage key that holds theme and locale.
    pub state_key: String,
    /// Upper bound on the `count` accepted by batch generators.
    pub max_batch: usize,
    pub default_token_length: usize,
    pub bcrypt_default_cost: u32,
    pub json_indent: usize,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            favorites_key: DEFAULT_FAVORITES_KEY.into(),
            state_key: DEFAULT_STATE_KEY.into(),
            max_batch: 500,
            default_token_length: 64,
            bcrypt_default_cost: 10,
            json_indent: 2,
        }
    }
}

impl ToolkitConfig {
    pub fn from_json(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(input)
            .map_err(|err| ToolError::configuration(format!("invalid toolkit config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.favorites_key.trim().is_empty() || self.state_key.trim().is_empty() {
            return Err(ToolError::configuration("storage keys must not be empty"));
        }
        if self.favorites_key == self.state_key {
            return Err(ToolError::configuration(
                "favorites and state must use different storage keys",
            ));
        }
        if self.max_batch == 0 || self.max_batch > MAX_BATCH_LIMIT {
            return Err(ToolError::configuration(format!(
                "maxBatch must be between 1 and {MAX_BATCH_LIMIT}"
            )));
        }
        if self.default_token_length == 0 {
            return Err(ToolError::configuration("defaultTokenLength must be positive"));
        }
        if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&self.bcrypt_default_cost) {
            return Err(ToolError::configuration(format!(
                "bcryptDefaultCost must be between {BCRYPT_MIN_COST} and {BCRYPT_MAX_COST}"
            )));
        }
        if self.json_indent > 8 {
            return Err(ToolError::configuration("jsonIndent must be at most 8"));
        }
        Ok(())
    }

    /// Rejects batch sizes outside `1..=max_batch`.
    pub fn check_count(&self, count: usize) -> Result<()> {
        if count == 0 || count > self.max_batch {
            return Err(ToolError::configuration(format!(
                "count must be between 1 and {}",
                self.max_batch
            )));
        }
        Ok(())
    }
}
