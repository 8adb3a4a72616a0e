use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ToolkitConfig;
use crate::entropy::EntropySource;
use crate::error::{Result, ToolError};

const ULID_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const TIMESTAMP_MASK: u64 = (1u64 << 48) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UlidFormat {
    /// One identifier per line.
    #[default]
    Raw,
    /// A pretty-printed JSON array.
    Json,
}

/// Crockford base32: 10 characters of millisecond timestamp, 16 of randomness.
pub fn encode_ulid(timestamp_ms: u64, randomness: [u8; 10]) -> String {
    let mut chars = [0u8; 26];
    let mut ts = timestamp_ms & TIMESTAMP_MASK;
    for idx in (0..10).rev() {
        chars[idx] = ULID_ALPHABET[(ts & 0x1F) as usize];
        ts >>= 5;
    }
    let mut rand_val = randomness
        .iter()
        .fold(0u128, |acc, byte| (acc << 8) | u128::from(*byte));
    for idx in (10..26).rev() {
        chars[idx] = ULID_ALPHABET[(rand_val & 0x1F) as usize];
        rand_val >>= 5;
    }
    chars.iter().map(|b| *b as char).collect()
}

pub fn generate_ulids(
    count: usize,
    now_millis: u64,
    config: &ToolkitConfig,
    entropy: &mut dyn EntropySource,
) -> Result<Vec<String>> {
    config.check_count(count)?;
    debug!(count, "generating ULIDs");
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let mut randomness = [0u8; 10];
        entropy.fill(&mut randomness)?;
        out.push(encode_ulid(now_millis, randomness));
    }
    Ok(out)
}

pub fn format_ulids(ids: &[String], format: UlidFormat) -> Result<String> {
    match format {
        UlidFormat::Raw => Ok(ids.join("\n")),
        UlidFormat::Json => serde_json::to_string_pretty(ids)
            .map_err(|err| ToolError::validation(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::SeededEntropy;

    #[test]
    fn encodes_known_timestamp_prefix() {
        let id = encode_ulid(1_469_918_176_385, [0u8; 10]);
        assert_eq!(id, "01ARYZ6S410000000000000000");
    }

    #[test]
    fn batch_uses_alphabet_and_length() {
        let mut entropy = SeededEntropy::new(11);
        let ids = generate_ulids(4, 1_700_000_000_000, &ToolkitConfig::default(), &mut entropy).unwrap();
        assert_eq!(ids.len(), 4);
        for id in &ids {
            assert_eq!(id.len(), 26);
            assert!(id.bytes().all(|b| ULID_ALPHABET.contains(&b)));
            assert_eq!(&id[..10], &ids[0][..10]);
        }
    }

    #[test]
    fn json_format_is_an_array() {
        let ids = vec!["A".to_string(), "B".to_string()];
        assert_eq!(format_ulids(&ids, UlidFormat::Raw).unwrap(), "A\nB");
        let json: Vec<String> = serde_json::from_str(&format_ulids(&ids, UlidFormat::Json).unwrap()).unwrap();
        assert_eq!(json, ids);
    }
}
