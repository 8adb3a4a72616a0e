//! UUID batches (NIL, v1, v3, v4, v5).
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::{Builder, ContextV1, Timestamp, Uuid};

use crate::config::ToolkitConfig;
use crate::entropy::EntropySource;
use crate::error::{Result, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UuidVersion {
    Nil,
    V1,
    V3,
    V4,
    V5,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UuidRequest {
    pub version: UuidVersion,
    #[serde(default = "default_count")]
    pub count: usize,
    /// Namespace for v3/v5: a UUID or one of `dns`, `url`, `oid`, `x500`.
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

fn default_count() -> usize {
    1
}

fn resolve_namespace(namespace: Option<&str>) -> Result<Uuid> {
    let raw = namespace
        .map(str::trim)
        .filter(|ns| !ns.is_empty())
        .ok_or_else(|| ToolError::configuration("a namespace is required for v3 and v5 UUIDs"))?;
    match raw.to_ascii_lowercase().as_str() {
        "dns" => Ok(Uuid::NAMESPACE_DNS),
        "url" => Ok(Uuid::NAMESPACE_URL),
        "oid" => Ok(Uuid::NAMESPACE_OID),
        "x500" => Ok(Uuid::NAMESPACE_X500),
        _ => Uuid::parse_str(raw)
            .map_err(|err| ToolError::configuration(format!("invalid namespace UUID: {err}"))),
    }
}

fn random_node_id(entropy: &mut dyn EntropySource) -> Result<[u8; 6]> {
    let mut node = [0u8; 6];
    entropy.fill(&mut node)?;
    // Multicast bit marks the node id as random rather than a real MAC.
    node[0] |= 0x01;
    Ok(node)
}

/// Generates `request.count` identifiers. v3/v5 are name based and therefore repeat.
pub fn generate_uuids(
    request: &UuidRequest,
    now_millis: u64,
    config: &ToolkitConfig,
    entropy: &mut dyn EntropySource,
) -> Result<Vec<String>> {
    config.check_count(request.count)?;
    debug!(version = ?request.version, count = request.count, "generating UUIDs");
    let count = request.count;
    match request.version {
        UuidVersion::Nil => Ok(vec![Uuid::nil().to_string(); count]),
        UuidVersion::V1 => {
            let node = random_node_id(entropy)?;
            let mut seed = [0u8; 2];
            entropy.fill(&mut seed)?;
            let context = ContextV1::new(u16::from_le_bytes(seed));
            let seconds = now_millis / 1000;
            let nanos = ((now_millis % 1000) * 1_000_000) as u32;
            Ok((0..count)
                .map(|_| {
                    let ts = Timestamp::from_unix(&context, seconds, nanos);
                    Uuid::new_v1(ts, &node).to_string()
                })
                .collect())
        }
        UuidVersion::V3 | UuidVersion::V5 => {
            let namespace = resolve_namespace(request.namespace.as_deref())?;
            let name = request
                .name
                .as_deref()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ToolError::configuration("a name is required for v3 and v5 UUIDs"))?;
            let id = if request.version == UuidVersion::V3 {
                Uuid::new_v3(&namespace, name.as_bytes())
            } else {
                Uuid::new_v5(&namespace, name.as_bytes())
            };
            Ok(vec![id.to_string(); count])
        }
        UuidVersion::V4 => {
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                let mut bytes = [0u8; 16];
                entropy.fill(&mut bytes)?;
                out.push(Builder::from_random_bytes(bytes).into_uuid().to_string());
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::SeededEntropy;

    fn request(version: UuidVersion, count: usize) -> UuidRequest {
        UuidRequest {
            version,
            count,
            namespace: None,
            name: None,
        }
    }

    #[test]
    fn nil_uuid_is_all_zero() {
        let mut entropy = SeededEntropy::new(0);
        let ids =
            generate_uuids(&request(UuidVersion::Nil, 2), 0, &ToolkitConfig::default(), &mut entropy)
                .unwrap();
        assert_eq!(ids, vec!["00000000-0000-0000-0000-000000000000"; 2]);
    }

    #[test]
    fn v4_batch_is_unique_and_versioned() {
        let mut entropy = SeededEntropy::new(9);
        let ids =
            generate_uuids(&request(UuidVersion::V4, 50), 0, &ToolkitConfig::default(), &mut entropy)
                .unwrap();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 50);
        for id in ids {
            let parsed = Uuid::parse_str(&id).unwrap();
            assert_eq!(parsed.get_version_num(), 4);
        }
    }

    #[test]
    fn v4_is_reproducible_with_seed() {
        let config = ToolkitConfig::default();
        let first =
            generate_uuids(&request(UuidVersion::V4, 3), 0, &config, &mut SeededEntropy::new(5))
                .unwrap();
        let second =
            generate_uuids(&request(UuidVersion::V4, 3), 0, &config, &mut SeededEntropy::new(5))
                .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn v1_carries_timestamp_version() {
        let mut entropy = SeededEntropy::new(3);
        let ids = generate_uuids(
            &request(UuidVersion::V1, 2),
            1_700_000_000_000,
            &ToolkitConfig::default(),
            &mut entropy,
        )
        .unwrap();
        assert_ne!(ids[0], ids[1]);
        let parsed = Uuid::parse_str(&ids[0]).unwrap();
        assert_eq!(parsed.get_version_num(), 1);
    }

    #[test]
    fn v5_matches_reference_vector() {
        let mut entropy = SeededEntropy::new(0);
        let req = UuidRequest {
            version: UuidVersion::V5,
            count: 1,
            namespace: Some("dns".into()),
            name: Some("example.com".into()),
        };
        let ids = generate_uuids(&req, 0, &ToolkitConfig::default(), &mut entropy).unwrap();
        assert_eq!(ids[0], "cfbff0d1-9375-5685-968c-48ce8b15ae17");
    }

    #[test]
    fn v3_requires_namespace_and_name() {
        let mut entropy = SeededEntropy::new(0);
        let err = generate_uuids(&request(UuidVersion::V3, 1), 0, &ToolkitConfig::default(), &mut entropy)
            .unwrap_err();
        assert!(matches!(err, ToolError::Configuration(_)));
    }

    #[test]
    fn zero_count_is_rejected() {
        let mut entropy = SeededEntropy::new(0);
        assert!(
            generate_uuids(&request(UuidVersion::V4, 0), 0, &ToolkitConfig::default(), &mut entropy)
                .is_err()
        );
    }

    #[test]
    fn request_deserializes_from_camel_case_json() {
        let request: UuidRequest =
            serde_json::from_str(r#"{"version":"v5","namespace":"dns","name":"example.com"}"#).unwrap();
        assert_eq!(request.version, UuidVersion::V5);
        assert_eq!(request.count, 1);
        assert!(serde_json::from_str::<UuidRequest>(r#"{"version":"v9"}"#).is_err());
    }
}
