//! Digest, HMAC and bcrypt helpers behind the hashing pages.
use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use tracing::debug;

use crate::entropy::EntropySource;
use crate::error::{Result, ToolError};

pub const BCRYPT_MIN_COST: u32 = 4;
pub const BCRYPT_MAX_COST: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashEncoding {
    #[default]
    Hex,
    Base64,
    Base64url,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [Self; 6] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
    ];

    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_ascii_lowercase().replace('-', "");
        Self::ALL
            .into_iter()
            .find(|algo| algo.name() == normalized)
            .ok_or_else(|| ToolError::configuration(format!("unsupported hash algorithm: {input}")))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Md5 => Md5::digest(data).to_vec(),
            Self::Sha1 => Sha1::digest(data).to_vec(),
            Self::Sha224 => Sha224::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

pub fn encode_digest(bytes: &[u8], encoding: HashEncoding) -> String {
    match encoding {
        HashEncoding::Hex => hex::encode(bytes),
        HashEncoding::Base64 => STANDARD.encode(bytes),
        HashEncoding::Base64url => URL_SAFE_NO_PAD.encode(bytes),
        HashEncoding::Binary => bytes.iter().map(|b| format!("{b:08b}")).collect(),
    }
}

/// Every supported digest of `text`, keyed by algorithm name.
pub fn hash_text(text: &str, encoding: HashEncoding) -> BTreeMap<String, String> {
    HashAlgorithm::ALL
        .into_iter()
        .map(|algo| {
            let digest = algo.digest(text.as_bytes());
            (algo.name().to_string(), encode_digest(&digest, encoding))
        })
        .collect()
}

macro_rules! hmac_bytes {
    ($digest:ty, $key:expr, $data:expr) => {{
        let mut mac = Hmac::<$digest>::new_from_slice($key)
            .map_err(|err| ToolError::configuration(err.to_string()))?;
        mac.update($data);
        mac.finalize().into_bytes().to_vec()
    }};
}

pub fn hmac_text(
    text: &str,
    secret: &str,
    algorithm: HashAlgorithm,
    encoding: HashEncoding,
) -> Result<String> {
    let (key, data) = (secret.as_bytes(), text.as_bytes());
    let bytes = match algorithm {
        HashAlgorithm::Md5 => hmac_bytes!(Md5, key, data),
        HashAlgorithm::Sha1 => hmac_bytes!(Sha1, key, data),
        HashAlgorithm::Sha224 => hmac_bytes!(Sha224, key, data),
        HashAlgorithm::Sha256 => hmac_bytes!(Sha256, key, data),
        HashAlgorithm::Sha384 => hmac_bytes!(Sha384, key, data),
        HashAlgorithm::Sha512 => hmac_bytes!(Sha512, key, data),
    };
    Ok(encode_digest(&bytes, encoding))
}

/// `$2b$` bcrypt hash with a salt drawn from `entropy`.
pub fn bcrypt_hash(password: &str, cost: u32, entropy: &mut dyn EntropySource) -> Result<String> {
    if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&cost) {
        return Err(ToolError::configuration(format!(
            "bcrypt cost must be between {BCRYPT_MIN_COST} and {BCRYPT_MAX_COST}"
        )));
    }
    debug!(cost, "hashing with bcrypt");
    let mut salt = [0u8; 16];
    entropy.fill(&mut salt)?;
    let parts = bcrypt::hash_with_salt(password, cost, salt)
        .map_err(|err| ToolError::validation(format!("bcrypt failed: {err}")))?;
    Ok(parts.format_for_version(bcrypt::Version::TwoB))
}

pub fn bcrypt_verify(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash.trim())
        .map_err(|err| ToolError::validation(format!("invalid bcrypt hash: {err}")))
}
