//! RSA key pairs rendered as PEM (PKCS#8 private key, SPKI public key).
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::Serialize;
use tracing::debug;

use crate::entropy::{EntropySource, RngAdapter};
use crate::error::{Result, ToolError};

pub const MIN_RSA_BITS: usize = 256;
pub const MAX_RSA_BITS: usize = 16384;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RsaKeyPair {
    pub bits: usize,
    pub public_key_pem: String,
    pub private_key_pem: String,
}

/// Sizes must be a multiple of 8 within `[256, 16384]`; nothing is clamped.
pub fn check_rsa_bits(bits: usize) -> Result<()> {
    if !(MIN_RSA_BITS..=MAX_RSA_BITS).contains(&bits) || bits % 8 != 0 {
        return Err(ToolError::configuration(format!(
            "key size must be a multiple of 8 between {MIN_RSA_BITS} and {MAX_RSA_BITS}, got {bits}"
        )));
    }
    Ok(())
}

pub fn generate_rsa_key_pair(bits: usize, entropy: &mut dyn EntropySource) -> Result<RsaKeyPair> {
    check_rsa_bits(bits)?;
    debug!(bits, "generating RSA key pair");
    let mut rng = RngAdapter::new(entropy);
    let private_key = RsaPrivateKey::new(&mut rng, bits)
        .map_err(|err| ToolError::configuration(format!("RSA key generation failed: {err}")))?;
    rng.finish()?;
    let public_key = RsaPublicKey::from(&private_key);
    let private_key_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|err| ToolError::configuration(format!("cannot encode private key: {err}")))?
        .to_string();
    let public_key_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|err| ToolError::configuration(format!("cannot encode public key: {err}")))?;
    Ok(RsaKeyPair {
        bits,
        public_key_pem,
        private_key_pem,
    })
}
