//! Random-byte sources injected into every generator.
//!
//! Generators never reach for an ambient RNG. The browser bindings pass
//! [`OsEntropy`]; tests pass [`SeededEntropy`] so batches are reproducible.

use rand_core::{CryptoRng, RngCore};

use crate::error::{Result, ToolError};

pub trait EntropySource {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()>;

    fn next_u32(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.fill(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Uniform index in `0..bound` using rejection sampling so small alphabets stay unbiased.
    fn index_below(&mut self, bound: usize) -> Result<usize> {
        if bound == 0 {
            return Err(ToolError::configuration("cannot pick from an empty set"));
        }
        let bound = bound as u32;
        let zone = u32::MAX - (u32::MAX % bound);
        loop {
            let value = self.next_u32()?;
            if value < zone {
                return Ok((value % bound) as usize);
            }
        }
    }
}

/// Operating system randomness (`crypto.getRandomValues` in the browser).
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        getrandom::fill(buf)
            .map_err(|err| ToolError::configuration(format!("randomness unavailable: {err}")))
    }
}

/// Deterministic, non-cryptographic source for reproducible output.
#[derive(Debug, Clone)]
pub struct SeededEntropy {
    rng: fastrand::Rng,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        self.rng.fill(buf);
        Ok(())
    }
}

/// Exposes an [`EntropySource`] as a `rand_core` generator for crates that expect one.
///
/// Failures of the underlying source are remembered and reported through
/// [`RngAdapter::finish`], since `RngCore::fill_bytes` cannot return them.
pub struct RngAdapter<'a> {
    source: &'a mut dyn EntropySource,
    failure: Option<ToolError>,
}

impl<'a> RngAdapter<'a> {
    pub fn new(source: &'a mut dyn EntropySource) -> Self {
        Self {
            source,
            failure: None,
        }
    }

    pub fn finish(self) -> Result<()> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl RngCore for RngAdapter<'_> {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_le_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_le_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(err) = self.source.fill(dest) {
            dest.fill(0);
            self.failure.get_or_insert(err);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

// Callers decide whether the wrapped source is suitable for key material.
impl CryptoRng for RngAdapter<'_> {}
