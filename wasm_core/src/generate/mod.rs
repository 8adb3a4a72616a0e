//! Non-deterministic generators. Each one draws from an injected [`EntropySource`].
//!
//! [`EntropySource`]: crate::entropy::EntropySource
pub mod rsa;
pub mod token;
pub mod ulid;
pub mod uuid;
