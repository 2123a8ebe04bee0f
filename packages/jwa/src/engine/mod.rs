//! Crypto engine capability
//!
//! The codec never computes a MAC or a signature itself. It hands a
//! [`PrimitiveDefinition`] and an opaque key to an engine and returns
//! whatever the engine produced.

pub mod rust_crypto;

use crate::key::KeyHandle;
use crate::registry::PrimitiveDefinition;
use thiserror::Error;

pub use rust_crypto::{JwtKey, RustCryptoEngine};

/// Engine-level failures
///
/// A signature that simply does not verify is not one of these; engines
/// report that as `Ok(false)`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Key material the engine cannot use
    #[error("malformed key: {0}")]
    MalformedKey(String),

    /// Key cannot perform the requested operation (e.g. a public key asked to sign)
    #[error("key usage not permitted: {0}")]
    KeyUsage(String),

    /// Primitive/key combination the engine does not implement
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// Failure inside the underlying implementation
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Signing and verification capability
///
/// Each engine owns its key type; the core only ever reads the key's
/// [`KeyHandle::algorithm`] descriptor.
pub trait CryptoEngine: Send + Sync {
    /// Key type understood by this engine
    type Key: KeyHandle;

    /// Produce a raw signature over `message`
    ///
    /// # Errors
    /// Returns an [`EngineError`] when the key or configuration is unusable.
    fn compute_signature(
        &self,
        primitive: &PrimitiveDefinition,
        key: &Self::Key,
        message: &[u8],
    ) -> Result<Vec<u8>, EngineError>;

    /// Check `signature` over `message`
    ///
    /// # Errors
    /// Returns an [`EngineError`] when the key or configuration is unusable.
    /// An invalid signature is `Ok(false)`.
    fn verify_signature(
        &self,
        primitive: &PrimitiveDefinition,
        key: &Self::Key,
        signature: &[u8],
        message: &[u8],
    ) -> Result<bool, EngineError>;
}

impl<E: CryptoEngine + ?Sized> CryptoEngine for std::sync::Arc<E> {
    type Key = E::Key;

    fn compute_signature(
        &self,
        primitive: &PrimitiveDefinition,
        key: &Self::Key,
        message: &[u8],
    ) -> Result<Vec<u8>, EngineError> {
        (**self).compute_signature(primitive, key, message)
    }

    fn verify_signature(
        &self,
        primitive: &PrimitiveDefinition,
        key: &Self::Key,
        signature: &[u8],
        message: &[u8],
    ) -> Result<bool, EngineError> {
        (**self).verify_signature(primitive, key, signature, message)
    }
}
