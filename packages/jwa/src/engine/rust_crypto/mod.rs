//! RustCrypto-backed engine
//!
//! HMAC via `hmac`, RSASSA-PKCS1-v1_5 and RSA-PSS via `rsa`, ECDSA via
//! `p256` / `p384`. All digests come from `sha2`.

/// Bind `$d` to the `sha2` digest type for a [`HashFunction`](crate::HashFunction)
macro_rules! with_digest {
    ($hash:expr, $d:ident => $body:expr) => {
        match $hash {
            $crate::algorithm::HashFunction::Sha256 => {
                type $d = sha2::Sha256;
                $body
            }
            $crate::algorithm::HashFunction::Sha384 => {
                type $d = sha2::Sha384;
                $body
            }
            $crate::algorithm::HashFunction::Sha512 => {
                type $d = sha2::Sha512;
                $body
            }
        }
    };
}

mod ecdsa;
mod hmac;
mod keys;
mod rsa;

pub use keys::{JwtKey, MIN_RSA_BITS};

use super::{CryptoEngine, EngineError};
use crate::algorithm::{HashFunction, NamedCurve};
use crate::key::KeyHandle;
use crate::registry::PrimitiveDefinition;
use keys::Material;

/// Engine over the RustCrypto crates
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoEngine;

impl RustCryptoEngine {
    /// Create the engine
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CryptoEngine for RustCryptoEngine {
    type Key = JwtKey;

    fn compute_signature(
        &self,
        primitive: &PrimitiveDefinition,
        key: &JwtKey,
        message: &[u8],
    ) -> Result<Vec<u8>, EngineError> {
        match (primitive, key.material()) {
            (PrimitiveDefinition::Hmac { hash }, Material::Secret(secret)) => {
                hmac::sign(*hash, secret, message)
            }
            (PrimitiveDefinition::RsaPkcs1 { hash }, Material::RsaPrivate(private)) => {
                rsa::sign_pkcs1(*hash, private, message)
            }
            (PrimitiveDefinition::RsaPss { hash, salt_length }, Material::RsaPrivate(private)) => {
                rsa::sign_pss(*hash, *salt_length, private, message)
            }
            (PrimitiveDefinition::Ecdsa { hash, curve }, Material::P256Signing(signing)) => {
                ensure_curve(*hash, *curve, NamedCurve::P256)?;
                ecdsa::sign_p256(signing, message)
            }
            (PrimitiveDefinition::Ecdsa { hash, curve }, Material::P384Signing(signing)) => {
                ensure_curve(*hash, *curve, NamedCurve::P384)?;
                ecdsa::sign_p384(signing, message)
            }
            (
                _,
                Material::RsaPublic(_) | Material::P256Verifying(_) | Material::P384Verifying(_),
            ) => Err(EngineError::KeyUsage(format!(
                "{} public key cannot sign",
                key.algorithm()
            ))),
            _ => Err(mismatch(primitive, key)),
        }
    }

    fn verify_signature(
        &self,
        primitive: &PrimitiveDefinition,
        key: &JwtKey,
        signature: &[u8],
        message: &[u8],
    ) -> Result<bool, EngineError> {
        match (primitive, key.material()) {
            (PrimitiveDefinition::Hmac { hash }, Material::Secret(secret)) => {
                hmac::verify(*hash, secret, signature, message)
            }
            (PrimitiveDefinition::RsaPkcs1 { hash }, Material::RsaPrivate(private)) => Ok(
                rsa::verify_pkcs1(*hash, &private.to_public_key(), signature, message),
            ),
            (PrimitiveDefinition::RsaPkcs1 { hash }, Material::RsaPublic(public)) => {
                Ok(rsa::verify_pkcs1(*hash, public, signature, message))
            }
            (PrimitiveDefinition::RsaPss { hash, salt_length }, Material::RsaPrivate(private)) => {
                rsa::verify_pss(*hash, *salt_length, &private.to_public_key(), signature, message)
            }
            (PrimitiveDefinition::RsaPss { hash, salt_length }, Material::RsaPublic(public)) => {
                rsa::verify_pss(*hash, *salt_length, public, signature, message)
            }
            (PrimitiveDefinition::Ecdsa { hash, curve }, Material::P256Signing(signing)) => {
                ensure_curve(*hash, *curve, NamedCurve::P256)?;
                Ok(ecdsa::verify_p256(signing.verifying_key(), signature, message))
            }
            (PrimitiveDefinition::Ecdsa { hash, curve }, Material::P256Verifying(verifying)) => {
                ensure_curve(*hash, *curve, NamedCurve::P256)?;
                Ok(ecdsa::verify_p256(verifying, signature, message))
            }
            (PrimitiveDefinition::Ecdsa { hash, curve }, Material::P384Signing(signing)) => {
                ensure_curve(*hash, *curve, NamedCurve::P384)?;
                Ok(ecdsa::verify_p384(signing.verifying_key(), signature, message))
            }
            (PrimitiveDefinition::Ecdsa { hash, curve }, Material::P384Verifying(verifying)) => {
                ensure_curve(*hash, *curve, NamedCurve::P384)?;
                Ok(ecdsa::verify_p384(verifying, signature, message))
            }
            _ => Err(mismatch(primitive, key)),
        }
    }
}

/// ECDSA keys here only hash with the curve's own digest
fn ensure_curve(hash: HashFunction, wanted: NamedCurve, have: NamedCurve) -> Result<(), EngineError> {
    let digest = match have {
        NamedCurve::P256 => HashFunction::Sha256,
        NamedCurve::P384 => HashFunction::Sha384,
    };
    if wanted != have || hash != digest {
        return Err(EngineError::UnsupportedConfiguration(format!(
            "ECDSA {wanted}/{hash} with a {have} key"
        )));
    }
    Ok(())
}

fn mismatch(primitive: &PrimitiveDefinition, key: &JwtKey) -> EngineError {
    EngineError::UnsupportedConfiguration(format!(
        "{} primitive with a {} key",
        primitive.family(),
        key.algorithm()
    ))
}
