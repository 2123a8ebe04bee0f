//! ECDSA over P-256 and P-384
//!
//! Signatures use the fixed-width `r || s` encoding JWS requires, not DER.

use crate::engine::EngineError;
use p256::ecdsa::signature::{Signer, Verifier};

/// Sign with P-256 / SHA-256, 64-byte signature
pub(super) fn sign_p256(
    signing_key: &p256::ecdsa::SigningKey,
    message: &[u8],
) -> Result<Vec<u8>, EngineError> {
    let signature: p256::ecdsa::Signature = signing_key
        .try_sign(message)
        .map_err(|e| EngineError::Backend(format!("ECDSA P-256 signing: {e}")))?;
    Ok(signature.to_bytes().to_vec())
}

/// Verify P-256 / SHA-256
pub(super) fn verify_p256(
    verifying_key: &p256::ecdsa::VerifyingKey,
    signature: &[u8],
    message: &[u8],
) -> bool {
    let Ok(signature) = p256::ecdsa::Signature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify(message, &signature).is_ok()
}

/// Sign with P-384 / SHA-384, 96-byte signature
pub(super) fn sign_p384(
    signing_key: &p384::ecdsa::SigningKey,
    message: &[u8],
) -> Result<Vec<u8>, EngineError> {
    let signature: p384::ecdsa::Signature = signing_key
        .try_sign(message)
        .map_err(|e| EngineError::Backend(format!("ECDSA P-384 signing: {e}")))?;
    Ok(signature.to_bytes().to_vec())
}

/// Verify P-384 / SHA-384
pub(super) fn verify_p384(
    verifying_key: &p384::ecdsa::VerifyingKey,
    signature: &[u8],
    message: &[u8],
) -> bool {
    let Ok(signature) = p384::ecdsa::Signature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify(message, &signature).is_ok()
}
