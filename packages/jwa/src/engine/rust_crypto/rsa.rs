//! RSASSA-PKCS1-v1_5 and RSA-PSS signing and verification

use crate::algorithm::HashFunction;
use crate::engine::EngineError;
use rsa::rand_core::OsRng;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey, pkcs1v15, pss};

/// Sign with RSASSA-PKCS1-v1_5
pub(super) fn sign_pkcs1(
    hash: HashFunction,
    private_key: &RsaPrivateKey,
    message: &[u8],
) -> Result<Vec<u8>, EngineError> {
    with_digest!(hash, D => {
        let signing_key = pkcs1v15::SigningKey::<D>::new(private_key.clone());
        signing_key
            .try_sign(message)
            .map(|signature| signature.to_vec())
            .map_err(|e| EngineError::Backend(format!("RSA PKCS#1 v1.5 signing: {e}")))
    })
}

/// Verify RSASSA-PKCS1-v1_5; anything unparsable is a mismatch
pub(super) fn verify_pkcs1(
    hash: HashFunction,
    public_key: &RsaPublicKey,
    signature: &[u8],
    message: &[u8],
) -> bool {
    let Ok(signature) = pkcs1v15::Signature::try_from(signature) else {
        return false;
    };
    with_digest!(hash, D => {
        pkcs1v15::VerifyingKey::<D>::new(public_key.clone())
            .verify(message, &signature)
            .is_ok()
    })
}

/// Sign with RSA-PSS, MGF1 over the same digest
pub(super) fn sign_pss(
    hash: HashFunction,
    salt_length: usize,
    private_key: &RsaPrivateKey,
    message: &[u8],
) -> Result<Vec<u8>, EngineError> {
    ensure_salt(hash, salt_length)?;
    with_digest!(hash, D => {
        let signing_key = pss::SigningKey::<D>::new(private_key.clone());
        signing_key
            .try_sign_with_rng(&mut OsRng, message)
            .map(|signature| signature.to_vec())
            .map_err(|e| EngineError::Backend(format!("RSA-PSS signing: {e}")))
    })
}

/// Verify RSA-PSS; anything unparsable is a mismatch
pub(super) fn verify_pss(
    hash: HashFunction,
    salt_length: usize,
    public_key: &RsaPublicKey,
    signature: &[u8],
    message: &[u8],
) -> Result<bool, EngineError> {
    ensure_salt(hash, salt_length)?;
    let Ok(signature) = pss::Signature::try_from(signature) else {
        return Ok(false);
    };
    Ok(with_digest!(hash, D => {
        pss::VerifyingKey::<D>::new(public_key.clone())
            .verify(message, &signature)
            .is_ok()
    }))
}

/// `pss::SigningKey::new` salts with the digest length
fn ensure_salt(hash: HashFunction, salt_length: usize) -> Result<(), EngineError> {
    if salt_length != hash.output_len() {
        return Err(EngineError::UnsupportedConfiguration(format!(
            "RSA-PSS salt of {salt_length} bytes with {hash}"
        )));
    }
    Ok(())
}
