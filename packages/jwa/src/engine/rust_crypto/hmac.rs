//! HMAC-SHA2 signing and verification

use crate::algorithm::HashFunction;
use crate::engine::EngineError;
use hmac::{Hmac, Mac};

/// Compute the HMAC tag over `message`
pub(super) fn sign(
    hash: HashFunction,
    secret: &[u8],
    message: &[u8],
) -> Result<Vec<u8>, EngineError> {
    with_digest!(hash, D => {
        let mut mac = Hmac::<D>::new_from_slice(secret)
            .map_err(|_| EngineError::MalformedKey("HMAC secret rejected".to_string()))?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    })
}

/// Check an HMAC tag in constant time
///
/// A tag of the wrong length is simply a mismatch.
pub(super) fn verify(
    hash: HashFunction,
    secret: &[u8],
    signature: &[u8],
    message: &[u8],
) -> Result<bool, EngineError> {
    with_digest!(hash, D => {
        let mut mac = Hmac::<D>::new_from_slice(secret)
            .map_err(|_| EngineError::MalformedKey("HMAC secret rejected".to_string()))?;
        mac.update(message);
        Ok(mac.verify_slice(signature).is_ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // RFC 4231 test case 2
    const KEY: &[u8] = b"Jefe";
    const DATA: &[u8] = b"what do ya want for nothing?";

    #[test]
    fn rfc4231_sha256() {
        let tag = sign(HashFunction::Sha256, KEY, DATA).unwrap();
        assert_eq!(
            tag,
            hex!("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
        );
        assert!(verify(HashFunction::Sha256, KEY, &tag, DATA).unwrap());
    }

    #[test]
    fn truncated_tag_does_not_verify() {
        let tag = sign(HashFunction::Sha384, KEY, DATA).unwrap();
        assert_eq!(tag.len(), 48);
        assert!(!verify(HashFunction::Sha384, KEY, &tag[..47], DATA).unwrap());
        assert!(!verify(HashFunction::Sha384, KEY, &[], DATA).unwrap());
    }
}
