//! Signature codec
//!
//! Produces and checks the raw signature over a token's signing input. Every
//! keyed call passes through [`key_matches_algorithm`] before the engine is
//! touched; `none` never reaches the engine at all.

use crate::algorithm::Algorithm;
use crate::engine::CryptoEngine;
use crate::error::{JwtError, JwtResult};
use crate::key::KeyHandle;
use crate::registry::{key_matches_algorithm, resolve};

/// Signs and verifies signing inputs through an injected engine
#[derive(Debug, Clone, Default)]
pub struct SignatureCodec<E> {
    engine: E,
}

impl<E: CryptoEngine> SignatureCodec<E> {
    /// Codec over `engine`
    #[must_use]
    pub const fn new(engine: E) -> Self {
        Self { engine }
    }

    /// The injected engine
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Sign `signing_input`
    ///
    /// Returns the engine's bytes untouched; base64url encoding is the
    /// caller's business. `none` yields an empty signature.
    ///
    /// # Errors
    /// - [`JwtError::KeyNotAllowed`] for `none` with a key
    /// - [`JwtError::KeyRequired`] for a keyed algorithm without one
    /// - [`JwtError::IncompatibleKey`] when the key belongs to another algorithm
    /// - [`JwtError::SigningFailed`] when the engine fails
    pub fn sign(
        &self,
        algorithm: Algorithm,
        key: Option<&E::Key>,
        signing_input: &str,
    ) -> JwtResult<Vec<u8>> {
        let compatible = key_matches_algorithm(algorithm, key)?;

        let Some(key) = key else {
            // only `none` gets past the gate without a key
            return Ok(Vec::new());
        };

        if !compatible {
            tracing::warn!(%algorithm, "refusing to sign with an incompatible key");
            return Err(JwtError::IncompatibleKey {
                algorithm,
                key: key.algorithm(),
            });
        }

        let primitive = resolve(algorithm)?;
        let signature = self
            .engine
            .compute_signature(&primitive, key, signing_input.as_bytes())
            .map_err(|e| {
                tracing::debug!(%algorithm, error = %e, "engine failed to sign");
                JwtError::SigningFailed(e)
            })?;

        tracing::trace!(%algorithm, len = signature.len(), "signed");
        Ok(signature)
    }

    /// Verify `signature` over `signing_input`
    ///
    /// Without a key the only acceptable signature is the empty one. With a
    /// key the engine's verdict is returned as is; the codec never compares
    /// signature bytes itself.
    ///
    /// # Errors
    /// - [`JwtError::KeyNotAllowed`] for `none` with a key
    /// - [`JwtError::VerificationFailed`] when the engine cannot run the check
    pub fn verify(
        &self,
        signature: &[u8],
        key: Option<&E::Key>,
        algorithm: Algorithm,
        signing_input: &str,
    ) -> JwtResult<bool> {
        let Some(key) = key else {
            if !algorithm.is_none() {
                tracing::debug!(%algorithm, "verifying without a key");
            }
            return Ok(signature.is_empty());
        };

        if !key_matches_algorithm(algorithm, Some(key))? {
            tracing::debug!(%algorithm, key = %key.algorithm(), "key does not match algorithm");
            return Ok(false);
        }

        let primitive = resolve(algorithm)?;
        self.engine
            .verify_signature(&primitive, key, signature, signing_input.as_bytes())
            .map_err(|e| {
                tracing::debug!(%algorithm, error = %e, "engine failed to verify");
                JwtError::VerificationFailed(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::HashFunction;
    use crate::engine::EngineError;
    use crate::key::KeyAlgorithm;
    use crate::registry::PrimitiveDefinition;
    use hex_literal::hex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SIGNATURE: [u8; 8] = hex!("deadbeef01020304");

    struct FakeKey(KeyAlgorithm);

    impl KeyHandle for FakeKey {
        fn algorithm(&self) -> KeyAlgorithm {
            self.0.clone()
        }
    }

    /// Returns a fixed signature, or a failure, and counts calls
    #[derive(Default)]
    struct FakeEngine {
        fail: bool,
        verdict: bool,
        calls: AtomicUsize,
    }

    impl CryptoEngine for FakeEngine {
        type Key = FakeKey;

        fn compute_signature(
            &self,
            _primitive: &PrimitiveDefinition,
            _key: &FakeKey,
            _message: &[u8],
        ) -> Result<Vec<u8>, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EngineError::MalformedKey("fake".to_string()));
            }
            Ok(SIGNATURE.to_vec())
        }

        fn verify_signature(
            &self,
            _primitive: &PrimitiveDefinition,
            _key: &FakeKey,
            _signature: &[u8],
            _message: &[u8],
        ) -> Result<bool, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EngineError::KeyUsage("fake".to_string()));
            }
            Ok(self.verdict)
        }
    }

    fn hs256_key() -> FakeKey {
        FakeKey(KeyAlgorithm::Hmac {
            hash: HashFunction::Sha256,
        })
    }

    #[test]
    fn returns_engine_bytes_verbatim() {
        let codec = SignatureCodec::new(FakeEngine::default());
        let signature = codec
            .sign(Algorithm::HS256, Some(&hs256_key()), "abc.def")
            .unwrap();
        assert_eq!(signature, SIGNATURE);
    }

    #[test]
    fn none_never_reaches_the_engine() {
        let codec = SignatureCodec::new(FakeEngine::default());
        assert!(codec.sign(Algorithm::None, None, "abc.def").unwrap().is_empty());
        assert!(codec.verify(&[], None, Algorithm::None, "abc.def").unwrap());
        assert!(!codec.verify(&SIGNATURE, None, Algorithm::None, "abc.def").unwrap());
        assert_eq!(codec.engine().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn none_with_a_key_is_rejected() {
        let codec = SignatureCodec::new(FakeEngine::default());
        let key = hs256_key();
        assert!(matches!(
            codec.sign(Algorithm::None, Some(&key), "abc.def"),
            Err(JwtError::KeyNotAllowed)
        ));
        assert!(matches!(
            codec.verify(&[], Some(&key), Algorithm::None, "abc.def"),
            Err(JwtError::KeyNotAllowed)
        ));
    }

    #[test]
    fn keyed_sign_requires_a_key() {
        let codec = SignatureCodec::new(FakeEngine::default());
        assert!(matches!(
            codec.sign(Algorithm::ES256, None, "abc.def"),
            Err(JwtError::KeyRequired(Algorithm::ES256))
        ));
    }

    #[test]
    fn incompatible_key_is_gated_before_the_engine() {
        let codec = SignatureCodec::new(FakeEngine {
            verdict: true,
            ..FakeEngine::default()
        });
        let key = hs256_key();

        assert!(matches!(
            codec.sign(Algorithm::RS256, Some(&key), "abc.def"),
            Err(JwtError::IncompatibleKey {
                algorithm: Algorithm::RS256,
                ..
            })
        ));
        assert!(!codec
            .verify(&SIGNATURE, Some(&key), Algorithm::HS384, "abc.def")
            .unwrap());
        assert_eq!(codec.engine().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn verify_returns_the_engine_verdict() {
        let key = hs256_key();
        for verdict in [true, false] {
            let codec = SignatureCodec::new(FakeEngine {
                verdict,
                ..FakeEngine::default()
            });
            assert_eq!(
                codec
                    .verify(&SIGNATURE, Some(&key), Algorithm::HS256, "abc.def")
                    .unwrap(),
                verdict
            );
        }
    }

    #[test]
    fn engine_failures_are_surfaced() {
        let codec = SignatureCodec::new(FakeEngine {
            fail: true,
            ..FakeEngine::default()
        });
        let key = hs256_key();

        assert!(matches!(
            codec.sign(Algorithm::HS256, Some(&key), "abc.def"),
            Err(JwtError::SigningFailed(EngineError::MalformedKey(_)))
        ));
        assert!(matches!(
            codec.verify(&SIGNATURE, Some(&key), Algorithm::HS256, "abc.def"),
            Err(JwtError::VerificationFailed(EngineError::KeyUsage(_)))
        ));
    }
}
