//! Algorithm registry
//!
//! Maps an [`Algorithm`] to the fully parameterized primitive an engine must
//! run, and decides whether a key may be used with a claimed algorithm. Both
//! operations are pure.

use crate::algorithm::{Algorithm, Family, HashFunction, NamedCurve};
use crate::error::{JwtError, JwtResult};
use crate::key::{KeyAlgorithm, KeyHandle};

/// What the crypto engine must run for a given algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveDefinition {
    /// HMAC over `hash`
    Hmac {
        /// Digest
        hash: HashFunction,
    },
    /// RSASSA-PKCS1-v1_5 over `hash`
    RsaPkcs1 {
        /// Digest
        hash: HashFunction,
    },
    /// RSA-PSS over `hash`, MGF1 with the same digest
    RsaPss {
        /// Digest
        hash: HashFunction,
        /// Salt length in bytes, always the digest length
        salt_length: usize,
    },
    /// ECDSA over `curve`, hashing with `hash`
    Ecdsa {
        /// Digest
        hash: HashFunction,
        /// Curve
        curve: NamedCurve,
    },
}

impl PrimitiveDefinition {
    /// Primitive family
    #[must_use]
    pub const fn family(&self) -> Family {
        match self {
            PrimitiveDefinition::Hmac { .. } => Family::Hmac,
            PrimitiveDefinition::RsaPkcs1 { .. } => Family::RsaPkcs1,
            PrimitiveDefinition::RsaPss { .. } => Family::RsaPss,
            PrimitiveDefinition::Ecdsa { .. } => Family::Ecdsa,
        }
    }

    /// Digest used by the primitive
    #[must_use]
    pub const fn hash(&self) -> HashFunction {
        match self {
            PrimitiveDefinition::Hmac { hash }
            | PrimitiveDefinition::RsaPkcs1 { hash }
            | PrimitiveDefinition::RsaPss { hash, .. }
            | PrimitiveDefinition::Ecdsa { hash, .. } => *hash,
        }
    }

    /// Curve, for ECDSA
    #[must_use]
    pub const fn curve(&self) -> Option<NamedCurve> {
        match self {
            PrimitiveDefinition::Ecdsa { curve, .. } => Some(*curve),
            _ => None,
        }
    }

    const fn pss(hash: HashFunction) -> Self {
        PrimitiveDefinition::RsaPss {
            hash,
            salt_length: hash.output_len(),
        }
    }
}

/// Resolve the primitive for `algorithm`
///
/// # Errors
/// Returns [`JwtError::UnsupportedAlgorithm`] for `none`, which has no
/// primitive. Callers branch on `none` before resolving.
pub fn resolve(algorithm: Algorithm) -> JwtResult<PrimitiveDefinition> {
    use HashFunction::{Sha256, Sha384, Sha512};

    let primitive = match algorithm {
        Algorithm::HS256 => PrimitiveDefinition::Hmac { hash: Sha256 },
        Algorithm::HS384 => PrimitiveDefinition::Hmac { hash: Sha384 },
        Algorithm::HS512 => PrimitiveDefinition::Hmac { hash: Sha512 },
        Algorithm::RS256 => PrimitiveDefinition::RsaPkcs1 { hash: Sha256 },
        Algorithm::RS384 => PrimitiveDefinition::RsaPkcs1 { hash: Sha384 },
        Algorithm::RS512 => PrimitiveDefinition::RsaPkcs1 { hash: Sha512 },
        Algorithm::PS256 => PrimitiveDefinition::pss(Sha256),
        Algorithm::PS384 => PrimitiveDefinition::pss(Sha384),
        Algorithm::PS512 => PrimitiveDefinition::pss(Sha512),
        Algorithm::ES256 => PrimitiveDefinition::Ecdsa {
            hash: Sha256,
            curve: NamedCurve::P256,
        },
        Algorithm::ES384 => PrimitiveDefinition::Ecdsa {
            hash: Sha384,
            curve: NamedCurve::P384,
        },
        Algorithm::None => return Err(JwtError::unsupported_algorithm(Algorithm::None.as_str())),
    };
    Ok(primitive)
}

/// Parse a wire identifier and resolve it in one step
///
/// # Errors
/// Returns [`JwtError::UnsupportedAlgorithm`] for unknown or disabled names
/// (`ES512`) and for `none`.
pub fn resolve_name(name: &str) -> JwtResult<PrimitiveDefinition> {
    resolve(name.parse()?)
}

/// Decide whether `key` may be used with `algorithm`
///
/// This is the algorithm-confusion gate: a token claiming one algorithm must
/// never be checked with a key provisioned for another.
///
/// # Errors
/// - [`JwtError::KeyNotAllowed`] when a key accompanies `none`
/// - [`JwtError::KeyRequired`] when any other algorithm has no key
pub fn key_matches_algorithm<K>(algorithm: Algorithm, key: Option<&K>) -> JwtResult<bool>
where
    K: KeyHandle + ?Sized,
{
    if algorithm.is_none() {
        return match key {
            Some(_) => Err(JwtError::KeyNotAllowed),
            None => Ok(true),
        };
    }

    let key = key.ok_or(JwtError::KeyRequired(algorithm))?;
    let expected = resolve(algorithm)?;
    let matches = primitive_accepts(&expected, &key.algorithm());

    tracing::trace!(%algorithm, matches, "key gate");
    Ok(matches)
}

/// Family first, then the family's own parameter
fn primitive_accepts(expected: &PrimitiveDefinition, key: &KeyAlgorithm) -> bool {
    match (expected, key) {
        (PrimitiveDefinition::Hmac { hash: want }, KeyAlgorithm::Hmac { hash })
        | (PrimitiveDefinition::RsaPkcs1 { hash: want }, KeyAlgorithm::RsaPkcs1 { hash })
        | (PrimitiveDefinition::RsaPss { hash: want, .. }, KeyAlgorithm::RsaPss { hash }) => {
            want == hash
        }
        (PrimitiveDefinition::Ecdsa { curve: want, .. }, KeyAlgorithm::Ecdsa { curve }) => {
            want == curve
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Described(KeyAlgorithm);

    impl KeyHandle for Described {
        fn algorithm(&self) -> KeyAlgorithm {
            self.0.clone()
        }
    }

    fn hmac(hash: HashFunction) -> Described {
        Described(KeyAlgorithm::Hmac { hash })
    }

    #[test]
    fn resolves_the_full_table() {
        use HashFunction::*;
        use NamedCurve::*;

        let table = [
            (Algorithm::HS256, PrimitiveDefinition::Hmac { hash: Sha256 }),
            (Algorithm::HS384, PrimitiveDefinition::Hmac { hash: Sha384 }),
            (Algorithm::HS512, PrimitiveDefinition::Hmac { hash: Sha512 }),
            (Algorithm::RS256, PrimitiveDefinition::RsaPkcs1 { hash: Sha256 }),
            (Algorithm::RS384, PrimitiveDefinition::RsaPkcs1 { hash: Sha384 }),
            (Algorithm::RS512, PrimitiveDefinition::RsaPkcs1 { hash: Sha512 }),
            (
                Algorithm::PS256,
                PrimitiveDefinition::RsaPss {
                    hash: Sha256,
                    salt_length: 32,
                },
            ),
            (
                Algorithm::PS384,
                PrimitiveDefinition::RsaPss {
                    hash: Sha384,
                    salt_length: 48,
                },
            ),
            (
                Algorithm::PS512,
                PrimitiveDefinition::RsaPss {
                    hash: Sha512,
                    salt_length: 64,
                },
            ),
            (
                Algorithm::ES256,
                PrimitiveDefinition::Ecdsa {
                    hash: Sha256,
                    curve: P256,
                },
            ),
            (
                Algorithm::ES384,
                PrimitiveDefinition::Ecdsa {
                    hash: Sha384,
                    curve: P384,
                },
            ),
        ];

        for (alg, expected) in table {
            assert_eq!(resolve(alg).unwrap(), expected, "{alg}");
        }
    }

    #[test]
    fn none_has_no_primitive() {
        assert!(matches!(
            resolve(Algorithm::None),
            Err(JwtError::UnsupportedAlgorithm(name)) if name == "none"
        ));
    }

    #[test]
    fn resolve_name_rejects_es512() {
        assert!(matches!(
            resolve_name("ES512"),
            Err(JwtError::UnsupportedAlgorithm(name)) if name == "ES512"
        ));
        assert_eq!(
            resolve_name("PS512").unwrap(),
            PrimitiveDefinition::RsaPss {
                hash: HashFunction::Sha512,
                salt_length: 64
            }
        );
    }

    #[test]
    fn hmac_hash_must_match() {
        let sha256 = hmac(HashFunction::Sha256);
        let sha384 = hmac(HashFunction::Sha384);
        assert!(key_matches_algorithm(Algorithm::HS256, Some(&sha256)).unwrap());
        assert!(!key_matches_algorithm(Algorithm::HS256, Some(&sha384)).unwrap());
    }

    #[test]
    fn family_mismatch_despite_same_hash() {
        let pss = Described(KeyAlgorithm::RsaPss {
            hash: HashFunction::Sha256,
        });
        assert!(!key_matches_algorithm(Algorithm::RS256, Some(&pss)).unwrap());
        assert!(key_matches_algorithm(Algorithm::PS256, Some(&pss)).unwrap());
    }

    #[test]
    fn hmac_secret_cannot_stand_in_for_rsa() {
        let secret = hmac(HashFunction::Sha256);
        let rsa = Described(KeyAlgorithm::RsaPkcs1 {
            hash: HashFunction::Sha256,
        });
        assert!(!key_matches_algorithm(Algorithm::RS256, Some(&secret)).unwrap());
        assert!(!key_matches_algorithm(Algorithm::HS256, Some(&rsa)).unwrap());
    }

    #[test]
    fn curve_mismatch() {
        let p256 = Described(KeyAlgorithm::Ecdsa {
            curve: NamedCurve::P256,
        });
        assert!(!key_matches_algorithm(Algorithm::ES384, Some(&p256)).unwrap());
        assert!(key_matches_algorithm(Algorithm::ES256, Some(&p256)).unwrap());
    }

    #[test]
    fn foreign_key_is_not_a_match() {
        let ed = Described(KeyAlgorithm::Other {
            name: "Ed25519".to_string(),
        });
        for alg in Algorithm::ALL.into_iter().filter(|a| !a.is_none()) {
            assert!(!key_matches_algorithm(alg, Some(&ed)).unwrap(), "{alg}");
        }
    }

    #[test]
    fn none_rejects_any_key() {
        let key = hmac(HashFunction::Sha256);
        assert!(matches!(
            key_matches_algorithm(Algorithm::None, Some(&key)),
            Err(JwtError::KeyNotAllowed)
        ));
        assert!(key_matches_algorithm::<Described>(Algorithm::None, None).unwrap());
    }

    #[test]
    fn keyed_algorithms_require_a_key() {
        assert!(matches!(
            key_matches_algorithm::<Described>(Algorithm::HS256, None),
            Err(JwtError::KeyRequired(Algorithm::HS256))
        ));
    }
}
