//! Key introspection
//!
//! The core never looks at key material. All it needs from a key is the
//! algorithm it was provisioned for, reported as a [`KeyAlgorithm`] tagged the
//! same way as [`PrimitiveDefinition`](crate::registry::PrimitiveDefinition).

use crate::algorithm::{Family, HashFunction, NamedCurve};
use std::fmt;

/// Algorithm a key was provisioned for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// HMAC secret bound to a digest
    Hmac {
        /// Digest the secret is meant for
        hash: HashFunction,
    },
    /// RSA key for RSASSA-PKCS1-v1_5
    RsaPkcs1 {
        /// Digest the key is meant for
        hash: HashFunction,
    },
    /// RSA key for RSA-PSS
    RsaPss {
        /// Digest the key is meant for
        hash: HashFunction,
    },
    /// EC key on a named curve
    Ecdsa {
        /// Curve the key lives on
        curve: NamedCurve,
    },
    /// Any algorithm this crate has no primitive for (Ed25519, AES-KW, ...)
    Other {
        /// Name as reported by the key's owner
        name: String,
    },
}

impl KeyAlgorithm {
    /// Family of the key, `None` for foreign algorithms
    #[must_use]
    pub fn family(&self) -> Option<Family> {
        match self {
            KeyAlgorithm::Hmac { .. } => Some(Family::Hmac),
            KeyAlgorithm::RsaPkcs1 { .. } => Some(Family::RsaPkcs1),
            KeyAlgorithm::RsaPss { .. } => Some(Family::RsaPss),
            KeyAlgorithm::Ecdsa { .. } => Some(Family::Ecdsa),
            KeyAlgorithm::Other { .. } => None,
        }
    }

    /// Family name as reported by the key
    #[must_use]
    pub fn family_name(&self) -> &str {
        match self {
            KeyAlgorithm::Other { name } => name,
            other => other.family().map_or("", Family::name),
        }
    }

    /// Digest, for hash-parameterized families
    #[must_use]
    pub fn hash(&self) -> Option<HashFunction> {
        match self {
            KeyAlgorithm::Hmac { hash }
            | KeyAlgorithm::RsaPkcs1 { hash }
            | KeyAlgorithm::RsaPss { hash } => Some(*hash),
            KeyAlgorithm::Ecdsa { .. } | KeyAlgorithm::Other { .. } => None,
        }
    }

    /// Named curve, for EC keys
    #[must_use]
    pub fn curve(&self) -> Option<NamedCurve> {
        match self {
            KeyAlgorithm::Ecdsa { curve } => Some(*curve),
            _ => None,
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAlgorithm::Hmac { hash }
            | KeyAlgorithm::RsaPkcs1 { hash }
            | KeyAlgorithm::RsaPss { hash } => write!(f, "{}/{hash}", self.family_name()),
            KeyAlgorithm::Ecdsa { curve } => write!(f, "ECDSA/{curve}"),
            KeyAlgorithm::Other { name } => f.write_str(name),
        }
    }
}

/// Opaque key capability
///
/// Implementations hand the core nothing but their algorithm descriptor; the
/// material itself only travels to the engine that owns the key type.
pub trait KeyHandle: Send + Sync {
    /// Algorithm this key was provisioned for
    fn algorithm(&self) -> KeyAlgorithm;
}

impl<T: KeyHandle + ?Sized> KeyHandle for &T {
    fn algorithm(&self) -> KeyAlgorithm {
        (**self).algorithm()
    }
}

impl<T: KeyHandle + ?Sized> KeyHandle for std::sync::Arc<T> {
    fn algorithm(&self) -> KeyAlgorithm {
        (**self).algorithm()
    }
}
