//! Algorithm identifiers and the parameters they are built from
//!
//! `Algorithm` is the closed set of `alg` header values this crate accepts.
//! Anything else, including the registered-but-disabled `ES512`, is rejected
//! at parse time with [`JwtError::UnsupportedAlgorithm`].

use crate::error::JwtError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// JWS `alg` identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Algorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
    PS256,
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
    PS384,
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
    PS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    RS512,
    /// ECDSA using P-256 and SHA-256
    ES256,
    /// ECDSA using P-384 and SHA-384
    ES384,
    /// Unsecured token: no signature is produced or accepted
    #[serde(rename = "none")]
    None,
}

impl Algorithm {
    /// Every supported identifier, `none` last
    pub const ALL: [Algorithm; 12] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::PS256,
        Algorithm::PS384,
        Algorithm::PS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::ES256,
        Algorithm::ES384,
        Algorithm::None,
    ];

    /// Wire name as it appears in the `alg` header
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::PS256 => "PS256",
            Algorithm::PS384 => "PS384",
            Algorithm::PS512 => "PS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::None => "none",
        }
    }

    /// Whether this is the unsecured `none` sentinel
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Algorithm::None)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| JwtError::unsupported_algorithm(s))
    }
}

impl TryFrom<String> for Algorithm {
    type Error = JwtError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Digest used by a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashFunction {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashFunction {
    /// Digest size in bits
    #[must_use]
    pub const fn bit_length(self) -> usize {
        match self {
            HashFunction::Sha256 => 256,
            HashFunction::Sha384 => 384,
            HashFunction::Sha512 => 512,
        }
    }

    /// Digest size in bytes
    #[must_use]
    pub const fn output_len(self) -> usize {
        self.bit_length() / 8
    }

    /// Registered name, e.g. `SHA-256`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            HashFunction::Sha256 => "SHA-256",
            HashFunction::Sha384 => "SHA-384",
            HashFunction::Sha512 => "SHA-512",
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named elliptic curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCurve {
    /// NIST P-256 (secp256r1)
    P256,
    /// NIST P-384 (secp384r1)
    P384,
}

impl NamedCurve {
    /// Registered name, e.g. `P-256`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            NamedCurve::P256 => "P-256",
            NamedCurve::P384 => "P-384",
        }
    }

    /// Width of one scalar in bytes; a JWS signature is two of these
    #[must_use]
    pub const fn scalar_len(self) -> usize {
        match self {
            NamedCurve::P256 => 32,
            NamedCurve::P384 => 48,
        }
    }
}

impl fmt::Display for NamedCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Primitive family, the first thing compared when gating a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// HMAC
    Hmac,
    /// RSASSA-PKCS1-v1_5
    RsaPkcs1,
    /// RSA-PSS
    RsaPss,
    /// ECDSA
    Ecdsa,
}

impl Family {
    /// Family name as reported by key introspection
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Family::Hmac => "HMAC",
            Family::RsaPkcs1 => "RSASSA-PKCS1-v1_5",
            Family::RsaPss => "RSA-PSS",
            Family::Ecdsa => "ECDSA",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_wire_name() {
        for alg in Algorithm::ALL {
            assert_eq!(alg.as_str().parse::<Algorithm>().ok(), Some(alg));
        }
    }

    #[test]
    fn rejects_es512_and_lookalikes() {
        for name in ["ES512", "EdDSA", "hs256", "None", "NONE", ""] {
            match name.parse::<Algorithm>() {
                Err(JwtError::UnsupportedAlgorithm(got)) => assert_eq!(got, name),
                other => panic!("{name} parsed as {other:?}"),
            }
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Algorithm::None).unwrap();
        assert_eq!(json, "\"none\"");
        let alg: Algorithm = serde_json::from_str("\"PS384\"").unwrap();
        assert_eq!(alg, Algorithm::PS384);
        assert!(serde_json::from_str::<Algorithm>("\"ES512\"").is_err());
    }

    #[test]
    fn hash_lengths() {
        assert_eq!(HashFunction::Sha256.output_len(), 32);
        assert_eq!(HashFunction::Sha384.output_len(), 48);
        assert_eq!(HashFunction::Sha512.output_len(), 64);
    }
}
