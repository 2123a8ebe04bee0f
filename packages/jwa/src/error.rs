//! JWT error types

use crate::algorithm::Algorithm;
use crate::engine::EngineError;
use crate::key::KeyAlgorithm;
use thiserror::Error;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// JWT error types
///
/// A cryptographically invalid signature is never reported through this type
/// by the codec; it is an `Ok(false)` verdict.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Identifier outside the supported set, explicitly disabled (`ES512`),
    /// or `none` passed where a primitive is required
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A non-`none` algorithm was used without a key
    #[error("A key is required for {0}")]
    KeyRequired(Algorithm),

    /// A key was supplied alongside `none`
    #[error("Unsecured (none) tokens must not carry a key")]
    KeyNotAllowed,

    /// The key was provisioned for a different algorithm than the one requested
    #[error("Key provisioned for {key} cannot be used with {algorithm}")]
    IncompatibleKey {
        /// Algorithm the caller asked for
        algorithm: Algorithm,
        /// Algorithm the key reports
        key: KeyAlgorithm,
    },

    /// The crypto engine failed to produce a signature
    #[error("Signing failed: {0}")]
    SigningFailed(#[source] EngineError),

    /// The crypto engine could not run the verification
    #[error("Verification failed: {0}")]
    VerificationFailed(#[source] EngineError),

    /// Key material could not be loaded
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid JWT format
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    /// Signature did not verify
    #[error("Invalid JWT signature")]
    InvalidSignature,

    /// Token has expired
    #[error("JWT token has expired")]
    TokenExpired,

    /// Token not yet valid
    #[error("JWT token not yet valid")]
    TokenNotYetValid,

    /// Invalid issuer
    #[error("Invalid JWT issuer")]
    InvalidIssuer,

    /// Invalid audience
    #[error("Invalid JWT audience")]
    InvalidAudience,

    /// Missing required claim
    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    /// Claim present but malformed
    #[error("Invalid claims: {0}")]
    InvalidClaims(String),

    /// Header or claims could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl JwtError {
    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm(alg.into())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create an invalid token error
    #[inline]
    #[must_use]
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    /// Create an invalid claims error
    #[inline]
    #[must_use]
    pub fn invalid_claims(msg: impl Into<String>) -> Self {
        Self::InvalidClaims(msg.into())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create an internal error
    #[inline]
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<serde_json::Error> for JwtError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
