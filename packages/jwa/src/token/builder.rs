//! Async builder API
//!
//! ```no_run
//! # async fn run() -> cryypt_jwa::JwtResult<()> {
//! use cryypt_jwa::{Algorithm, HashFunction, Jwt, JwtClaims, JwtKey};
//!
//! let key = JwtKey::generate_hmac(HashFunction::Sha256);
//! let token = Jwt::builder()
//!     .with_algorithm(Algorithm::HS256)
//!     .with_key(key.clone())
//!     .sign(JwtClaims::new().subject("user-1"))
//!     .await?;
//! let data = Jwt::builder()
//!     .with_algorithm(Algorithm::HS256)
//!     .with_key(key)
//!     .verify(token)
//!     .await?;
//! assert_eq!(data.claims.sub.as_deref(), Some("user-1"));
//! # Ok(())
//! # }
//! ```

use super::async_result::AsyncJwtResult;
use super::claims::JwtClaims;
use super::compact::{self, TokenData};
use super::header::JwtHeader;
use super::validation::Validation;
use crate::algorithm::Algorithm;
use crate::codec::SignatureCodec;
use crate::engine::{JwtKey, RustCryptoEngine};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Entry point for the builder API
pub struct Jwt;

impl Jwt {
    /// New builder, `HS256` until told otherwise
    #[must_use]
    pub fn builder() -> JwtBuilder {
        JwtBuilder::new()
    }
}

/// Collects algorithm, key and validation for one sign or verify
#[derive(Debug, Clone)]
pub struct JwtBuilder {
    algorithm: Algorithm,
    key: Option<JwtKey>,
    key_id: Option<String>,
    validation: Option<Validation>,
}

impl Default for JwtBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JwtBuilder {
    /// Create new JWT builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithm: Algorithm::HS256,
            key: None,
            key_id: None,
            validation: None,
        }
    }

    /// Set algorithm
    #[inline]
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the signing or verification key
    #[inline]
    #[must_use]
    pub fn with_key(mut self, key: JwtKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Put `kid` in the header when signing
    #[inline]
    #[must_use]
    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.key_id = Some(kid.into());
        self
    }

    /// Replace the default validation (only the builder's algorithm, 60s leeway)
    #[inline]
    #[must_use]
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Sign `claims` on the blocking pool
    ///
    /// Resolves to [`JwtError::Internal`](crate::JwtError::Internal) when
    /// called outside a Tokio runtime.
    pub fn sign<C>(self, claims: C) -> AsyncJwtResult<String>
    where
        C: Serialize + Send + 'static,
    {
        AsyncJwtResult::spawn(move || {
            let mut header = JwtHeader::new(self.algorithm);
            header.kid = self.key_id;
            let codec = SignatureCodec::new(RustCryptoEngine);
            compact::encode(&codec, &header, &claims, self.key.as_ref())
        })
    }

    /// Verify `token` into [`JwtClaims`]
    pub fn verify(self, token: impl Into<String>) -> AsyncJwtResult<TokenData<JwtClaims>> {
        self.verify_as(token)
    }

    /// Verify `token` into caller-defined claims
    ///
    /// Resolves to [`JwtError::Internal`](crate::JwtError::Internal) when
    /// called outside a Tokio runtime.
    pub fn verify_as<C>(self, token: impl Into<String>) -> AsyncJwtResult<TokenData<C>>
    where
        C: DeserializeOwned + Send + 'static,
    {
        let token = token.into();
        AsyncJwtResult::spawn(move || {
            let validation = self
                .validation
                .unwrap_or_else(|| Validation::new(self.algorithm));
            let codec = SignatureCodec::new(RustCryptoEngine);
            compact::decode(&codec, &token, self.key.as_ref(), &validation)
        })
    }
}
