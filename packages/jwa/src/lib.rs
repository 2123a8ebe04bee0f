//! JSON Web Algorithms binding for JWT signing and verification
//!
//! This crate provides:
//! - A closed [`Algorithm`] set (`HS*`, `RS*`, `PS*`, `ES256`, `ES384`, `none`)
//! - [`registry::resolve`] from algorithm to [`PrimitiveDefinition`]
//! - [`registry::key_matches_algorithm`], the algorithm-confusion gate
//! - [`SignatureCodec`] over an injectable [`CryptoEngine`]
//! - A RustCrypto engine with its [`JwtKey`] type
//! - Compact token encode/decode, claim validation and an async builder

pub mod algorithm;
pub mod codec;
pub mod engine;
mod error;
pub mod key;
pub mod registry;
pub mod token;

pub use algorithm::{Algorithm, Family, HashFunction, NamedCurve};
pub use codec::SignatureCodec;
pub use engine::{CryptoEngine, EngineError, JwtKey, RustCryptoEngine};
pub use error::{JwtError, JwtResult};
pub use key::{KeyAlgorithm, KeyHandle};
pub use registry::{PrimitiveDefinition, key_matches_algorithm, resolve};
pub use token::{
    AsyncJwtResult, Audience, Jwt, JwtBuilder, JwtClaims, JwtHeader, TokenData, Validation,
};
