//! Token assembly on top of the codec
//!
//! Header and claims JSON, base64url compact serialization, claim
//! validation and the async builder.

mod async_result;
pub mod builder;
pub mod claims;
pub mod compact;
pub mod header;
pub mod validation;

pub use async_result::AsyncJwtResult;
pub use builder::{Jwt, JwtBuilder};
pub use claims::{Audience, JwtClaims};
pub use compact::{TokenData, decode, decode_header, encode};
pub use header::JwtHeader;
pub use validation::Validation;
