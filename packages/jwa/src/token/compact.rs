//! Compact serialization
//!
//! `base64url(header) . base64url(payload) . base64url(signature)`, no
//! padding. The signature segment is empty for `none`.

use super::header::JwtHeader;
use super::validation::Validation;
use crate::algorithm::Algorithm;
use crate::codec::SignatureCodec;
use crate::engine::CryptoEngine;
use crate::error::{JwtError, JwtResult};
use crate::key::KeyHandle;
use crate::registry::key_matches_algorithm;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decoded header and claims of a verified token
#[derive(Debug, Clone, PartialEq)]
pub struct TokenData<C> {
    /// Header as sent
    pub header: JwtHeader,
    /// Validated claims
    pub claims: C,
}

/// Base64 URL-safe encoding without padding (RFC 7515)
#[inline]
pub fn base64_url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64 URL-safe decoding without padding (RFC 7515)
///
/// # Errors
/// Returns [`JwtError::InvalidToken`] when `input` is not base64url.
#[inline]
pub fn base64_url_decode(input: &str) -> JwtResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| JwtError::invalid_token(format!("Invalid base64url segment: {e}")))
}

/// Sign `claims` into a compact token
///
/// # Errors
/// Serialization failures, plus anything [`SignatureCodec::sign`] reports.
pub fn encode<E, C>(
    codec: &SignatureCodec<E>,
    header: &JwtHeader,
    claims: &C,
    key: Option<&E::Key>,
) -> JwtResult<String>
where
    E: CryptoEngine,
    C: Serialize + ?Sized,
{
    let header_b64 = base64_url_encode(&serde_json::to_vec(header)?);
    let payload_b64 = base64_url_encode(&serde_json::to_vec(claims)?);

    let mut token = String::with_capacity(header_b64.len() + payload_b64.len() + 2);
    token.push_str(&header_b64);
    token.push('.');
    token.push_str(&payload_b64);

    let signature = codec.sign(header.alg, key, &token)?;
    token.push('.');
    token.push_str(&base64_url_encode(&signature));

    tracing::debug!(alg = %header.alg, "encoded token");
    Ok(token)
}

/// Verify a compact token and return its header and claims
///
/// The header is untrusted input: its `alg` must be listed in `validation`
/// and must match the key before any signature check happens.
///
/// # Errors
/// [`JwtError::InvalidToken`] for malformed input,
/// [`JwtError::UnsupportedAlgorithm`] for unknown or unlisted algorithms,
/// [`JwtError::InvalidSignature`] for a wrong key or bad signature, and the
/// claim errors of [`Validation::validate`].
pub fn decode<E, C>(
    codec: &SignatureCodec<E>,
    token: &str,
    key: Option<&E::Key>,
    validation: &Validation,
) -> JwtResult<TokenData<C>>
where
    E: CryptoEngine,
    C: DeserializeOwned,
{
    let (signing_input, signature_b64) = token
        .rsplit_once('.')
        .ok_or_else(|| JwtError::invalid_token("Invalid JWT format"))?;
    let (header_b64, payload_b64) = signing_input
        .split_once('.')
        .ok_or_else(|| JwtError::invalid_token("Invalid JWT format"))?;
    if payload_b64.contains('.') {
        return Err(JwtError::invalid_token("Invalid JWT format"));
    }

    let header = parse_header(&base64_url_decode(header_b64)?)?;
    let algorithm = header.alg;

    if !validation.permits(algorithm) {
        tracing::warn!(%algorithm, "token algorithm not permitted");
        return Err(JwtError::unsupported_algorithm(format!(
            "{algorithm} is not accepted here"
        )));
    }

    // a key the header cannot legitimately use is the same outcome as a bad signature
    match key_matches_algorithm(algorithm, key) {
        Ok(true) => {}
        Ok(false) | Err(JwtError::KeyNotAllowed) => {
            tracing::debug!(
                %algorithm,
                key = %key.map(|k| k.algorithm().to_string()).unwrap_or_default(),
                "key rejected for token algorithm"
            );
            return Err(JwtError::InvalidSignature);
        }
        Err(e) => return Err(e),
    }

    let signature = base64_url_decode(signature_b64)?;
    if !codec.verify(&signature, key, algorithm, signing_input)? {
        return Err(JwtError::InvalidSignature);
    }

    let payload = base64_url_decode(payload_b64)?;
    let claims: Value = serde_json::from_slice(&payload)
        .map_err(|e| JwtError::invalid_token(format!("Invalid payload JSON: {e}")))?;

    validation.validate(&claims, chrono::Utc::now().timestamp())?;

    let claims = serde_json::from_value(claims)?;
    tracing::debug!(%algorithm, "decoded token");
    Ok(TokenData { header, claims })
}

/// Read the header without verifying anything
///
/// Useful for picking a key by `kid`; never trust the result on its own.
///
/// # Errors
/// [`JwtError::InvalidToken`] or [`JwtError::UnsupportedAlgorithm`].
pub fn decode_header(token: &str) -> JwtResult<JwtHeader> {
    let header_b64 = token
        .split('.')
        .next()
        .ok_or_else(|| JwtError::invalid_token("Invalid JWT format"))?;
    parse_header(&base64_url_decode(header_b64)?)
}

fn parse_header(bytes: &[u8]) -> JwtResult<JwtHeader> {
    let raw: Value = serde_json::from_slice(bytes)
        .map_err(|e| JwtError::invalid_token(format!("Invalid header JSON: {e}")))?;
    // surface unknown algorithms as such rather than as a generic parse error
    let alg = raw
        .get("alg")
        .and_then(Value::as_str)
        .ok_or_else(|| JwtError::invalid_token("Header has no alg"))?;
    alg.parse::<Algorithm>()?;
    serde_json::from_value(raw)
        .map_err(|e| JwtError::invalid_token(format!("Invalid header: {e}")))
}
