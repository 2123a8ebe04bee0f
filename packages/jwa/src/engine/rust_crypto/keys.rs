//! Keys understood by the RustCrypto engine
//!
//! A [`JwtKey`] pairs parsed key material with the algorithm it was
//! provisioned for. Loading validates the material up front so signing and
//! verification never see a half-parsed key.

use crate::algorithm::{Algorithm, HashFunction, NamedCurve};
use crate::error::{JwtError, JwtResult};
use crate::key::{KeyAlgorithm, KeyHandle};
use crate::registry::{self, PrimitiveDefinition};
use p256::elliptic_curve::rand_core::{OsRng, RngCore};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use zeroize::Zeroizing;

/// Smallest RSA modulus accepted, in bits
pub const MIN_RSA_BITS: usize = 2048;

#[derive(Clone)]
pub(crate) enum Material {
    Secret(Zeroizing<Vec<u8>>),
    RsaPrivate(Box<RsaPrivateKey>),
    RsaPublic(Box<RsaPublicKey>),
    P256Signing(p256::ecdsa::SigningKey),
    P256Verifying(p256::ecdsa::VerifyingKey),
    P384Signing(p384::ecdsa::SigningKey),
    P384Verifying(p384::ecdsa::VerifyingKey),
}

/// Key for the [`RustCryptoEngine`](super::RustCryptoEngine)
#[derive(Clone)]
pub struct JwtKey {
    algorithm: KeyAlgorithm,
    material: Material,
}

impl JwtKey {
    /// HMAC secret bound to `hash`
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the secret is shorter than the
    /// digest output (32, 48 or 64 bytes).
    pub fn hmac(hash: HashFunction, secret: &[u8]) -> JwtResult<Self> {
        let min_length = hash.output_len();
        if secret.len() < min_length {
            return Err(JwtError::invalid_key(format!(
                "HMAC key for {hash} must be at least {min_length} bytes, got {}",
                secret.len()
            )));
        }

        Ok(Self {
            algorithm: KeyAlgorithm::Hmac { hash },
            material: Material::Secret(Zeroizing::new(secret.to_vec())),
        })
    }

    /// HMAC secret for one of the `HS*` algorithms
    ///
    /// # Errors
    /// Returns [`JwtError::UnsupportedAlgorithm`] for non-HMAC algorithms and
    /// [`JwtError::InvalidKey`] for short secrets.
    pub fn hmac_for(algorithm: Algorithm, secret: &[u8]) -> JwtResult<Self> {
        match registry::resolve(algorithm)? {
            PrimitiveDefinition::Hmac { hash } => Self::hmac(hash, secret),
            _ => Err(JwtError::unsupported_algorithm(algorithm.as_str())),
        }
    }

    /// Fresh random HMAC secret of digest length
    #[must_use]
    pub fn generate_hmac(hash: HashFunction) -> Self {
        let mut secret = Zeroizing::new(vec![0u8; hash.output_len()]);
        OsRng.fill_bytes(&mut secret);
        Self {
            algorithm: KeyAlgorithm::Hmac { hash },
            material: Material::Secret(secret),
        }
    }

    /// RSA private key for an `RS*` or `PS*` algorithm
    ///
    /// # Errors
    /// Returns [`JwtError::UnsupportedAlgorithm`] for non-RSA algorithms and
    /// [`JwtError::InvalidKey`] for moduli under [`MIN_RSA_BITS`].
    pub fn from_rsa_private_key(algorithm: Algorithm, key: RsaPrivateKey) -> JwtResult<Self> {
        check_rsa_size(&key)?;
        Ok(Self {
            algorithm: rsa_descriptor(algorithm)?,
            material: Material::RsaPrivate(Box::new(key)),
        })
    }

    /// RSA public key for an `RS*` or `PS*` algorithm
    ///
    /// # Errors
    /// Same as [`JwtKey::from_rsa_private_key`].
    pub fn from_rsa_public_key(algorithm: Algorithm, key: RsaPublicKey) -> JwtResult<Self> {
        check_rsa_size(&key)?;
        Ok(Self {
            algorithm: rsa_descriptor(algorithm)?,
            material: Material::RsaPublic(Box::new(key)),
        })
    }

    /// RSA private key from PKCS#8 DER
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the DER does not parse.
    pub fn from_rsa_pkcs8_der(algorithm: Algorithm, der: &[u8]) -> JwtResult<Self> {
        let key = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| JwtError::invalid_key(format!("Invalid RSA private key: {e}")))?;
        Self::from_rsa_private_key(algorithm, key)
    }

    /// RSA private key from PKCS#8 PEM
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the PEM does not parse.
    pub fn from_rsa_pkcs8_pem(algorithm: Algorithm, pem: &str) -> JwtResult<Self> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| JwtError::invalid_key(format!("Invalid RSA private key: {e}")))?;
        Self::from_rsa_private_key(algorithm, key)
    }

    /// RSA public key from SPKI DER
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the DER does not parse.
    pub fn from_rsa_public_der(algorithm: Algorithm, der: &[u8]) -> JwtResult<Self> {
        let key = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| JwtError::invalid_key(format!("Invalid RSA public key: {e}")))?;
        Self::from_rsa_public_key(algorithm, key)
    }

    /// RSA public key from SPKI PEM
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the PEM does not parse.
    pub fn from_rsa_public_pem(algorithm: Algorithm, pem: &str) -> JwtResult<Self> {
        let key = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| JwtError::invalid_key(format!("Invalid RSA public key: {e}")))?;
        Self::from_rsa_public_key(algorithm, key)
    }

    /// EC private key from PKCS#8 DER
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the DER is not a key on `curve`.
    pub fn from_ec_pkcs8_der(curve: NamedCurve, der: &[u8]) -> JwtResult<Self> {
        let material = match curve {
            NamedCurve::P256 => p256::ecdsa::SigningKey::from_pkcs8_der(der)
                .map(Material::P256Signing)
                .map_err(|e| ec_error(curve, &e))?,
            NamedCurve::P384 => p384::ecdsa::SigningKey::from_pkcs8_der(der)
                .map(Material::P384Signing)
                .map_err(|e| ec_error(curve, &e))?,
        };
        Ok(Self::ec(curve, material))
    }

    /// EC private key from PKCS#8 PEM
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the PEM is not a key on `curve`.
    pub fn from_ec_pkcs8_pem(curve: NamedCurve, pem: &str) -> JwtResult<Self> {
        let material = match curve {
            NamedCurve::P256 => p256::ecdsa::SigningKey::from_pkcs8_pem(pem)
                .map(Material::P256Signing)
                .map_err(|e| ec_error(curve, &e))?,
            NamedCurve::P384 => p384::ecdsa::SigningKey::from_pkcs8_pem(pem)
                .map(Material::P384Signing)
                .map_err(|e| ec_error(curve, &e))?,
        };
        Ok(Self::ec(curve, material))
    }

    /// EC public key from SPKI DER
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the DER is not a key on `curve`.
    pub fn from_ec_public_der(curve: NamedCurve, der: &[u8]) -> JwtResult<Self> {
        let material = match curve {
            NamedCurve::P256 => p256::ecdsa::VerifyingKey::from_public_key_der(der)
                .map(Material::P256Verifying)
                .map_err(|e| ec_error(curve, &e))?,
            NamedCurve::P384 => p384::ecdsa::VerifyingKey::from_public_key_der(der)
                .map(Material::P384Verifying)
                .map_err(|e| ec_error(curve, &e))?,
        };
        Ok(Self::ec(curve, material))
    }

    /// EC public key from SPKI PEM
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the PEM is not a key on `curve`.
    pub fn from_ec_public_pem(curve: NamedCurve, pem: &str) -> JwtResult<Self> {
        let material = match curve {
            NamedCurve::P256 => p256::ecdsa::VerifyingKey::from_public_key_pem(pem)
                .map(Material::P256Verifying)
                .map_err(|e| ec_error(curve, &e))?,
            NamedCurve::P384 => p384::ecdsa::VerifyingKey::from_public_key_pem(pem)
                .map(Material::P384Verifying)
                .map_err(|e| ec_error(curve, &e))?,
        };
        Ok(Self::ec(curve, material))
    }

    /// EC public key from a SEC1 point (compressed or uncompressed)
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the bytes are not a point on `curve`.
    pub fn from_ec_sec1_public(curve: NamedCurve, point: &[u8]) -> JwtResult<Self> {
        let material = match curve {
            NamedCurve::P256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(point)
                .map(Material::P256Verifying)
                .map_err(|e| ec_error(curve, &e))?,
            NamedCurve::P384 => p384::ecdsa::VerifyingKey::from_sec1_bytes(point)
                .map(Material::P384Verifying)
                .map_err(|e| ec_error(curve, &e))?,
        };
        Ok(Self::ec(curve, material))
    }

    /// Fresh random EC signing key
    #[must_use]
    pub fn generate_ec(curve: NamedCurve) -> Self {
        let material = match curve {
            NamedCurve::P256 => Material::P256Signing(p256::ecdsa::SigningKey::random(&mut OsRng)),
            NamedCurve::P384 => Material::P384Signing(p384::ecdsa::SigningKey::random(&mut OsRng)),
        };
        Self::ec(curve, material)
    }

    /// Verification half of this key
    ///
    /// HMAC secrets are symmetric and come back unchanged.
    #[must_use]
    pub fn to_public(&self) -> Self {
        let material = match &self.material {
            Material::RsaPrivate(key) => Material::RsaPublic(Box::new(key.to_public_key())),
            Material::P256Signing(key) => {
                Material::P256Verifying(p256::ecdsa::VerifyingKey::from(key))
            }
            Material::P384Signing(key) => {
                Material::P384Verifying(p384::ecdsa::VerifyingKey::from(key))
            }
            other => other.clone(),
        };
        Self {
            algorithm: self.algorithm.clone(),
            material,
        }
    }

    /// Whether this key can sign
    #[must_use]
    pub fn can_sign(&self) -> bool {
        matches!(
            self.material,
            Material::Secret(_)
                | Material::RsaPrivate(_)
                | Material::P256Signing(_)
                | Material::P384Signing(_)
        )
    }

    pub(crate) fn material(&self) -> &Material {
        &self.material
    }

    fn ec(curve: NamedCurve, material: Material) -> Self {
        Self {
            algorithm: KeyAlgorithm::Ecdsa { curve },
            material,
        }
    }
}

impl KeyHandle for JwtKey {
    fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm.clone()
    }
}

impl fmt::Debug for JwtKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKey")
            .field("algorithm", &self.algorithm)
            .field("private", &self.can_sign())
            .finish_non_exhaustive()
    }
}

fn rsa_descriptor(algorithm: Algorithm) -> JwtResult<KeyAlgorithm> {
    match registry::resolve(algorithm)? {
        PrimitiveDefinition::RsaPkcs1 { hash } => Ok(KeyAlgorithm::RsaPkcs1 { hash }),
        PrimitiveDefinition::RsaPss { hash, .. } => Ok(KeyAlgorithm::RsaPss { hash }),
        _ => Err(JwtError::unsupported_algorithm(algorithm.as_str())),
    }
}

fn check_rsa_size(key: &impl PublicKeyParts) -> JwtResult<()> {
    let bits = key.n().bits();
    if bits < MIN_RSA_BITS {
        return Err(JwtError::invalid_key(format!(
            "RSA modulus must be at least {MIN_RSA_BITS} bits, got {bits}"
        )));
    }
    Ok(())
}

fn ec_error(curve: NamedCurve, err: &dyn fmt::Display) -> JwtError {
    JwtError::invalid_key(format!("Invalid {curve} key: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hmac_secrets_are_rejected() {
        assert!(matches!(
            JwtKey::hmac(HashFunction::Sha512, &[7u8; 63]),
            Err(JwtError::InvalidKey(_))
        ));
        assert!(JwtKey::hmac(HashFunction::Sha512, &[7u8; 64]).is_ok());
    }

    #[test]
    fn hmac_for_refuses_asymmetric_algorithms() {
        assert!(matches!(
            JwtKey::hmac_for(Algorithm::RS256, &[1u8; 64]),
            Err(JwtError::UnsupportedAlgorithm(name)) if name == "RS256"
        ));
        let key = JwtKey::hmac_for(Algorithm::HS384, &[1u8; 48]).unwrap();
        assert_eq!(
            key.algorithm(),
            KeyAlgorithm::Hmac {
                hash: HashFunction::Sha384
            }
        );
    }

    #[test]
    fn debug_output_hides_material() {
        let key = JwtKey::hmac(HashFunction::Sha256, b"super-secret-value-for-hmac-sha256!!").unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("Hmac"));
    }

    #[test]
    fn public_half_of_ec_key_cannot_sign() {
        let key = JwtKey::generate_ec(NamedCurve::P384);
        assert!(key.can_sign());
        let public = key.to_public();
        assert!(!public.can_sign());
        assert_eq!(public.algorithm(), key.algorithm());
    }

    #[test]
    fn garbage_der_is_an_invalid_key() {
        assert!(matches!(
            JwtKey::from_ec_public_der(NamedCurve::P256, b"not a key"),
            Err(JwtError::InvalidKey(_))
        ));
        assert!(matches!(
            JwtKey::from_rsa_pkcs8_der(Algorithm::PS256, b"not a key"),
            Err(JwtError::InvalidKey(_))
        ));
    }
}
