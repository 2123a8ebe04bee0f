//! Claim validation
//!
//! `Validation` is plain configuration: it can be built in code with the
//! `with_*` methods or deserialized from a config file.

use crate::algorithm::Algorithm;
use crate::error::{JwtError, JwtResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_leeway() -> i64 {
    60
}

fn default_true() -> bool {
    true
}

/// What a decoded token must satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Validation {
    /// Algorithms a token header may declare
    pub algorithms: Vec<Algorithm>,
    /// Accept `none` tokens when it is also listed in `algorithms`
    pub allow_unsecured: bool,
    /// Clock skew tolerance for `exp`, `nbf` and `iat`, in seconds
    #[serde(default = "default_leeway")]
    pub leeway_seconds: i64,
    /// Reject expired tokens
    #[serde(default = "default_true")]
    pub validate_exp: bool,
    /// Reject tokens before `nbf`
    #[serde(default = "default_true")]
    pub validate_nbf: bool,
    /// Expected `iss`
    pub issuer: Option<String>,
    /// Accepted `aud` values; the token must name at least one
    pub audience: Option<Vec<String>>,
    /// Claims that must be present
    pub required_claims: Vec<String>,
}

impl Default for Validation {
    fn default() -> Self {
        Self {
            algorithms: Vec::new(),
            allow_unsecured: false,
            leeway_seconds: default_leeway(),
            validate_exp: true,
            validate_nbf: true,
            issuer: None,
            audience: None,
            required_claims: Vec::new(),
        }
    }
}

impl Validation {
    /// Accept tokens signed with `algorithm`
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithms: vec![algorithm],
            ..Self::default()
        }
    }

    /// Also accept `algorithm`
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        if !self.algorithms.contains(&algorithm) {
            self.algorithms.push(algorithm);
        }
        self
    }

    /// Accept unsecured `none` tokens
    #[must_use]
    pub fn allow_unsecured(mut self) -> Self {
        self.allow_unsecured = true;
        self.with_algorithm(Algorithm::None)
    }

    /// Set the clock skew tolerance
    #[must_use]
    pub fn with_leeway(mut self, seconds: i64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Require `iss` to equal `issuer`
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Require `aud` to name `audience` (may be called repeatedly)
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience
            .get_or_insert_with(Vec::new)
            .push(audience.into());
        self
    }

    /// Require `claim` to be present
    #[must_use]
    pub fn require_claim(mut self, claim: impl Into<String>) -> Self {
        self.required_claims.push(claim.into());
        self
    }

    /// Skip the `exp` check
    #[must_use]
    pub fn without_expiry_check(mut self) -> Self {
        self.validate_exp = false;
        self
    }

    /// Whether a header declaring `algorithm` may be processed at all
    #[must_use]
    pub fn permits(&self, algorithm: Algorithm) -> bool {
        if algorithm.is_none() && !self.allow_unsecured {
            return false;
        }
        self.algorithms.contains(&algorithm)
    }

    /// Check `claims` against this configuration at time `now` (unix seconds)
    ///
    /// `exp`, `nbf` and `iat` must be whole seconds. A fractional NumericDate
    /// is rejected as [`JwtError::InvalidClaims`], since [`JwtClaims`] stores
    /// them as `i64`.
    ///
    /// [`JwtClaims`]: super::claims::JwtClaims
    ///
    /// # Errors
    /// Returns the first failing check: [`JwtError::InvalidClaims`],
    /// [`JwtError::MissingClaim`], [`JwtError::TokenExpired`],
    /// [`JwtError::TokenNotYetValid`], [`JwtError::InvalidIssuer`] or
    /// [`JwtError::InvalidAudience`].
    pub fn validate(&self, claims: &Value, now: i64) -> JwtResult<()> {
        let obj = claims
            .as_object()
            .ok_or_else(|| JwtError::invalid_claims("Claims must be a JSON object"))?;

        for name in ["iss", "sub", "jti"] {
            if let Some(value) = obj.get(name)
                && !value.is_string()
            {
                return Err(JwtError::invalid_claims(format!("{name} must be a string")));
            }
        }

        for name in ["exp", "nbf", "iat"] {
            if let Some(value) = obj.get(name)
                && value.as_i64().is_none()
            {
                return Err(JwtError::invalid_claims(format!(
                    "{name} must be an integer NumericDate"
                )));
            }
        }

        if let Some(aud) = obj.get("aud") {
            let well_formed = match aud {
                Value::String(_) => true,
                Value::Array(items) => items.iter().all(Value::is_string),
                _ => false,
            };
            if !well_formed {
                return Err(JwtError::invalid_claims(
                    "Audience must be a string or array of strings",
                ));
            }
        }

        for name in &self.required_claims {
            if !obj.contains_key(name) {
                return Err(JwtError::MissingClaim(name.clone()));
            }
        }

        let leeway = self.leeway_seconds;

        if self.validate_exp
            && let Some(exp) = obj.get("exp").and_then(Value::as_i64)
            && now > exp.saturating_add(leeway)
        {
            return Err(JwtError::TokenExpired);
        }

        if self.validate_nbf
            && let Some(nbf) = obj.get("nbf").and_then(Value::as_i64)
            && now.saturating_add(leeway) < nbf
        {
            return Err(JwtError::TokenNotYetValid);
        }

        if let Some(iat) = obj.get("iat").and_then(Value::as_i64)
            && iat > now.saturating_add(leeway)
        {
            return Err(JwtError::invalid_claims("Token issued in the future"));
        }

        if let Some(expected) = &self.issuer
            && obj.get("iss").and_then(Value::as_str) != Some(expected.as_str())
        {
            return Err(JwtError::InvalidIssuer);
        }

        if let Some(accepted) = &self.audience {
            let named = match obj.get("aud") {
                Some(Value::String(aud)) => accepted.iter().any(|a| a == aud),
                Some(Value::Array(auds)) => auds
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|aud| accepted.iter().any(|a| a == aud)),
                _ => false,
            };
            if !named {
                return Err(JwtError::InvalidAudience);
            }
        }

        Ok(())
    }
}
