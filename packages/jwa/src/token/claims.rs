//! Registered and custom claims

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// `aud` is either one string or an array of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// Single audience
    Single(String),
    /// Several audiences
    Many(Vec<String>),
}

impl Audience {
    /// Whether `audience` is among the listed values
    #[must_use]
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(value) => value == audience,
            Audience::Many(values) => values.iter().any(|value| value == audience),
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    /// Expiration time (unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Not before (unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued at (unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// JWT ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Custom claims, flattened into the payload root
    #[serde(flatten)]
    pub custom: HashMap<String, Value>,
}

impl JwtClaims {
    /// Empty claim set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `sub`
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.sub = Some(subject.into());
        self
    }

    /// Set `iss`
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    /// Set `aud` to a single value
    #[must_use]
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.aud = Some(Audience::Single(audience.into()));
        self
    }

    /// Set `aud` to several values
    #[must_use]
    pub fn audiences<I, S>(mut self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aud = Some(Audience::Many(
            audiences.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Set `jti`
    #[must_use]
    pub fn jwt_id(mut self, id: impl Into<String>) -> Self {
        self.jti = Some(id.into());
        self
    }

    /// Set `exp` to an absolute time
    #[must_use]
    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.exp = Some(at.timestamp());
        self
    }

    /// Set `exp` relative to now
    #[must_use]
    pub fn expires_in(self, duration: Duration) -> Self {
        self.expires_at(Utc::now() + duration)
    }

    /// Set `nbf`
    #[must_use]
    pub fn not_before(mut self, at: DateTime<Utc>) -> Self {
        self.nbf = Some(at.timestamp());
        self
    }

    /// Set `iat` to now
    #[must_use]
    pub fn issued_now(mut self) -> Self {
        self.iat = Some(Utc::now().timestamp());
        self
    }

    /// Add a custom claim
    #[must_use]
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn custom_claims_flatten_into_the_root() {
        let claims = JwtClaims::new().subject("user-1").claim("role", "admin");
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value, json!({ "sub": "user-1", "role": "admin" }));
    }

    #[test]
    fn audience_accepts_both_shapes() {
        let single: JwtClaims = serde_json::from_value(json!({ "aud": "api" })).unwrap();
        let many: JwtClaims = serde_json::from_value(json!({ "aud": ["api", "web"] })).unwrap();
        assert!(single.aud.unwrap().contains("api"));
        let many = many.aud.unwrap();
        assert!(many.contains("web"));
        assert!(!many.contains("admin"));
    }

    #[test]
    fn expiry_is_in_the_future() {
        let claims = JwtClaims::new().expires_in(Duration::hours(1)).issued_now();
        assert!(claims.exp.unwrap() > claims.iat.unwrap());
    }
}
