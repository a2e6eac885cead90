use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Minimal token claim set: who the token is for and when it stops being valid.
///
/// Both fields are optional on the wire so that a decoded payload can be
/// inspected before it is trusted; `require` turns it into `ValidClaims`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPayload {
    /// Audience: the identifier of the user the token was issued to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Expiration time (Unix timestamp, seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Claims of a payload that carried both `aud` and `exp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidClaims {
    pub aud: String,
    pub exp: i64,
}

impl TokenPayload {
    /// Create a payload for a subject expiring at `exp`.
    pub fn new(aud: impl ToString, exp: i64) -> Self {
        Self {
            aud: Some(aud.to_string()),
            exp: Some(exp),
        }
    }

    /// Interpret a raw decoded payload.
    ///
    /// # Errors
    /// * `MalformedPayload` - The payload is not a JSON object with the expected claim types
    pub fn from_value(value: serde_json::Value) -> Result<Self, JwtError> {
        if !value.is_object() {
            return Err(JwtError::MalformedPayload(
                "payload is not a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| JwtError::MalformedPayload(e.to_string()))
    }

    /// Check that both claims are present.
    ///
    /// Empty audiences count as missing.
    ///
    /// # Errors
    /// * `MissingClaim` - `exp` or `aud` is absent
    pub fn require(&self) -> Result<ValidClaims, JwtError> {
        let exp = self
            .exp
            .ok_or_else(|| JwtError::MissingClaim("exp".to_string()))?;
        let aud = self
            .aud
            .as_deref()
            .filter(|aud| !aud.is_empty())
            .ok_or_else(|| JwtError::MissingClaim("aud".to_string()))?;

        Ok(ValidClaims {
            aud: aud.to_string(),
            exp,
        })
    }
}

impl ValidClaims {
    /// A token is expired from the second its `exp` is reached.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
