use jsonwebtoken::crypto;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Serialize;

use super::algorithm::AlgorithmFamily;
use super::algorithm::TokenAlgorithm;
use super::claims::TokenPayload;
use super::errors::JwtError;

/// Signing engine for compact signed tokens.
///
/// The three steps are kept apart so that callers decide in which order a
/// token is checked: signature first, then payload shape, then claims.
pub trait TokenEngine: Send + Sync + 'static {
    /// Sign `payload` with `key` and return the compact token.
    ///
    /// # Errors
    /// * `InvalidKey` - Key cannot be used with the algorithm
    /// * `EncodingFailed` - Token encoding failed
    fn sign(
        &self,
        algorithm: TokenAlgorithm,
        payload: &TokenPayload,
        key: &[u8],
    ) -> Result<String, JwtError>;

    /// Check the token signature against `key`.
    ///
    /// Returns `Ok(false)` for any token that was not signed with `algorithm`
    /// and the matching key, including structurally broken tokens.
    ///
    /// # Errors
    /// * `InvalidKey` - Key cannot be used with the algorithm
    fn verify(&self, token: &str, algorithm: TokenAlgorithm, key: &[u8])
        -> Result<bool, JwtError>;

    /// Extract the raw payload without checking the signature.
    ///
    /// # Errors
    /// * `DecodingFailed` - Token is not a parseable compact JWT
    fn decode(&self, token: &str) -> Result<serde_json::Value, JwtError>;
}

/// `TokenEngine` backed by the `jsonwebtoken` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtEngine;

impl JwtEngine {
    pub fn new() -> Self {
        Self
    }

    /// Sign any serializable claim set.
    pub fn sign_claims<T: Serialize>(
        &self,
        algorithm: TokenAlgorithm,
        claims: &T,
        key: &[u8],
    ) -> Result<String, JwtError> {
        let encoding_key = match algorithm.family() {
            AlgorithmFamily::Symmetric => EncodingKey::from_secret(key),
            AlgorithmFamily::Asymmetric => {
                EncodingKey::from_rsa_pem(key).map_err(|e| JwtError::InvalidKey(e.to_string()))?
            }
        };
        let header = Header::new(algorithm.into());

        encode(&header, claims, &encoding_key).map_err(|e| {
            if is_key_error(&e) {
                JwtError::InvalidKey(e.to_string())
            } else {
                JwtError::EncodingFailed(e.to_string())
            }
        })
    }
}

impl TokenEngine for JwtEngine {
    fn sign(
        &self,
        algorithm: TokenAlgorithm,
        payload: &TokenPayload,
        key: &[u8],
    ) -> Result<String, JwtError> {
        self.sign_claims(algorithm, payload, key)
    }

    fn verify(
        &self,
        token: &str,
        algorithm: TokenAlgorithm,
        key: &[u8],
    ) -> Result<bool, JwtError> {
        let decoding_key = match algorithm.family() {
            AlgorithmFamily::Symmetric => DecodingKey::from_secret(key),
            AlgorithmFamily::Asymmetric => {
                DecodingKey::from_rsa_pem(key).map_err(|e| JwtError::InvalidKey(e.to_string()))?
            }
        };

        let Some((message, signature)) = token.rsplit_once('.') else {
            return Ok(false);
        };
        if message.split('.').count() != 2 {
            return Ok(false);
        }

        // The header must name the configured algorithm; never let the token pick.
        let algorithm = Algorithm::from(algorithm);
        match decode_header(token) {
            Ok(header) if header.alg == algorithm => {}
            _ => return Ok(false),
        }

        match crypto::verify(signature, message.as_bytes(), &decoding_key, algorithm) {
            Ok(valid) => Ok(valid),
            Err(e) if is_key_error(&e) => Err(JwtError::InvalidKey(e.to_string())),
            Err(_) => Ok(false),
        }
    }

    fn decode(&self, token: &str) -> Result<serde_json::Value, JwtError> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<serde_json::Value>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| JwtError::DecodingFailed(e.to_string()))?;

        Ok(token_data.claims)
    }
}

fn is_key_error(error: &JsonWebTokenError) -> bool {
    matches!(
        error.kind(),
        ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat | ErrorKind::InvalidEcdsaKey
    )
}
