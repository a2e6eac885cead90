use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Unusable key: {0}")]
    InvalidKey(String),

    #[error("Token payload is malformed: {0}")]
    MalformedPayload(String),

    #[error("Missing required claim: {0}")]
    MissingClaim(String),
}

/// Error type for token configuration problems.
///
/// These are deployment mistakes, reported when the configuration is built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Algorithm {0} needs a private key")]
    MissingPrivateKey(String),

    #[error("Algorithm {0} needs a public key to verify tokens")]
    MissingPublicKey(String),
}
