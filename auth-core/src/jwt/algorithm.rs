use std::fmt;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

use super::errors::TokenConfigError;

/// Which kind of key material an algorithm needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    /// HMAC: one shared secret signs and verifies.
    Symmetric,
    /// RSA: the private key signs, the public key verifies.
    Asymmetric,
}

/// Supported token signing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenAlgorithm {
    HS256,
    HS384,
    HS512,
    RS256,
    RS384,
    RS512,
}

impl TokenAlgorithm {
    pub fn family(&self) -> AlgorithmFamily {
        match self {
            TokenAlgorithm::HS256 | TokenAlgorithm::HS384 | TokenAlgorithm::HS512 => {
                AlgorithmFamily::Symmetric
            }
            TokenAlgorithm::RS256 | TokenAlgorithm::RS384 | TokenAlgorithm::RS512 => {
                AlgorithmFamily::Asymmetric
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenAlgorithm::HS256 => "HS256",
            TokenAlgorithm::HS384 => "HS384",
            TokenAlgorithm::HS512 => "HS512",
            TokenAlgorithm::RS256 => "RS256",
            TokenAlgorithm::RS384 => "RS384",
            TokenAlgorithm::RS512 => "RS512",
        }
    }
}

impl FromStr for TokenAlgorithm {
    type Err = TokenConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HS256" => Ok(TokenAlgorithm::HS256),
            "HS384" => Ok(TokenAlgorithm::HS384),
            "HS512" => Ok(TokenAlgorithm::HS512),
            "RS256" => Ok(TokenAlgorithm::RS256),
            "RS384" => Ok(TokenAlgorithm::RS384),
            "RS512" => Ok(TokenAlgorithm::RS512),
            _ => Err(TokenConfigError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for TokenAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TokenAlgorithm> for Algorithm {
    fn from(algorithm: TokenAlgorithm) -> Self {
        match algorithm {
            TokenAlgorithm::HS256 => Algorithm::HS256,
            TokenAlgorithm::HS384 => Algorithm::HS384,
            TokenAlgorithm::HS512 => Algorithm::HS512,
            TokenAlgorithm::RS256 => Algorithm::RS256,
            TokenAlgorithm::RS384 => Algorithm::RS384,
            TokenAlgorithm::RS512 => Algorithm::RS512,
        }
    }
}
