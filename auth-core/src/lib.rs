//! Authentication primitives
//!
//! Building blocks for credential-and-token authentication:
//! - Password hashing (Argon2id with configurable cost)
//! - Signed token engine (HMAC and RSA JWTs)
//! - Token configuration validated once at startup
//!
//! Orchestration (registration, login, token checks) lives in the service that
//! owns the credential store; this crate only provides the primitives.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth_core::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify(&digest, "my_password").unwrap());
//! assert!(!hasher.verify(&digest, "not_my_password").unwrap());
//! ```
//!
//! ## Signed Tokens
//! ```
//! use auth_core::{ExpiryPolicy, JwtEngine, TokenAlgorithm, TokenConfig, TokenEngine, TokenKeys, TokenPayload};
//!
//! let config = TokenConfig::new(
//!     TokenAlgorithm::HS256,
//!     TokenKeys::shared_secret("secret_key_at_least_32_bytes_long!"),
//!     ExpiryPolicy::from_seconds(3600),
//! )
//! .unwrap();
//!
//! let engine = JwtEngine::new();
//! let payload = TokenPayload::new(1, config.expiry().expires_at());
//! let token = engine.sign(config.algorithm(), &payload, config.signing_key()).unwrap();
//!
//! assert!(engine.verify(&token, config.algorithm(), config.verification_key()).unwrap());
//! let claims = TokenPayload::from_value(engine.decode(&token).unwrap())
//!     .unwrap()
//!     .require()
//!     .unwrap();
//! assert_eq!(claims.aud, "1");
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::AlgorithmFamily;
pub use jwt::ExpiryPolicy;
pub use jwt::JwtEngine;
pub use jwt::JwtError;
pub use jwt::TokenAlgorithm;
pub use jwt::TokenConfig;
pub use jwt::TokenConfigError;
pub use jwt::TokenEngine;
pub use jwt::TokenKeys;
pub use jwt::TokenPayload;
pub use jwt::ValidClaims;
pub use password::HashParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
