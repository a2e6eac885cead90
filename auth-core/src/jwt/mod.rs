pub mod algorithm;
pub mod claims;
pub mod config;
pub mod engine;
pub mod errors;
pub mod expiry;

pub use algorithm::AlgorithmFamily;
pub use algorithm::TokenAlgorithm;
pub use claims::TokenPayload;
pub use claims::ValidClaims;
pub use config::TokenConfig;
pub use config::TokenKeys;
pub use engine::JwtEngine;
pub use engine::TokenEngine;
pub use errors::JwtError;
pub use errors::TokenConfigError;
pub use expiry::ExpiryPolicy;
