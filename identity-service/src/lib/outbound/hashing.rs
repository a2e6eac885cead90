use async_trait::async_trait;
use auth_core::HashParams;
use auth_core::PasswordError;
use auth_core::PasswordHasher;

use crate::domain::identity::ports::PasswordHashing;

/// Argon2id password hashing.
///
/// Hashing is CPU and memory bound, so every call runs on the blocking
/// thread pool instead of stalling the async workers.
#[derive(Clone, Default)]
pub struct Argon2PasswordHashing {
    hasher: PasswordHasher,
}

impl Argon2PasswordHashing {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// * `InvalidParams` - Cost parameters are outside the accepted ranges
    pub fn with_params(params: HashParams) -> Result<Self, PasswordError> {
        Ok(Self {
            hasher: PasswordHasher::with_params(params)?,
        })
    }
}

#[async_trait]
impl PasswordHashing for Argon2PasswordHashing {
    async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
    }

    async fn verify(&self, digest: &str, password: &str) -> Result<bool, PasswordError> {
        let hasher = self.hasher.clone();
        let digest = digest.to_string();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&digest, &password))
            .await
            .map_err(|e| PasswordError::VerificationFailed(e.to_string()))?
    }
}
