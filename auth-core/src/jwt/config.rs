use super::algorithm::AlgorithmFamily;
use super::algorithm::TokenAlgorithm;
use super::errors::TokenConfigError;
use super::expiry::ExpiryPolicy;

/// Raw key material as supplied by configuration.
///
/// For HMAC algorithms `private_key` is the shared secret. For RSA algorithms
/// both keys are PEM encoded.
#[derive(Clone, Default)]
pub struct TokenKeys {
    pub private_key: Option<Vec<u8>>,
    pub public_key: Option<Vec<u8>>,
}

impl TokenKeys {
    pub fn shared_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            private_key: Some(secret.into()),
            public_key: None,
        }
    }

    pub fn key_pair(private_pem: impl Into<Vec<u8>>, public_pem: impl Into<Vec<u8>>) -> Self {
        Self {
            private_key: Some(private_pem.into()),
            public_key: Some(public_pem.into()),
        }
    }
}

#[derive(Clone)]
enum KeyMaterial {
    Shared(Vec<u8>),
    Pair {
        private_key: Vec<u8>,
        public_key: Vec<u8>,
    },
}

/// Process-wide token settings, validated once and read-only afterwards.
#[derive(Clone)]
pub struct TokenConfig {
    algorithm: TokenAlgorithm,
    keys: KeyMaterial,
    expiry: ExpiryPolicy,
}

impl TokenConfig {
    /// Build a configuration, checking that the keys fit the algorithm family.
    ///
    /// # Errors
    /// * `MissingPrivateKey` - No (or an empty) private key / shared secret
    /// * `MissingPublicKey` - RSA algorithm without a public key
    pub fn new(
        algorithm: TokenAlgorithm,
        keys: TokenKeys,
        expiry: ExpiryPolicy,
    ) -> Result<Self, TokenConfigError> {
        let private_key = keys
            .private_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| TokenConfigError::MissingPrivateKey(algorithm.to_string()))?;

        let keys = match algorithm.family() {
            AlgorithmFamily::Symmetric => KeyMaterial::Shared(private_key),
            AlgorithmFamily::Asymmetric => {
                let public_key = keys
                    .public_key
                    .filter(|key| !key.is_empty())
                    .ok_or_else(|| TokenConfigError::MissingPublicKey(algorithm.to_string()))?;
                KeyMaterial::Pair {
                    private_key,
                    public_key,
                }
            }
        };

        Ok(Self {
            algorithm,
            keys,
            expiry,
        })
    }

    pub fn algorithm(&self) -> TokenAlgorithm {
        self.algorithm
    }

    pub fn expiry(&self) -> &ExpiryPolicy {
        &self.expiry
    }

    /// Key used to sign: the private key whatever the family.
    pub fn signing_key(&self) -> &[u8] {
        match &self.keys {
            KeyMaterial::Shared(secret) => secret,
            KeyMaterial::Pair { private_key, .. } => private_key,
        }
    }

    /// Key used to verify: the shared secret for HMAC, the public key for RSA.
    pub fn verification_key(&self) -> &[u8] {
        match &self.keys {
            KeyMaterial::Shared(secret) => secret,
            KeyMaterial::Pair { public_key, .. } => public_key,
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("algorithm", &self.algorithm)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}
