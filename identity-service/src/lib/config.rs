use std::env;
use std::fs;

use anyhow::Context;
use auth_core::AlgorithmFamily;
use auth_core::ExpiryPolicy;
use auth_core::HashParams;
use auth_core::TokenAlgorithm;
use auth_core::TokenConfig;
use auth_core::TokenKeys;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Absent: credentials live in memory for the life of the process
    pub database: Option<DatabaseConfig>,
    pub token: TokenSettings,
    #[serde(default)]
    pub hasher: HasherConfig,
    /// Absent: events are only logged
    pub kafka: Option<KafkaConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

/// Token signing settings.
///
/// HMAC algorithms read `secret`; RSA algorithms read the PEM files at
/// `private_key_path` and `public_key_path`.
#[derive(Deserialize, Clone)]
pub struct TokenSettings {
    pub algorithm: String,
    pub secret: Option<String>,
    pub private_key_path: Option<String>,
    pub public_key_path: Option<String>,
    pub expiration_seconds: i64,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("algorithm", &self.algorithm)
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .field("expiration_seconds", &self.expiration_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenSettings {
    /// Build the validated token configuration, reading key files as needed.
    ///
    /// # Errors
    /// * Unknown algorithm, missing key material, or unreadable key files
    pub fn token_config(&self) -> Result<TokenConfig, anyhow::Error> {
        let algorithm: TokenAlgorithm = self.algorithm.parse()?;

        let keys = match algorithm.family() {
            AlgorithmFamily::Symmetric => {
                TokenKeys::shared_secret(self.secret.clone().unwrap_or_default())
            }
            AlgorithmFamily::Asymmetric => TokenKeys {
                private_key: read_key(self.private_key_path.as_deref())?,
                public_key: read_key(self.public_key_path.as_deref())?,
            },
        };

        let expiry = ExpiryPolicy::from_seconds(self.expiration_seconds);

        Ok(TokenConfig::new(algorithm, keys, expiry)?)
    }
}

fn read_key(path: Option<&str>) -> Result<Option<Vec<u8>>, anyhow::Error> {
    path.map(|path| fs::read(path).with_context(|| format!("Failed to read key file {}", path)))
        .transpose()
}

/// Argon2id cost parameters.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct HasherConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        let params = HashParams::default();
        Self {
            memory_kib: params.memory_kib,
            iterations: params.iterations,
            parallelism: params.parallelism,
        }
    }
}

impl From<HasherConfig> for HashParams {
    fn from(config: HasherConfig) -> Self {
        Self {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (TOKEN__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment_overrides())
            .build()?;

        configuration.try_deserialize()
    }
}

/// Unprefixed variables with `__` between path segments.
/// Example: DATABASE__URL=postgres://... sets database.url
fn environment_overrides() -> Environment {
    Environment::default().separator("__")
}
