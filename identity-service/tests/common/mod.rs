use std::sync::Arc;

use auth_core::ExpiryPolicy;
use auth_core::HashParams;
use auth_core::JwtEngine;
use auth_core::TokenAlgorithm;
use auth_core::TokenConfig;
use auth_core::TokenKeys;
use identity_service::domain::identity::service::AuthService;
use identity_service::inbound::http::create_router;
use identity_service::outbound::events::InMemoryEventSink;
use identity_service::outbound::hashing::Argon2PasswordHashing;
use identity_service::outbound::repositories::InMemoryCredentialStore;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

pub type TestAuthService =
    AuthService<InMemoryCredentialStore, Argon2PasswordHashing, JwtEngine, InMemoryEventSink>;

/// Cheap Argon2 parameters so tests do not spend seconds hashing
pub fn test_hashing() -> Argon2PasswordHashing {
    Argon2PasswordHashing::with_params(HashParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("Failed to build test hasher")
}

pub fn test_token_config(expiration_seconds: i64) -> TokenConfig {
    TokenConfig::new(
        TokenAlgorithm::HS256,
        TokenKeys::shared_secret(TEST_SECRET),
        ExpiryPolicy::from_seconds(expiration_seconds),
    )
    .expect("Failed to build token config")
}

/// Auth service wired to in-memory adapters, plus handles to inspect them
pub struct TestServices {
    pub service: Arc<TestAuthService>,
    pub store: Arc<InMemoryCredentialStore>,
    pub events: Arc<InMemoryEventSink>,
}

impl TestServices {
    pub fn new() -> Self {
        Self::with_token_config(test_token_config(3600))
    }

    pub fn with_token_config(token_config: TokenConfig) -> Self {
        let store = Arc::new(InMemoryCredentialStore::new());
        let events = Arc::new(InMemoryEventSink::new());
        let service = Arc::new(AuthService::new(
            Arc::clone(&store),
            Arc::new(test_hashing()),
            Arc::new(JwtEngine::new()),
            Arc::clone(&events),
            token_config,
        ));

        Self {
            service,
            store,
            events,
        }
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub services: TestServices,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with(TestServices::new()).await
    }

    pub async fn spawn_with(services: TestServices) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(services.service.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            services,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user through the API, returning the response body
    pub async fn register(&self, username: &str, email: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/api/auth/register")
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in by username through the API, returning the token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }
}

/// Throwaway Postgres database with migrations applied
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    postgres_url: String,
}

impl TestDb {
    /// Create a new test database with a unique name.
    ///
    /// Returns `None` when `DATABASE_URL` is not set so the suite still runs
    /// without a Postgres server.
    pub async fn from_env() -> Option<Self> {
        let Ok(postgres_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping Postgres test");
            return None;
        };

        let db_name = format!(
            "test_identity_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&postgres_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = postgres_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            postgres_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Database cleanup happens asynchronously
        let db_name = self.db_name.clone();
        let postgres_url = self.postgres_url.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&postgres_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
