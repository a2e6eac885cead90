use std::sync::Arc;

use auth_core::JwtEngine;
use identity_service::config::Config;
use identity_service::domain::identity::ports::AuthServicePort;
use identity_service::domain::identity::ports::CredentialStore;
use identity_service::domain::identity::ports::EventSink;
use identity_service::domain::identity::service::AuthService;
use identity_service::inbound::http::create_router;
use identity_service::outbound::events::FanoutEventSink;
use identity_service::outbound::events::KafkaEventSink;
use identity_service::outbound::events::TracingEventSink;
use identity_service::outbound::hashing::Argon2PasswordHashing;
use identity_service::outbound::repositories::InMemoryCredentialStore;
use identity_service::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_algorithm = %config.token.algorithm,
        persistent_store = config.database.is_some(),
        kafka_enabled = config.kafka.is_some(),
        "Configuration loaded"
    );

    let token_config = config.token.token_config()?;
    let hasher = Arc::new(Argon2PasswordHashing::with_params(config.hasher.into())?);

    let store: Arc<dyn CredentialStore> = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(PostgresCredentialStore::new(pg_pool))
        }
        None => {
            tracing::warn!("No database configured, credentials are kept in memory");
            Arc::new(InMemoryCredentialStore::new())
        }
    };

    let mut events = FanoutEventSink::new().with(Arc::new(TracingEventSink::new()));
    if let Some(kafka) = &config.kafka {
        events = events.with(Arc::new(KafkaEventSink::new(kafka)?));
    }
    let events: Arc<dyn EventSink> = Arc::new(events);

    let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
        store,
        hasher,
        Arc::new(JwtEngine::new()),
        events,
        token_config,
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
