use std::sync::Arc;

use account_service::config::Config;
use account_service::config::LogFormat;
use account_service::domain::user::ports::UserServicePort;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use auth::Authenticator;
use auth::PasswordHasher;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;
    let json_logs = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let token_ttl = config.token_ttl()?;
    let store = if config.database_url.is_some() {
        "postgresql"
    } else {
        "memory"
    };

    tracing::info!(
        port = config.port,
        token_ttl_secs = token_ttl.num_seconds(),
        store,
        hash_memory_kib = config.hash_memory_kib,
        hash_iterations = config.hash_iterations,
        log_format = ?config.log_format,
        "Configuration loaded"
    );

    let authenticator = Arc::new(
        Authenticator::new(config.jwt_secret.as_bytes())
            .with_password_hasher(PasswordHasher::with_cost(config.hash_cost())?)
            .with_token_ttl(token_ttl),
    );

    let user_service: Arc<dyn UserServicePort> = match &config.database_url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            tracing::info!(
                max_connections = 5,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let repository = Arc::new(PostgresUserRepository::new(pg_pool));
            Arc::new(UserService::new(repository, Arc::clone(&authenticator)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, users are kept in memory and lost on restart");
            let repository = Arc::new(InMemoryUserRepository::new());
            Arc::new(UserService::new(repository, Arc::clone(&authenticator)))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authenticator);

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
