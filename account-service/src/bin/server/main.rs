use std::sync::Arc;
use std::time::Duration;

use account_service::config::Config;
use account_service::domain::user::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::PostgresUserRepository;
use auth::TokenIssuer;
use auth::TokenIssuerOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Any panic is treated as fatal: log it and exit rather than limp along
/// with a task silently gone.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "Fatal error, shutting down");
        default_hook(info);
        std::process::exit(1);
    }));
}

/// Probe the database and run migrations when reachable. The pool is
/// lazy, so an unreachable database delays requests rather than boot.
async fn prepare_database(pool: &PgPool, config: &Config) {
    match pool.acquire().await {
        Ok(_) => {
            tracing::info!(database = %config.database.name, "Database connection established");

            if !config.environment.is_production() {
                match sqlx::migrate!("./migrations").run(pool).await {
                    Ok(()) => tracing::info!("Database migrations applied"),
                    Err(e) => tracing::warn!(error = %e, "Database migration failed"),
                }
            }
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Database unreachable at startup; continuing in degraded mode"
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    install_panic_hook();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        environment = ?config.environment,
        database_host = %config.database.host,
        database_name = %config.database.name,
        port = config.server.port,
        "Configuration loaded"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
        .connect_lazy(&config.database.connection_url())?;

    prepare_database(&pool, &config).await;

    let tokens = Arc::new(TokenIssuer::new(TokenIssuerOptions {
        issuer: &config.jwt.issuer,
        access_secret: config.jwt.access_secret.as_bytes(),
        access_ttl_days: config.jwt.access_expiry_days,
        refresh_secret: config.jwt.refresh_secret.as_bytes(),
        refresh_ttl_days: config.jwt.refresh_expiry_days,
    }));

    let repository = Arc::new(PostgresUserRepository::new(pool));
    let auth_service = Arc::new(AuthService::new(repository, Arc::clone(&tokens)));

    let address = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Http server listening");

    let application = create_router(
        auth_service,
        tokens,
        !config.environment.is_production(),
    );

    axum::serve(listener, application).await?;

    Ok(())
}
