use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::io;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use actix_middleware::{CorrelationIdMiddleware, MetricsMiddleware};
use betting_service::{
    config::{AppConfig, Config},
    db::{create_pool, run_migrations},
    handlers, AppState,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_cors(app: &AppConfig) -> Cors {
    let origins = app.cors_allowed_origins.trim();
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .expose_headers(["x-correlation-id"])
        .max_age(3600);

    if origins == "*" {
        cors.allow_any_origin()
    } else {
        origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let config = Config::from_env().map_err(|e| {
        tracing::error!(error = %e, "failed to load configuration");
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    tracing::info!("Starting betting-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    crypto_core::jwt::initialize_jwt_secret(&config.jwt.secret, config.jwt.access_token_ttl)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    tracing::info!("JWT secret initialized");

    config.database.log_config();
    let db_pool = create_pool(config.database.clone())
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("database pool: {e}")))?;

    let run_migrations_env = std::env::var("RUN_MIGRATIONS").unwrap_or_else(|_| "true".into());
    if run_migrations_env != "false" {
        tracing::info!("Running database migrations...");
        run_migrations(&db_pool)
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("migrations: {e}")))?;
        tracing::info!("Database migrations completed");
    } else {
        tracing::info!("Skipping database migrations (RUN_MIGRATIONS=false)");
    }

    let state = web::Data::new(AppState::new(db_pool, config.betting.clone()));
    let app_config = config.app.clone();
    let bind_address = config.bind_address();

    tracing::info!(
        host = %bind_address.0,
        port = bind_address.1,
        utc_offset_minutes = config.betting.utc_offset_minutes,
        "HTTP server listening"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(build_cors(&app_config))
            .wrap(MetricsMiddleware)
            .wrap(TracingLogger::default())
            .wrap(CorrelationIdMiddleware)
            .configure(handlers::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
