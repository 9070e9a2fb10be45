//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::infra::{SmtpConfig, SmtpMailer};
use auth::{AuthConfig, PgAuthRepository};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Auth configuration
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        // In production, load the session secret from environment
        let secret_b64 =
            env::var("AUTH_TOKEN_SECRET").expect("AUTH_TOKEN_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);
        AuthConfig::new(secret)
    };

    let auth_config = match env::var("PASSWORD_PEPPER") {
        Ok(pepper_b64) => {
            let pepper = Engine::decode(&general_purpose::STANDARD, &pepper_b64)?;
            auth_config.password_pepper(pepper)
        }
        Err(_) => auth_config,
    };

    let repo = PgAuthRepository::new(pool.clone());

    // Mailer selection: SMTP when configured, log-only otherwise
    let auth_routes = match smtp_config_from_env() {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, "Using SMTP mailer");
            let mailer = SmtpMailer::new(smtp).map_err(|e| anyhow::anyhow!(e.to_string()))?;
            auth::router::auth_router(repo, mailer, auth_config)
        }
        None => {
            tracing::warn!("SMTP not configured, verification emails go to the log");
            auth::router::auth_router_dev(repo, auth_config)
        }
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31113));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Read SMTP settings; all of them must be present to enable real delivery
fn smtp_config_from_env() -> Option<SmtpConfig> {
    Some(SmtpConfig {
        host: env::var("SMTP_HOST").ok()?,
        port: env::var("SMTP_PORT").ok()?.parse().ok()?,
        username: env::var("SMTP_USERNAME").ok()?,
        password: env::var("SMTP_PASSWORD").ok()?,
        from: env::var("SMTP_FROM").ok()?,
        verify_base_url: env::var("VERIFY_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:40922".to_string()),
    })
}
