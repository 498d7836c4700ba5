//! Q&A API server
//!
//! Mounts the auth routes under `/api/auth` and the Q&A routes under `/api`,
//! with session resolution running in front of both. Startup failures are
//! `anyhow` errors; request failures are rendered by the domain crates.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use auth::domain::repository::AuthSessionRepository;
use auth::middleware::{AuthMiddlewareState, authenticate};
use auth::{AuthConfig, GithubProvider, PgAuthRepository, auth_router};
use axum::Router;
use axum::http::{Method, header};
use axum::middleware::from_fn_with_state;
use qa::{PgQaRepository, QaConfig, qa_router};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ServerConfig, auth_config_from_env};

const DEFAULT_LOG_FILTER: &str = "api=info,auth=info,qa=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let server = ServerConfig::from_env()?;
    let auth_config = Arc::new(auth_config_from_env()?);
    let pool = open_database(&server).await?;

    let auth_repo = Arc::new(PgAuthRepository::new(pool.clone()));
    if let Err(e) = auth_repo.cleanup_expired().await {
        tracing::warn!(error = %e, "Could not purge expired sessions at startup");
    }

    let app = build_app(&server, pool, auth_repo, auth_config)?;

    let listener = TcpListener::bind(server.bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", server.bind_addr))?;
    tracing::info!(addr = %server.bind_addr, "API listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn open_database(server: &ServerConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(server.database_max_connections)
        .connect(&server.database_url)
        .await
        .context("cannot connect to DATABASE_URL")?;

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await
        .context("database migration failed")?;
    tracing::info!("Database ready");

    Ok(pool)
}

fn build_app(
    server: &ServerConfig,
    pool: PgPool,
    auth_repo: Arc<PgAuthRepository>,
    auth_config: Arc<AuthConfig>,
) -> anyhow::Result<Router> {
    let providers = match &server.github {
        Some(github) => vec![GithubProvider::new(github.clone())?],
        None => {
            tracing::info!("GITHUB_CLIENT_ID not set, GitHub sign-in disabled");
            Vec::new()
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(server.frontend_origins.clone())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    let qa_repo = Arc::new(PgQaRepository::new(pool));
    let sessions = AuthMiddlewareState::new(auth_repo.clone(), auth_config.clone());

    Ok(Router::new()
        .nest("/api/auth", auth_router(auth_repo, providers, auth_config))
        .nest("/api", qa_router(qa_repo, Arc::new(QaConfig::default())))
        .layer(from_fn_with_state(
            sessions,
            authenticate::<PgAuthRepository>,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        ))
}
