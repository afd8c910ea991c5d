mod analysis;
mod auth;
mod config;
mod db;
mod errors;
mod extraction;
mod github;
mod guard;
mod history;
mod llm_client;
mod presenter;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::LlmAnalyzer;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::github::GithubClient;
use crate::guard::RedisSubmissionGuard;
use crate::history::archive::S3ReportArchive;
use crate::history::PgHistoryStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerKit API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and apply migrations
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize Redis (submission guard); one multiplexed connection shared by all requests
    let redis = redis::Client::open(config.redis_url.clone())?
        .get_multiplexed_async_connection()
        .await?;
    info!("Redis connection established");

    // Initialize S3 / MinIO (report archive)
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize LLM and GitHub clients
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let github = GithubClient::new(&config)?;
    info!(
        "GitHub client initialized (authenticated: {})",
        config.github_token.is_some()
    );

    // Build app state
    let state = AppState {
        analyzer: Arc::new(LlmAnalyzer::new(llm, github.clone())),
        history: Arc::new(PgHistoryStore::new(
            db,
            S3ReportArchive::new(s3, config.s3_bucket.clone()),
        )),
        guard: Arc::new(RedisSubmissionGuard::new(
            redis,
            config.submission_ttl_secs,
        )),
        profiles: Arc::new(github),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "careerkit-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
