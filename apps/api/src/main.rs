mod assessment;
mod auth;
mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod profile;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::requester::AssessmentRequester;
use crate::assessment::service::AssessmentSessions;
use crate::auth::sessions::RedisSessionStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::PgDocumentStore;

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

    info!("Starting Skill Bridge API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis-backed login sessions
    let redis = redis::Client::open(config.redis_url.clone())?;
    let sessions = RedisSessionStore::connect(&redis, config.session_ttl_secs()).await?;
    info!("Session store connected");

    // Initialize LLM client
    let generator = GeminiClient::new(config.gemini_api_base.clone(), config.gemini_api_key.clone())?;
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; generation requests will fail and fall back");
    }
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let requester = AssessmentRequester::new(config.internal_api_url.clone())?;
    info!("Assessment requester targets {}", config.internal_api_url);

    let state = AppState {
        store: Arc::new(PgDocumentStore::new(db)),
        sessions: Arc::new(sessions),
        generator: Arc::new(generator),
        requester,
        assessments: Arc::new(AssessmentSessions::new()),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
