mod auth;
mod config;
mod db;
mod email;
mod errors;
mod extract;
mod llm_client;
mod messages;
mod models;
mod recruiter;
mod routes;
mod state;
mod store;
mod suggestions;
mod validation;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::email::ResendMailer;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgUserStore;

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

    info!("Starting Feedback API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs pending migrations)
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgUserStore::new(db));

    // Initialize email delivery
    if config.resend_api_key.is_none() {
        warn!("RESEND_API_KEY not set; verification codes will be logged instead of emailed");
    }
    let mailer = Arc::new(ResendMailer::new(
        config.resend_api_key.clone(),
        config.email_from.clone(),
    )?);

    // Initialize LLM client
    let llm: Option<Arc<dyn TextGenerator>> = match &config.gemini_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone(), config.gemini_model.clone())?;
            info!("LLM client initialized (model: {})", client.model());
            let client: Arc<dyn TextGenerator> = Arc::new(client);
            Some(client)
        }
        None => {
            warn!("GOOGLE_GENERATIVE_AI_API_KEY not set; suggestions use the fallback pool");
            None
        }
    };

    if config.recruiter.access_key.is_none() {
        info!("Recruiter access disabled (RECRUITER_ACCESS_KEY not set)");
    }

    // Build app state
    let state = AppState {
        store,
        mailer,
        llm,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
