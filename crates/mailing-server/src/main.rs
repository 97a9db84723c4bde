//! Mailing List Server
//!
//! Accepts mailing list signups over HTTP and stores them in SQLite
//! (default) or an append-only CSV file.

mod config;
mod handlers;
mod serve;
mod services;
mod shutdown;
mod storage;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use services::SignupService;

const READ_TIMEOUT: Duration = Duration::from_secs(15);
const WRITE_TIMEOUT: Duration = Duration::from_secs(15);

const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:1313", "https://zhisme.com"];
const CORS_MAX_AGE: Duration = Duration::from_secs(300);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub signup_service: Arc<SignupService>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "Starting mailing list server v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = ServerConfig::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: addr={}, backend={:?}",
        config.server_addr, config.storage_backend
    );

    let repo = storage::open_repository(&config)
        .await
        .context("Failed to initialize storage")?;

    let state = AppState {
        signup_service: Arc::new(SignupService::new(repo.clone())),
    };
    let app = build_router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address: {}", addr))?;
    info!("Server listening on {}", listener.local_addr()?);

    serve::serve(
        listener,
        app,
        serve::IDLE_TIMEOUT,
        shutdown::shutdown_signal(),
    )
    .await;

    if let Err(e) = repo.close().await {
        warn!("Error closing storage: {}", e);
    }
    info!("Server stopped");

    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/mailing_list", post(handlers::mailing_list::create))
        .layer(DefaultBodyLimit::disable())
        .layer(cors_layer())
        .layer(TimeoutLayer::new(WRITE_TIMEOUT))
        .layer(RequestBodyTimeoutLayer::new(READ_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            ALLOWED_ORIGINS.iter().copied().map(HeaderValue::from_static),
        ))
        .allow_methods([Method::POST, Method::DELETE])
        .allow_headers([
            header::ORIGIN,
            header::ACCEPT,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}
