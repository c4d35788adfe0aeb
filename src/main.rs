//! Voter Slip Backend
//!
//! Looks up voters by date of birth and ward in an external directory and
//! renders printable and downloadable voter slips.

mod api;
mod config;
mod controller;
mod directory;
mod errors;
mod models;
mod search;
mod slip;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, DirectoryConfig};
use controller::SessionStore;
use directory::{init_directory, RestDirectory, SqliteDirectory, VoterDirectory};
use slip::SlipRenderer;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn VoterDirectory>,
    pub sessions: Arc<SessionStore>,
    pub renderer: Arc<SlipRenderer>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Voter Slip Backend");
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Wards offered: {}", config.ward_count);
    tracing::info!("Slip theme: {}", config.slip_theme.name);

    // Connect the directory once; failure here stops startup.
    let directory = connect_directory(&config.directory).await.map_err(|e| {
        tracing::error!("Voter directory initialization failed: {e}");
        e
    })?;

    let renderer = Arc::new(SlipRenderer::load(
        config.slip_theme.clone(),
        &config.font_path,
    ));
    if renderer.can_export() {
        tracing::info!("Slip font: {:?}", config.font_path);
    }

    // Create application state
    let state = AppState {
        directory,
        sessions: Arc::new(SessionStore::new(config.session_ttl)),
        renderer,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the configured directory backend.
async fn connect_directory(
    config: &DirectoryConfig,
) -> Result<Arc<dyn VoterDirectory>, Box<dyn std::error::Error>> {
    match config {
        DirectoryConfig::Sqlite { db_path } => {
            tracing::info!("Directory: SQLite at {:?}", db_path);
            let pool = init_directory(db_path).await?;
            Ok(Arc::new(SqliteDirectory::new(pool)))
        }
        DirectoryConfig::Rest {
            base_url,
            api_key,
            table,
            timeout,
        } => {
            tracing::info!("Directory: REST at {} (table {})", base_url, table);
            if api_key.is_none() {
                tracing::warn!("No directory key configured (VOTER_DIRECTORY_KEY)");
            }
            Ok(Arc::new(RestDirectory::new(
                base_url,
                table,
                api_key.clone(),
                *timeout,
            )?))
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Form helpers
        .route("/form", get(api::get_form))
        .route("/form/dob", get(api::format_dob))
        // Stateless lookup
        .route("/search", get(api::search_voters))
        // Sessions
        .route("/sessions", post(api::create_session))
        .route("/sessions/{id}", get(api::get_session))
        .route("/sessions/{id}/search", post(api::search_in_session))
        .route("/sessions/{id}/select/{voter_id}", post(api::select_voter))
        .route("/sessions/{id}/back", post(api::go_back))
        .route("/sessions/{id}/reset", post(api::reset_session))
        // Slip
        .route("/sessions/{id}/slip", get(api::slip_page))
        .route("/sessions/{id}/slip.png", get(api::download_slip))
        .route("/sessions/{id}/slip/share", get(api::share_slip));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
