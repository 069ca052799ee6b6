//! Wellmind Community Backend
//!
//! A healthcare-community backend: concerns forum, AI chat assistant and
//! contact notifications behind a supervising HTTP gateway.
//!
//! Runs in one of two roles: `wellmind-backend backend` serves the API;
//! `wellmind-backend gateway` (the default) supervises a backend process
//! and reverse-proxies `/api` to it.

mod ai;
mod api;
mod client;
mod config;
mod contract;
mod db;
mod errors;
mod gateway;
mod models;
mod notify;

use std::sync::Arc;

use axum::{
    handler::Handler,
    routing::{get, on, MethodFilter},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ai::Responder;
use config::Config;
use contract::Endpoint;
use db::Repository;
use notify::ContactMailer;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
    pub responder: Arc<Responder>,
    pub mailer: Arc<ContactMailer>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let role = std::env::args().nth(1).unwrap_or_else(|| "gateway".to_string());
    match role.as_str() {
        "backend" => run_backend(config).await,
        "gateway" => gateway::run(config).await,
        other => {
            eprintln!("Unknown role '{}'; expected 'gateway' or 'backend'", other);
            std::process::exit(2);
        }
    }
}

/// Run the API backend process.
async fn run_backend(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting Wellmind backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.backend_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        responder: Arc::new(Responder::from_config(&config)),
        mailer: Arc::new(ContactMailer::new()),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.backend_addr).await?;
    tracing::info!("Backend listening on {}", config.backend_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Register a handler at the method and path the contract table declares.
fn contract_route<H, T>(router: Router<AppState>, endpoint: &Endpoint, handler: H) -> Router<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    let filter = MethodFilter::try_from(endpoint.method.clone())
        .expect("contract methods are standard HTTP methods");
    router.route(&endpoint.nested_axum_path(), on(filter, handler))
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes, registered from the contract table
    let mut api_routes = Router::new();
    api_routes = contract_route(api_routes, &contract::LIST_CONCERNS, api::list_concerns);
    api_routes = contract_route(api_routes, &contract::GET_CONCERN, api::get_concern);
    api_routes = contract_route(api_routes, &contract::CREATE_CONCERN, api::create_concern);
    api_routes = contract_route(api_routes, &contract::RESPOND_CONCERN, api::respond_concern);
    api_routes = contract_route(api_routes, &contract::UPVOTE_CONCERN, api::upvote_concern);
    api_routes = contract_route(api_routes, &contract::SEND_CHAT, api::send_chat);
    api_routes = contract_route(api_routes, &contract::CHAT_HISTORY, api::chat_history);
    api_routes = contract_route(api_routes, &contract::LIST_CATEGORIES, api::list_categories);
    api_routes = contract_route(api_routes, &contract::SEND_CONTACT, api::send_contact);

    // Health check (not part of the contract)
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
