//! # Server Module
//!
//! HTTP server setup and route configuration for the contact server.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::get,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::password::{Argon2Hasher, CredentialHasher};
use crate::auth::session::SessionManager;
use crate::config::Config;
use crate::database::{migrations, DatabaseConfig, DatabaseConnection, MemoryStore, PgStore, Store};
use crate::routes;
use crate::routes::health::ping;
use crate::services::{ContactService, UserService};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub users: Arc<UserService>,
    pub contacts: Arc<ContactService>,
}

impl AppState {
    /// Wire services around one store and one password hasher.
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn CredentialHasher>, config: &Config) -> Self {
        Self {
            sessions: Arc::new(SessionManager::new(store.clone(), hasher.clone(), config.session.ttl)),
            users: Arc::new(UserService::new(store.clone(), hasher)),
            contacts: Arc::new(ContactService::new(store)),
        }
    }
}

/// Build the full router: public routes, protected routes, and the
/// tracing/CORS layers.
pub fn create_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/ping", get(ping)) // Health check endpoint
        .merge(routes::auth::create_auth_routes(&state))
        .merge(routes::users::create_user_routes(&state))
        .merge(routes::contacts::create_contact_routes(&state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.server.cors_allowed_origins)),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-api-token"),
        ])
}

/// Pick the store: Postgres when `DATABASE_URL` is set, memory otherwise.
async fn build_store(config: &Config) -> Result<Arc<dyn Store>> {
    match &config.database {
        Some(settings) => {
            let db_config = DatabaseConfig::from_url(&settings.url, settings.max_connections, settings.tls)?;
            let db = DatabaseConnection::new(db_config).await?;
            migrations::run_migrations(db.pool()).await?;
            Ok(Arc::new(PgStore::new(db.pool().clone())))
        }
        None => {
            tracing::warn!("⚠️  DATABASE_URL not set, using in-memory store (data is lost on restart)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Starts the HTTP server and serves until the process is terminated.
pub async fn start(config: Config) -> Result<()> {
    let store = build_store(&config).await?;
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::default());
    let state = AppState::new(store, hasher, &config);

    let app = create_router(state, &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind to {addr} - port may already be in use"))?;

    tracing::info!("🚀 Contact server starting...");
    tracing::info!("📡 Listening on http://{}", addr);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);
    tracing::info!("⏳ Session TTL: {}s", config.session.ttl.as_secs());

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
