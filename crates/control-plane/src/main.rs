// Network monitor API server
// Decision: Postgres when DATABASE_URL is set, in-memory dev mode otherwise
// Decision: Health and Swagger UI stay outside API_PREFIX

use anyhow::{Context, Result};
use axum::http::{header, Method};
use axum::{extract::State, routing::get, Json, Router};
use netmon_control_plane::api;
use netmon_control_plane::config::{CorsConfig, ServerConfig};
use netmon_control_plane::openapi::ApiDoc;
use netmon_control_plane::storage::StorageBackend;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const DEFAULT_LOG_FILTER: &str = "netmon_control_plane=debug,tower_http=debug";

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage,
    })
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    storage: &'static str,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; real environment variables win
    dotenvy::dotenv().ok();

    // RUST_LOG overrides the default filter
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("netmon-control-plane starting...");

    let config = ServerConfig::from_env().context("Invalid configuration")?;

    let store = match &config.database_url {
        Some(url) => {
            let store = StorageBackend::postgres(url, &config.pool)
                .await
                .context("Failed to connect to database")?;
            tracing::info!(
                max_connections = config.pool.max_connections,
                "Connected to database"
            );
            if config.init_schema {
                if let StorageBackend::Postgres(db) = &store {
                    db.ensure_schema()
                        .await
                        .context("Failed to create events schema")?;
                    tracing::info!("Events schema ready");
                }
            }
            store
        }
        None => {
            tracing::warn!("DATABASE_URL not set, running in dev mode with in-memory storage");
            StorageBackend::in_memory()
        }
    };

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }
    match &config.cors {
        CorsConfig::Disabled => tracing::info!("CORS not configured (same-origin requests only)"),
        CorsConfig::Any => tracing::info!("CORS allows any origin"),
        CorsConfig::Origins(origins) => tracing::info!(origins = ?origins, "CORS origins configured"),
    }

    let app = build_app(Arc::new(store), &config.api_prefix, &config.cors);

    // Start HTTP server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    tracing::info!("HTTP server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("netmon-control-plane stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Assemble the full application: health, prefixed API routes, Swagger UI,
/// CORS and request tracing
fn build_app(store: Arc<StorageBackend>, api_prefix: &str, cors: &CorsConfig) -> Router {
    let health_state = HealthState {
        storage: store.kind(),
    };
    let api_routes = api::events::routes(api::events::AppState::new(store));

    let app = Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(build_router_with_prefix(api_routes, api_prefix))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    let app = match cors {
        CorsConfig::Disabled => app,
        CorsConfig::Any => app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(cors_methods())
                .allow_headers(cors_headers()),
        ),
        CorsConfig::Origins(origins) => app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins.clone()))
                .allow_methods(cors_methods())
                .allow_headers(cors_headers())
                .allow_credentials(true),
        ),
    };

    app.layer(TraceLayer::new_for_http())
}

fn cors_methods() -> [Method; 5] {
    [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ]
}

fn cors_headers() -> [header::HeaderName; 3] {
    [header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
