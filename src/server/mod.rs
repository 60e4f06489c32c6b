use crate::config::Config;
use crate::metadata::client::MetadataClient;
use crate::metadata::registry::ProviderRegistry;
use crate::metadata::tmdb::build_http_client;
use crate::plugin::{register_services, ConfigurationSource, PluginConfiguration};
use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderName, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::{CancellationToken, DropGuard};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod auth;
pub mod error;
pub mod routes_config;
pub mod routes_images;
pub mod routes_plugin;
pub mod routes_tmdb;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Path to config file (for persistence)
    pub config_path: Option<PathBuf>,
    /// Live plugin configuration (edited via PUT /textless/Configuration)
    pub plugin_config: Arc<RwLock<PluginConfiguration>>,
    pub registry: Arc<ProviderRegistry>,
    pub tmdb: Arc<dyn MetadataClient>,
}

impl AppContext {
    /// Wire up the TMDb client and providers for `config`.
    ///
    /// Providers hold a weak handle to the live plugin configuration, so they
    /// see updates immediately and fall back to defaults once the context is gone.
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Result<Self> {
        let http = build_http_client(&config.tmdb).context("Failed to build HTTP client")?;
        let plugin_config = Arc::new(RwLock::new(config.plugin.clone()));
        let source: Arc<dyn ConfigurationSource> = Arc::new(Arc::downgrade(&plugin_config));

        let (client, registry) = register_services(http, &config.tmdb, source);
        let tmdb: Arc<dyn MetadataClient> = client;

        Ok(Self {
            config: Arc::new(config),
            config_path,
            plugin_config,
            registry: Arc::new(registry),
            tmdb,
        })
    }
}

/// Cancellation token for one request. The token fires when the returned
/// guard is dropped, i.e. when the handler future goes away.
pub(crate) fn request_cancellation() -> (CancellationToken, DropGuard) {
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    (token, guard)
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(auth::X_EMBY_TOKEN),
        ]);

    Router::new()
        .route("/health", get(health_check))
        // Static settings page, like the host's other plugin pages
        .route(
            "/textless/ConfigurationPage",
            get(routes_config::configuration_page),
        )
        .merge(textless_routes(&ctx))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

fn textless_routes(ctx: &AppContext) -> Router<AppContext> {
    let protected_routes = routes_tmdb::tmdb_routes()
        .merge(routes_config::config_routes())
        .merge(routes_plugin::plugin_routes())
        .merge(routes_images::image_routes());

    // Apply auth middleware to protected routes only if enabled
    if ctx.config.server.auth.enabled {
        protected_routes.layer(middleware::from_fn_with_state(
            ctx.clone(),
            auth::api_auth_middleware,
        ))
    } else {
        protected_routes
    }
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server with an optional config path for persistence
pub async fn start_server(config: Config, config_path: Option<PathBuf>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    if !config.server.auth.enabled {
        tracing::warn!(
            "API authentication is disabled; every /textless route accepts anonymous callers \
             (set server.auth.enabled and server.auth.api_key to require a key)"
        );
    }

    let ctx = AppContext::new(config, config_path)?;
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
