//! Server assembly and lifecycle: typed `server.*` settings, router
//! construction, bind, and graceful serve.

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use howdy_core::config::{ConfigError, ConfigSection, HowdyConfig};

use crate::controllers;
use crate::layers;
use crate::request_id;
use crate::state::AppState;

/// Port used when `server.port` is not configured.
pub const DEFAULT_PORT: u16 = 8080;

/// Bind host used when `server.host` is not configured.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Typed view of the `server.*` configuration section.
///
/// Missing keys fall back to the defaults above; a present but malformed
/// value (non-numeric or out-of-range port) fails startup.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    /// The address to bind, `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ConfigSection for ServerSettings {
    fn prefix() -> &'static str {
        "server"
    }

    fn from_config(config: &HowdyConfig) -> Result<Self, ConfigError> {
        let host = match config.get::<Option<String>>(&Self::key("host")) {
            Ok(Some(host)) => host,
            Ok(None) => DEFAULT_HOST.to_string(),
            Err(ConfigError::NotFound(_)) => DEFAULT_HOST.to_string(),
            Err(e) => return Err(e),
        };
        let port = match config.get::<Option<u16>>(&Self::key("port")) {
            Ok(Some(port)) => port,
            Ok(None) => DEFAULT_PORT,
            Err(ConfigError::NotFound(_)) => DEFAULT_PORT,
            Err(e) => return Err(e),
        };
        Ok(ServerSettings { host, port })
    }
}

/// Error type for server startup and shutdown.
#[derive(Debug)]
pub enum ServeError {
    /// The listener could not be bound (address in use, permission
    /// denied, unresolvable host, ...).
    Bind { addr: String, source: std::io::Error },
    /// The server failed while serving connections.
    Io(std::io::Error),
}

impl std::fmt::Display for ServeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServeError::Bind { addr, source } => {
                write!(f, "failed to bind {addr}: {source}")
            }
            ServeError::Io(e) => write!(f, "server error: {e}"),
        }
    }
}

impl std::error::Error for ServeError {}

/// Assemble the application router: the greeting controller, the liveness
/// route, and the middleware stack.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(controllers::greeting::routes())
        .route("/health", get(health))
        .with_state(state)
        // Panics become 500s before the trace layer records the response;
        // request ids are stamped outside both, so even a 500 carries one.
        .layer(layers::catch_panic_layer())
        .layer(layers::trace_layer())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
}

async fn health() -> &'static str {
    "OK"
}

/// Bind a TCP listener on the configured address.
///
/// A failure here is fatal at startup; the error names the address that
/// could not be bound.
pub async fn bind(addr: &str) -> Result<TcpListener, ServeError> {
    TcpListener::bind(addr).await.map_err(|source| ServeError::Bind {
        addr: addr.to_string(),
        source,
    })
}

/// Serve the router on an already-bound listener until shutdown.
pub async fn serve_on(listener: TcpListener, router: Router) -> Result<(), ServeError> {
    let addr = listener.local_addr().map_err(ServeError::Io)?;
    info!(%addr, "howdy server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServeError::Io)?;
    info!("howdy server stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl-C or SIGTERM on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for Ctrl-C");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, starting graceful shutdown");
}
