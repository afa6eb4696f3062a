use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use chrono::{DateTime, Utc};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto::Builder as HyperBuilder,
    service::TowerToHyperService,
};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tower_http::trace::TraceLayer;

use crate::{
    error::ServiceResult,
    handler,
    metadata::{PKG_NAME, PKG_VERSION},
    openapi,
};

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Pause after a failed `accept`, e.g. when out of file descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Routes that are always mounted, as `METHOD path`.
const API_ROUTES: [&str; 4] = ["GET /", "GET /health", "POST /echo", "POST /format-number"];

/// Resolved, validated server settings.
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub http_addr: SocketAddr,
    pub openapi_url: Option<String>,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            openapi_url: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Read-only state shared by every request.
pub struct ServerState {
    pub name: &'static str,
    pub version: &'static str,
    pub started: Instant,
    pub started_at: DateTime<Utc>,
    pub config: ServerConfig,
    pub openapi: Value,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        let openapi = if config.openapi_url.is_some() {
            openapi::document()
        } else {
            Value::Null
        };
        Self {
            name: PKG_NAME,
            version: PKG_VERSION,
            started: Instant::now(),
            started_at: Utc::now(),
            config,
            openapi,
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn endpoints(&self) -> Vec<String> {
        let mut endpoints: Vec<String> = API_ROUTES.iter().map(|r| r.to_string()).collect();
        if let Some(url) = &self.config.openapi_url {
            endpoints.push(format!("GET {url}"));
        }
        endpoints
    }
}

/// Build the application router over `state`.
pub fn router(state: Arc<ServerState>) -> Router {
    let mut router = Router::new()
        .route("/", get(handler::welcome))
        .route("/health", get(handler::health))
        .route("/echo", post(handler::echo))
        .route("/format-number", post(handler::format_number));

    if let Some(url) = &state.config.openapi_url {
        router = router.route(url, get(handler::openapi));
    }

    router
        .fallback(handler::not_found)
        .method_not_allowed_fallback(handler::method_not_allowed)
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Accept connections on `listener` until `shutdown` is cancelled, then let
/// open connections finish their in-flight requests.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> ServiceResult<()> {
    let service = TowerToHyperService::new(app);
    let tracker = TaskTracker::new();

    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(err) => {
                    accept_backoff(&err).await;
                    continue;
                }
            },
        };

        let svc = service.clone();
        let shutdown = shutdown.clone();
        tracker.spawn(async move {
            let builder = HyperBuilder::new(TokioExecutor::new());
            let conn = builder.serve_connection(TokioIo::new(stream), svc);
            tokio::pin!(conn);

            let mut draining = false;
            loop {
                tokio::select! {
                    res = conn.as_mut() => {
                        if let Err(err) = res {
                            tracing::warn!(%peer, "HTTP connection error: {err}");
                        }
                        break;
                    }
                    _ = shutdown.cancelled(), if !draining => {
                        draining = true;
                        conn.as_mut().graceful_shutdown();
                    }
                }
            }
        });
    }

    tracker.close();
    tracing::info!(open_connections = tracker.len(), "Draining HTTP connections");
    tracker.wait().await;
    Ok(())
}

async fn accept_backoff(err: &std::io::Error) {
    tracing::warn!(
        backoff_ms = ACCEPT_BACKOFF.as_millis() as u64,
        "HTTP accept error: {err}"
    );
    tokio::time::sleep(ACCEPT_BACKOFF).await;
}

/// Bind `config.http_addr` and serve until Ctrl-C or SIGTERM.
pub async fn start_server(config: ServerConfig) -> ServiceResult<()> {
    let listener = TcpListener::bind(config.http_addr).await?;
    let local_addr = listener.local_addr()?;

    let state = Arc::new(ServerState::new(config));
    tracing::info!(
        addr = %local_addr,
        version = state.version,
        openapi = ?state.config.openapi_url,
        "Starting {} HTTP server",
        state.name
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    serve(listener, router(state), shutdown).await?;
    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
    shutdown.cancel();
}
