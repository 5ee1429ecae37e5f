//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID)
//! - Dispatch by method/path: preflight, health, proxy, 404
//! - Drive the proxy pipeline: validate → authorize → impersonate →
//!   fetch → relay
//! - Bind server to listener and stop on shutdown

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::error::{ProxyError, StartupError};
use crate::http::health::health_handler;
use crate::http::request::{parse_target, request_id};
use crate::http::response::{not_found, preflight, relay};
use crate::observability::metrics;
use crate::security::{build_outbound_headers, DomainAllowList};
use crate::upstream::UpstreamFetcher;

/// Application state injected into handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub allow_list: DomainAllowList,
    pub fetcher: Arc<UpstreamFetcher>,
    pub service_name: Arc<str>,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Result<Self, StartupError> {
        Ok(Self {
            allow_list: DomainAllowList::new(&config.access.allowed_domains),
            fetcher: Arc::new(UpstreamFetcher::new(&config.upstream)?),
            service_name: Arc::from(config.service.name.as_str()),
        })
    }
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ProxyConfig) -> Result<Self, StartupError> {
        let state = AppState::from_config(config)?;

        tracing::debug!(
            allowed_domains = state.allow_list.len(),
            upstream_timeout_ms = config.upstream.timeout_ms,
            "Relay state initialized"
        );

        let router = build_router(state);
        Ok(Self { router })
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process use.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", proxy_route())
        .route("/proxy", proxy_route())
        .route(
            "/health",
            get(health_handler).options(preflight_handler).fallback(not_found_handler),
        )
        .fallback(fallback_handler)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

fn proxy_route() -> MethodRouter<AppState> {
    // `get` also answers HEAD; hyper drops the body for those.
    get(proxy_handler)
        .options(preflight_handler)
        .fallback(not_found_handler)
}

async fn preflight_handler() -> Response {
    preflight()
}

async fn not_found_handler() -> Response {
    not_found()
}

async fn fallback_handler(method: Method) -> Response {
    if method == Method::OPTIONS {
        preflight()
    } else {
        not_found()
    }
}

/// Main proxy handler.
async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers).to_string();

    match forward(&state, uri.query(), &headers).await {
        Ok(response) => {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                status = response.status().as_u16(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Relaying upstream response"
            );
            metrics::record_request(&method, response.status(), "relayed", start_time);
            response
        }
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!(request_id = %request_id, kind = e.kind(), error = %e, "Proxy request failed");
            } else {
                tracing::warn!(request_id = %request_id, kind = e.kind(), error = %e, "Proxy request rejected");
            }
            metrics::record_request(&method, status, e.kind(), start_time);
            e.into_response()
        }
    }
}

async fn forward(
    state: &AppState,
    query: Option<&str>,
    headers: &HeaderMap,
) -> Result<Response, ProxyError> {
    let target = parse_target(query, headers)?;
    state.allow_list.authorize(&target.hostname)?;

    let outbound = build_outbound_headers(&target.hostname, target.range.as_ref());
    let outcome = state.fetcher.fetch(&target, outbound).await?;

    Ok(relay(outcome))
}
