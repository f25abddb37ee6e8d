//! # Lexis HTTP Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! This module runs the Axum server behind `lexis serve`:
//! - builds the completion provider and the topic gate from the config
//! - mounts the ask routes with request tracing and optional CORS
//! - falls forward to the next free port when the requested one is taken
//! - shuts down gracefully on Ctrl+C or SIGTERM
//!
//! Requests share no mutable state. Each one reads the same `Arc<AppState>`.
//!
use super::config::ServerConfig;
use super::routes::{api_router, AppState};
use crate::common::provider::OpenAiClient;
use crate::common::topic_gate::TopicGate;
use crate::core::error::Result;
use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

const MAX_PORT_ATTEMPTS: u8 = 10;

/// # Run HTTP Server (`run_server`)
///
/// Builds the application state and serves it until a shutdown signal
/// arrives.
///
/// ## Errors
///
/// Returns an error if the provider client cannot be built, no port is
/// available within `MAX_PORT_ATTEMPTS`, binding fails, or the server stops
/// with a fatal error.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let listener = find_available_port(config.host, config.port, MAX_PORT_ATTEMPTS).await?;
    let addr = listener
        .local_addr()
        .context("Failed to read the bound listener address")?;

    let provider = OpenAiClient::from_config(&config.provider)?;
    let model = provider.model().to_string();
    let state = Arc::new(AppState {
        provider: Arc::new(provider),
        gate: TopicGate::new(config.topics.clone()),
        system_prompt: config.provider.system_prompt.clone(),
    });
    let app = create_app(state, config.enable_cors);

    println!("\n=================================================================");
    println!("📚 Ask endpoint:   http://{}/api/ask", addr);
    println!("🤖 Provider:       {} ({})", config.provider.base_url, model);
    println!("🎯 Topics:         {}", config.topics.join(", "));
    println!("🔒 CORS enabled:   {}", config.enable_cors);
    println!("=================================================================\n");

    info!("Starting ask server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves when Ctrl+C or (on Unix) SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
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
}

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port` and then the following ports, up to `max_attempts` in
/// total, and returns the first listener that binds. The listener is kept so
/// the port cannot be taken between probing and serving.
async fn find_available_port(
    req_host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<TcpListener> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);

        match TcpListener::bind(addr).await {
            Ok(listener) => {
                if attempt > 0 {
                    warn!(
                        "Port {} was unavailable, using port {} instead. Point clients at the new address.",
                        start_port, current_port
                    );
                }
                return Ok(listener);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}

/// # Create Axum Application (`create_app`)
///
/// Wraps the ask routes in request tracing and, when enabled, permissive CORS.
fn create_app(state: Arc<AppState>, enable_cors: bool) -> Router {
    let cors_layer = if enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    api_router(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer)
            .layer(cors_layer),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::provider::fake::FakeProvider;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::net::Ipv4Addr;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            provider: Arc::new(FakeProvider::replying("ok")),
            gate: TopicGate::new(vec!["english".into()]),
            system_prompt: "persona".into(),
        })
    }

    #[tokio::test]
    async fn test_find_available_port_start_is_free() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 50300;

        let listener = find_available_port(host, start_port, 5).await?;
        let addr = listener.local_addr()?;

        assert_eq!(addr.port(), start_port);
        assert_eq!(addr.ip(), host);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_port_start_occupied() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 51300;

        let _listener = TcpListener::bind(SocketAddr::new(host, start_port)).await?;

        let listener = find_available_port(host, start_port, 5).await?;
        let addr = listener.local_addr()?;

        assert!(addr.port() > start_port);
        assert!(addr.port() < start_port + 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_port_keeps_port_reserved() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 52300;

        let listener = find_available_port(host, start_port, 5).await?;
        let addr = listener.local_addr()?;

        // While the returned listener is alive nobody else can bind the port.
        assert!(TcpListener::bind(addr).await.is_err());
        drop(listener);
        Ok(())
    }

    #[tokio::test]
    async fn test_cors_headers_follow_flag() {
        let preflight = || {
            Request::builder()
                .method("OPTIONS")
                .uri("/api/ask")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap()
        };

        let with_cors = create_app(test_state(), true)
            .oneshot(preflight())
            .await
            .unwrap();
        assert!(with_cors
            .headers()
            .contains_key("access-control-allow-origin"));

        let without_cors = create_app(test_state(), false)
            .oneshot(preflight())
            .await
            .unwrap();
        assert!(!without_cors
            .headers()
            .contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_create_app_serves_health() {
        let response = create_app(test_state(), true)
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_shutdown_signal_creation() {
        let shutdown_future = shutdown_signal();
        drop(shutdown_future);
    }
}
