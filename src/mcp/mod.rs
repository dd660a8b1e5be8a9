//! Model Context Protocol (MCP) server implementation
//!
//! Exposes the OpenProject API and the derived views as MCP tools, over
//! stdio or (with the `http` feature) the Streamable HTTP transport.
//!
//! # Architecture
//!
//! - **server**: [`McpServer`], generic over `C: ResourceClient`
//! - **tools**: tool routers grouped by entity
//!   - projects, work_packages, users, time_entries, catalog: API passthrough
//!   - analysis: project overview, hierarchy, blockers
//!   - activities: journal and comments
//! - **service**: Streamable HTTP service for axum

mod error;
pub mod server;
#[cfg(feature = "http")]
mod service;
pub mod tools;

#[cfg(test)]
mod server_test;
#[cfg(all(test, feature = "http"))]
mod service_test;

pub use error::ServerError;
pub use server::McpServer;
#[cfg(feature = "http")]
pub use service::create_mcp_service;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::client::OpenProjectClient;
use crate::config::{Config, Transport};

/// Initialize tracing subscriber with env filter
///
/// Logs go to stderr; stdout carries the stdio transport.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openproject_mcp=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer().with_writer(std::io::stderr),
        )
        .init();
}

/// Run the MCP server with the given configuration until the client
/// disconnects (stdio) or the process is interrupted (http).
pub async fn run(config: Config) -> Result<(), ServerError> {
    let client = Arc::new(OpenProjectClient::new(&config.client)?);
    let shutdown = CancellationToken::new();

    info!(
        api_root = client.api_root(),
        transport = ?config.transport,
        "starting OpenProject MCP server"
    );

    match config.transport {
        Transport::Stdio => serve_stdio(client, &config, shutdown).await,
        Transport::Http => serve_http(client, &config, shutdown).await,
    }
}

async fn serve_stdio(
    client: Arc<OpenProjectClient>,
    config: &Config,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let server = McpServer::new(client, config.server, shutdown.clone());

    let running = server
        .serve(stdio())
        .await
        .map_err(|e| ServerError::Initialize {
            message: e.to_string(),
        })?;
    info!("MCP server ready on stdio");

    let reason = running.waiting().await.map_err(|e| ServerError::Runtime {
        message: e.to_string(),
    })?;
    shutdown.cancel();
    info!(?reason, "MCP session closed");
    Ok(())
}

#[cfg(feature = "http")]
async fn serve_http(
    client: Arc<OpenProjectClient>,
    config: &Config,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    use tower_http::trace::TraceLayer;

    let service = create_mcp_service(client, config.server, shutdown.clone());
    let app = axum::Router::new()
        .nest_service("/mcp", service)
        .layer(TraceLayer::new_for_http());

    let addr = std::net::SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("MCP server listening on http://{}/mcp", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
            shutdown.cancel();
        })
        .await?;
    Ok(())
}

#[cfg(not(feature = "http"))]
async fn serve_http(
    _client: Arc<OpenProjectClient>,
    _config: &Config,
    _shutdown: CancellationToken,
) -> Result<(), ServerError> {
    Err(ServerError::HttpDisabled)
}
