//! MCP Streamable HTTP service creation
//!
//! This module provides the MCP service that can be nested into an Axum
//! router.

use std::sync::Arc;

use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use crate::client::ResourceClient;
use crate::config::ServerSettings;

use super::server::McpServer;

/// Create the MCP Streamable HTTP service
///
/// Every session gets its own [`McpServer`] sharing one client handle.
/// Cancelling `cancellation_token` closes all sessions and aborts their
/// in-flight tool calls.
///
/// # Example
/// ```no_run
/// use axum::Router;
/// use tokio_util::sync::CancellationToken;
/// # use std::sync::Arc;
/// # use openproject_mcp::client::{ClientConfig, OpenProjectClient};
/// # use openproject_mcp::config::ServerSettings;
/// # use openproject_mcp::mcp::create_mcp_service;
/// # fn example(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
/// let client = Arc::new(OpenProjectClient::new(&config)?);
/// let ct = CancellationToken::new();
/// let mcp_service = create_mcp_service(client, ServerSettings::default(), ct);
///
/// let app: Router = Router::new().nest_service("/mcp", mcp_service);
/// # Ok(())
/// # }
/// ```
pub fn create_mcp_service<C: ResourceClient + 'static>(
    client: Arc<C>,
    settings: ServerSettings,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<McpServer<C>, LocalSessionManager> {
    let shutdown = cancellation_token.clone();

    // rmcp expects the factory to fail with io::Error
    let service_factory = move || -> Result<McpServer<C>, std::io::Error> {
        Ok(McpServer::new(
            Arc::clone(&client),
            settings,
            shutdown.clone(),
        ))
    };

    let config = StreamableHttpServerConfig::default()
        .with_sse_keep_alive(None)
        .with_sse_retry(None)
        .with_stateful_mode(true)
        .with_cancellation_token(cancellation_token);

    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}
