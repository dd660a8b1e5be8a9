//! Helpers shared by the tool tests.

use std::sync::Arc;
use std::time::Duration;

use rmcp::model::{CallToolResult, RawContent};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::client::fake::FakeClient;
use crate::config::ServerSettings;
use crate::mcp::McpServer;

/// Server over `client`, with the client handle kept for call inspection.
pub(crate) fn server(client: FakeClient) -> (McpServer<FakeClient>, Arc<FakeClient>) {
    server_with(client, ServerSettings::default())
}

pub(crate) fn server_with(
    client: FakeClient,
    settings: ServerSettings,
) -> (McpServer<FakeClient>, Arc<FakeClient>) {
    let client = Arc::new(client);
    let server = McpServer::new(Arc::clone(&client), settings, CancellationToken::new());
    (server, client)
}

pub(crate) fn settings(operation_timeout: Duration, max_depth_limit: usize) -> ServerSettings {
    ServerSettings {
        operation_timeout,
        max_depth_limit,
    }
}

/// Parse the single text content of a tool result as JSON.
pub(crate) fn json_of(result: &CallToolResult) -> Value {
    let text = match &result.content[0].raw {
        RawContent::Text(text) => text.text.as_str(),
        _ => panic!("Expected text content"),
    };
    serde_json::from_str(text).expect("tool output should be JSON")
}
