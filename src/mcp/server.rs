//! MCP server implementation
//!
//! [`McpServer`] owns the shared client handle and the tool router. Tool
//! methods live in `tools/*`, each file contributing one router.

use std::future::Future;
use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{ServerCapabilities, ServerInfo, Tool},
    tool_handler,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::client::{ClientResult, ResourceClient};
use crate::config::ServerSettings;
use crate::views::guarded;

use super::tools::map_client_error;

/// MCP server over an OpenProject instance.
///
/// Generic over `C: ResourceClient`, so tests run the same tools against an
/// in-memory client.
pub struct McpServer<C: ResourceClient> {
    client: Arc<C>,
    settings: ServerSettings,
    shutdown: CancellationToken,
    tool_router: ToolRouter<Self>,
}

impl<C: ResourceClient + 'static> McpServer<C> {
    /// Create a server. `shutdown` cancels every in-flight tool call when it
    /// fires.
    pub fn new(client: Arc<C>, settings: ServerSettings, shutdown: CancellationToken) -> Self {
        Self {
            client,
            settings,
            shutdown,
            tool_router: Self::project_router()
                + Self::work_package_router()
                + Self::user_router()
                + Self::time_entry_router()
                + Self::catalog_router()
                + Self::analysis_router()
                + Self::activity_router(),
        }
    }

    /// Every registered tool.
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    pub(crate) fn client(&self) -> &C {
        &self.client
    }

    pub(crate) fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Run one tool operation under the operation deadline.
    ///
    /// `op` receives a child of the shutdown token; it is cancelled when the
    /// deadline passes or the server shuts down. Operations that ignore the
    /// token are still raced against it.
    pub(crate) async fn run_operation<T, F, Fut>(
        &self,
        name: &'static str,
        op: F,
    ) -> Result<T, McpError>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let cancel = self.shutdown.child_token();
        let _cancel_on_exit = cancel.clone().drop_guard();
        let operation = guarded(&cancel, op(cancel.clone()));

        match tokio::time::timeout(self.settings.operation_timeout, operation).await {
            Ok(result) => result.map_err(map_client_error),
            Err(_) => {
                warn!(
                    operation = name,
                    timeout_secs = self.settings.operation_timeout.as_secs(),
                    "operation timed out"
                );
                Err(McpError::internal_error(
                    "operation_timeout",
                    Some(json!({
                        "operation": name,
                        "timeoutSecs": self.settings.operation_timeout.as_secs(),
                    })),
                ))
            }
        }
    }
}

#[tool_handler(router = self.tool_router)]
impl<C: ResourceClient + 'static> ServerHandler for McpServer<C> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build()).with_instructions(
            "OpenProject MCP Server - Manage projects, work packages, users and time entries. \
             Use get_project_overview, get_work_package_hierarchy and \
             find_blocking_work_packages for whole-project analysis.",
        )
    }
}
