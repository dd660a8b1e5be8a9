//! MCP tools for users.

use rmcp::{
    ErrorData as McpError, handler::server::wrapper::Parameters, model::*, schemars,
    schemars::JsonSchema, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{Page, ResourceClient, ResourceId, ResourceKind};
use crate::mcp::McpServer;
use crate::mcp::tools::{json_result, list_query};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersParams {
    #[schemars(description = "JSON filters for the query")]
    pub filters: Option<String>,
    #[schemars(description = "Number of results per page (default: 20, max: 100)")]
    pub page_size: Option<usize>,
    #[schemars(description = "Page to return, starting at 1 (default: 1)")]
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetUserParams {
    #[schemars(description = "User ID (or 'me' for the acting user)")]
    pub id: ResourceId,
}

#[tool_router(router = user_router, vis = "pub(crate)")]
impl<C: ResourceClient + 'static> McpServer<C> {
    #[tool(description = "List users in OpenProject. Supports filtering and pagination.")]
    pub async fn list_users(
        &self,
        params: Parameters<ListUsersParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = list_query(params.0.filters, params.0.page_size, params.0.offset);

        let page: Page<Value> = self
            .run_operation("list_users", |_| {
                self.client().fetch_page(ResourceKind::Users, query)
            })
            .await?;

        json_result(&page)
    }

    #[tool(description = "Get details of a specific user by ID")]
    pub async fn get_user(
        &self,
        params: Parameters<GetUserParams>,
    ) -> Result<CallToolResult, McpError> {
        let user: Value = self
            .run_operation("get_user", |_| {
                self.client().fetch_one(ResourceKind::Users, &params.0.id)
            })
            .await?;

        json_result(&user)
    }
}
