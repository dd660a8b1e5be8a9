//! MCP tools for the activity journal of a work package.

use rmcp::{
    ErrorData as McpError, handler::server::wrapper::Parameters, model::*, schemars,
    schemars::JsonSchema, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{ResourceClient, ResourceId};
use crate::mcp::McpServer;
use crate::mcp::tools::{json_result, list_query};
use crate::views;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListActivitiesParams {
    #[schemars(description = "Work package ID")]
    pub work_package_id: ResourceId,
    #[schemars(description = "Number of results per page (default: 20, max: 100)")]
    pub page_size: Option<usize>,
    #[schemars(description = "Page to return, starting at 1 (default: 1)")]
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetCommentsParams {
    #[schemars(description = "Work package ID")]
    pub work_package_id: ResourceId,
}

#[tool_router(router = activity_router, vis = "pub(crate)")]
impl<C: ResourceClient + 'static> McpServer<C> {
    #[tool(
        description = "List the activity journal of a work package: comments and field changes, oldest first"
    )]
    pub async fn list_work_package_activities(
        &self,
        params: Parameters<ListActivitiesParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = list_query(None, params.0.page_size, params.0.offset);

        let page = self
            .run_operation("list_work_package_activities", |_| {
                self.client().fetch_activities(
                    &params.0.work_package_id,
                    query.page_size,
                    query.offset,
                )
            })
            .await?;

        json_result(&page)
    }

    #[tool(description = "Get all comments on a work package, without field-change entries")]
    pub async fn get_work_package_comments(
        &self,
        params: Parameters<GetCommentsParams>,
    ) -> Result<CallToolResult, McpError> {
        let client = self.client();
        let work_package_id = &params.0.work_package_id;

        let comments = self
            .run_operation("get_work_package_comments", |cancel| async move {
                views::load_comments(client, work_package_id, &cancel).await
            })
            .await?;

        json_result(&json!({
            "workPackageId": work_package_id,
            "comments": comments,
            "total": comments.len(),
        }))
    }
}
