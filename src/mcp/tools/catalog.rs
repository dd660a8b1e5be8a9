//! MCP tools for the work package catalog: types and statuses.
//!
//! Both collections are small and unpaginated on the remote, so the list
//! tools return every entry.

use rmcp::{
    ErrorData as McpError, handler::server::wrapper::Parameters, model::*, schemars,
    schemars::JsonSchema, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::client::{PageQuery, ResourceClient, ResourceId, ResourceKind};
use crate::mcp::McpServer;
use crate::mcp::tools::json_result;
use crate::views::{FetchAllOptions, fetch_all};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetTypeParams {
    #[schemars(description = "Work package type ID")]
    pub id: ResourceId,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetStatusParams {
    #[schemars(description = "Work package status ID")]
    pub id: ResourceId,
}

impl<C: ResourceClient + 'static> McpServer<C> {
    async fn list_catalog(
        &self,
        name: &'static str,
        kind: ResourceKind,
    ) -> Result<CallToolResult, McpError> {
        let client = self.client();
        let items: Vec<Value> = self
            .run_operation(name, |_| {
                fetch_all(
                    move |offset, page_size| {
                        client.fetch_page(kind, PageQuery::at_item(None, offset, page_size))
                    },
                    FetchAllOptions::default(),
                )
            })
            .await?;

        json_result(&json!({
            "items": items,
            "total": items.len(),
        }))
    }
}

#[tool_router(router = catalog_router, vis = "pub(crate)")]
impl<C: ResourceClient + 'static> McpServer<C> {
    #[tool(
        description = "List all work package types (e.g., Task, Bug, Feature) available in OpenProject"
    )]
    pub async fn list_work_package_types(&self) -> Result<CallToolResult, McpError> {
        self.list_catalog("list_work_package_types", ResourceKind::Types)
            .await
    }

    #[tool(description = "Get details of a specific work package type by ID")]
    pub async fn get_work_package_type(
        &self,
        params: Parameters<GetTypeParams>,
    ) -> Result<CallToolResult, McpError> {
        let work_package_type: Value = self
            .run_operation("get_work_package_type", |_| {
                self.client().fetch_one(ResourceKind::Types, &params.0.id)
            })
            .await?;

        json_result(&work_package_type)
    }

    #[tool(
        description = "List all work package statuses (e.g., New, In Progress, Closed) available in OpenProject"
    )]
    pub async fn list_work_package_statuses(&self) -> Result<CallToolResult, McpError> {
        self.list_catalog("list_work_package_statuses", ResourceKind::Statuses)
            .await
    }

    #[tool(description = "Get details of a specific work package status by ID")]
    pub async fn get_work_package_status(
        &self,
        params: Parameters<GetStatusParams>,
    ) -> Result<CallToolResult, McpError> {
        let status: Value = self
            .run_operation("get_work_package_status", |_| {
                self.client()
                    .fetch_one(ResourceKind::Statuses, &params.0.id)
            })
            .await?;

        json_result(&status)
    }
}
