//! MCP tools for work packages.

use rmcp::{
    ErrorData as McpError, handler::server::wrapper::Parameters, model::*, schemars,
    schemars::JsonSchema, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::client::payloads::{NewWorkPackage, WorkPackagePatch};
use crate::client::{Page, ResourceClient, ResourceId, ResourceKind};
use crate::mcp::McpServer;
use crate::mcp::tools::{json_result, list_query};

// =============================================================================
// Parameter Structs
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkPackagesParams {
    #[schemars(
        description = "JSON filters (e.g., [{\"status\":{\"operator\":\"o\",\"values\":[]}}] for open items)"
    )]
    pub filters: Option<String>,
    #[schemars(description = "Number of results per page (default: 20, max: 100)")]
    pub page_size: Option<usize>,
    #[schemars(description = "Page to return, starting at 1 (default: 1)")]
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetWorkPackageParams {
    #[schemars(description = "Work package ID")]
    pub id: ResourceId,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkPackageParams {
    #[schemars(description = "Work package subject/title")]
    pub subject: String,
    #[schemars(description = "Project ID")]
    pub project_id: u64,
    #[schemars(description = "Work package type ID (e.g., Task, Bug, Feature)")]
    pub type_id: Option<u64>,
    #[schemars(description = "Work package description (supports markdown)")]
    pub description: Option<String>,
    #[schemars(description = "User ID of assignee")]
    pub assignee_id: Option<u64>,
    #[schemars(description = "Start date (YYYY-MM-DD format)")]
    pub start_date: Option<String>,
    #[schemars(description = "Due date (YYYY-MM-DD format)")]
    pub due_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkPackageParams {
    #[schemars(description = "Work package ID")]
    pub id: ResourceId,
    #[schemars(description = "New subject/title")]
    pub subject: Option<String>,
    #[schemars(description = "New description (supports markdown)")]
    pub description: Option<String>,
    #[schemars(description = "New assignee user ID")]
    pub assignee_id: Option<u64>,
    #[schemars(description = "Start date (YYYY-MM-DD format)")]
    pub start_date: Option<String>,
    #[schemars(description = "Due date (YYYY-MM-DD format)")]
    pub due_date: Option<String>,
    #[schemars(description = "Status ID")]
    pub status_id: Option<u64>,
    #[schemars(description = "Percentage done (0-100)")]
    pub percentage_done: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteWorkPackageParams {
    #[schemars(description = "Work package ID")]
    pub id: ResourceId,
}

// =============================================================================
// Work Package Tools
// =============================================================================

#[tool_router(router = work_package_router, vis = "pub(crate)")]
impl<C: ResourceClient + 'static> McpServer<C> {
    #[tool(
        description = "List work packages (tasks/issues) in OpenProject. Supports filtering and pagination."
    )]
    pub async fn list_work_packages(
        &self,
        params: Parameters<ListWorkPackagesParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = list_query(params.0.filters, params.0.page_size, params.0.offset);

        let page: Page<Value> = self
            .run_operation("list_work_packages", |_| {
                self.client().fetch_page(ResourceKind::WorkPackages, query)
            })
            .await?;

        json_result(&page)
    }

    #[tool(description = "Get details of a specific work package by ID")]
    pub async fn get_work_package(
        &self,
        params: Parameters<GetWorkPackageParams>,
    ) -> Result<CallToolResult, McpError> {
        let work_package: Value = self
            .run_operation("get_work_package", |_| {
                self.client()
                    .fetch_one(ResourceKind::WorkPackages, &params.0.id)
            })
            .await?;

        json_result(&work_package)
    }

    #[tool(description = "Create a new work package (task/issue) in OpenProject")]
    pub async fn create_work_package(
        &self,
        params: Parameters<CreateWorkPackageParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let payload = NewWorkPackage {
            subject: params.subject,
            project_id: params.project_id,
            type_id: params.type_id,
            description: params.description,
            assignee_id: params.assignee_id,
            start_date: params.start_date,
            due_date: params.due_date,
        }
        .to_payload();

        let created = self
            .run_operation("create_work_package", |_| {
                self.client().create(ResourceKind::WorkPackages, payload)
            })
            .await?;

        json_result(&created)
    }

    #[tool(
        description = "Update an existing work package. Only the given fields change; the current lock version is fetched automatically."
    )]
    pub async fn update_work_package(
        &self,
        params: Parameters<UpdateWorkPackageParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let client = self.client();

        let updated = self
            .run_operation("update_work_package", |_| async move {
                let current: Value = client
                    .fetch_one(ResourceKind::WorkPackages, &params.id)
                    .await?;

                let payload = WorkPackagePatch {
                    subject: params.subject,
                    description: params.description,
                    assignee_id: params.assignee_id,
                    start_date: params.start_date,
                    due_date: params.due_date,
                    status_id: params.status_id,
                    percentage_done: params.percentage_done,
                    lock_version: current["lockVersion"].as_u64(),
                }
                .to_payload();

                client
                    .update(ResourceKind::WorkPackages, &params.id, payload)
                    .await
            })
            .await?;

        json_result(&updated)
    }

    #[tool(description = "Delete a work package by ID")]
    pub async fn delete_work_package(
        &self,
        params: Parameters<DeleteWorkPackageParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_operation("delete_work_package", |_| {
            self.client()
                .delete(ResourceKind::WorkPackages, &params.0.id)
        })
        .await?;

        json_result(&json!({
            "deleted": true,
            "id": params.0.id,
            "message": format!("Work package {} deleted successfully", params.0.id),
        }))
    }
}
