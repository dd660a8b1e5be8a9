//! MCP tools for projects.

use rmcp::{
    ErrorData as McpError, handler::server::wrapper::Parameters, model::*, schemars,
    schemars::JsonSchema, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::payloads::{NewProject, ProjectPatch};
use crate::client::{Page, ResourceClient, ResourceId, ResourceKind};
use crate::mcp::McpServer;
use crate::mcp::tools::{json_result, list_query};

// =============================================================================
// Parameter Structs
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsParams {
    #[schemars(
        description = "JSON filters for the query (e.g., [{\"active\":{\"operator\":\"=\",\"values\":[\"true\"]}}])"
    )]
    pub filters: Option<String>,
    #[schemars(description = "Number of results per page (default: 20, max: 100)")]
    pub page_size: Option<usize>,
    #[schemars(description = "Page to return, starting at 1 (default: 1)")]
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetProjectParams {
    #[schemars(description = "Project ID or identifier")]
    pub id: ResourceId,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectParams {
    #[schemars(description = "Project name")]
    pub name: String,
    #[schemars(description = "Project identifier (unique, lowercase, no spaces)")]
    pub identifier: String,
    #[schemars(description = "Project description (supports markdown)")]
    pub description: Option<String>,
    #[schemars(description = "Whether the project is public (default: false)")]
    pub public: Option<bool>,
    #[schemars(description = "Parent project ID (for subprojects)")]
    pub parent_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateProjectParams {
    #[schemars(description = "Project ID or identifier")]
    pub id: ResourceId,
    #[schemars(description = "New project name")]
    pub name: Option<String>,
    #[schemars(description = "New project description (supports markdown)")]
    pub description: Option<String>,
    #[schemars(description = "Whether the project is public")]
    pub public: Option<bool>,
    #[schemars(description = "Whether the project is active")]
    pub active: Option<bool>,
}

// =============================================================================
// Project Tools
// =============================================================================

#[tool_router(router = project_router, vis = "pub(crate)")]
impl<C: ResourceClient + 'static> McpServer<C> {
    #[tool(description = "List all projects in OpenProject. Supports filtering and pagination.")]
    pub async fn list_projects(
        &self,
        params: Parameters<ListProjectsParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = list_query(params.0.filters, params.0.page_size, params.0.offset);

        let page: Page<Value> = self
            .run_operation("list_projects", |_| {
                self.client().fetch_page(ResourceKind::Projects, query)
            })
            .await?;

        json_result(&page)
    }

    #[tool(description = "Get details of a specific project by ID or identifier")]
    pub async fn get_project(
        &self,
        params: Parameters<GetProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        let project: Value = self
            .run_operation("get_project", |_| {
                self.client()
                    .fetch_one(ResourceKind::Projects, &params.0.id)
            })
            .await?;

        json_result(&project)
    }

    #[tool(description = "Create a new project in OpenProject")]
    pub async fn create_project(
        &self,
        params: Parameters<CreateProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let payload = NewProject {
            name: params.name,
            identifier: params.identifier,
            description: params.description,
            public: params.public,
            parent_id: params.parent_id,
        }
        .to_payload();

        let created = self
            .run_operation("create_project", |_| {
                self.client().create(ResourceKind::Projects, payload)
            })
            .await?;

        json_result(&created)
    }

    #[tool(description = "Update an existing project. Only the given fields change.")]
    pub async fn update_project(
        &self,
        params: Parameters<UpdateProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let payload = ProjectPatch {
            name: params.name,
            description: params.description,
            public: params.public,
            active: params.active,
        }
        .to_payload();

        let updated = self
            .run_operation("update_project", |_| {
                self.client()
                    .update(ResourceKind::Projects, &params.id, payload)
            })
            .await?;

        json_result(&updated)
    }
}
