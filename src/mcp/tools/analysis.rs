//! MCP tools for whole-project and graph views.
//!
//! These are the bulk operations: they page through collections, walk the
//! parent/child tree or follow blocking relations, and return one assembled
//! result.

use rmcp::{
    ErrorData as McpError, handler::server::wrapper::Parameters, model::*, schemars,
    schemars::JsonSchema, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::client::{ResourceClient, ResourceId};
use crate::mcp::McpServer;
use crate::mcp::tools::json_result;
use crate::views::{self, DEFAULT_MAX_DEPTH, FetchAllOptions};

// =============================================================================
// Parameter Structs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWorkPackagesParams {
    #[schemars(description = "Project ID or identifier")]
    pub project_id: ResourceId,
    #[schemars(description = "Maximum number of work packages to load (default: unlimited)")]
    pub max_items: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackageRefParams {
    #[schemars(description = "Work package ID")]
    pub work_package_id: ResourceId,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyParams {
    #[schemars(description = "Work package ID")]
    pub work_package_id: ResourceId,
    #[schemars(description = "Maximum depth to traverse (default: 10)")]
    pub max_depth: Option<usize>,
}

// =============================================================================
// Analysis Tools
// =============================================================================

#[tool_router(router = analysis_router, vis = "pub(crate)")]
impl<C: ResourceClient + 'static> McpServer<C> {
    #[tool(
        description = "Load ALL work packages for a project in a single call (handles pagination automatically). Use this for comprehensive project analysis instead of manually paginating through list_work_packages."
    )]
    pub async fn get_all_work_packages_in_project(
        &self,
        params: Parameters<ProjectWorkPackagesParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let options = FetchAllOptions {
            max_items: params.max_items,
            page_size: None,
        };
        let client = self.client();
        let project_id = &params.project_id;

        let work_packages = self
            .run_operation("get_all_work_packages_in_project", |cancel| async move {
                views::load_project_work_packages(client, project_id, options, &cancel).await
            })
            .await?;

        info!(
            project_id = %params.project_id,
            count = work_packages.len(),
            "loaded project work packages"
        );

        json_result(&json!({
            "projectId": params.project_id,
            "workPackages": work_packages,
            "totalCount": work_packages.len(),
        }))
    }

    #[tool(
        description = "Get comprehensive project overview including ALL work packages and statistics. Returns project details, all work packages, and computed statistics (completion %, overdue count, by status/type/assignee breakdowns)."
    )]
    pub async fn get_project_overview(
        &self,
        params: Parameters<ProjectWorkPackagesParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let options = FetchAllOptions {
            max_items: params.max_items,
            page_size: None,
        };
        let client = self.client();
        let project_id = &params.project_id;

        let overview = self
            .run_operation("get_project_overview", |cancel| async move {
                views::get_project_overview(client, project_id, options, &cancel).await
            })
            .await?;

        json_result(&overview)
    }

    #[tool(
        description = "Get all relations (blocks, precedes, relates, duplicates, ...) of a work package"
    )]
    pub async fn get_work_package_relations(
        &self,
        params: Parameters<WorkPackageRefParams>,
    ) -> Result<CallToolResult, McpError> {
        let relations = self
            .run_operation("get_work_package_relations", |_| {
                self.client().fetch_relations(&params.0.work_package_id)
            })
            .await?;

        json_result(&json!({
            "workPackageId": params.0.work_package_id,
            "relations": relations,
            "total": relations.len(),
        }))
    }

    #[tool(
        description = "Get the complete parent-child hierarchy tree for a work package. Shows parents, all children, grandchildren, etc. Nodes cut off by maxDepth are marked truncated."
    )]
    pub async fn get_work_package_hierarchy(
        &self,
        params: Parameters<HierarchyParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let limit = self.settings().max_depth_limit;
        let requested = params.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
        let max_depth = requested.min(limit);
        if max_depth < requested {
            debug!(requested, limit, "capping hierarchy depth");
        }
        let client = self.client();
        let work_package_id = &params.work_package_id;

        let hierarchy = self
            .run_operation("get_work_package_hierarchy", |cancel| async move {
                views::build_hierarchy(client, work_package_id, max_depth, &cancel).await
            })
            .await?;

        info!(
            work_package_id = hierarchy.root.work_package.id,
            nodes = hierarchy.node_count(),
            ancestors = hierarchy.ancestors.len(),
            max_depth,
            "built work package hierarchy"
        );

        json_result(&hierarchy)
    }

    #[tool(
        description = "Find all work packages that are blocking a specific work package, directly or through a chain of blockers. Quick way to identify what needs to be completed before this work package can proceed."
    )]
    pub async fn find_blocking_work_packages(
        &self,
        params: Parameters<WorkPackageRefParams>,
    ) -> Result<CallToolResult, McpError> {
        let client = self.client();
        let work_package_id = &params.0.work_package_id;

        let blockers = self
            .run_operation("find_blocking_work_packages", |cancel| async move {
                views::find_all_blockers(client, work_package_id, &cancel).await
            })
            .await?;

        json_result(&json!({
            "workPackageId": work_package_id,
            "blockers": blockers,
            "total": blockers.len(),
        }))
    }
}
