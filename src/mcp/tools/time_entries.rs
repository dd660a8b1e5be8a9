//! MCP tools for time tracking: time entries and their activities.

use chrono::NaiveDate;
use rmcp::{
    ErrorData as McpError, handler::server::wrapper::Parameters, model::*, schemars,
    schemars::JsonSchema, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::client::payloads::NewTimeEntry;
use crate::client::{Page, ResourceClient, ResourceId, ResourceKind};
use crate::mcp::McpServer;
use crate::mcp::tools::{json_result, list_query};

// =============================================================================
// Parameter Structs
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTimeEntriesParams {
    #[schemars(description = "JSON filters for the query")]
    pub filters: Option<String>,
    #[schemars(description = "Number of results per page (default: 20, max: 100)")]
    pub page_size: Option<usize>,
    #[schemars(description = "Page to return, starting at 1 (default: 1)")]
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeEntryParams {
    #[schemars(description = "Work package ID")]
    pub work_package_id: u64,
    #[schemars(description = "Hours spent (e.g., 2.5 for 2.5 hours)")]
    pub hours: f64,
    #[schemars(description = "Date when time was spent (YYYY-MM-DD format)")]
    pub spent_on: String,
    #[schemars(description = "Activity ID (optional)")]
    pub activity_id: Option<u64>,
    #[schemars(description = "Comment about the time entry (supports markdown)")]
    pub comment: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTimeEntryActivitiesParams {
    #[schemars(description = "Number of results per page (default: 20, max: 100)")]
    pub page_size: Option<usize>,
    #[schemars(description = "Page to return, starting at 1 (default: 1)")]
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetTimeEntryActivityParams {
    #[schemars(description = "Time entry activity ID")]
    pub id: ResourceId,
}

// =============================================================================
// Time Entry Tools
// =============================================================================

#[tool_router(router = time_entry_router, vis = "pub(crate)")]
impl<C: ResourceClient + 'static> McpServer<C> {
    #[tool(description = "List time entries. Supports filtering and pagination.")]
    pub async fn list_time_entries(
        &self,
        params: Parameters<ListTimeEntriesParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = list_query(params.0.filters, params.0.page_size, params.0.offset);

        let page: Page<Value> = self
            .run_operation("list_time_entries", |_| {
                self.client().fetch_page(ResourceKind::TimeEntries, query)
            })
            .await?;

        json_result(&page)
    }

    #[tool(description = "Create a time entry for a work package")]
    pub async fn create_time_entry(
        &self,
        params: Parameters<CreateTimeEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        if !params.hours.is_finite() || params.hours <= 0.0 {
            return Err(McpError::invalid_params(
                "invalid_hours",
                Some(json!({
                    "error": "hours must be a positive number",
                    "hours": params.hours
                })),
            ));
        }
        if NaiveDate::parse_from_str(&params.spent_on, "%Y-%m-%d").is_err() {
            return Err(McpError::invalid_params(
                "invalid_date",
                Some(json!({
                    "error": "spentOn must be YYYY-MM-DD",
                    "spentOn": params.spent_on
                })),
            ));
        }

        let payload = NewTimeEntry {
            work_package_id: params.work_package_id,
            hours: params.hours,
            spent_on: params.spent_on,
            activity_id: params.activity_id,
            comment: params.comment,
        }
        .to_payload();

        let created = self
            .run_operation("create_time_entry", |_| {
                self.client().create(ResourceKind::TimeEntries, payload)
            })
            .await?;

        json_result(&created)
    }

    #[tool(
        description = "List all time entry activities (e.g., Development, Testing, Documentation)"
    )]
    pub async fn list_time_entry_activities(
        &self,
        params: Parameters<ListTimeEntryActivitiesParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = list_query(None, params.0.page_size, params.0.offset);

        let page: Page<Value> = self
            .run_operation("list_time_entry_activities", |_| {
                self.client()
                    .fetch_page(ResourceKind::TimeEntryActivities, query)
            })
            .await?;

        json_result(&page)
    }

    #[tool(description = "Get details of a specific time entry activity by ID")]
    pub async fn get_time_entry_activity(
        &self,
        params: Parameters<GetTimeEntryActivityParams>,
    ) -> Result<CallToolResult, McpError> {
        let activity: Value = self
            .run_operation("get_time_entry_activity", |_| {
                self.client()
                    .fetch_one(ResourceKind::TimeEntryActivities, &params.0.id)
            })
            .await?;

        json_result(&activity)
    }
}
