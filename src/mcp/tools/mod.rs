//! MCP tool implementations
//!
//! Tools are grouped by entity, one `#[tool_router]` block per file, all on
//! [`McpServer`](super::McpServer). The server adds the routers together.

pub mod activities;
pub mod analysis;
pub mod catalog;
pub mod projects;
pub mod time_entries;
pub mod users;
pub mod work_packages;

#[cfg(test)]
pub(crate) mod testing;

use rmcp::{ErrorData as McpError, model::*};
use serde::Serialize;
use serde_json::json;

use crate::client::{ClientError, MAX_PAGE_SIZE, PageQuery};

/// Page size used by list tools when none is given.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Map a client error onto the MCP error space.
///
/// Missing entities are `resource_not_found`, requests the remote refused
/// are `invalid_params`, everything else is `internal_error`.
pub(crate) fn map_client_error(error: ClientError) -> McpError {
    let data = Some(json!({ "error": error.to_string() }));
    match &error {
        ClientError::NotFound { .. } => McpError::resource_not_found("not_found", data),
        ClientError::Remote { .. } if error.is_rejection() => {
            McpError::invalid_params("rejected_by_openproject", data)
        }
        ClientError::Cancelled => McpError::internal_error("cancelled", data),
        _ => McpError::internal_error("openproject_error", data),
    }
}

/// Pretty-printed JSON text result.
pub(crate) fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(
            "serialization_error",
            Some(json!({ "error": e.to_string() })),
        )
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Query for one page of a list tool. `offset` is the page number.
pub(crate) fn list_query(
    filters: Option<String>,
    page_size: Option<usize>,
    offset: Option<usize>,
) -> PageQuery {
    PageQuery {
        filters: filters.filter(|f| !f.trim().is_empty()),
        page_size: page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE),
        offset: offset.unwrap_or(1).max(1),
    }
}
