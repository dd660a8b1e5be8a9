//! Tests for MCP server wiring and the operation guard

use std::sync::Arc;
use std::time::Duration;

use rmcp::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::ErrorCode;
use tokio_util::sync::CancellationToken;

use crate::client::ClientResult;
use crate::client::fake::{FakeClient, project};
use crate::client::{ResourceId, ResourceKind};
use crate::config::ServerSettings;
use crate::mcp::tools::projects::GetProjectParams;
use crate::mcp::tools::testing::{server, server_with, settings};

use super::server::McpServer;

const TOOL_NAMES: [&str; 26] = [
    "list_projects",
    "get_project",
    "create_project",
    "update_project",
    "list_work_packages",
    "get_work_package",
    "create_work_package",
    "update_work_package",
    "delete_work_package",
    "list_users",
    "get_user",
    "list_time_entries",
    "create_time_entry",
    "list_time_entry_activities",
    "get_time_entry_activity",
    "list_work_package_types",
    "get_work_package_type",
    "list_work_package_statuses",
    "get_work_package_status",
    "get_all_work_packages_in_project",
    "get_project_overview",
    "get_work_package_relations",
    "get_work_package_hierarchy",
    "find_blocking_work_packages",
    "list_work_package_activities",
    "get_work_package_comments",
];

#[tokio::test]
async fn test_server_info() {
    let (server, _client) = server(FakeClient::new());

    let info = server.get_info();

    assert!(
        info.capabilities.tools.is_some(),
        "Server should support tools"
    );
    assert!(
        info.instructions
            .as_deref()
            .is_some_and(|text| text.contains("get_project_overview")),
        "Server should point at the bulk tools"
    );
}

#[tokio::test]
async fn test_all_tools_registered() {
    let (server, _client) = server(FakeClient::new());

    let mut registered: Vec<String> = server
        .tools()
        .iter()
        .map(|tool| tool.name.to_string())
        .collect();
    registered.sort();

    let mut expected: Vec<String> = TOOL_NAMES.iter().map(|name| name.to_string()).collect();
    expected.sort();

    assert_eq!(registered, expected);
}

#[tokio::test]
async fn test_tools_describe_their_parameters() {
    let (server, _client) = server(FakeClient::new());

    let tools = server.tools();
    let hierarchy = tools
        .iter()
        .find(|tool| tool.name == "get_work_package_hierarchy")
        .expect("hierarchy tool should be registered");

    let properties = &hierarchy.input_schema["properties"];
    assert!(properties.get("workPackageId").is_some());
    assert!(properties.get("maxDepth").is_some());
    assert!(hierarchy.description.is_some());
}

#[tokio::test]
async fn test_operation_timeout() {
    let timeout = settings(Duration::from_millis(20), 25);
    let (server, _client) = server_with(FakeClient::new(), timeout);

    let err = server
        .run_operation("stalled", |_| std::future::pending::<ClientResult<()>>())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    assert_eq!(err.message, "operation_timeout");
    let data = err.data.unwrap();
    assert_eq!(data["operation"], "stalled");
}

#[tokio::test]
async fn test_operation_token_cancelled_when_done() {
    let (server, _client) = server(FakeClient::new());
    let mut handed_out = None;

    server
        .run_operation("quick", |cancel| {
            handed_out = Some(cancel.clone());
            async { Ok(()) }
        })
        .await
        .unwrap();

    assert!(handed_out.unwrap().is_cancelled());
}

#[tokio::test]
async fn test_shutdown_cancels_operations() {
    let shutdown = CancellationToken::new();
    let client = FakeClient::new().with(ResourceKind::Projects, project(1, "apollo", "Apollo"));
    let server = McpServer::new(
        Arc::new(client),
        ServerSettings::default(),
        shutdown.clone(),
    );
    shutdown.cancel();

    let err = server
        .run_operation("stalled", |_| std::future::pending::<ClientResult<()>>())
        .await
        .unwrap_err();
    assert_eq!(err.message, "cancelled");

    let err = server
        .get_project(Parameters(GetProjectParams {
            id: ResourceId::from(1),
        }))
        .await
        .unwrap_err();
    assert_eq!(err.message, "cancelled");
}
