//! Project-scoped views: all work packages, the overview composite and the
//! comment thread of a work package.

use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::client::{
    Activity, ClientResult, PageQuery, Project, ResourceClient, ResourceId, ResourceKind,
    WorkPackage,
};

use super::{FetchAllOptions, Statistics, compute_statistics, fetch_all, guarded};

/// Project with every one of its work packages and their statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverview {
    pub project: Project,
    pub work_packages: Vec<WorkPackage>,
    pub statistics: Statistics,
    /// RFC 3339 timestamp taken when the overview was requested.
    pub loaded_at: String,
    pub total_count: usize,
}

/// Filter expression selecting work packages of `project_id` in any status.
pub fn project_filter(project_id: &ResourceId) -> String {
    json!([
        { "project": { "operator": "=", "values": [project_id.to_string()] } },
        { "status": { "operator": "*", "values": [] } }
    ])
    .to_string()
}

/// Every work package of a project, open or closed.
///
/// Pages can overlap when the collection changes mid-load; a work package
/// seen twice is kept once, at its first position.
pub async fn load_project_work_packages<C: ResourceClient>(
    client: &C,
    project_id: &ResourceId,
    options: FetchAllOptions,
    cancel: &CancellationToken,
) -> ClientResult<Vec<WorkPackage>> {
    let filters = project_filter(project_id);
    let mut work_packages: Vec<WorkPackage> = fetch_all(
        |offset, page_size| {
            let query = PageQuery::at_item(Some(filters.clone()), offset, page_size);
            guarded(cancel, client.fetch_page(ResourceKind::WorkPackages, query))
        },
        options,
    )
    .await?;

    let mut seen = HashSet::new();
    work_packages.retain(|wp| seen.insert(wp.id));
    Ok(work_packages)
}

pub async fn get_project_overview<C: ResourceClient>(
    client: &C,
    project_id: &ResourceId,
    options: FetchAllOptions,
    cancel: &CancellationToken,
) -> ClientResult<ProjectOverview> {
    let loaded_at = Utc::now().to_rfc3339();

    let project: Project =
        guarded(cancel, client.fetch_one(ResourceKind::Projects, project_id)).await?;
    let work_packages =
        load_project_work_packages(client, &ResourceId::from(project.id), options, cancel).await?;
    let statistics = compute_statistics(&work_packages);

    info!(
        project_id = project.id,
        work_packages = work_packages.len(),
        "built project overview"
    );

    Ok(ProjectOverview {
        total_count: work_packages.len(),
        project,
        work_packages,
        statistics,
        loaded_at,
    })
}

/// Journal entries of a work package that carry a comment.
pub async fn load_comments<C: ResourceClient>(
    client: &C,
    work_package_id: &ResourceId,
    cancel: &CancellationToken,
) -> ClientResult<Vec<Activity>> {
    let activities = fetch_all(
        |offset, page_size| {
            let query = PageQuery::at_item(None, offset, page_size);
            guarded(
                cancel,
                client.fetch_activities(work_package_id, query.page_size, query.offset),
            )
        },
        FetchAllOptions::default(),
    )
    .await?;

    Ok(activities
        .into_iter()
        .filter(Activity::has_comment)
        .collect())
}
