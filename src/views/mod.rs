//! Derived views over the OpenProject API.
//!
//! # Architecture
//!
//! - `paginator`: sequential "fetch every page" driver
//! - `statistics`: pure aggregation over work packages
//! - `hierarchy`: parent chain plus bounded, cycle-safe descent
//! - `blockers`: transitive walk over blocking relations
//! - `project`: project-scoped composites built on the above
//!
//! Every remote call is raced against a [`CancellationToken`]; a fired token
//! surfaces as [`ClientError::Cancelled`].

mod blockers;
mod hierarchy;
mod paginator;
mod project;
mod statistics;

#[cfg(test)]
mod paginator_test;

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::client::{ClientError, ClientResult};

pub use blockers::find_all_blockers;
pub use hierarchy::{DEFAULT_MAX_DEPTH, Hierarchy, HierarchyNode, build_hierarchy};
pub use paginator::{FetchAllOptions, MAX_PAGES, fetch_all};
pub use project::{
    ProjectOverview, get_project_overview, load_comments, load_project_work_packages,
    project_filter,
};
pub use statistics::{Statistics, compute_statistics, compute_statistics_on};

/// Run `fut` unless `cancel` fires first.
pub(crate) async fn guarded<T, F>(cancel: &CancellationToken, fut: F) -> ClientResult<T>
where
    F: Future<Output = ClientResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        result = fut => result,
    }
}
