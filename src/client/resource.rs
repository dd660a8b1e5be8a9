//! Resource client trait for OpenProject data access.
//!
//! The derived views only ever reach the remote system through this trait,
//! so tests can swap in an in-memory implementation.

use std::fmt;
use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Activity, ClientResult, Page, Relation, ResourceId};

/// Hard maximum page size accepted by the OpenProject API.
pub const MAX_PAGE_SIZE: usize = 100;

/// Collections exposed by the OpenProject API that the bridge reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Projects,
    WorkPackages,
    Users,
    TimeEntries,
    Types,
    Statuses,
    TimeEntryActivities,
}

impl ResourceKind {
    /// Path segment below `/api/v3`.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Projects => "projects",
            ResourceKind::WorkPackages => "work_packages",
            ResourceKind::Users => "users",
            ResourceKind::TimeEntries => "time_entries",
            ResourceKind::Types => "types",
            ResourceKind::Statuses => "statuses",
            ResourceKind::TimeEntryActivities => "time_entries/activities",
        }
    }

    /// Human readable entity name for messages.
    pub fn entity_name(self) -> &'static str {
        match self {
            ResourceKind::Projects => "Project",
            ResourceKind::WorkPackages => "Work package",
            ResourceKind::Users => "User",
            ResourceKind::TimeEntries => "Time entry",
            ResourceKind::Types => "Work package type",
            ResourceKind::Statuses => "Work package status",
            ResourceKind::TimeEntryActivities => "Time entry activity",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Query for one page of a collection.
///
/// `offset` follows the remote convention: it is the 1-indexed page number.
/// `filters` is an opaque JSON filter expression forwarded unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub filters: Option<String>,
    pub page_size: usize,
    pub offset: usize,
}

impl PageQuery {
    /// Build a query for the page containing the 1-indexed item `offset`.
    pub fn at_item(filters: Option<String>, offset: usize, page_size: usize) -> Self {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        Self {
            filters,
            page_size,
            offset: offset.saturating_sub(1) / page_size + 1,
        }
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            filters: None,
            page_size: 20,
            offset: 1,
        }
    }
}

/// Narrow interface to the remote project-management API.
///
/// Reads are typed through `DeserializeOwned` so callers decide whether they
/// want a domain model or raw JSON. Writes are plain passthrough.
pub trait ResourceClient: Send + Sync {
    /// Fetch one page of a collection.
    fn fetch_page<T: DeserializeOwned + Send>(
        &self,
        kind: ResourceKind,
        query: PageQuery,
    ) -> impl Future<Output = ClientResult<Page<T>>> + Send;

    /// Fetch a single entity by identifier.
    fn fetch_one<T: DeserializeOwned + Send>(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> impl Future<Output = ClientResult<T>> + Send;

    /// Fetch every relation touching a work package.
    fn fetch_relations(
        &self,
        work_package_id: &ResourceId,
    ) -> impl Future<Output = ClientResult<Vec<Relation>>> + Send;

    /// Fetch one page of a work package's activity journal.
    fn fetch_activities(
        &self,
        work_package_id: &ResourceId,
        page_size: usize,
        offset: usize,
    ) -> impl Future<Output = ClientResult<Page<Activity>>> + Send;

    /// Create an entity from a HAL payload.
    fn create(
        &self,
        kind: ResourceKind,
        payload: Value,
    ) -> impl Future<Output = ClientResult<Value>> + Send;

    /// Patch an entity with a HAL payload.
    fn update(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        payload: Value,
    ) -> impl Future<Output = ClientResult<Value>> + Send;

    /// Delete an entity.
    fn delete(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> impl Future<Output = ClientResult<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_maps_item_offset_to_page_number() {
        assert_eq!(PageQuery::at_item(None, 1, 100).offset, 1);
        assert_eq!(PageQuery::at_item(None, 101, 100).offset, 2);
        assert_eq!(PageQuery::at_item(None, 201, 100).offset, 3);
        assert_eq!(PageQuery::at_item(None, 11, 10).offset, 2);
    }

    #[test]
    fn test_page_query_clamps_page_size() {
        let query = PageQuery::at_item(None, 1, 500);
        assert_eq!(query.page_size, MAX_PAGE_SIZE);

        let query = PageQuery::at_item(None, 1, 0);
        assert_eq!(query.page_size, 1);
    }

    #[test]
    fn test_kind_paths() {
        assert_eq!(ResourceKind::WorkPackages.path(), "work_packages");
        assert_eq!(
            ResourceKind::TimeEntryActivities.path(),
            "time_entries/activities"
        );
        assert_eq!(ResourceKind::Statuses.to_string(), "statuses");
    }
}
