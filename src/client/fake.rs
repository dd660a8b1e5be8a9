//! In-memory [`ResourceClient`] over HAL JSON fixtures, for tests.
//!
//! Entities are stored exactly as the API would return them, so the same
//! deserialisation path runs as in production. Every call is recorded.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::{
    Activity, ClientError, ClientResult, Page, PageQuery, Relation, ResourceClient, ResourceId,
    ResourceKind,
};

/// A recorded client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Page(ResourceKind, PageQuery),
    One(ResourceKind, String),
    Relations(String),
    Activities(String, usize, usize),
    Create(ResourceKind),
    Update(ResourceKind, String),
    Delete(ResourceKind, String),
}

#[derive(Default)]
pub(crate) struct FakeClient {
    entities: HashMap<ResourceKind, Vec<Value>>,
    relations: HashMap<u64, Vec<Value>>,
    activities: HashMap<u64, Vec<Value>>,
    failing: HashSet<(ResourceKind, String)>,
    calls: Mutex<Vec<Call>>,
    writes: Mutex<Vec<Value>>,
}

fn id_of(value: &Value) -> String {
    match &value["id"] {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

fn matches_id(value: &Value, id: &ResourceId) -> bool {
    let wanted = id.to_string();
    id_of(value) == wanted || value["identifier"].as_str() == Some(wanted.as_str())
}

/// Project ids named by a `project` clause in a filter expression.
fn project_filter(filters: Option<&str>) -> Option<Vec<String>> {
    let clauses: Vec<Value> = serde_json::from_str(filters?).ok()?;
    clauses.iter().find_map(|clause| {
        let values = clause["project"]["values"].as_array()?;
        Some(
            values
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| v.to_string())
                })
                .collect(),
        )
    })
}

impl FakeClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, kind: ResourceKind, value: Value) -> Self {
        self.entities.entry(kind).or_default().push(value);
        self
    }

    pub(crate) fn with_work_package(self, value: Value) -> Self {
        self.with(ResourceKind::WorkPackages, value)
    }

    /// Register `from <kind> to`. Both ends see the relation.
    pub(crate) fn with_relation(mut self, from: u64, to: u64, kind: &str) -> Self {
        let relation = relation(from, to, kind);
        self.relations
            .entry(from)
            .or_default()
            .push(relation.clone());
        if from != to {
            self.relations.entry(to).or_default().push(relation);
        }
        self
    }

    pub(crate) fn with_activity(mut self, work_package_id: u64, value: Value) -> Self {
        self.activities
            .entry(work_package_id)
            .or_default()
            .push(value);
        self
    }

    /// Make every fetch of this entity fail with a 500.
    pub(crate) fn failing(mut self, kind: ResourceKind, id: impl ToString) -> Self {
        self.failing.insert((kind, id.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn writes(&self) -> Vec<Value> {
        self.writes.lock().unwrap().clone()
    }

    pub(crate) fn count_calls(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| predicate(c))
            .count()
    }

    /// Number of single-entity fetches of `id`.
    pub(crate) fn fetches_of(&self, kind: ResourceKind, id: u64) -> usize {
        let wanted = Call::One(kind, id.to_string());
        self.count_calls(|call| *call == wanted)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failing(&self, kind: ResourceKind, id: &str) -> ClientResult<()> {
        if self.failing.contains(&(kind, id.to_string())) {
            return Err(ClientError::Remote {
                status: 500,
                message: format!("Injected failure for {kind} {id}"),
            });
        }
        Ok(())
    }

    fn find(&self, kind: ResourceKind, id: &ResourceId) -> ClientResult<Value> {
        self.check_failing(kind, &id.to_string())?;
        self.entities
            .get(&kind)
            .and_then(|values| values.iter().find(|v| matches_id(v, id)))
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                kind,
                id: id.to_string(),
            })
    }

    fn collection(items: Vec<Value>, total: usize, page_size: usize, offset: usize) -> Value {
        json!({
            "_type": "Collection",
            "total": total,
            "count": items.len(),
            "pageSize": page_size,
            "offset": offset,
            "_embedded": { "elements": items },
        })
    }
}

impl ResourceClient for FakeClient {
    async fn fetch_page<T: DeserializeOwned + Send>(
        &self,
        kind: ResourceKind,
        query: PageQuery,
    ) -> ClientResult<Page<T>> {
        self.record(Call::Page(kind, query.clone()));
        tokio::task::yield_now().await;

        let mut all: Vec<Value> = self.entities.get(&kind).cloned().unwrap_or_default();
        if let Some(projects) = project_filter(query.filters.as_deref()) {
            all.retain(|value| {
                let href = value["_links"]["project"]["href"].as_str().unwrap_or("");
                projects
                    .iter()
                    .any(|project| href.ends_with(&format!("/{project}")))
            });
        }
        all.sort_by_key(|value| value["id"].as_u64().unwrap_or(u64::MAX));

        let total = all.len();
        let start = (query.offset.max(1) - 1) * query.page_size;
        let items: Vec<Value> = all
            .into_iter()
            .skip(start)
            .take(query.page_size)
            .collect();

        let collection = Self::collection(items, total, query.page_size, query.offset);
        Ok(serde_json::from_value(collection)?)
    }

    async fn fetch_one<T: DeserializeOwned + Send>(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> ClientResult<T> {
        self.record(Call::One(kind, id.to_string()));
        tokio::task::yield_now().await;
        Ok(serde_json::from_value(self.find(kind, id)?)?)
    }

    async fn fetch_relations(&self, work_package_id: &ResourceId) -> ClientResult<Vec<Relation>> {
        self.record(Call::Relations(work_package_id.to_string()));
        tokio::task::yield_now().await;

        self.find(ResourceKind::WorkPackages, work_package_id)?;
        let relations = work_package_id
            .as_number()
            .and_then(|id| self.relations.get(&id))
            .cloned()
            .unwrap_or_default();
        Ok(serde_json::from_value(Value::Array(relations))?)
    }

    async fn fetch_activities(
        &self,
        work_package_id: &ResourceId,
        page_size: usize,
        offset: usize,
    ) -> ClientResult<Page<Activity>> {
        self.record(Call::Activities(
            work_package_id.to_string(),
            page_size,
            offset,
        ));
        tokio::task::yield_now().await;

        self.find(ResourceKind::WorkPackages, work_package_id)?;
        let all = work_package_id
            .as_number()
            .and_then(|id| self.activities.get(&id))
            .cloned()
            .unwrap_or_default();
        let total = all.len();
        let items = all
            .into_iter()
            .skip((offset.max(1) - 1) * page_size)
            .take(page_size)
            .collect();
        let collection = Self::collection(items, total, page_size, offset);
        Ok(serde_json::from_value(collection)?)
    }

    async fn create(&self, kind: ResourceKind, payload: Value) -> ClientResult<Value> {
        self.record(Call::Create(kind));
        self.writes.lock().unwrap().push(payload.clone());

        let mut created = payload;
        created["id"] = json!(1000);
        Ok(created)
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        payload: Value,
    ) -> ClientResult<Value> {
        self.record(Call::Update(kind, id.to_string()));
        let mut current = self.find(kind, id)?;
        self.writes.lock().unwrap().push(payload.clone());

        if let (Some(target), Some(patch)) = (current.as_object_mut(), payload.as_object()) {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(current)
    }

    async fn delete(&self, kind: ResourceKind, id: &ResourceId) -> ClientResult<()> {
        self.record(Call::Delete(kind, id.to_string()));
        self.find(kind, id).map(|_| ())
    }
}

// =============================================================================
// Fixture builders
// =============================================================================

/// Builder for a HAL work package.
pub(crate) struct WorkPackageFixture {
    value: Value,
}

pub(crate) fn work_package(id: u64) -> WorkPackageFixture {
    WorkPackageFixture {
        value: json!({
            "_type": "WorkPackage",
            "id": id,
            "subject": format!("Work package {id}"),
            "lockVersion": 0,
            "_links": {
                "self": { "href": format!("/api/v3/work_packages/{id}") },
                "parent": { "href": null },
            },
            "_embedded": {},
        }),
    }
}

impl WorkPackageFixture {
    pub(crate) fn subject(mut self, subject: &str) -> Self {
        self.value["subject"] = json!(subject);
        self
    }

    pub(crate) fn status(mut self, name: &str, is_closed: bool) -> Self {
        self.value["_links"]["status"] = json!({ "href": "/api/v3/statuses/1", "title": name });
        self.value["_embedded"]["status"] =
            json!({ "_type": "Status", "id": 1, "name": name, "isClosed": is_closed });
        self
    }

    pub(crate) fn type_name(mut self, name: &str) -> Self {
        self.value["_links"]["type"] = json!({ "href": "/api/v3/types/1", "title": name });
        self.value["_embedded"]["type"] = json!({ "_type": "Type", "id": 1, "name": name });
        self
    }

    pub(crate) fn assignee(mut self, name: &str) -> Self {
        self.value["_links"]["assignee"] = json!({ "href": "/api/v3/users/9", "title": name });
        self.value["_embedded"]["assignee"] = json!({ "_type": "User", "id": 9, "name": name });
        self
    }

    pub(crate) fn due(mut self, date: &str) -> Self {
        self.value["dueDate"] = json!(date);
        self
    }

    pub(crate) fn done(mut self, percentage: u32) -> Self {
        self.value["percentageDone"] = json!(percentage);
        self
    }

    pub(crate) fn project(mut self, project_id: u64) -> Self {
        self.value["_links"]["project"] =
            json!({ "href": format!("/api/v3/projects/{project_id}") });
        self
    }

    pub(crate) fn parent(mut self, parent_id: u64) -> Self {
        self.value["_links"]["parent"] =
            json!({ "href": format!("/api/v3/work_packages/{parent_id}") });
        self
    }

    pub(crate) fn children(mut self, ids: &[u64]) -> Self {
        let links: Vec<Value> = ids
            .iter()
            .map(|id| format!("/api/v3/work_packages/{id}"))
            .map(|href| json!({ "href": href }))
            .collect();
        self.value["_links"]["children"] = Value::Array(links);
        self
    }

    pub(crate) fn build(self) -> Value {
        self.value
    }
}

pub(crate) fn relation(from: u64, to: u64, kind: &str) -> Value {
    json!({
        "_type": "Relation",
        "id": from * 1000 + to,
        "name": kind,
        "type": kind,
        "_links": {
            "from": { "href": format!("/api/v3/work_packages/{from}") },
            "to": { "href": format!("/api/v3/work_packages/{to}") },
        },
    })
}

pub(crate) fn activity(id: u64, comment: Option<&str>) -> Value {
    json!({
        "_type": "Activity::Comment",
        "id": id,
        "version": id,
        "comment": { "format": "markdown", "raw": comment.unwrap_or("") },
        "details": [],
        "_links": { "user": { "href": "/api/v3/users/9", "title": "Alice" } },
    })
}

pub(crate) fn project(id: u64, identifier: &str, name: &str) -> Value {
    json!({
        "_type": "Project",
        "id": id,
        "identifier": identifier,
        "name": name,
        "active": true,
        "public": false,
        "_links": { "self": { "href": format!("/api/v3/projects/{id}") } },
    })
}
