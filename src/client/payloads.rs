//! HAL request bodies for write operations.
//!
//! OpenProject expects relationships as `_links` with API hrefs and long text
//! as markdown formattables. These builders produce exactly that and nothing
//! else; the remote does all validation.

use serde_json::{Map, Value, json};

use super::ResourceKind;

/// `/api/v3/{kind}/{id}` href for a link.
pub fn api_href(kind: ResourceKind, id: impl std::fmt::Display) -> String {
    format!("/api/v3/{}/{}", kind.path(), id)
}

fn link(kind: ResourceKind, id: impl std::fmt::Display) -> Value {
    json!({ "href": api_href(kind, id) })
}

fn markdown(raw: &str) -> Value {
    json!({ "format": "markdown", "raw": raw })
}

/// New project.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub identifier: String,
    pub description: Option<String>,
    pub public: Option<bool>,
    pub parent_id: Option<u64>,
}

impl NewProject {
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("name".into(), json!(self.name));
        payload.insert("identifier".into(), json!(self.identifier));
        payload.insert("public".into(), json!(self.public.unwrap_or(false)));

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            payload.insert("description".into(), markdown(description));
        }
        if let Some(parent_id) = self.parent_id {
            payload.insert(
                "_links".into(),
                json!({ "parent": link(ResourceKind::Projects, parent_id) }),
            );
        }

        Value::Object(payload)
    }
}

/// Partial project update. Only set fields are sent.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub public: Option<bool>,
    pub active: Option<bool>,
}

impl ProjectPatch {
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        if let Some(name) = &self.name {
            payload.insert("name".into(), json!(name));
        }
        if let Some(public) = self.public {
            payload.insert("public".into(), json!(public));
        }
        if let Some(active) = self.active {
            payload.insert("active".into(), json!(active));
        }
        if let Some(description) = &self.description {
            payload.insert("description".into(), markdown(description));
        }
        Value::Object(payload)
    }
}

/// New work package.
#[derive(Debug, Clone, Default)]
pub struct NewWorkPackage {
    pub subject: String,
    pub project_id: u64,
    pub type_id: Option<u64>,
    pub description: Option<String>,
    pub assignee_id: Option<u64>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
}

impl NewWorkPackage {
    pub fn to_payload(&self) -> Value {
        let mut links = Map::new();
        links.insert(
            "project".into(),
            link(ResourceKind::Projects, self.project_id),
        );
        if let Some(type_id) = self.type_id {
            links.insert("type".into(), link(ResourceKind::Types, type_id));
        }
        if let Some(assignee_id) = self.assignee_id {
            links.insert("assignee".into(), link(ResourceKind::Users, assignee_id));
        }

        let mut payload = Map::new();
        payload.insert("subject".into(), json!(self.subject));
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            payload.insert("description".into(), markdown(description));
        }
        if let Some(start_date) = &self.start_date {
            payload.insert("startDate".into(), json!(start_date));
        }
        if let Some(due_date) = &self.due_date {
            payload.insert("dueDate".into(), json!(due_date));
        }
        payload.insert("_links".into(), Value::Object(links));

        Value::Object(payload)
    }
}

/// Partial work package update. Only set fields are sent.
#[derive(Debug, Clone, Default)]
pub struct WorkPackagePatch {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub assignee_id: Option<u64>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub status_id: Option<u64>,
    pub percentage_done: Option<u32>,
    /// Optimistic locking version; OpenProject rejects patches without it.
    pub lock_version: Option<u64>,
}

impl WorkPackagePatch {
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        if let Some(lock_version) = self.lock_version {
            payload.insert("lockVersion".into(), json!(lock_version));
        }
        if let Some(subject) = &self.subject {
            payload.insert("subject".into(), json!(subject));
        }
        if let Some(start_date) = &self.start_date {
            payload.insert("startDate".into(), json!(start_date));
        }
        if let Some(due_date) = &self.due_date {
            payload.insert("dueDate".into(), json!(due_date));
        }
        if let Some(percentage_done) = self.percentage_done {
            payload.insert("percentageDone".into(), json!(percentage_done.min(100)));
        }
        if let Some(description) = &self.description {
            payload.insert("description".into(), markdown(description));
        }

        let mut links = Map::new();
        if let Some(assignee_id) = self.assignee_id {
            links.insert("assignee".into(), link(ResourceKind::Users, assignee_id));
        }
        if let Some(status_id) = self.status_id {
            links.insert("status".into(), link(ResourceKind::Statuses, status_id));
        }
        if !links.is_empty() {
            payload.insert("_links".into(), Value::Object(links));
        }

        Value::Object(payload)
    }
}

/// New time entry.
#[derive(Debug, Clone, Default)]
pub struct NewTimeEntry {
    pub work_package_id: u64,
    pub hours: f64,
    pub spent_on: String,
    pub activity_id: Option<u64>,
    pub comment: Option<String>,
}

impl NewTimeEntry {
    pub fn to_payload(&self) -> Value {
        let mut links = Map::new();
        links.insert(
            "workPackage".into(),
            link(ResourceKind::WorkPackages, self.work_package_id),
        );
        if let Some(activity_id) = self.activity_id {
            links.insert(
                "activity".into(),
                link(ResourceKind::TimeEntryActivities, activity_id),
            );
        }

        let mut payload = Map::new();
        payload.insert("hours".into(), json!(format!("PT{}H", self.hours)));
        payload.insert("spentOn".into(), json!(self.spent_on));
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            payload.insert("comment".into(), markdown(comment));
        }
        payload.insert("_links".into(), Value::Object(links));

        Value::Object(payload)
    }
}
