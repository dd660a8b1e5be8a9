//! HAL+JSON wire shapes and their conversion into domain models.

use serde::Deserialize;

use super::models::{
    Activity, Formattable, HalLink, NamedSummary, Page, Reference, Relation, RelationKind,
    StatusSummary, WorkPackage,
};

/// HAL collection envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection<T> {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(rename = "_embedded")]
    pub embedded: Elements<T>,
}

#[derive(Debug, Deserialize)]
pub struct Elements<T> {
    pub elements: Vec<T>,
}

impl<T> From<Collection<T>> for Page<T> {
    fn from(collection: Collection<T>) -> Self {
        Page {
            items: collection.embedded.elements,
            total: collection.total,
            count: collection.count,
            page_size: collection.page_size,
            offset: collection.offset,
        }
    }
}

/// Error body returned on non-success responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Work packages
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackageResource {
    pub id: u64,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: Option<Formattable>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub spent_time: Option<String>,
    #[serde(default)]
    pub percentage_done: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(rename = "_links", default)]
    pub links: WorkPackageLinks,
    #[serde(rename = "_embedded", default)]
    pub embedded: WorkPackageEmbedded,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WorkPackageLinks {
    pub project: Option<HalLink>,
    pub status: Option<HalLink>,
    #[serde(rename = "type")]
    pub work_package_type: Option<HalLink>,
    pub priority: Option<HalLink>,
    pub assignee: Option<HalLink>,
    pub author: Option<HalLink>,
    pub parent: Option<HalLink>,
    pub children: Vec<HalLink>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WorkPackageEmbedded {
    pub project: Option<NamedSummary>,
    pub status: Option<StatusSummary>,
    #[serde(rename = "type")]
    pub work_package_type: Option<NamedSummary>,
    pub priority: Option<NamedSummary>,
    pub assignee: Option<NamedSummary>,
    pub author: Option<NamedSummary>,
}

impl From<WorkPackageResource> for WorkPackage {
    fn from(wp: WorkPackageResource) -> Self {
        let WorkPackageLinks {
            project,
            status,
            work_package_type,
            priority,
            assignee,
            author,
            parent,
            children,
        } = wp.links;
        let embedded = wp.embedded;

        WorkPackage {
            id: wp.id,
            subject: wp.subject,
            description: wp
                .description
                .as_ref()
                .and_then(Formattable::text)
                .map(str::to_string),
            start_date: wp.start_date,
            due_date: wp.due_date,
            estimated_time: wp.estimated_time,
            spent_time: wp.spent_time,
            percentage_done: wp
                .percentage_done
                .map(|done| done.round().clamp(0.0, 100.0) as u32),
            created_at: wp.created_at,
            updated_at: wp.updated_at,
            project: Reference::resolve(project, embedded.project),
            status: Reference::resolve(status, embedded.status),
            work_package_type: Reference::resolve(work_package_type, embedded.work_package_type),
            priority: Reference::resolve(priority, embedded.priority),
            assignee: Reference::resolve(assignee, embedded.assignee),
            author: Reference::resolve(author, embedded.author),
            parent: Reference::resolve(parent, None),
            children: children
                .into_iter()
                .filter(|child| child.href.is_some())
                .map(Reference::from_link)
                .collect(),
        }
    }
}

// =============================================================================
// Relations
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationResource {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    #[serde(default)]
    pub reverse_type: Option<RelationKind>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "_links", default)]
    pub links: RelationLinks,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RelationLinks {
    pub from: HalLink,
    pub to: HalLink,
}

impl From<RelationResource> for Relation {
    fn from(relation: RelationResource) -> Self {
        Relation {
            id: relation.id,
            kind: relation.kind,
            reverse_kind: relation.reverse_type,
            description: relation.description,
            from: Reference::from_link(relation.links.from),
            to: Reference::from_link(relation.links.to),
        }
    }
}

// =============================================================================
// Activities
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResource {
    pub id: u64,
    #[serde(default)]
    pub comment: Option<Formattable>,
    #[serde(default)]
    pub details: Vec<Formattable>,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(rename = "_links", default)]
    pub links: ActivityLinks,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActivityLinks {
    pub user: Option<HalLink>,
}

impl From<ActivityResource> for Activity {
    fn from(activity: ActivityResource) -> Self {
        Activity {
            id: activity.id,
            comment: activity
                .comment
                .as_ref()
                .and_then(Formattable::text)
                .map(str::to_string),
            details: activity
                .details
                .iter()
                .filter_map(Formattable::text)
                .map(str::to_string)
                .collect(),
            version: activity.version,
            created_at: activity.created_at,
            user: activity
                .links
                .user
                .and_then(|user| Reference::resolve(Some(user), None)),
        }
    }
}
