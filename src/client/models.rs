//! Domain models for OpenProject resources.
//!
//! The API speaks HAL: relationships arrive as `_links` entries that may or
//! may not have a matching `_embedded` object. Here every relationship is a
//! [`Reference`]: an identifier, the link title and an optional pre-fetched
//! summary. Nothing downstream may assume the summary is populated.

use std::fmt;

use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};

use super::hal;

// =============================================================================
// Identifiers and links
// =============================================================================

/// Identifier accepted from callers: numeric id or textual identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ResourceId {
    Number(u64),
    Text(String),
}

impl ResourceId {
    /// Numeric form, if the identifier is (or spells) a number.
    pub fn as_number(&self) -> Option<u64> {
        match self {
            ResourceId::Number(n) => Some(*n),
            ResourceId::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        ResourceId::Number(id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        ResourceId::Text(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        ResourceId::Text(id)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{n}"),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

/// A HAL link. `href` is null for unset relationships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalLink {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl HalLink {
    /// Numeric id from the last path segment of `href`.
    pub fn id(&self) -> Option<u64> {
        self.href
            .as_deref()?
            .trim_end_matches('/')
            .rsplit('/')
            .next()?
            .parse()
            .ok()
    }
}

/// Pre-fetched summary of a linked entity.
pub trait Summary {
    fn summary_id(&self) -> Option<u64>;
    fn summary_name(&self) -> &str;
}

/// Explicit optional reference to another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference<S> {
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<S>,
}

impl<S: Summary> Reference<S> {
    /// Merge a link and its embedded object. Returns `None` when neither
    /// carries anything.
    pub fn resolve(link: Option<HalLink>, summary: Option<S>) -> Option<Self> {
        let link = link.unwrap_or_default();
        let id = link
            .id()
            .or_else(|| summary.as_ref().and_then(Summary::summary_id));
        if id.is_none() && link.title.is_none() && summary.is_none() {
            return None;
        }
        Some(Self {
            id,
            title: link.title,
            summary,
        })
    }

    /// Display name: embedded summary name, then link title.
    pub fn display_name(&self) -> Option<&str> {
        self.summary
            .as_ref()
            .map(Summary::summary_name)
            .filter(|name| !name.is_empty())
            .or(self.title.as_deref().filter(|title| !title.is_empty()))
    }
}

impl<S> Reference<S> {
    /// Reference built from a bare link, without summary.
    pub fn from_link(link: HalLink) -> Self {
        Self {
            id: link.id(),
            title: link.title,
            summary: None,
        }
    }
}

/// Summary of a status; carries the closed flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_closed: bool,
}

impl Summary for StatusSummary {
    fn summary_id(&self) -> Option<u64> {
        self.id
    }

    fn summary_name(&self) -> &str {
        &self.name
    }
}

/// Summary of any named entity (type, user, project).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSummary {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
}

impl Summary for NamedSummary {
    fn summary_id(&self) -> Option<u64> {
        self.id
    }

    fn summary_name(&self) -> &str {
        &self.name
    }
}

/// Formattable text (`{format, raw, html}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formattable {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl Formattable {
    /// Raw text, if non-blank.
    pub fn text(&self) -> Option<&str> {
        self.raw.as_deref().filter(|raw| !raw.trim().is_empty())
    }
}

// =============================================================================
// Pages
// =============================================================================

/// One slice of a collection, with the server-reported total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    from = "hal::Collection<T>",
    bound(deserialize = "T: serde::de::DeserializeOwned")
)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub count: usize,
    pub page_size: Option<usize>,
    pub offset: Option<usize>,
}

impl<T> Page<T> {
    /// Page built from items, with `count` derived.
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self {
            count: items.len(),
            items,
            total,
            page_size: None,
            offset: None,
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<Formattable>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A work package snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "hal::WorkPackageResource")]
pub struct WorkPackage {
    pub id: u64,
    pub subject: String,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub estimated_time: Option<String>,
    pub spent_time: Option<String>,
    pub percentage_done: Option<u32>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub project: Option<Reference<NamedSummary>>,
    pub status: Option<Reference<StatusSummary>>,
    #[serde(rename = "type")]
    pub work_package_type: Option<Reference<NamedSummary>>,
    pub priority: Option<Reference<NamedSummary>>,
    pub assignee: Option<Reference<NamedSummary>>,
    pub author: Option<Reference<NamedSummary>>,
    pub parent: Option<Reference<NamedSummary>>,
    pub children: Vec<Reference<NamedSummary>>,
}

impl WorkPackage {
    pub fn parent_id(&self) -> Option<u64> {
        self.parent.as_ref().and_then(|parent| parent.id)
    }

    /// Ids of the direct children, in link order.
    pub fn child_ids(&self) -> Vec<u64> {
        self.children.iter().filter_map(|child| child.id).collect()
    }

    /// Closed according to the embedded status. Unknown status is open.
    pub fn is_closed(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|status| status.summary.as_ref())
            .is_some_and(|summary| summary.is_closed)
    }
}

/// Relation types known to OpenProject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Relates,
    Duplicates,
    Duplicated,
    Blocks,
    Blocked,
    Precedes,
    Follows,
    Includes,
    PartOf,
    Requires,
    Required,
    Parent,
    Children,
    #[serde(other)]
    Unknown,
}

/// A directed, typed edge between two work packages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "hal::RelationResource")]
pub struct Relation {
    pub id: Option<u64>,
    pub kind: RelationKind,
    pub reverse_kind: Option<RelationKind>,
    pub description: Option<String>,
    pub from: Reference<NamedSummary>,
    pub to: Reference<NamedSummary>,
}

impl Relation {
    /// The work package that blocks `target` through this edge, if any.
    pub fn blocker_of(&self, target: u64) -> Option<u64> {
        match self.kind {
            RelationKind::Blocks if self.to.id == Some(target) => self.from.id,
            RelationKind::Blocked if self.from.id == Some(target) => self.to.id,
            _ => None,
        }
    }

    /// The end of this edge that is not `id`.
    pub fn other_end(&self, id: u64) -> Option<u64> {
        if self.from.id == Some(id) {
            self.to.id
        } else if self.to.id == Some(id) {
            self.from.id
        } else {
            None
        }
    }
}

/// A journal entry of a work package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "hal::ActivityResource")]
pub struct Activity {
    pub id: u64,
    pub comment: Option<String>,
    pub details: Vec<String>,
    pub version: Option<u32>,
    pub created_at: Option<String>,
    pub user: Option<Reference<NamedSummary>>,
}

impl Activity {
    pub fn has_comment(&self) -> bool {
        self.comment.is_some()
    }
}
