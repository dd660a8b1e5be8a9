//! Parent/child tree around a work package.
//!
//! The builder walks up the parent chain, then descends level by level. Nodes
//! live in a flat arena with a parallel parent index until the walk is done;
//! the owned tree is assembled afterwards in reverse arena order, so no step
//! recurses.

use std::collections::HashSet;

use futures_util::future::{try_join, try_join_all};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{ClientResult, Relation, ResourceClient, ResourceId, ResourceKind, WorkPackage};

use super::guarded;

pub const DEFAULT_MAX_DEPTH: usize = 10;

/// One work package in the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub work_package: WorkPackage,
    /// Distance from the root of the descent (root = 0).
    pub depth: usize,
    /// Absent at the root of the descent.
    pub parent_id: Option<u64>,
    pub relations: Vec<Relation>,
    pub children: Vec<HierarchyNode>,
    /// Descent stopped at the depth limit although the item has children.
    pub truncated: bool,
}

/// A descent tree together with the chain of ancestors above its root.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hierarchy {
    pub root: HierarchyNode,
    /// Nearest parent first.
    pub ancestors: Vec<WorkPackage>,
}

impl Hierarchy {
    /// Number of nodes in the descent tree, root included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Build the hierarchy of `root_id`, descending at most `max_depth` levels.
///
/// An identifier is entered at most once: children that point back at an
/// ancestor or at a node already in the tree are skipped. A work package
/// reachable from two parents is attached only under the first parent
/// reached. Fails as a whole on the first fetch error.
pub async fn build_hierarchy<C: ResourceClient>(
    client: &C,
    root_id: &ResourceId,
    max_depth: usize,
    cancel: &CancellationToken,
) -> ClientResult<Hierarchy> {
    let (root, root_relations) = try_join(
        guarded(
            cancel,
            client.fetch_one::<WorkPackage>(ResourceKind::WorkPackages, root_id),
        ),
        guarded(cancel, client.fetch_relations(root_id)),
    )
    .await?;

    let mut seen: HashSet<u64> = HashSet::from([root.id]);

    let mut ancestors = Vec::new();
    let mut next_parent = root.parent_id();
    while let Some(parent_id) = next_parent {
        if !seen.insert(parent_id) {
            debug!(parent_id, "parent chain loops back, stopping ascent");
            break;
        }
        let parent: WorkPackage = guarded(
            cancel,
            client.fetch_one(ResourceKind::WorkPackages, &ResourceId::from(parent_id)),
        )
        .await?;
        next_parent = parent.parent_id();
        ancestors.push(parent);
    }

    let mut nodes = vec![HierarchyNode {
        work_package: root,
        depth: 0,
        parent_id: None,
        relations: root_relations,
        children: Vec::new(),
        truncated: false,
    }];
    // parents[i] is the arena index of the parent of nodes[i]; unused for 0.
    let mut parents: Vec<usize> = vec![0];
    let mut frontier: Vec<usize> = vec![0];

    while !frontier.is_empty() {
        let mut requests: Vec<(usize, u64)> = Vec::new();
        for &index in &frontier {
            let node = &mut nodes[index];
            let child_ids = node.work_package.child_ids();
            if node.depth >= max_depth {
                node.truncated = !child_ids.is_empty();
                continue;
            }
            for child_id in child_ids {
                if seen.insert(child_id) {
                    requests.push((index, child_id));
                }
            }
        }
        if requests.is_empty() {
            break;
        }

        debug!(
            depth = nodes[requests[0].0].depth + 1,
            count = requests.len(),
            "fetching hierarchy level"
        );

        let fetched = try_join_all(requests.iter().map(|&(_, child_id)| async move {
            let id = ResourceId::from(child_id);
            try_join(
                guarded(
                    cancel,
                    client.fetch_one::<WorkPackage>(ResourceKind::WorkPackages, &id),
                ),
                guarded(cancel, client.fetch_relations(&id)),
            )
            .await
        }))
        .await?;

        frontier = Vec::with_capacity(fetched.len());
        for ((parent, _), (work_package, relations)) in requests.into_iter().zip(fetched) {
            let parent_node = &nodes[parent];
            let child = HierarchyNode {
                depth: parent_node.depth + 1,
                parent_id: Some(parent_node.work_package.id),
                work_package,
                relations,
                children: Vec::new(),
                truncated: false,
            };
            nodes.push(child);
            parents.push(parent);
            frontier.push(nodes.len() - 1);
        }
    }

    Ok(Hierarchy {
        root: assemble(nodes, &parents),
        ancestors,
    })
}

/// Move every node into its parent, deepest arena entries first.
///
/// Children always sit after their parent in the arena, so by the time a
/// node is removed all of its children have been attached to it (in reverse).
fn assemble(mut nodes: Vec<HierarchyNode>, parents: &[usize]) -> HierarchyNode {
    for index in (1..nodes.len()).rev() {
        let mut node = nodes.swap_remove(index);
        node.children.reverse();
        nodes[parents[index]].children.push(node);
    }
    let mut root = nodes.swap_remove(0);
    root.children.reverse();
    root
}
