//! Transitive blockers of a work package.

use std::collections::HashSet;

use futures_util::future::try_join_all;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{
    ClientError, ClientResult, ResourceClient, ResourceId, ResourceKind, WorkPackage,
};

use super::guarded;

/// Every work package that blocks `target_id` directly or through a chain of
/// blocking relations, sorted by id. The target itself is never included.
///
/// The target is fetched first, so a missing target is a `NotFound`.
pub async fn find_all_blockers<C: ResourceClient>(
    client: &C,
    target_id: &ResourceId,
    cancel: &CancellationToken,
) -> ClientResult<Vec<WorkPackage>> {
    let target: WorkPackage = guarded(
        cancel,
        client.fetch_one(ResourceKind::WorkPackages, target_id),
    )
    .await?;

    let mut visited: HashSet<u64> = HashSet::from([target.id]);
    let mut frontier = vec![target.id];
    let mut blocker_ids: Vec<u64> = Vec::new();

    while !frontier.is_empty() {
        debug!(size = frontier.len(), "expanding blocker frontier");

        let expanded = try_join_all(frontier.iter().map(|&id| async move {
            let relations = guarded(cancel, client.fetch_relations(&ResourceId::from(id))).await?;
            Ok::<_, ClientError>((id, relations))
        }))
        .await?;

        let mut next = Vec::new();
        for (id, relations) in expanded {
            for relation in relations {
                if let Some(blocker) = relation.blocker_of(id)
                    && visited.insert(blocker)
                {
                    next.push(blocker);
                }
            }
        }
        blocker_ids.extend_from_slice(&next);
        frontier = next;
    }

    let mut blockers = try_join_all(blocker_ids.into_iter().map(|id| async move {
        guarded(
            cancel,
            client.fetch_one::<WorkPackage>(ResourceKind::WorkPackages, &ResourceId::from(id)),
        )
        .await
    }))
    .await?;
    blockers.sort_by_key(|work_package| work_package.id);
    Ok(blockers)
}
