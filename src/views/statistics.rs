//! Aggregate counts over a work package collection.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::client::WorkPackage;

const UNKNOWN: &str = "Unknown";
const UNASSIGNED: &str = "Unassigned";

/// Summary of a set of work packages. Maps are ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_work_packages: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub by_assignee: BTreeMap<String, usize>,
    /// Mean of `percentageDone` (missing counts as 0), rounded half-up.
    pub completion_percentage: u32,
    pub overdue_count: usize,
    pub unassigned_count: usize,
}

/// Compute statistics relative to today's UTC date.
pub fn compute_statistics(items: &[WorkPackage]) -> Statistics {
    compute_statistics_on(items, Utc::now().date_naive())
}

/// Compute statistics relative to `today`.
pub fn compute_statistics_on(items: &[WorkPackage], today: NaiveDate) -> Statistics {
    let mut stats = Statistics {
        total_work_packages: items.len(),
        ..Statistics::default()
    };
    let mut percentage_sum: u64 = 0;

    for item in items {
        let status = item
            .status
            .as_ref()
            .and_then(|s| s.display_name())
            .unwrap_or(UNKNOWN);
        *stats.by_status.entry(status.to_string()).or_default() += 1;

        let kind = item
            .work_package_type
            .as_ref()
            .and_then(|t| t.display_name())
            .unwrap_or(UNKNOWN);
        *stats.by_type.entry(kind.to_string()).or_default() += 1;

        // Only a missing assignee counts as unassigned; a nameless one just
        // falls back to the sentinel key.
        let assignee = match &item.assignee {
            Some(assignee) => assignee.display_name().unwrap_or(UNASSIGNED),
            None => {
                stats.unassigned_count += 1;
                UNASSIGNED
            }
        };
        *stats.by_assignee.entry(assignee.to_string()).or_default() += 1;

        percentage_sum += u64::from(item.percentage_done.unwrap_or(0));

        if is_overdue(item, today) {
            stats.overdue_count += 1;
        }
    }

    stats.completion_percentage = round_half_up(percentage_sum, items.len() as u64);
    stats
}

fn is_overdue(item: &WorkPackage, today: NaiveDate) -> bool {
    if item.is_closed() {
        return false;
    }
    item.due_date
        .as_deref()
        .and_then(|due| NaiveDate::parse_from_str(due.trim(), "%Y-%m-%d").ok())
        .is_some_and(|due| due < today)
}

/// `sum / count` rounded to the nearest integer, ties away from zero.
fn round_half_up(sum: u64, count: u64) -> u32 {
    if count == 0 {
        return 0;
    }
    let rounded = (2 * sum + count) / (2 * count);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
