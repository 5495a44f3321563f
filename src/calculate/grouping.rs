//! Group partitioning.
//!
//! Two views are exposed: the default view pulls the overflow build out of
//! every group into its own squad, and the "all groups" view keeps everyone
//! in their numbered group.

use std::collections::BTreeMap;

use serde::Serialize;

use super::totals::squad_totals;
use crate::models::{GroupStat, GroupSummary, PlayerRecord};

/// Records split into numbered groups plus the overflow squad.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupPartition<'a> {
    pub groups: BTreeMap<u32, Vec<&'a PlayerRecord>>,
    pub overflow: Vec<&'a PlayerRecord>,
}

impl<'a> GroupPartition<'a> {
    /// Per-group summaries in group order, then the overflow squad (if any)
    /// reported under group 0.
    pub fn summaries(&self) -> (Vec<GroupSummary<'a>>, Option<GroupSummary<'a>>) {
        let groups = self
            .groups
            .iter()
            .map(|(group, members)| summarize(*group, members.clone()))
            .collect();
        let overflow = (!self.overflow.is_empty()).then(|| summarize(0, self.overflow.clone()));
        (groups, overflow)
    }
}

fn summarize<'a>(group: u32, members: Vec<&'a PlayerRecord>) -> GroupSummary<'a> {
    GroupSummary {
        group,
        totals: squad_totals(&members),
        members,
    }
}

/// Insert into a group map, keeping each group sorted by build priority.
fn into_groups<'a, I>(records: I) -> BTreeMap<u32, Vec<&'a PlayerRecord>>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let mut groups: BTreeMap<u32, Vec<&PlayerRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.group).or_default().push(record);
    }
    for members in groups.values_mut() {
        // sort_by_key is stable
        members.sort_by_key(|p| p.build_type.priority());
    }
    groups
}

/// Split records into numbered groups and the overflow squad.
///
/// Overflow records never appear in a group; a group made only of overflow
/// records is omitted.
pub fn partition_by_group(records: &[PlayerRecord]) -> GroupPartition<'_> {
    let (overflow, rest): (Vec<&PlayerRecord>, Vec<&PlayerRecord>) =
        records.iter().partition(|p| p.build_type.is_overflow());

    GroupPartition {
        groups: into_groups(rest),
        overflow,
    }
}

/// Group every record by number, overflow build included.
pub fn group_all(records: &[PlayerRecord]) -> BTreeMap<u32, Vec<&PlayerRecord>> {
    into_groups(records)
}

/// Summaries for either grouping view.
pub fn group_summaries(
    records: &[PlayerRecord],
    separate_overflow: bool,
) -> (Vec<GroupSummary<'_>>, Option<GroupSummary<'_>>) {
    if separate_overflow {
        partition_by_group(records).summaries()
    } else {
        GroupPartition {
            groups: group_all(records),
            overflow: Vec::new(),
        }
        .summaries()
    }
}

/// Members by group in first-appearance order, ignoring group 0 (unassigned).
///
/// Used for cross-war matching, where build order is irrelevant.
pub fn members_by_group(records: &[PlayerRecord]) -> Vec<(u32, Vec<&PlayerRecord>)> {
    let mut groups: Vec<(u32, Vec<&PlayerRecord>)> = Vec::new();
    for record in records.iter().filter(|p| p.group != 0) {
        match groups.iter_mut().find(|(g, _)| *g == record.group) {
            Some((_, members)) => members.push(record),
            None => groups.push((record.group, vec![record])),
        }
    }
    groups
}

/// Damage, healing and contribution per group, most damage first.
///
/// Every record counts, overflow build and unassigned group 0 included.
/// Groups with equal damage keep first-appearance order.
pub fn group_comparison(records: &[PlayerRecord]) -> Vec<GroupStat> {
    let mut stats: Vec<GroupStat> = Vec::new();
    for p in records {
        let idx = match stats.iter().position(|s| s.group == p.group) {
            Some(idx) => idx,
            None => {
                stats.push(GroupStat {
                    group: p.group,
                    total_damage: 0,
                    total_healing: 0,
                    total_contribution: 0,
                });
                stats.len() - 1
            }
        };
        let stat = &mut stats[idx];
        stat.total_damage += p.damage;
        stat.total_healing += p.healing;
        stat.total_contribution += p.kills as u64 + p.assists as u64;
    }

    stats.sort_by(|a, b| b.total_damage.cmp(&a.total_damage));
    stats
}
