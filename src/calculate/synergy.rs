//! Cross-war comparisons: how a baseline group fares when its members meet
//! again, and how two players perform together versus apart.
//!
//! Wars are passed in the order they should be considered (the repository's
//! canonical order). Players are matched across wars by identity key.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use super::grouping::members_by_group;
use super::totals::{player_averages, squad_totals};
use crate::models::{
    player_key, BestPerformance, PairAverages, PairReport, PlayerRecord, StatLine,
    SynergyReport, SynergyRow, TogetherCard, War,
};

/// Composite score used to pick a player's best war.
pub fn performance_score(p: &PlayerRecord) -> f64 {
    p.damage as f64
        + p.healing as f64
        + 1000.0 * p.kill_participation_pct
        + 250.0 * p.kills as f64
        + 50.0 * p.assists as f64
        - 150.0 * p.deaths as f64
}

/// The group of `war` holding the most of `names`. The first group seen
/// wins a tie; no group is returned when nobody matches.
fn best_matching_group<'a>(
    war: &'a War,
    names: &HashSet<String>,
) -> Option<(u32, Vec<&'a PlayerRecord>, usize)> {
    let mut best: Option<(u32, Vec<&PlayerRecord>, usize)> = None;

    for (group, members) in members_by_group(&war.players) {
        let together = members.iter().filter(|p| names.contains(&p.key())).count();
        let current = best.as_ref().map(|(_, _, n)| *n).unwrap_or(0);
        if together > current {
            best = Some((group, members, together));
        }
    }

    best
}

/// Compare one group of a baseline war against every other war.
///
/// Rows are ordered by the matched group's team K/D, then in-group overlap,
/// then overall overlap, then newest date. Wars where no baseline member
/// shares a group are left out.
pub fn compare_baseline_group(baseline: &War, group: u32, wars: &[&War]) -> SynergyReport {
    let members: Vec<&PlayerRecord> = members_by_group(&baseline.players)
        .into_iter()
        .find(|(g, _)| *g == group)
        .map(|(_, members)| members)
        .unwrap_or_default();

    let mut roster: Vec<String> = members.iter().map(|p| p.player.clone()).collect();
    roster.sort_by(|a, b| player_key(a).cmp(&player_key(b)).then_with(|| a.cmp(b)));

    let mut report = SynergyReport {
        baseline_war: baseline.file.clone(),
        baseline_group: group,
        baseline_totals: (!members.is_empty()).then(|| squad_totals(&members)),
        roster,
        rows: Vec::new(),
    };

    if members.is_empty() {
        return report;
    }

    let names: HashSet<String> = members.iter().map(|p| p.key()).collect();
    let size = members.len() as f64;

    let mut rows: Vec<SynergyRow> = wars
        .iter()
        .filter(|w| w.file != baseline.file)
        .filter_map(|war| {
            let overlap = war
                .players
                .iter()
                .filter(|p| names.contains(&p.key()))
                .count();
            let (best_group, group_members, together) = best_matching_group(war, &names)?;

            Some(SynergyRow {
                war: war.file.clone(),
                date: war.date,
                outcome: war.outcome,
                overlap_count: overlap,
                overlap_pct: overlap as f64 / size,
                together_count: together,
                together_pct: together as f64 / size,
                best_group,
                group_totals: squad_totals(&group_members),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.group_totals
            .team_kill_death_ratio
            .total_cmp(&a.group_totals.team_kill_death_ratio)
            .then_with(|| b.together_count.cmp(&a.together_count))
            .then_with(|| b.overlap_count.cmp(&a.overlap_count))
            .then_with(|| b.date.cmp(&a.date))
    });

    debug!(
        "Group {} of {} matched in {} of {} wars",
        group,
        baseline.file,
        rows.len(),
        wars.len()
    );

    report.rows = rows;
    report
}

/// A player's best war by [`performance_score`]; the earliest wins a tie.
fn best_performance(samples: &[(&War, &PlayerRecord)]) -> Option<BestPerformance> {
    let mut best: Option<BestPerformance> = None;
    for (war, p) in samples {
        let score = performance_score(p);
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(BestPerformance {
                war: war.file.clone(),
                stats: StatLine::from(*p),
                score,
            });
        }
    }
    best
}

/// One partition of a pair comparison: wars plus each player's record in them.
#[derive(Default)]
struct Partition<'a> {
    wars: Vec<&'a War>,
    a: Vec<(&'a War, &'a PlayerRecord)>,
    b: Vec<(&'a War, &'a PlayerRecord)>,
}

impl<'a> Partition<'a> {
    fn push(&mut self, war: &'a War, a: &'a PlayerRecord, b: &'a PlayerRecord) {
        self.wars.push(war);
        self.a.push((war, a));
        self.b.push((war, b));
    }

    fn files(&self) -> Vec<String> {
        self.wars.iter().map(|w| w.file.clone()).collect()
    }

    fn averages(&self) -> Option<PairAverages> {
        if self.wars.is_empty() {
            return None;
        }
        Some(PairAverages {
            wars: self.wars.len(),
            a: player_averages(&records_of(&self.a)),
            b: player_averages(&records_of(&self.b)),
        })
    }
}

fn records_of<'a>(samples: &[(&'a War, &'a PlayerRecord)]) -> Vec<&'a PlayerRecord> {
    samples.iter().map(|(_, p)| *p).collect()
}

/// The player with the most healing in a group; the earliest wins a tie.
fn top_healer<'a>(members: &[&'a PlayerRecord]) -> Option<&'a PlayerRecord> {
    let mut best: Option<&PlayerRecord> = None;
    for &p in members {
        if best.map_or(true, |b| p.healing > b.healing) {
            best = Some(p);
        }
    }
    best
}

fn together_card(war: &War, a: &PlayerRecord, b: &PlayerRecord) -> Option<TogetherCard> {
    let members: Vec<&PlayerRecord> = war.players.iter().filter(|p| p.group == a.group).collect();
    let healer = top_healer(&members)?;

    Some(TogetherCard {
        war: war.file.clone(),
        group: a.group,
        left: StatLine::from(a),
        right: StatLine::from(b),
        healer_name: healer.player.clone(),
        healer: StatLine::from(healer),
    })
}

/// Compare two players across the wars they both played.
///
/// A war counts as "together" when both share the same non-zero group.
/// Returns `None` when either name is blank or both name the same player.
pub fn compare_pair(wars: &[&War], player_a: &str, player_b: &str) -> Option<PairReport> {
    let key_a = player_key(player_a);
    let key_b = player_key(player_b);
    if key_a.is_empty() || key_b.is_empty() || key_a == key_b {
        return None;
    }

    let mut together = Partition::default();
    let mut apart = Partition::default();

    for &war in wars {
        let (Some(a), Some(b)) = (war.find_player(&key_a), war.find_player(&key_b)) else {
            continue;
        };
        if a.group != 0 && a.group == b.group {
            together.push(war, a, b);
        } else {
            apart.push(war, a, b);
        }
    }

    let mut cards: Vec<(Option<NaiveDate>, TogetherCard)> = together
        .a
        .iter()
        .zip(together.b.iter())
        .filter_map(|((war, a), (_, b))| together_card(war, a, b).map(|c| (war.date, c)))
        .collect();
    cards.sort_by(|x, y| y.0.cmp(&x.0));

    Some(PairReport {
        player_a: player_a.trim().to_string(),
        player_b: player_b.trim().to_string(),
        together_wars: together.files(),
        apart_wars: apart.files(),
        together_avg: together.averages(),
        apart_avg: apart.averages(),
        together_best_a: best_performance(&together.a),
        together_best_b: best_performance(&together.b),
        apart_best_a: best_performance(&apart.a),
        apart_best_b: best_performance(&apart.b),
        together_cards: cards.into_iter().map(|(_, card)| card).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::record;

    fn war(file: &str, players: Vec<PlayerRecord>) -> War {
        War::new(file, players)
    }

    fn sample_wars() -> Vec<War> {
        vec![
            war(
                "MGvK6_11-18-25.csv",
                vec![
                    record("Amy", "Bruiser", 1, 10, 2, 5000, 0, 45.0),
                    record("Bob", "Healer", 1, 1, 1, 100, 8000, 30.0),
                    record("Cat", "Fire Staff", 2, 4, 4, 7000, 0, 20.0),
                ],
            ),
            // Amy and Bob split up, Bob with Cat
            war(
                "MGvOppo_11-10-25.csv",
                vec![
                    record("amy", "Bruiser", 3, 2, 2, 3000, 0, 20.0),
                    record("Bob", "Healer", 4, 0, 3, 0, 6000, 10.0),
                    record("Cat", "Fire Staff", 4, 9, 1, 9000, 0, 60.0),
                ],
            ),
            // Both again, very good K/D
            war(
                "MGvRival_10-01-25.csv",
                vec![
                    record("Amy", "Bruiser", 2, 20, 1, 9000, 0, 70.0),
                    record("Bob", "Healer", 2, 5, 0, 500, 12000, 50.0),
                    record("Dan", "Healer", 2, 0, 1, 0, 12000, 10.0),
                ],
            ),
            // Nobody from the baseline group
            war(
                "MGvNobody_09-01-25.csv",
                vec![record("Eve", "Tank", 1, 1, 1, 100, 100, 5.0)],
            ),
        ]
    }

    #[test]
    fn test_compare_baseline_group() {
        let wars = sample_wars();
        let refs: Vec<&War> = wars.iter().collect();
        let report = compare_baseline_group(&wars[0], 1, &refs);

        assert_eq!(report.roster, vec!["Amy", "Bob"]);
        assert_eq!(report.baseline_totals.as_ref().unwrap().totals.kills, 11);
        assert_eq!(report.rows.len(), 2);

        // Rival: group 2 has both, K/D 25/2
        assert_eq!(report.rows[0].war, "MGvRival_10-01-25.csv");
        assert_eq!(report.rows[0].together_count, 2);
        assert_eq!(report.rows[0].best_group, 2);
        assert_eq!(report.rows[0].together_pct, 1.0);

        // Oppo: both present, one per group; group 3 seen first
        let oppo = &report.rows[1];
        assert_eq!(oppo.overlap_count, 2);
        assert_eq!(oppo.together_count, 1);
        assert_eq!(oppo.best_group, 3);
        assert_eq!(oppo.overlap_pct, 1.0);
        assert_eq!(oppo.together_pct, 0.5);
    }

    #[test]
    fn test_roster_ignores_case() {
        let wars = vec![war(
            "MGvK6_11-18-25.csv",
            vec![
                record("Bob", "Tank", 1, 0, 0, 0, 0, 0.0),
                record("amy", "Tank", 1, 0, 0, 0, 0, 0.0),
                record("Cat", "Tank", 1, 0, 0, 0, 0, 0.0),
            ],
        )];
        let refs: Vec<&War> = wars.iter().collect();
        let report = compare_baseline_group(&wars[0], 1, &refs);
        assert_eq!(report.roster, vec!["amy", "Bob", "Cat"]);
    }

    #[test]
    fn test_baseline_group_missing() {
        let wars = sample_wars();
        let refs: Vec<&War> = wars.iter().collect();
        let report = compare_baseline_group(&wars[0], 9, &refs);
        assert!(report.baseline_totals.is_none());
        assert!(report.rows.is_empty());
        assert!(report.roster.is_empty());
    }

    #[test]
    fn test_synergy_ties_prefer_newer_war() {
        let wars = vec![
            war("MGvA_01-01-25.csv", vec![record("Amy", "Tank", 1, 1, 1, 0, 0, 0.0)]),
            war("MGvB_01-01-24.csv", vec![record("Amy", "Tank", 1, 1, 1, 0, 0, 0.0)]),
            war("undated.csv", vec![record("Amy", "Tank", 1, 1, 1, 0, 0, 0.0)]),
            war("MGvC_06-01-25.csv", vec![record("Amy", "Tank", 1, 1, 1, 0, 0, 0.0)]),
        ];
        let refs: Vec<&War> = wars.iter().collect();
        let report = compare_baseline_group(&wars[0], 1, &refs);
        let order: Vec<_> = report.rows.iter().map(|r| r.war.as_str()).collect();
        assert_eq!(
            order,
            vec!["MGvC_06-01-25.csv", "MGvB_01-01-24.csv", "undated.csv"]
        );
    }

    #[test]
    fn test_performance_score() {
        let p = record("Amy", "Bruiser", 1, 10, 2, 5000, 100, 45.0);
        // 5000 + 100 + 45000 + 2500 + 0 - 300
        assert_eq!(performance_score(&p), 52300.0);
    }

    #[test]
    fn test_compare_pair() {
        let wars = sample_wars();
        let refs: Vec<&War> = wars.iter().collect();
        let report = compare_pair(&refs, "Amy", " BOB ").unwrap();

        assert_eq!(
            report.together_wars,
            vec!["MGvK6_11-18-25.csv", "MGvRival_10-01-25.csv"]
        );
        assert_eq!(report.apart_wars, vec!["MGvOppo_11-10-25.csv"]);

        let together = report.together_avg.unwrap();
        assert_eq!(together.wars, 2);
        assert_eq!(together.a.avg_kills, 15.0);
        assert_eq!(together.b.avg_healing, 10000.0);

        let apart = report.apart_avg.unwrap();
        assert_eq!(apart.a.avg_damage, 3000.0);

        assert_eq!(report.together_best_a.unwrap().war, "MGvRival_10-01-25.csv");
        assert_eq!(report.apart_best_b.unwrap().war, "MGvOppo_11-10-25.csv");
    }

    #[test]
    fn test_pair_together_cards() {
        let wars = sample_wars();
        let refs: Vec<&War> = wars.iter().collect();
        let report = compare_pair(&refs, "Amy", "Bob").unwrap();

        assert_eq!(report.together_cards.len(), 2);
        assert_eq!(report.together_cards[0].war, "MGvK6_11-18-25.csv");
        assert_eq!(report.together_cards[0].healer_name, "Bob");
        // Bob and Dan tie on healing in Rival; Bob comes first
        assert_eq!(report.together_cards[1].healer_name, "Bob");
        assert_eq!(report.together_cards[1].group, 2);
    }

    #[test]
    fn test_pair_rejects_blank_or_same() {
        let wars = sample_wars();
        let refs: Vec<&War> = wars.iter().collect();
        assert!(compare_pair(&refs, "", "Bob").is_none());
        assert!(compare_pair(&refs, "Amy", " amy").is_none());
    }

    #[test]
    fn test_pair_without_shared_wars() {
        let wars = sample_wars();
        let refs: Vec<&War> = wars.iter().collect();
        let report = compare_pair(&refs, "Amy", "Eve").unwrap();
        assert!(report.together_wars.is_empty());
        assert!(report.apart_wars.is_empty());
        assert!(report.together_avg.is_none());
        assert!(report.apart_avg.is_none());
        assert!(report.together_best_a.is_none());
        assert!(report.together_cards.is_empty());
    }

    #[test]
    fn test_group_zero_is_never_together() {
        let wars = vec![war(
            "w.csv",
            vec![
                record("Amy", "Tank", 0, 1, 1, 0, 0, 0.0),
                record("Bob", "Tank", 0, 1, 1, 0, 0, 0.0),
            ],
        )];
        let refs: Vec<&War> = wars.iter().collect();
        let report = compare_pair(&refs, "Amy", "Bob").unwrap();
        assert_eq!(report.apart_wars, vec!["w.csv"]);
    }
}
