//! Totals, averages, best-by selection and heat scores.

use crate::models::{
    Build, ClassComparison, ClassRow, HeatRow, Insight, PlayerAverages, PlayerRecord,
    SquadTotals, Stat, Totals, NEUTRAL_HEAT,
};

/// Number of rows shown on ranked tables.
pub const RANKED_TABLE_LEN: usize = 15;

/// Sum the counters of a set of records.
pub fn compute_totals<'a, I>(records: I) -> Totals
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    records.into_iter().fold(Totals::default(), |mut t, p| {
        t.kills += p.kills as u64;
        t.deaths += p.deaths as u64;
        t.assists += p.assists as u64;
        t.damage += p.damage;
        t.healing += p.healing;
        t
    })
}

pub fn total_damage(records: &[PlayerRecord]) -> u64 {
    compute_totals(records).damage
}

pub fn total_healing(records: &[PlayerRecord]) -> u64 {
    compute_totals(records).healing
}

/// Team K/D for a set of records, with the same zero-death floor as players.
pub fn team_kill_death_ratio(records: &[PlayerRecord]) -> f64 {
    compute_totals(records).team_kill_death_ratio()
}

/// Mean of a slice, 0 when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Mean kill participation. An empty set averages to 0.
pub fn average_kill_participation<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let values: Vec<f64> = records
        .into_iter()
        .map(|p| p.kill_participation_pct)
        .collect();
    mean(&values)
}

/// Totals plus average KP for a squad.
pub fn squad_totals(members: &[&PlayerRecord]) -> SquadTotals {
    let totals = compute_totals(members.iter().copied());
    SquadTotals {
        totals,
        team_kill_death_ratio: totals.team_kill_death_ratio(),
        avg_kill_participation: average_kill_participation(members.iter().copied()),
        members: members.len(),
    }
}

/// Per-record averages of one player's samples. Empty samples average to 0.
pub fn player_averages(samples: &[&PlayerRecord]) -> PlayerAverages {
    let n = samples.len().max(1) as f64;
    let totals = compute_totals(samples.iter().copied());
    PlayerAverages {
        avg_kills: totals.kills as f64 / n,
        avg_deaths: totals.deaths as f64 / n,
        avg_assists: totals.assists as f64 / n,
        avg_damage: totals.damage as f64 / n,
        avg_healing: totals.healing as f64 / n,
        avg_kill_participation: average_kill_participation(samples.iter().copied()),
    }
}

/// Records ordered by a stat, highest first. Ties keep input order.
pub fn ranked_by<'a>(records: &'a [PlayerRecord], stat: Stat) -> Vec<&'a PlayerRecord> {
    let mut ranked: Vec<&PlayerRecord> = records.iter().collect();
    ranked.sort_by(|a, b| stat.value(b).total_cmp(&stat.value(a)));
    ranked
}

/// The record with the highest value of a stat; the earliest wins a tie.
pub fn best_by(records: &[PlayerRecord], stat: Stat) -> Option<&PlayerRecord> {
    ranked_by(records, stat).into_iter().next()
}

/// Position of `value` within `[min, max]`, in `[0, 1]`.
///
/// A column without spread scores [`NEUTRAL_HEAT`].
pub fn normalized_rank(value: f64, min: f64, max: f64) -> f64 {
    if min == max || !(max - min).is_finite() {
        return NEUTRAL_HEAT;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// [`normalized_rank`] for columns where lower is better.
pub fn normalized_rank_inverted(value: f64, min: f64, max: f64) -> f64 {
    if min == max || !(max - min).is_finite() {
        return NEUTRAL_HEAT;
    }
    1.0 - normalized_rank(value, min, max)
}

/// Heat for a stat, inverted when the stat is lower-is-better.
pub fn heat_for(stat: Stat, value: f64, range: (f64, f64)) -> f64 {
    if stat.lower_is_better() {
        normalized_rank_inverted(value, range.0, range.1)
    } else {
        normalized_rank(value, range.0, range.1)
    }
}

/// Min and max of a stat over a view. `None` for an empty view.
pub fn column_range<'a, I>(records: I, stat: Stat) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    records.into_iter().map(|p| stat.value(p)).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// The four headline cards of a war.
pub fn war_insights(records: &[PlayerRecord]) -> Vec<Insight> {
    const CARDS: [(&str, Stat); 4] = [
        ("Top DPS", Stat::Damage),
        ("Top Healer", Stat::Healing),
        ("Top Assists", Stat::Assists),
        ("Best K/D", Stat::KillDeathRatio),
    ];

    CARDS
        .iter()
        .filter_map(|(title, stat)| {
            best_by(records, *stat).map(|p| Insight {
                title: *title,
                stat: *stat,
                player: p.player.clone(),
                build_type: p.build_type,
                value: match stat {
                    Stat::KillDeathRatio => p.kill_death_ratio.clone(),
                    _ => format!("{}", stat.value(p)),
                },
            })
        })
        .collect()
}

/// A ranked table with heat computed over the rows shown.
///
/// `limit` caps the rows; heat is relative to the shown rows only.
pub fn heat_table(records: &[PlayerRecord], stat: Stat, limit: Option<usize>) -> Vec<HeatRow> {
    let mut ranked = ranked_by(records, stat);
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }

    let Some(range) = column_range(ranked.iter().copied(), stat) else {
        return Vec::new();
    };

    ranked
        .into_iter()
        .map(|p| {
            let value = stat.value(p);
            HeatRow {
                player: p.player.clone(),
                build_type: p.build_type,
                value,
                heat: heat_for(stat, value, range),
            }
        })
        .collect()
}

/// Damage per player, highest first, without healers.
pub fn damage_by_player(records: &[PlayerRecord]) -> Vec<&PlayerRecord> {
    ranked_by(records, Stat::Damage)
        .into_iter()
        .filter(|p| p.build_type != Build::Heals)
        .collect()
}

/// The stat a build is judged by.
pub fn primary_stat(build: Build) -> Stat {
    match build {
        Build::Heals | Build::Tank => Stat::Healing,
        _ => Stat::Damage,
    }
}

/// All records of one build, ranked by the build's primary stat, with
/// per-column heat relative to that build only.
pub fn class_comparison(records: &[PlayerRecord], build: Build) -> ClassComparison<'_> {
    let primary = primary_stat(build);
    let mut members: Vec<&PlayerRecord> =
        records.iter().filter(|p| p.build_type == build).collect();
    members.sort_by(|a, b| primary.value(b).total_cmp(&primary.value(a)));

    let heat = |stat: Stat, p: &PlayerRecord| {
        column_range(members.iter().copied(), stat)
            .map(|range| heat_for(stat, stat.value(p), range))
            .unwrap_or(NEUTRAL_HEAT)
    };

    let rows = members
        .iter()
        .map(|&p| ClassRow {
            record: p,
            kills_heat: heat(Stat::Kills, p),
            deaths_heat: heat(Stat::Deaths, p),
            assists_heat: heat(Stat::Assists, p),
            damage_heat: heat(Stat::Damage, p),
            healing_heat: heat(Stat::Healing, p),
            kill_participation_heat: heat(Stat::KillParticipation, p),
        })
        .collect();

    ClassComparison {
        build,
        primary_stat: primary,
        rows,
    }
}
