//! Derived statistics models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{format_ratio, kill_death_ratio, Build, Outcome, PlayerRecord};

/// Heat score returned when a column has no spread.
pub const NEUTRAL_HEAT: f64 = 0.5;

/// A numeric column of a player record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Kills,
    Deaths,
    Assists,
    Healing,
    Damage,
    KillParticipation,
    KillDeathRatio,
}

impl Stat {
    /// Read this column from a record. K/D is parsed back from its
    /// two-decimal rendering.
    pub fn value(&self, p: &PlayerRecord) -> f64 {
        match self {
            Stat::Kills => p.kills as f64,
            Stat::Deaths => p.deaths as f64,
            Stat::Assists => p.assists as f64,
            Stat::Healing => p.healing as f64,
            Stat::Damage => p.damage as f64,
            Stat::KillParticipation => p.kill_participation_pct,
            Stat::KillDeathRatio => p.kd_value(),
        }
    }

    /// Columns where a smaller value is better.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Stat::Deaths)
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stat::Kills => write!(f, "Kills"),
            Stat::Deaths => write!(f, "Deaths"),
            Stat::Assists => write!(f, "Assists"),
            Stat::Healing => write!(f, "Healing"),
            Stat::Damage => write!(f, "Damage"),
            Stat::KillParticipation => write!(f, "KP"),
            Stat::KillDeathRatio => write!(f, "KD"),
        }
    }
}

/// Summed counters over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
    pub damage: u64,
    pub healing: u64,
}

impl Totals {
    /// `kills / max(1, deaths)`.
    pub fn team_kill_death_ratio(&self) -> f64 {
        kill_death_ratio(self.kills, self.deaths)
    }

    /// Team K/D with two decimals.
    pub fn team_kill_death_display(&self) -> String {
        format_ratio(self.team_kill_death_ratio())
    }
}

/// Totals plus average kill participation for one squad.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquadTotals {
    #[serde(flatten)]
    pub totals: Totals,
    pub team_kill_death_ratio: f64,
    pub avg_kill_participation: f64,
    pub members: usize,
}

/// A "best by stat" highlight for one war.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub title: &'static str,
    pub stat: Stat,
    pub player: String,
    pub build_type: Build,
    pub value: String,
}

/// A record paired with its heat score for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatRow {
    pub player: String,
    pub build_type: Build,
    pub value: f64,
    pub heat: f64,
}

/// A group (or the overflow squad) with its members in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary<'a> {
    pub group: u32,
    pub totals: SquadTotals,
    pub members: Vec<&'a PlayerRecord>,
}

/// Group-level contribution used by the group comparison board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStat {
    pub group: u32,
    pub total_damage: u64,
    pub total_healing: u64,
    /// kills + assists
    pub total_contribution: u64,
}

/// Heat scores for each column of one class-comparison row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRow<'a> {
    pub record: &'a PlayerRecord,
    pub kills_heat: f64,
    pub deaths_heat: f64,
    pub assists_heat: f64,
    pub damage_heat: f64,
    pub healing_heat: f64,
    pub kill_participation_heat: f64,
}

/// Records of one build ranked by its primary stat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassComparison<'a> {
    pub build: Build,
    pub primary_stat: Stat,
    pub rows: Vec<ClassRow<'a>>,
}

/// Which wars an analysis looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WarScope {
    /// Full wars only
    #[default]
    Full,
    /// Full and partial wars
    All,
}

impl std::str::FromStr for WarScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(WarScope::Full),
            "all" => Ok(WarScope::All),
            other => Err(format!("unknown war scope '{}' (expected full or all)", other)),
        }
    }
}

/// How one other war lines up against a baseline group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynergyRow {
    pub war: String,
    pub date: Option<NaiveDate>,
    pub outcome: Outcome,
    /// Baseline members present anywhere in the war
    pub overlap_count: usize,
    pub overlap_pct: f64,
    /// Baseline members inside the best matching group
    pub together_count: usize,
    pub together_pct: f64,
    pub best_group: u32,
    pub group_totals: SquadTotals,
}

/// Cross-war comparison for a baseline war + group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynergyReport {
    pub baseline_war: String,
    pub baseline_group: u32,
    pub baseline_totals: Option<SquadTotals>,
    pub roster: Vec<String>,
    pub rows: Vec<SynergyRow>,
}

/// Per-player per-war averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlayerAverages {
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
    pub avg_damage: f64,
    pub avg_healing: f64,
    pub avg_kill_participation: f64,
}

/// Both players' averages over one partition of wars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairAverages {
    pub wars: usize,
    pub a: PlayerAverages,
    pub b: PlayerAverages,
}

/// Stat line of one player in one war.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatLine {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub damage: u64,
    pub healing: u64,
    pub kill_participation: f64,
}

impl From<&PlayerRecord> for StatLine {
    fn from(p: &PlayerRecord) -> Self {
        Self {
            kills: p.kills,
            deaths: p.deaths,
            assists: p.assists,
            damage: p.damage,
            healing: p.healing,
            kill_participation: p.kill_participation_pct,
        }
    }
}

/// A player's best single war by composite score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestPerformance {
    pub war: String,
    pub stats: StatLine,
    pub score: f64,
}

/// One war where both focus players shared a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TogetherCard {
    pub war: String,
    pub group: u32,
    pub left: StatLine,
    pub right: StatLine,
    pub healer_name: String,
    pub healer: StatLine,
}

/// Together vs apart comparison for two players.
///
/// Averages and bests are `None` when their partition has no wars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairReport {
    pub player_a: String,
    pub player_b: String,
    pub together_wars: Vec<String>,
    pub apart_wars: Vec<String>,
    pub together_avg: Option<PairAverages>,
    pub apart_avg: Option<PairAverages>,
    pub together_best_a: Option<BestPerformance>,
    pub together_best_b: Option<BestPerformance>,
    pub apart_best_a: Option<BestPerformance>,
    pub apart_best_b: Option<BestPerformance>,
    pub together_cards: Vec<TogetherCard>,
}

/// Pre-digitization win/loss record added on top of loaded reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRecord {
    #[serde(default = "default_legacy_wins")]
    pub wins: u32,

    #[serde(default = "default_legacy_losses")]
    pub losses: u32,

    #[serde(default = "default_legacy_wars")]
    pub wars: u32,
}

fn default_legacy_wins() -> u32 {
    1
}

fn default_legacy_losses() -> u32 {
    3
}

fn default_legacy_wars() -> u32 {
    4
}

impl LegacyRecord {
    /// No historical record at all.
    pub const NONE: LegacyRecord = LegacyRecord {
        wins: 0,
        losses: 0,
        wars: 0,
    };
}

impl Default for LegacyRecord {
    fn default() -> Self {
        Self {
            wins: default_legacy_wins(),
            losses: default_legacy_losses(),
            wars: default_legacy_wars(),
        }
    }
}

/// Company-wide record and long-run averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyOverview {
    /// Loaded wars plus legacy wars
    pub wars: u32,
    pub wins: u32,
    pub losses: u32,
    pub full_wars: u32,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_damage: f64,
    pub avg_healing: f64,
    pub avg_kill_participation: f64,
}

/// Lifetime view of one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub player: String,
    /// Every war the player appears in, full or not
    pub wars_played: usize,
    pub wars: Vec<String>,
    pub lifetime: Option<PlayerAverages>,
}
