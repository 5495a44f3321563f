//! Per-war player performance records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Build;

/// One untyped CSV data row, keyed by raw header text.
///
/// Nothing downstream of the normalizer reads a `RawRow`; it only exists to
/// carry a row through the column allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow(BTreeMap<String, String>);

impl RawRow {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set a column value. A repeated header overwrites the earlier value.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.0.insert(header.into(), value.into());
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.0.get(header).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// Whether a report covers a complete war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FullWarFlag {
    #[default]
    Yes,
    No,
}

impl FullWarFlag {
    /// Normalize a raw `Full` cell. Only `no`, `n` and `false` (any case) are
    /// negative; everything else, including an absent cell, is `Yes`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()) {
            Some(v) if matches!(v.as_str(), "no" | "n" | "false") => FullWarFlag::No,
            _ => FullWarFlag::Yes,
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, FullWarFlag::Yes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FullWarFlag::Yes => "yes",
            FullWarFlag::No => "no",
        }
    }
}

impl std::fmt::Display for FullWarFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One player's performance in one war. Immutable once normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Player name (trimmed, never empty)
    pub player: String,

    /// Build label as written in the report
    pub raw_build_label: String,

    /// Classified role
    pub build_type: Build,

    /// War-local ordinal
    pub rank: u32,

    /// Group number, 0 when ungrouped
    pub group: u32,

    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub healing: u64,
    pub damage: u64,

    /// Kill participation, 0-100
    pub kill_participation_pct: f64,

    /// `kills / max(1, deaths)` rendered with two decimals
    pub kill_death_ratio: String,

    pub defender_side_label: String,
    pub attacker_side_label: String,
    pub result_text: String,

    pub full_war: FullWarFlag,
}

impl PlayerRecord {
    /// K/D as a number, read back from its two-decimal rendering.
    pub fn kd_value(&self) -> f64 {
        self.kill_death_ratio.parse().unwrap_or(0.0)
    }

    /// Case-insensitive identity used to follow a player across wars.
    pub fn key(&self) -> String {
        player_key(&self.player)
    }

    /// Export back to an allow-listed raw row.
    pub fn to_raw_row(&self) -> RawRow {
        let mut row = RawRow::new();
        row.insert("Rank", self.rank.to_string());
        row.insert("Group", self.group.to_string());
        row.insert("Build", self.raw_build_label.clone());
        row.insert("Player", self.player.clone());
        row.insert("Kills", self.kills.to_string());
        row.insert("Deaths", self.deaths.to_string());
        row.insert("Assists", self.assists.to_string());
        row.insert("Healing", self.healing.to_string());
        row.insert("Damage", self.damage.to_string());
        row.insert("KP %", self.kill_participation_pct.to_string());
        row.insert("Defender", self.defender_side_label.clone());
        row.insert("Attacker", self.attacker_side_label.clone());
        row.insert("Result", self.result_text.clone());
        row.insert("Full", self.full_war.as_str());
        row
    }
}

/// Normalize a player name into its cross-war identity key.
pub fn player_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// `kills / max(1, deaths)`. Zero deaths divide by one.
pub fn kill_death_ratio(kills: u64, deaths: u64) -> f64 {
    kills as f64 / deaths.max(1) as f64
}

/// Render a ratio with exactly two decimals.
///
/// Rounds the exact binary value of `value`, with exact ties going up, so a
/// ratio such as 17/40 (stored just below 0.425) renders as `0.42`.
pub fn format_ratio(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }
    // Only multiples of 1/8 sit exactly on a third-decimal 5
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        return format!("{:.2}", (value * 100.0 + 0.5).floor() / 100.0);
    }
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_flag_negative_tokens() {
        assert_eq!(FullWarFlag::from_raw(Some("no")), FullWarFlag::No);
        assert_eq!(FullWarFlag::from_raw(Some("N")), FullWarFlag::No);
        assert_eq!(FullWarFlag::from_raw(Some(" FALSE ")), FullWarFlag::No);
    }

    #[test]
    fn test_full_flag_defaults_to_yes() {
        assert_eq!(FullWarFlag::from_raw(None), FullWarFlag::Yes);
        assert_eq!(FullWarFlag::from_raw(Some("")), FullWarFlag::Yes);
        assert_eq!(FullWarFlag::from_raw(Some("partial")), FullWarFlag::Yes);
        assert_eq!(FullWarFlag::from_raw(Some("yes")), FullWarFlag::Yes);
    }

    #[test]
    fn test_full_flag_serialization() {
        assert_eq!(serde_json::to_string(&FullWarFlag::No).unwrap(), "\"no\"");
        assert_eq!(format!("{}", FullWarFlag::Yes), "yes");
    }

    #[test]
    fn test_kill_death_ratio_zero_deaths() {
        assert_eq!(kill_death_ratio(5, 0), 5.0);
        assert_eq!(kill_death_ratio(0, 0), 0.0);
        assert_eq!(kill_death_ratio(10, 4), 2.5);
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(5.0), "5.00");
        assert_eq!(format_ratio(1.0 / 3.0), "0.33");
        assert_eq!(format_ratio(2.0 / 3.0), "0.67");
        assert_eq!(format_ratio(0.125), "0.13");
        assert_eq!(format_ratio(0.375), "0.38");
        assert_eq!(format_ratio(2.625), "2.63");
        assert_eq!(format_ratio(f64::INFINITY), "0.00");
    }

    #[test]
    fn test_format_ratio_below_midpoint_rounds_down() {
        assert_eq!(format_ratio(kill_death_ratio(17, 40)), "0.42");
        assert_eq!(format_ratio(kill_death_ratio(3, 40)), "0.07");
        assert_eq!(format_ratio(kill_death_ratio(7, 40)), "0.17");
        assert_eq!(format_ratio(kill_death_ratio(3, 200)), "0.01");
    }

    #[test]
    fn test_player_key() {
        assert_eq!(player_key("  Amy "), "amy");
        assert_eq!(player_key("BOB"), "bob");
    }

    #[test]
    fn test_raw_row_overwrites_duplicate_header() {
        let row: RawRow = [("Kills", "1"), ("Kills", "7")].into_iter().collect();
        assert_eq!(row.get("Kills"), Some("7"));
        assert_eq!(row.len(), 1);
    }
}
