//! Row normalization: raw CSV row -> typed `PlayerRecord`.
//!
//! Only allow-listed columns survive. Numbers that fail to parse become 0,
//! missing strings become empty. The only rejection is a row without a
//! player name, and it is silent.

use crate::models::{
    format_ratio, kill_death_ratio, Build, FullWarFlag, PlayerRecord, RawRow,
};

/// Columns recognized in a war report header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Rank,
    Group,
    Build,
    Player,
    Kills,
    Deaths,
    Assists,
    Healing,
    Damage,
    /// `KP %`
    KpSpaced,
    /// `KP%`
    KpCompact,
    Defender,
    Attacker,
    Result,
    Outcome,
    Full,
}

impl Column {
    /// Match a header exactly (after trimming). Header names are case-sensitive.
    pub fn from_header(header: &str) -> Option<Self> {
        let column = match header.trim() {
            "Rank" => Column::Rank,
            "Group" => Column::Group,
            "Build" => Column::Build,
            "Player" => Column::Player,
            "Kills" => Column::Kills,
            "Deaths" => Column::Deaths,
            "Assists" => Column::Assists,
            "Healing" => Column::Healing,
            "Damage" => Column::Damage,
            "KP %" => Column::KpSpaced,
            "KP%" => Column::KpCompact,
            "Defender" => Column::Defender,
            "Attacker" => Column::Attacker,
            "Result" => Column::Result,
            "Outcome" => Column::Outcome,
            "Full" => Column::Full,
            _ => return None,
        };
        Some(column)
    }
}

/// A raw row reduced to recognized columns.
#[derive(Debug, Default)]
struct AllowedRow<'a> {
    cells: Vec<(Column, &'a str)>,
}

impl<'a> AllowedRow<'a> {
    fn from_raw(raw: &'a RawRow) -> Self {
        let cells = raw
            .iter()
            .filter_map(|(header, value)| Column::from_header(header).map(|c| (c, value)))
            .collect();
        Self { cells }
    }

    fn get(&self, column: Column) -> Option<&'a str> {
        self.cells
            .iter()
            .rev()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| *v)
    }

    fn text(&self, column: Column) -> String {
        self.get(column).map(|v| v.trim().to_string()).unwrap_or_default()
    }

    fn number(&self, column: Column) -> f64 {
        self.get(column).map(coerce_number).unwrap_or(0.0)
    }
}

/// Parse a report number: thousands separators and trailing `%` are
/// stripped, anything unparseable (or non-finite) becomes 0.
pub fn coerce_number(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim().trim_end_matches('%').trim();
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Counter view of a coerced number: negatives clamp to 0, fractions truncate.
fn counter(value: f64) -> u64 {
    if value <= 0.0 {
        0
    } else {
        value.trunc() as u64
    }
}

fn small_counter(value: f64) -> u32 {
    counter(value).min(u32::MAX as u64) as u32
}

/// Normalize one raw row. Returns `None` when the row has no player name.
pub fn normalize_row(raw: &RawRow) -> Option<PlayerRecord> {
    let row = AllowedRow::from_raw(raw);

    let player = row.text(Column::Player);
    if player.is_empty() {
        return None;
    }

    let kills = small_counter(row.number(Column::Kills));
    let deaths = small_counter(row.number(Column::Deaths));

    // "KP %" wins over "KP%" whenever the spaced column is present at all
    let kp = row
        .get(Column::KpSpaced)
        .or_else(|| row.get(Column::KpCompact))
        .map(coerce_number)
        .unwrap_or(0.0)
        .max(0.0);

    let raw_build_label = row.text(Column::Build);
    let build_type = Build::classify(&raw_build_label);

    let mut result_text = row.text(Column::Result);
    if result_text.is_empty() {
        result_text = row.text(Column::Outcome);
    }

    Some(PlayerRecord {
        player,
        build_type,
        raw_build_label,
        rank: small_counter(row.number(Column::Rank)),
        group: small_counter(row.number(Column::Group)),
        kills,
        deaths,
        assists: small_counter(row.number(Column::Assists)),
        healing: counter(row.number(Column::Healing)),
        damage: counter(row.number(Column::Damage)),
        kill_participation_pct: kp,
        kill_death_ratio: format_ratio(kill_death_ratio(kills as u64, deaths as u64)),
        defender_side_label: row.text(Column::Defender),
        attacker_side_label: row.text(Column::Attacker),
        result_text,
        full_war: FullWarFlag::from_raw(row.get(Column::Full)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_missing_player_rejected() {
        assert!(normalize_row(&row(&[("Kills", "5")])).is_none());
        assert!(normalize_row(&row(&[("Player", "   "), ("Kills", "5")])).is_none());
    }

    #[test]
    fn test_unknown_columns_quarantined() {
        let record = normalize_row(&row(&[("Player", "Amy"), ("Foo", "bar")])).unwrap();
        assert_eq!(record.player, "Amy");
        let exported = record.to_raw_row();
        assert!(exported.get("Foo").is_none());
    }

    #[test]
    fn test_header_case_sensitive() {
        let record = normalize_row(&row(&[("Player", "Amy"), ("kills", "9")])).unwrap();
        assert_eq!(record.kills, 0);
    }

    #[test]
    fn test_header_whitespace_trimmed() {
        let record = normalize_row(&row(&[(" Player ", "Amy"), ("Kills ", "9")])).unwrap();
        assert_eq!(record.kills, 9);
    }

    #[test]
    fn test_numeric_cleanup() {
        let record = normalize_row(&row(&[
            ("Player", "Amy"),
            ("Damage", "1,234"),
            ("KP %", "42.5%"),
        ]))
        .unwrap();
        assert_eq!(record.damage, 1234);
        assert_eq!(record.kill_participation_pct, 42.5);
    }

    #[test]
    fn test_malformed_numbers_default_to_zero() {
        let record = normalize_row(&row(&[
            ("Player", "Amy"),
            ("Kills", "lots"),
            ("Deaths", ""),
            ("Healing", "NaN"),
            ("Damage", "inf"),
        ]))
        .unwrap();
        assert_eq!(record.kills, 0);
        assert_eq!(record.deaths, 0);
        assert_eq!(record.healing, 0);
        assert_eq!(record.damage, 0);
        assert_eq!(record.kill_death_ratio, "0.00");
    }

    #[test]
    fn test_kp_compact_alias() {
        let record = normalize_row(&row(&[("Player", "Amy"), ("KP%", "30")])).unwrap();
        assert_eq!(record.kill_participation_pct, 30.0);

        let both = normalize_row(&row(&[("Player", "Amy"), ("KP %", "12"), ("KP%", "30")]))
            .unwrap();
        assert_eq!(both.kill_participation_pct, 12.0);
    }

    #[test]
    fn test_kd_zero_floor() {
        for kills in [0u32, 1, 5, 17] {
            let kills_cell = kills.to_string();
            let record = normalize_row(&row(&[
                ("Player", "Amy"),
                ("Kills", kills_cell.as_str()),
                ("Deaths", "0"),
            ]))
            .unwrap();
            assert_eq!(record.kill_death_ratio, format!("{:.2}", kills as f64));
        }
    }

    #[test]
    fn test_kd_rounds_exact_value() {
        let record =
            normalize_row(&row(&[("Player", "Amy"), ("Kills", "17"), ("Deaths", "40")])).unwrap();
        assert_eq!(record.kill_death_ratio, "0.42");

        let record =
            normalize_row(&row(&[("Player", "Amy"), ("Kills", "1"), ("Deaths", "8")])).unwrap();
        assert_eq!(record.kill_death_ratio, "0.13");
    }

    #[test]
    fn test_kd_two_decimals() {
        let record =
            normalize_row(&row(&[("Player", "Amy"), ("Kills", "10"), ("Deaths", "3")])).unwrap();
        assert_eq!(record.kill_death_ratio, "3.33");
        assert_eq!(record.kd_value(), 3.33);
    }

    #[test]
    fn test_strings_trimmed_and_defaulted() {
        let record = normalize_row(&row(&[
            ("Player", "  Amy "),
            ("Build", " Bruiser "),
            ("Attacker", " Mercguards "),
        ]))
        .unwrap();
        assert_eq!(record.player, "Amy");
        assert_eq!(record.raw_build_label, "Bruiser");
        assert_eq!(record.build_type, Build::Bruiser);
        assert_eq!(record.attacker_side_label, "Mercguards");
        assert_eq!(record.defender_side_label, "");
        assert_eq!(record.result_text, "");
    }

    #[test]
    fn test_outcome_column_fills_result() {
        let record = normalize_row(&row(&[("Player", "Amy"), ("Outcome", "Victory")])).unwrap();
        assert_eq!(record.result_text, "Victory");
    }

    #[test]
    fn test_full_flag() {
        let absent = normalize_row(&row(&[("Player", "Amy")])).unwrap();
        assert_eq!(absent.full_war, FullWarFlag::Yes);

        let partial = normalize_row(&row(&[("Player", "Amy"), ("Full", "No")])).unwrap();
        assert_eq!(partial.full_war, FullWarFlag::No);
    }

    #[test]
    fn test_counters_clamp_and_truncate() {
        let record = normalize_row(&row(&[
            ("Player", "Amy"),
            ("Kills", "-4"),
            ("Assists", "3.9"),
            ("Group", "2.0"),
        ]))
        .unwrap();
        assert_eq!(record.kills, 0);
        assert_eq!(record.assists, 3);
        assert_eq!(record.group, 2);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let first = normalize_row(&row(&[
            ("Rank", "3"),
            ("Group", "2"),
            ("Build", "Void Gauntlet"),
            ("Player", "Cat"),
            ("Kills", "4"),
            ("Deaths", "0"),
            ("Assists", "12"),
            ("Healing", "1,500"),
            ("Damage", "88,000"),
            ("KP %", "37.5%"),
            ("Defender", "K6"),
            ("Attacker", "MG"),
            ("Result", "Loss"),
            ("Full", "n"),
            ("Junk", "x"),
        ]))
        .unwrap();

        let second = normalize_row(&first.to_raw_row()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("1,234,567"), 1234567.0);
        assert_eq!(coerce_number(" 42.5% "), 42.5);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("1e3"), 1000.0);
    }
}
