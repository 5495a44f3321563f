//! A single war report and the metadata inferred from its filename.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Outcome, PlayerRecord};

/// Opponent label used when the filename does not follow the convention.
pub const UNKNOWN_OPPONENT: &str = "Unknown";

static FILE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[_-])(\d{1,2})-(\d{1,2})-(\d{2})(?:$|[_-])").expect("valid date pattern")
});

static OPPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^MGv([^_]+)[_-]").expect("valid opponent pattern"));

fn file_stem(file: &str) -> &str {
    file.strip_suffix(".csv").unwrap_or(file)
}

/// Parse the `MM-DD-YY` date embedded in a report filename.
///
/// Two-digit years are read as 20YY. Out-of-range months or days give `None`.
pub fn parse_file_date(file: &str) -> Option<NaiveDate> {
    let caps = FILE_DATE_RE.captures(file_stem(file))?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let yy: i32 = caps[3].parse().ok()?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    NaiveDate::from_ymd_opt(2000 + yy, month, day)
}

/// Parse the opponent from an `MGv<Opponent>_...` filename.
pub fn parse_opponent(file: &str) -> String {
    OPPONENT_RE
        .captures(file_stem(file))
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| UNKNOWN_OPPONENT.to_string())
}

/// Human-readable date, e.g. `Nov 18, 2025`.
pub fn format_readable_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// One CSV report: every player record plus file-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct War {
    /// Source filename, also the war's identity
    pub file: String,

    /// Date from the filename, if present
    pub date: Option<NaiveDate>,

    /// Opponent from the filename
    pub opponent: String,

    /// Inferred result
    pub outcome: Outcome,

    /// Records in file order
    pub players: Vec<PlayerRecord>,
}

impl War {
    /// Build a war from already-normalized records.
    pub fn new(file: impl Into<String>, players: Vec<PlayerRecord>) -> Self {
        let file = file.into();
        let outcome = crate::calculate::infer_outcome(&players);

        Self {
            date: parse_file_date(&file),
            opponent: parse_opponent(&file),
            file,
            outcome,
            players,
        }
    }

    /// A war is full when it has records and every record is flagged full.
    pub fn is_full(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.full_war.is_yes())
    }

    /// Records ordered by rank (stable).
    pub fn ledger(&self) -> Vec<&PlayerRecord> {
        let mut ledger: Vec<_> = self.players.iter().collect();
        ledger.sort_by_key(|p| p.rank);
        ledger
    }

    /// Find a player by identity key.
    pub fn find_player(&self, key: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.key() == key)
    }

    pub fn contains_player(&self, key: &str) -> bool {
        self.find_player(key).is_some()
    }

    /// Display label: `MG vs <Opponent>`, plus the date when known.
    pub fn label(&self) -> String {
        match self.date {
            Some(date) => format!("MG vs {} ({})", self.opponent, format_readable_date(date)),
            None => format!("MG vs {}", self.opponent),
        }
    }
}
