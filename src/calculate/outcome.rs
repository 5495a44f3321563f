//! Win/loss inference from report text.
//!
//! Mixed or missing signals always resolve to `Outcome::Unknown`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::{Outcome, PlayerRecord};

const WIN_KEYWORDS: [&str; 3] = ["win", "victory", "won"];
const LOSS_KEYWORDS: [&str; 3] = ["loss", "defeat", "lost"];

/// Rows scanned by the fallback path.
const FALLBACK_ROWS: usize = 10;

static WIN_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(win|victory|won)\b").expect("valid win pattern"));

static LOSS_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(loss|defeat|lost)\b").expect("valid loss pattern"));

/// Lowercase, drop quotes and carriage returns, trim.
fn normalize_outcome_text(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| *c != '"' && *c != '\r')
        .collect::<String>()
        .trim()
        .to_string()
}

fn decide(has_win: bool, has_loss: bool) -> Option<Outcome> {
    match (has_win, has_loss) {
        (true, false) => Some(Outcome::Win),
        (false, true) => Some(Outcome::Loss),
        _ => None,
    }
}

/// Classify a single result cell. `None` when it says nothing decisive.
fn classify_result(text: &str) -> Option<Outcome> {
    match text {
        "w" | "1" => return Some(Outcome::Win),
        "l" | "0" => return Some(Outcome::Loss),
        _ => {}
    }
    decide(
        WIN_KEYWORDS.iter().any(|k| text.contains(k)),
        LOSS_KEYWORDS.iter().any(|k| text.contains(k)),
    )
}

fn classify_blob(blob: &str) -> Outcome {
    decide(WIN_WORD_RE.is_match(blob), LOSS_WORD_RE.is_match(blob)).unwrap_or_default()
}

/// Infer a war's outcome from its records.
///
/// Records carrying result text are checked in order and the first one that
/// decides wins; a cell naming both sides decides nothing. When no record
/// decides, the results of the first rows are scanned together for
/// whole-word keywords.
pub fn infer_outcome(records: &[PlayerRecord]) -> Outcome {
    let decided = records
        .iter()
        .map(|p| normalize_outcome_text(&p.result_text))
        .filter(|text| !text.is_empty())
        .find_map(|text| classify_result(&text));
    if let Some(outcome) = decided {
        return outcome;
    }

    let blob = records
        .iter()
        .take(FALLBACK_ROWS)
        .map(|p| p.result_text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    classify_blob(&normalize_outcome_text(&blob))
}

/// Infer an outcome by scanning raw report text for whole-word keywords.
pub fn infer_outcome_from_text(raw: &str) -> Outcome {
    classify_blob(&normalize_outcome_text(raw))
}

/// Side labels and result shown above a war.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matchup {
    pub defenders: String,
    pub attackers: String,
    pub outcome: Outcome,
}

impl Matchup {
    pub const DEFAULT_DEFENDERS: &'static str = "Defenders";
    pub const DEFAULT_ATTACKERS: &'static str = "Attackers";
}

/// Side labels from the first record that carries any matchup metadata.
pub fn matchup(records: &[PlayerRecord], outcome: Outcome) -> Matchup {
    let first = records.iter().find(|p| {
        !p.defender_side_label.is_empty()
            || !p.attacker_side_label.is_empty()
            || !p.result_text.is_empty()
    });

    let label = |value: Option<&String>, fallback: &str| {
        value
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    };

    Matchup {
        defenders: label(
            first.map(|p| &p.defender_side_label),
            Matchup::DEFAULT_DEFENDERS,
        ),
        attackers: label(
            first.map(|p| &p.attacker_side_label),
            Matchup::DEFAULT_ATTACKERS,
        ),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_csv_text;

    fn with_results(results: &[&str]) -> Vec<PlayerRecord> {
        let mut text = String::from("Player,Result,Defender,Attacker\n");
        for (i, result) in results.iter().enumerate() {
            text.push_str(&format!("P{},{},,\n", i, result));
        }
        parse_csv_text(&text)
    }

    #[test]
    fn test_keywords() {
        assert_eq!(infer_outcome(&with_results(&["Victory"])), Outcome::Win);
        assert_eq!(infer_outcome(&with_results(&["We won"])), Outcome::Win);
        assert_eq!(infer_outcome(&with_results(&["DEFEAT"])), Outcome::Loss);
        assert_eq!(infer_outcome(&with_results(&["lost"])), Outcome::Loss);
    }

    #[test]
    fn test_exact_tokens() {
        assert_eq!(infer_outcome(&with_results(&["W"])), Outcome::Win);
        assert_eq!(infer_outcome(&with_results(&["1"])), Outcome::Win);
        assert_eq!(infer_outcome(&with_results(&["l"])), Outcome::Loss);
        assert_eq!(infer_outcome(&with_results(&["0"])), Outcome::Loss);
    }

    #[test]
    fn test_quotes_stripped() {
        assert_eq!(infer_outcome(&with_results(&["\"Victory\""])), Outcome::Win);
    }

    #[test]
    fn test_mixed_signals_are_unknown() {
        assert_eq!(infer_outcome(&with_results(&["win loss"])), Outcome::Unknown);
        assert_eq!(
            infer_outcome_from_text("Player,Result\nAmy,win\nBob,loss\n"),
            Outcome::Unknown
        );
    }

    #[test]
    fn test_no_signal_is_unknown() {
        assert_eq!(infer_outcome(&[]), Outcome::Unknown);
        assert_eq!(infer_outcome(&with_results(&["", ""])), Outcome::Unknown);
        assert_eq!(infer_outcome(&with_results(&["draw"])), Outcome::Unknown);
        assert_eq!(infer_outcome_from_text(""), Outcome::Unknown);
    }

    #[test]
    fn test_first_result_decides() {
        assert_eq!(
            infer_outcome(&with_results(&["Victory", "Defeat"])),
            Outcome::Win
        );
    }

    #[test]
    fn test_undecided_rows_are_skipped() {
        assert_eq!(
            infer_outcome(&with_results(&["pending", "Winner"])),
            Outcome::Win
        );
        assert_eq!(
            infer_outcome(&with_results(&["win and loss", "Defeat"])),
            Outcome::Loss
        );
    }

    #[test]
    fn test_first_result_skips_blank_rows() {
        assert_eq!(infer_outcome(&with_results(&["", "Loss"])), Outcome::Loss);
    }

    #[test]
    fn test_raw_text_needs_whole_words() {
        assert_eq!(infer_outcome_from_text("Result\nVictory\n"), Outcome::Win);
        assert_eq!(infer_outcome_from_text("Result\nwinner\n"), Outcome::Unknown);
        assert_eq!(infer_outcome_from_text("\"defeat\"\r\n"), Outcome::Loss);
    }

    #[test]
    fn test_matchup_labels() {
        let text = "Player,Defender,Attacker,Result\nAmy,,,\nBob,K6,Mercguards,Victory\n";
        let records = parse_csv_text(text);
        let m = matchup(&records, Outcome::Win);
        assert_eq!(m.defenders, "K6");
        assert_eq!(m.attackers, "Mercguards");
        assert_eq!(m.outcome, Outcome::Win);
    }

    #[test]
    fn test_matchup_defaults() {
        let m = matchup(&[], Outcome::Unknown);
        assert_eq!(m.defenders, "Defenders");
        assert_eq!(m.attackers, "Attackers");
    }
}
