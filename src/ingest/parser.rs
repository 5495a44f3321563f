//! CSV text -> player records.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::normalize::normalize_row;
use crate::models::{PlayerRecord, RawRow};

/// How cells are split out of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CsvDialect {
    /// Plain delimiter split. A delimiter inside a quoted cell misaligns the
    /// row, exactly as existing exports have always been read.
    #[default]
    Legacy,
    /// RFC 4180 quoting.
    Quoted,
}

impl std::str::FromStr for CsvDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(CsvDialect::Legacy),
            "quoted" => Ok(CsvDialect::Quoted),
            other => Err(format!("unknown CSV dialect '{}'", other)),
        }
    }
}

/// Tab when the text contains a tab anywhere, otherwise comma.
pub fn detect_delimiter(text: &str) -> char {
    if text.contains('\t') {
        '\t'
    } else {
        ','
    }
}

/// Parse report text with the legacy dialect.
pub fn parse_csv_text(text: &str) -> Vec<PlayerRecord> {
    parse_csv_text_with(text, CsvDialect::Legacy)
}

/// Parse report text. Rows without a player are dropped; text without a
/// header line yields no records.
pub fn parse_csv_text_with(text: &str, dialect: CsvDialect) -> Vec<PlayerRecord> {
    let rows = match dialect {
        CsvDialect::Legacy => split_legacy(text),
        CsvDialect::Quoted => split_quoted(text),
    };

    let total = rows.len();
    let records: Vec<PlayerRecord> = rows.iter().filter_map(normalize_row).collect();

    if records.len() < total {
        debug!(
            "Dropped {} of {} rows without a player name",
            total - records.len(),
            total
        );
    }

    records
}

fn split_legacy(text: &str) -> Vec<RawRow> {
    let delimiter = detect_delimiter(text);
    let mut lines = text.split('\n').map(str::trim).filter(|l| !l.is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<&str> = header_line.split(delimiter).map(str::trim).collect();

    lines
        .map(|line| {
            let cells: Vec<&str> = line.split(delimiter).map(str::trim).collect();
            zip_row(&headers, &cells)
        })
        .collect()
}

fn split_quoted(text: &str) -> Vec<RawRow> {
    let delimiter = detect_delimiter(text) as u8;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(|s| s.trim().to_string()).collect(),
        Err(e) => {
            warn!("Unreadable CSV header: {}", e);
            return Vec::new();
        }
    };
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                if record.iter().all(|c| c.trim().is_empty()) {
                    continue;
                }
                let cells: Vec<&str> = record.iter().collect();
                rows.push(zip_row(&headers, &cells));
            }
            Err(e) => warn!("Skipping unreadable CSV record {}: {}", line + 2, e),
        }
    }
    rows
}

/// Pair header names with cells. Missing trailing cells are absent from the
/// row; surplus cells are ignored.
fn zip_row(headers: &[&str], cells: &[&str]) -> RawRow {
    headers
        .iter()
        .zip(cells.iter())
        .map(|(h, c)| (*h, *c))
        .collect()
}
