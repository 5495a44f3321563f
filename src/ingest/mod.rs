//! Report ingestion.
//!
//! Turns raw war-report text into typed records:
//! - `parser`: header detection, delimiter detection and row splitting
//! - `normalize`: column allow-list, numeric coercion and build classification
//!
//! Nothing here fails. Bad cells degrade to defaults and nameless rows are
//! dropped.

pub mod normalize;
pub mod parser;

pub use normalize::{coerce_number, normalize_row, Column};
pub use parser::{detect_delimiter, parse_csv_text, parse_csv_text_with, CsvDialect};

use tracing::debug;

use crate::models::War;

/// Parse one report file's text into a `War`.
pub fn parse_war(file: &str, text: &str, dialect: CsvDialect) -> War {
    let players = parse_csv_text_with(text, dialect);
    debug!("Parsed {} records from {}", players.len(), file);
    War::new(file, players)
}
