//! Loaded war reports.
//!
//! `WarRepository` is the explicit context handed to every cross-war
//! calculation. It owns the parsed wars, keyed by filename, and knows the
//! canonical display order and which wars count as full.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ingest::{parse_war, CsvDialect};
use crate::models::{War, WarScope};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Wars keyed by source filename.
#[derive(Debug, Clone, Default)]
pub struct WarRepository {
    wars: BTreeMap<String, War>,
}

impl WarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a war, replacing any war loaded from the same file.
    pub fn insert(&mut self, war: War) -> Option<War> {
        self.wars.insert(war.file.clone(), war)
    }

    /// Parse report text and add it.
    pub fn insert_text(&mut self, file: &str, text: &str, dialect: CsvDialect) -> Option<War> {
        self.insert(parse_war(file, text, dialect))
    }

    /// Load every file in `dir` whose name matches `pattern`.
    ///
    /// Files are read one at a time in name order. Unreadable files and
    /// files without any player rows are skipped with a warning.
    pub fn load_dir(dir: &Path, pattern: &str, dialect: CsvDialect) -> Result<Self, StorageError> {
        if !dir.is_dir() {
            return Err(StorageError::PathNotFound(dir.to_path_buf()));
        }
        let pattern = glob::Pattern::new(pattern)?;

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if pattern.matches(name) {
                    files.push(name.to_string());
                }
            }
        }
        files.sort();

        let mut repo = Self::new();
        for name in files {
            let text = match fs::read_to_string(dir.join(&name)) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping unreadable report {}: {}", name, e);
                    continue;
                }
            };

            let war = parse_war(&name, text.trim_start_matches('\u{feff}'), dialect);
            if war.players.is_empty() {
                warn!("Skipping {}: no player rows", name);
                continue;
            }

            debug!(
                "Loaded {} ({} players, {})",
                name,
                war.players.len(),
                war.outcome
            );
            repo.insert(war);
        }

        info!("Loaded {} wars from {}", repo.len(), dir.display());
        Ok(repo)
    }

    pub fn len(&self) -> usize {
        self.wars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wars.is_empty()
    }

    pub fn get(&self, file: &str) -> Option<&War> {
        self.wars.get(file)
    }

    /// All wars in filename order.
    pub fn wars(&self) -> impl Iterator<Item = &War> {
        self.wars.values()
    }

    /// Wars in scope, in canonical order: dated wars newest first, then
    /// undated wars by filename descending.
    pub fn visible_wars(&self, scope: WarScope) -> Vec<&War> {
        let mut wars: Vec<&War> = self
            .wars
            .values()
            .filter(|w| scope == WarScope::All || w.is_full())
            .collect();

        // Option orders None first, so reversing puts undated wars last
        wars.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.file.cmp(&a.file)));
        wars
    }

    /// Full wars in canonical order.
    pub fn full_wars(&self) -> Vec<&War> {
        self.visible_wars(WarScope::Full)
    }
}
