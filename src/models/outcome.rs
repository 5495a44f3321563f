//! War outcome.

use serde::{Deserialize, Serialize};

/// Categorical war result. `Unknown` is a valid answer, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    #[default]
    Unknown,
}

impl Outcome {
    /// Single-character badge shown next to a war label.
    pub fn badge(&self) -> &'static str {
        match self {
            Outcome::Win => "W",
            Outcome::Loss => "L",
            Outcome::Unknown => "?",
        }
    }

    /// Banner text for the matchup header.
    pub fn banner(&self) -> &'static str {
        match self {
            Outcome::Win => "VICTORY",
            Outcome::Loss => "DEFEAT",
            Outcome::Unknown => "UNDECIDED",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Loss => write!(f, "loss"),
            Outcome::Unknown => write!(f, "unknown"),
        }
    }
}
