//! Build (role) classification.

use serde::{Deserialize, Serialize};

/// A player's combat role, inferred from the free-text build label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Build {
    Flail,
    Qdps,
    Bruiser,
    Disruptor,
    Bbx,
    Vgig,
    Fsx,
    Dex,
    Cw,
    Heals,
    Tank,
    #[default]
    Unknown,
}

/// Ordered keyword rules. The first rule with a matching needle wins, so the
/// order here is part of the classification contract.
const BUILD_RULES: &[(&[&str], Build)] = &[
    (&["flail"], Build::Flail),
    (&["qdps"], Build::Qdps),
    (&["bruis"], Build::Bruiser),
    (&["disr"], Build::Disruptor),
    (&["bb", "blunder"], Build::Bbx),
    (&["vg", "void", "ig"], Build::Vgig),
    (&["fs", "fire"], Build::Fsx),
    (&["dex", "bow", "musket"], Build::Dex),
    (&["cw"], Build::Cw),
    (&["heal"], Build::Heals),
    (&["tank"], Build::Tank),
];

/// Priority used when a build has no entry in the ordering table.
pub const UNRANKED_PRIORITY: u8 = 99;

impl Build {
    /// Every build, in the order the dashboard offers them for comparison.
    pub const ALL: [Build; 12] = [
        Build::Bruiser,
        Build::Qdps,
        Build::Disruptor,
        Build::Dex,
        Build::Vgig,
        Build::Fsx,
        Build::Bbx,
        Build::Cw,
        Build::Heals,
        Build::Tank,
        Build::Flail,
        Build::Unknown,
    ];

    /// The build that is always reported as its own squad, whatever its group.
    pub const OVERFLOW: Build = Build::Qdps;

    /// Classify a raw build label.
    ///
    /// Lower-cases the label and returns the first matching rule. Empty or
    /// unmatched labels are `Unknown`.
    pub fn classify(raw: &str) -> Self {
        if raw.is_empty() {
            return Build::Unknown;
        }
        let label = raw.to_lowercase();

        BUILD_RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| label.contains(n)))
            .map(|(_, build)| *build)
            .unwrap_or(Build::Unknown)
    }

    /// Display priority inside a group (lower sorts first).
    pub fn priority(&self) -> u8 {
        match self {
            Build::Bruiser => 1,
            Build::Disruptor => 2,
            Build::Qdps => 3,
            Build::Dex => 4,
            Build::Vgig => 5,
            Build::Fsx => 6,
            Build::Bbx => 7,
            Build::Cw => 8,
            Build::Tank => 9,
            Build::Heals => 10,
            Build::Unknown => 11,
            Build::Flail => UNRANKED_PRIORITY,
        }
    }

    /// Whether this build is pulled out of its numeric group.
    pub fn is_overflow(&self) -> bool {
        *self == Self::OVERFLOW
    }

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Build::Flail => "FLAIL",
            Build::Qdps => "QDPS",
            Build::Bruiser => "BRUISER",
            Build::Disruptor => "DISRUPTOR",
            Build::Bbx => "BBX",
            Build::Vgig => "VGIG",
            Build::Fsx => "FSX",
            Build::Dex => "DEX",
            Build::Cw => "CW",
            Build::Heals => "HEALS",
            Build::Tank => "TANK",
            Build::Unknown => "UNKNOWN",
        }
    }

    /// Parse a canonical build name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.as_str().eq_ignore_ascii_case(name))
    }
}

/// Free-function form of [`Build::classify`].
pub fn classify_build(raw: &str) -> Build {
    Build::classify(raw)
}

impl std::fmt::Display for Build {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
