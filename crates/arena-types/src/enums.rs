//! Enumeration types for the arena.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The side a fighter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Team {
    /// The heroes roster.
    Heroes,
    /// The villains roster.
    Villains,
}

impl Team {
    /// The team on the other side of the fight.
    pub const fn opponent(self) -> Self {
        match self {
            Self::Heroes => Self::Villains,
            Self::Villains => Self::Heroes,
        }
    }

    /// Lowercase name used in JSON and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heroes => "heroes",
            Self::Villains => "villains",
        }
    }
}

impl core::fmt::Display for Team {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
