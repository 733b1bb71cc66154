//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Fighters and locations keep the integer primary keys assigned by their
//! data services. Fights are never persisted, so their identifier is
//! generated app-side as a UUID v7 (time-ordered) when the result is built.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for a single fight result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FightId(pub Uuid);

impl FightId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for FightId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for FightId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for FightId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<FightId> for Uuid {
    fn from(id: FightId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_distinct_and_v7() {
        let a = FightId::new();
        let b = FightId::new();
        assert_ne!(a, b);
        assert_eq!(Uuid::from(a).get_version_num(), 7);
    }

    #[test]
    fn serializes_as_bare_uuid_string() {
        let id = FightId::from(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
