//! Core entity structs exchanged between the arena services.
//!
//! The data services own [`Fighter`] and [`Location`] rows; the fights
//! service only ever holds them for the lifetime of one request and folds
//! them into a [`FightResult`]. JSON uses camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

use crate::enums::Team;
use crate::ids::FightId;

// ---------------------------------------------------------------------------
// Fighters and locations
// ---------------------------------------------------------------------------

/// A hero or a villain.
///
/// Heroes and villains share one shape; which roster a fighter came from is
/// tracked by the position it occupies in a fight, not by the record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Fighter {
    /// Primary key assigned by the owning data service.
    #[serde(default)]
    pub id: i64,
    /// Display name.
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Secret identity, if any. Accepts the legacy `otherName` key.
    #[serde(default, alias = "otherName")]
    pub alias: Option<String>,
    /// Power level. Higher wins.
    #[validate(range(min = 0, message = "level must be non-negative"))]
    pub level: i32,
    /// Free-form description of the fighter's powers.
    #[serde(default)]
    pub powers: String,
    /// Picture URL.
    #[serde(default)]
    pub picture: String,
}

/// A place where a fight happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// Primary key assigned by the locations service.
    #[serde(default)]
    pub id: i64,
    /// Display name.
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Picture URL.
    #[serde(default)]
    pub picture: String,
}

// ---------------------------------------------------------------------------
// Fight requests and results
// ---------------------------------------------------------------------------

/// Caller-supplied fighters and location for a custom fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[ts(export, export_to = "bindings/")]
pub struct FightRequest {
    /// The hero.
    #[validate(nested)]
    pub hero: Fighter,
    /// The villain.
    #[validate(nested)]
    pub villain: Fighter,
    /// Where the fight happens.
    #[validate(nested)]
    pub location: Location,
}

/// One hero and one villain drawn at random, not yet fought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Fighters {
    /// The hero.
    pub hero: Fighter,
    /// The villain.
    pub villain: Fighter,
}

/// The outcome of one fight.
///
/// Built exactly once per request and never mutated afterwards. The
/// winner/loser fields are denormalized copies of the matching fighter so
/// clients can render a result without inspecting `winner_team`.
///
/// Invariant: `winner_level >= loser_level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FightResult {
    /// Identifier of this fight.
    pub fight_id: FightId,
    /// When the fight was resolved.
    pub fight_date: DateTime<Utc>,
    /// The hero that took part.
    pub hero: Fighter,
    /// The villain that took part.
    pub villain: Fighter,
    /// Where it happened.
    pub location: Location,
    /// Team of the winner.
    pub winner_team: Team,
    /// Team of the loser.
    pub loser_team: Team,
    /// Winner's name.
    pub winner_name: String,
    /// Winner's level.
    pub winner_level: i32,
    /// Winner's powers.
    pub winner_powers: String,
    /// Winner's picture URL.
    pub winner_picture: String,
    /// Loser's name.
    pub loser_name: String,
    /// Loser's level.
    pub loser_level: i32,
    /// Loser's powers.
    pub loser_powers: String,
    /// Loser's picture URL.
    pub loser_picture: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter(name: &str, level: i32) -> Fighter {
        Fighter {
            id: 1,
            name: name.to_owned(),
            alias: None,
            level,
            powers: String::from("flight"),
            picture: String::from("https://example.com/a.png"),
        }
    }

    fn location() -> Location {
        Location {
            id: 3,
            name: String::from("Gotham"),
            description: String::from("A dark city"),
            picture: String::new(),
        }
    }

    #[test]
    fn fighter_accepts_legacy_other_name() {
        let json = r#"{"id":7,"name":"Bruce","otherName":"Batman","level":40,"powers":"money","picture":""}"#;
        let parsed: Result<Fighter, _> = serde_json::from_str(json);
        assert!(parsed.is_ok());
        let parsed = parsed.unwrap_or_else(|_| fighter("x", 0));
        assert_eq!(parsed.alias.as_deref(), Some("Batman"));
        assert_eq!(parsed.level, 40);
    }

    #[test]
    fn negative_level_fails_validation() {
        let request = FightRequest {
            hero: fighter("Hero", -1),
            villain: fighter("Villain", 10),
            location: location(),
        };
        let errors = request.validate();
        assert!(errors.is_err());
    }

    #[test]
    fn empty_name_fails_validation() {
        let request = FightRequest {
            hero: fighter("Hero", 1),
            villain: fighter("", 10),
            location: location(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn valid_request_passes() {
        let request = FightRequest {
            hero: fighter("Hero", 0),
            villain: fighter("Villain", 0),
            location: location(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn fight_result_uses_camel_case_keys() {
        let result = FightResult {
            fight_id: FightId::new(),
            fight_date: Utc::now(),
            hero: fighter("Hero", 5),
            villain: fighter("Villain", 3),
            location: location(),
            winner_team: Team::Heroes,
            loser_team: Team::Villains,
            winner_name: String::from("Hero"),
            winner_level: 5,
            winner_powers: String::from("flight"),
            winner_picture: String::new(),
            loser_name: String::from("Villain"),
            loser_level: 3,
            loser_powers: String::from("flight"),
            loser_picture: String::new(),
        };
        let value = serde_json::to_value(&result).unwrap_or_default();
        assert_eq!(value["winnerTeam"], "heroes");
        assert_eq!(value["loserLevel"], 3);
        assert!(value["fightId"].is_string());
        assert!(value["fightDate"].is_string());
    }
}
