//! Deterministic fight resolution.
//!
//! The fighter with the strictly greater level wins. Equal levels go to the
//! hero. Identity and timestamp come from a caller-supplied [`FightStamp`],
//! so [`resolve`] performs no I/O and gives the same output for the same
//! input.

use arena_types::{FightId, FightResult, Fighter, Location, Team};
use chrono::{DateTime, Utc};

/// Identity and time assigned to a fight by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FightStamp {
    /// Identifier of the fight.
    pub fight_id: FightId,
    /// When the fight took place.
    pub fight_date: DateTime<Utc>,
}

impl FightStamp {
    /// A fresh UUID v7 and the current time.
    pub fn now() -> Self {
        Self {
            fight_id: FightId::new(),
            fight_date: Utc::now(),
        }
    }
}

/// Decide the winner of `hero` against `villain` at `location`.
pub fn resolve(
    hero: Fighter,
    villain: Fighter,
    location: Location,
    stamp: FightStamp,
) -> FightResult {
    let winner_team = if villain.level > hero.level {
        Team::Villains
    } else {
        Team::Heroes
    };
    let (winner, loser) = match winner_team {
        Team::Heroes => (&hero, &villain),
        Team::Villains => (&villain, &hero),
    };

    FightResult {
        fight_id: stamp.fight_id,
        fight_date: stamp.fight_date,
        winner_team,
        loser_team: winner_team.opponent(),
        winner_name: winner.name.clone(),
        winner_level: winner.level,
        winner_powers: winner.powers.clone(),
        winner_picture: winner.picture.clone(),
        loser_name: loser.name.clone(),
        loser_level: loser.level,
        loser_powers: loser.powers.clone(),
        loser_picture: loser.picture.clone(),
        hero,
        villain,
        location,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn fighter(name: &str, level: i32) -> Fighter {
        Fighter {
            id: 1,
            name: name.to_owned(),
            alias: None,
            level,
            powers: format!("{name} powers"),
            picture: format!("https://pics.example/{name}.png"),
        }
    }

    fn arena() -> Location {
        Location {
            id: 7,
            name: String::from("Gotham City"),
            description: String::from("Dark and rainy"),
            picture: String::new(),
        }
    }

    fn stamp() -> FightStamp {
        FightStamp {
            fight_id: FightId::from(Uuid::nil()),
            fight_date: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().unwrap_or_default(),
        }
    }

    #[test]
    fn stronger_hero_wins() {
        let result = resolve(fighter("Storm", 95), fighter("Magneto", 85), arena(), stamp());
        assert_eq!(result.winner_team, Team::Heroes);
        assert_eq!(result.loser_team, Team::Villains);
        assert_eq!(result.winner_name, "Storm");
        assert_eq!(result.winner_level, 95);
        assert_eq!(result.winner_powers, "Storm powers");
        assert_eq!(result.loser_name, "Magneto");
        assert_eq!(result.loser_level, 85);
        assert_eq!(result.loser_picture, "https://pics.example/Magneto.png");
        assert_eq!(result.location.name, "Gotham City");
    }

    #[test]
    fn stronger_villain_wins() {
        let result = resolve(fighter("Robin", 40), fighter("Joker", 90), arena(), stamp());
        assert_eq!(result.winner_team, Team::Villains);
        assert_eq!(result.loser_team, Team::Heroes);
        assert_eq!(result.winner_name, "Joker");
        assert_eq!(result.loser_name, "Robin");
        assert!(result.winner_level >= result.loser_level);
    }

    #[test]
    fn tie_goes_to_the_hero() {
        let result = resolve(fighter("Flash", 50), fighter("Reverse", 50), arena(), stamp());
        assert_eq!(result.winner_team, Team::Heroes);
        assert_eq!(result.winner_name, "Flash");
        assert_eq!(result.winner_level, result.loser_level);
    }

    #[test]
    fn zero_levels_tie_to_the_hero() {
        let result = resolve(fighter("A", 0), fighter("B", 0), arena(), stamp());
        assert_eq!(result.winner_team, Team::Heroes);
    }

    #[test]
    fn same_input_gives_same_output() {
        let a = resolve(fighter("Storm", 70), fighter("Mystique", 71), arena(), stamp());
        let b = resolve(fighter("Storm", 70), fighter("Mystique", 71), arena(), stamp());
        assert_eq!(a, b);
    }

    #[test]
    fn stamp_is_carried_through() {
        let stamp = stamp();
        let result = resolve(fighter("A", 1), fighter("B", 2), arena(), stamp);
        assert_eq!(result.fight_id, stamp.fight_id);
        assert_eq!(result.fight_date, stamp.fight_date);
        assert_eq!(result.hero.name, "A");
        assert_eq!(result.villain.name, "B");
    }

    #[test]
    fn winner_level_never_below_loser_level() {
        for hero in -1..=3 {
            for villain in -1..=3 {
                let result =
                    resolve(fighter("H", hero), fighter("V", villain), arena(), stamp());
                assert!(result.winner_level >= result.loser_level);
            }
        }
    }
}
