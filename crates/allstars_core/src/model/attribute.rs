//! Attribute ratings attached to a card identity.
//!
//! # Invariants
//! - `value` is within `MIN_RATING..=MAX_RATING`.
//! - `name` comes from the pitcher or batter vocabulary and never changes
//!   after creation.

use super::identity::{IdentityId, Position};
use super::roll::RandomSource;
use serde::{Deserialize, Serialize};

pub type AttributeId = i64;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 100;

/// Attribute names rated on pitching positions, in insertion order.
pub const PITCHER_ATTRIBUTE_NAMES: [&str; 5] =
    ["Stuff", "Movement", "Control", "Stamina", "Hold Runners"];

/// Attribute names rated on every other position, in insertion order.
pub const BATTER_ATTRIBUTE_NAMES: [&str; 8] = [
    "Contact",
    "Gap Power",
    "Home Run Power",
    "Eye",
    "Avoid K's",
    "Speed",
    "Stealing",
    "Baserunning",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// `None` until the row has been inserted.
    pub id: Option<AttributeId>,
    pub identity_id: IdentityId,
    pub name: String,
    pub value: i64,
}

impl Attribute {
    pub fn new(identity_id: IdentityId, name: impl Into<String>, value: i64) -> Self {
        Self {
            id: None,
            identity_id,
            name: name.into(),
            value,
        }
    }

    /// Builds a fresh attribute set for the inserted identity `identity_id`,
    /// one per name of the `position` vocabulary, each with an independent
    /// rating draw.
    pub fn random_for(
        identity_id: IdentityId,
        position: Position,
        source: &mut impl RandomSource,
    ) -> Vec<Self> {
        position
            .attribute_names()
            .iter()
            .map(|name| Self::new(identity_id, *name, random_rating(source)))
            .collect()
    }

    /// Re-rolls `value` with a fresh uniform draw.
    pub fn randomize_value(&mut self, source: &mut impl RandomSource) {
        self.value = random_rating(source);
    }
}

/// Returns whether `value` is a legal rating.
pub fn is_valid_rating(value: i64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&value)
}

fn random_rating(source: &mut impl RandomSource) -> i64 {
    let span = (MAX_RATING - MIN_RATING + 1) as usize;
    MIN_RATING + source.next_index(span) as i64
}

#[cfg(test)]
mod tests {
    use super::{is_valid_rating, Attribute, BATTER_ATTRIBUTE_NAMES, PITCHER_ATTRIBUTE_NAMES};
    use crate::model::identity::Position;
    use crate::model::roll::{ScriptedRolls, SeededRolls};

    #[test]
    fn pitcher_gets_pitcher_vocabulary() {
        let attributes = Attribute::random_for(40, Position::Reliever, &mut SeededRolls::new(1));
        let names: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, PITCHER_ATTRIBUTE_NAMES);
        assert!(attributes.iter().all(|a| a.identity_id == 40 && a.id.is_none()));
    }

    #[test]
    fn batter_gets_batter_vocabulary() {
        let attributes = Attribute::random_for(41, Position::Shortstop, &mut SeededRolls::new(2));
        let names: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, BATTER_ATTRIBUTE_NAMES);
        assert!(attributes.iter().all(|a| a.identity_id == 41));
    }

    #[test]
    fn every_position_gets_a_full_attribute_set() {
        let mut rolls = SeededRolls::new(3);
        for position in Position::ALL {
            let attributes = Attribute::random_for(7, position, &mut rolls);
            let expected = if position.is_pitcher() { 5 } else { 8 };
            assert_eq!(attributes.len(), expected, "{position:?}");
        }
    }

    #[test]
    fn ratings_cover_both_bounds() {
        let mut rolls = ScriptedRolls::new([0, 99]);
        let mut attribute = Attribute::new(1, "Eye", 50);
        attribute.randomize_value(&mut rolls);
        assert_eq!(attribute.value, 1);
        attribute.randomize_value(&mut rolls);
        assert_eq!(attribute.value, 100);
    }

    #[test]
    fn randomized_values_stay_in_range() {
        let mut rolls = SeededRolls::new(7);
        let mut attribute = Attribute::new(1, "Speed", 1);
        for _ in 0..1_000 {
            attribute.randomize_value(&mut rolls);
            assert!(is_valid_rating(attribute.value), "out of range: {}", attribute.value);
        }
        assert!(!is_valid_rating(0));
        assert!(!is_valid_rating(101));
    }
}
