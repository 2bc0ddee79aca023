//! Card identity: who the card is for, its tier and its field position.
//!
//! # Responsibility
//! - Define `Position` and `Category` with storage-stable integer codes.
//! - Define the `Identity` record owned by a team member.
//!
//! # Invariants
//! - Enum codes follow declaration order and must never be reordered.
//! - `Position::is_pitcher` holds only for `StartingPitcher` and `Reliever`.

use super::attribute::{BATTER_ATTRIBUTE_NAMES, PITCHER_ATTRIBUTE_NAMES};
use super::roll::RandomSource;
use super::team_member::TeamMemberId;
use serde::{Deserialize, Serialize};

/// Auto-assigned identity row id. Doubles as the card id.
pub type IdentityId = i64;

/// Field position of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    StartingPitcher,
    Reliever,
    Catcher,
    FirstBase,
    SecondBase,
    Shortstop,
    ThirdBase,
    RightField,
    CenterField,
    LeftField,
    DesignatedHitter,
}

impl Position {
    /// Every position in storage order.
    pub const ALL: [Position; 11] = [
        Position::StartingPitcher,
        Position::Reliever,
        Position::Catcher,
        Position::FirstBase,
        Position::SecondBase,
        Position::Shortstop,
        Position::ThirdBase,
        Position::RightField,
        Position::CenterField,
        Position::LeftField,
        Position::DesignatedHitter,
    ];

    /// Storage encoding.
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::StartingPitcher => "SP",
            Self::Reliever => "RP",
            Self::Catcher => "C",
            Self::FirstBase => "1B",
            Self::SecondBase => "2B",
            Self::Shortstop => "SS",
            Self::ThirdBase => "3B",
            Self::RightField => "RF",
            Self::CenterField => "CF",
            Self::LeftField => "LF",
            Self::DesignatedHitter => "DH",
        }
    }

    pub fn is_pitcher(self) -> bool {
        matches!(self, Self::StartingPitcher | Self::Reliever)
    }

    /// Attribute vocabulary a card at this position is rated on.
    pub fn attribute_names(self) -> &'static [&'static str] {
        if self.is_pitcher() {
            return &PITCHER_ATTRIBUTE_NAMES;
        }
        &BATTER_ATTRIBUTE_NAMES
    }

    /// Uniformly random position.
    pub fn random(source: &mut impl RandomSource) -> Self {
        Self::ALL[source.next_index(Self::ALL.len())]
    }
}

/// Rarity tier of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Rookie,
    Veteran,
    AllStar,
    HallOfFamer,
    AllTimeLegend,
}

impl Category {
    /// Every category in storage order.
    pub const ALL: [Category; 5] = [
        Category::Rookie,
        Category::Veteran,
        Category::AllStar,
        Category::HallOfFamer,
        Category::AllTimeLegend,
    ];

    /// Storage encoding.
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Rookie => "Rookie",
            Self::Veteran => "Veteran",
            Self::AllStar => "All-Star",
            Self::HallOfFamer => "Hall of Famer",
            Self::AllTimeLegend => "All-Time Legend",
        }
    }

    /// Uniformly random category.
    pub fn random(source: &mut impl RandomSource) -> Self {
        Self::ALL[source.next_index(Self::ALL.len())]
    }
}

/// One card identity row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// `None` until the row has been inserted.
    pub id: Option<IdentityId>,
    pub team_member_id: TeamMemberId,
    pub category: Category,
    pub position: Position,
}

impl Identity {
    pub fn new(team_member_id: TeamMemberId, category: Category, position: Position) -> Self {
        Self {
            id: None,
            team_member_id,
            category,
            position,
        }
    }

    /// Draws category then position from `source`.
    pub fn random_for(team_member_id: TeamMemberId, source: &mut impl RandomSource) -> Self {
        let category = Category::random(source);
        let position = Position::random(source);
        Self::new(team_member_id, category, position)
    }
}
