//! Card read aggregate.
//!
//! A card is not stored. It is the join of one team member, one identity
//! and that identity's attributes, ordered by attribute id.

use super::attribute::Attribute;
use super::identity::{Identity, IdentityId, Position};
use super::team_member::TeamMember;
use serde::Serialize;

/// Cards are addressed by their identity id.
pub type CardId = IdentityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub team_member: TeamMember,
    pub identity: Identity,
    pub attributes: Vec<Attribute>,
}

impl Card {
    /// Card id. `0` only for an aggregate built from an uninserted identity,
    /// which the repository never produces.
    pub fn id(&self) -> CardId {
        self.identity.id.unwrap_or_default()
    }

    pub fn position(&self) -> Position {
        self.identity.position
    }

    /// Checks the ownership chain member -> identity -> attributes.
    pub fn is_consistent(&self) -> bool {
        let Some(identity_id) = self.identity.id else {
            return false;
        };
        self.identity.team_member_id == self.team_member.id
            && self
                .attributes
                .iter()
                .all(|attribute| attribute.identity_id == identity_id)
    }
}
