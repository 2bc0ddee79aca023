//! Card use-case service.
//!
//! # Responsibility
//! - Expose the four card operations (list, create, update, delete) plus
//!   the roster reads the team picker needs.
//! - Run every mutation as one store write transaction.
//!
//! # Invariants
//! - A failed create leaves no identity or attribute behind.
//! - A failed update leaves every rating unchanged.
//! - Deleting a card never touches its team member.

use crate::db::Store;
use crate::model::attribute::Attribute;
use crate::model::card::{Card, CardId};
use crate::model::identity::Identity;
use crate::model::roll::{RandomSource, ThreadRolls};
use crate::model::team_member::{TeamMember, TeamMemberId};
use crate::repo::card_repo::{CardRepository, SqliteCardRepository};
use crate::repo::team_repo::{group_by_sort_key, SqliteTeamRepository, TeamRepository, TeamSection};
use crate::repo::{PersistenceError, PersistenceResult};
use log::{info, warn};
use std::time::Instant;

/// Card operations over a shared store.
pub struct CardService<'store, S: RandomSource> {
    store: &'store Store,
    rolls: S,
}

impl<'store> CardService<'store, ThreadRolls> {
    /// Service drawing from the thread-local generator.
    pub fn new(store: &'store Store) -> Self {
        Self::with_rolls(store, ThreadRolls::new())
    }
}

impl<'store, S: RandomSource> CardService<'store, S> {
    /// Service drawing from a caller-supplied source.
    pub fn with_rolls(store: &'store Store, rolls: S) -> Self {
        Self { store, rolls }
    }

    /// Lists every card ordered by position, then creation order.
    pub fn list_cards(&self) -> PersistenceResult<Vec<Card>> {
        self.store
            .read(|conn| SqliteCardRepository::try_new(conn)?.list_cards())
    }

    pub fn get_card(&self, card_id: CardId) -> PersistenceResult<Option<Card>> {
        self.store
            .read(|conn| SqliteCardRepository::try_new(conn)?.get_card(card_id))
    }

    /// Creates a random card for `team_member_id` and returns its id.
    ///
    /// # Contract
    /// - Category and position are independent uniform draws.
    /// - One attribute per vocabulary name, each rated independently.
    /// - `UnknownTeamMember` when the member is not in the roster.
    pub fn create_card(&mut self, team_member_id: TeamMemberId) -> PersistenceResult<CardId> {
        let started_at = Instant::now();
        let rolls = &mut self.rolls;
        let result = self.store.write(|tx| {
            let team = SqliteTeamRepository::try_new(tx)?;
            if team.get_team_member(team_member_id)?.is_none() {
                return Err(PersistenceError::UnknownTeamMember(team_member_id));
            }

            let cards = SqliteCardRepository::try_new(tx)?;
            let mut identity = Identity::random_for(team_member_id, rolls);
            let card_id = cards.insert_identity(&mut identity)?;
            for mut attribute in Attribute::random_for(card_id, identity.position, rolls) {
                cards.insert_attribute(&mut attribute)?;
            }
            Ok(card_id)
        });

        match &result {
            Ok(card_id) => info!(
                "event=card_create module=card status=ok team_member_id={} card_id={} duration_ms={}",
                team_member_id,
                card_id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=card_create module=card status=error team_member_id={} duration_ms={} error={}",
                team_member_id,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Re-rolls every rating of one card.
    ///
    /// Names, attribute ids and the owning identity are unchanged.
    /// `NotFound` when the card does not exist.
    pub fn update_card(&mut self, card_id: CardId) -> PersistenceResult<()> {
        let started_at = Instant::now();
        let rolls = &mut self.rolls;
        let result = self.store.write(|tx| {
            let cards = SqliteCardRepository::try_new(tx)?;
            let card = cards
                .get_card(card_id)?
                .ok_or(PersistenceError::NotFound(card_id))?;

            let rerolled = card.attributes.len();
            for mut attribute in card.attributes {
                attribute.randomize_value(rolls);
                cards.save_attribute(&mut attribute)?;
            }
            Ok(rerolled)
        });

        match result {
            Ok(rerolled) => {
                info!(
                    "event=card_update module=card status=ok card_id={} rerolled={} duration_ms={}",
                    card_id,
                    rerolled,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=card_update module=card status=error card_id={} duration_ms={} error={}",
                    card_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Deletes one card. Attributes go with it; the team member stays.
    ///
    /// Deleting a card that no longer exists is a no-op.
    pub fn delete_card(&self, card_id: CardId) -> PersistenceResult<()> {
        let started_at = Instant::now();
        let result = self
            .store
            .write(|tx| SqliteCardRepository::try_new(tx)?.delete_identity(card_id));

        match result {
            Ok(deleted) => {
                info!(
                    "event=card_delete module=card status=ok card_id={} deleted={} duration_ms={}",
                    card_id,
                    deleted,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=card_delete module=card status=error card_id={} duration_ms={} error={}",
                    card_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Full roster, ordered by sort key.
    pub fn list_team(&self) -> PersistenceResult<Vec<TeamMember>> {
        self.store
            .read(|conn| SqliteTeamRepository::try_new(conn)?.list_team_members())
    }

    /// Roster grouped into alphabetical sections.
    pub fn team_sections(&self) -> PersistenceResult<Vec<TeamSection>> {
        Ok(group_by_sort_key(self.list_team()?))
    }
}
