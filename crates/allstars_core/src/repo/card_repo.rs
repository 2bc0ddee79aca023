//! Card repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Produce `Card` aggregates from the identity/member/attribute join.
//! - Provide the row-level writes the card operations are built from.
//!
//! # Invariants
//! - Cards are ordered by position code, then identity id.
//! - Attributes inside a card are ordered by attribute id.
//! - Writes reject ratings outside `1..=100` before touching SQL.

use super::{ensure_connection_ready, PersistenceError, PersistenceResult};
use crate::model::attribute::{is_valid_rating, Attribute, AttributeId};
use crate::model::card::{Card, CardId};
use crate::model::identity::{Category, Identity, IdentityId, Position};
use crate::model::team_member::TeamMember;
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;

const CARD_SELECT_SQL: &str = "SELECT
    i.\"id\" AS identity_id,
    i.\"teamMemberId\" AS team_member_id,
    i.\"category\" AS category,
    i.\"position\" AS position,
    t.\"name\" AS team_member_name,
    t.\"sortKey\" AS sort_key
FROM \"identity\" i
JOIN \"teamMember\" t ON t.\"id\" = i.\"teamMemberId\"";

const ATTRIBUTE_SELECT_SQL: &str =
    "SELECT \"id\", \"identityId\", \"name\", \"value\" FROM \"attribute\"";

/// Repository interface for card reads and row-level writes.
pub trait CardRepository {
    /// Every card, ordered by position then id.
    fn list_cards(&self) -> PersistenceResult<Vec<Card>>;
    fn get_card(&self, id: CardId) -> PersistenceResult<Option<Card>>;
    /// Inserts `identity` and stores the assigned id back into it.
    fn insert_identity(&self, identity: &mut Identity) -> PersistenceResult<IdentityId>;
    /// Inserts `attribute` and stores the assigned id back into it.
    fn insert_attribute(&self, attribute: &mut Attribute) -> PersistenceResult<AttributeId>;
    /// Updates `attribute` by id, inserting it when no row matches.
    fn save_attribute(&self, attribute: &mut Attribute) -> PersistenceResult<AttributeId>;
    fn attributes_for(&self, identity_id: IdentityId) -> PersistenceResult<Vec<Attribute>>;
    /// Deletes one identity (attributes cascade). Returns rows affected.
    fn delete_identity(&self, id: IdentityId) -> PersistenceResult<usize>;
}

/// SQLite-backed card repository.
pub struct SqliteCardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCardRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> PersistenceResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CardRepository for SqliteCardRepository<'_> {
    fn list_cards(&self) -> PersistenceResult<Vec<Card>> {
        let mut attributes = self.attributes_by_identity()?;

        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} ORDER BY i.\"position\" ASC, i.\"id\" ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            let (team_member, identity) = parse_card_row(row)?;
            let identity_id = identity.id.unwrap_or_default();
            cards.push(Card {
                team_member,
                identity,
                attributes: attributes.remove(&identity_id).unwrap_or_default(),
            });
        }

        Ok(cards)
    }

    fn get_card(&self, id: CardId) -> PersistenceResult<Option<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} WHERE i.\"id\" = ?1;"))?;
        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let (team_member, identity) = parse_card_row(row)?;
        Ok(Some(Card {
            team_member,
            identity,
            attributes: self.attributes_for(id)?,
        }))
    }

    fn insert_identity(&self, identity: &mut Identity) -> PersistenceResult<IdentityId> {
        self.conn.execute(
            "INSERT INTO \"identity\" (\"id\", \"teamMemberId\", \"category\", \"position\")
             VALUES (?1, ?2, ?3, ?4);",
            params![
                identity.id,
                identity.team_member_id,
                identity.category.code(),
                identity.position.code(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        identity.id = Some(id);
        Ok(id)
    }

    fn insert_attribute(&self, attribute: &mut Attribute) -> PersistenceResult<AttributeId> {
        validate_rating(attribute)?;

        self.conn.execute(
            "INSERT INTO \"attribute\" (\"id\", \"identityId\", \"name\", \"value\")
             VALUES (?1, ?2, ?3, ?4);",
            params![
                attribute.id,
                attribute.identity_id,
                attribute.name.as_str(),
                attribute.value,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        attribute.id = Some(id);
        Ok(id)
    }

    fn save_attribute(&self, attribute: &mut Attribute) -> PersistenceResult<AttributeId> {
        validate_rating(attribute)?;

        if let Some(id) = attribute.id {
            let changed = self.conn.execute(
                "UPDATE \"attribute\"
                 SET \"identityId\" = ?2, \"name\" = ?3, \"value\" = ?4
                 WHERE \"id\" = ?1;",
                params![id, attribute.identity_id, attribute.name.as_str(), attribute.value],
            )?;
            if changed > 0 {
                return Ok(id);
            }
        }

        self.insert_attribute(attribute)
    }

    fn attributes_for(&self, identity_id: IdentityId) -> PersistenceResult<Vec<Attribute>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ATTRIBUTE_SELECT_SQL} WHERE \"identityId\" = ?1 ORDER BY \"id\" ASC;"
        ))?;
        let mut rows = stmt.query([identity_id])?;
        let mut attributes = Vec::new();
        while let Some(row) = rows.next()? {
            attributes.push(parse_attribute_row(row)?);
        }
        Ok(attributes)
    }

    fn delete_identity(&self, id: IdentityId) -> PersistenceResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM \"identity\" WHERE \"id\" = ?1;", [id])?;
        Ok(changed)
    }
}

impl SqliteCardRepository<'_> {
    fn attributes_by_identity(&self) -> PersistenceResult<HashMap<IdentityId, Vec<Attribute>>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ATTRIBUTE_SELECT_SQL} ORDER BY \"identityId\" ASC, \"id\" ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut grouped: HashMap<IdentityId, Vec<Attribute>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let attribute = parse_attribute_row(row)?;
            grouped
                .entry(attribute.identity_id)
                .or_default()
                .push(attribute);
        }
        Ok(grouped)
    }
}

fn validate_rating(attribute: &Attribute) -> PersistenceResult<()> {
    if is_valid_rating(attribute.value) {
        return Ok(());
    }
    Err(PersistenceError::InvalidRating {
        name: attribute.name.clone(),
        value: attribute.value,
    })
}

fn parse_card_row(row: &Row<'_>) -> PersistenceResult<(TeamMember, Identity)> {
    let identity_id: IdentityId = row.get("identity_id")?;

    let category_code: i64 = row.get("category")?;
    let category = Category::from_code(category_code).ok_or_else(|| {
        PersistenceError::InvalidData(format!(
            "invalid category code `{category_code}` in identity {identity_id}"
        ))
    })?;

    let position_code: i64 = row.get("position")?;
    let position = Position::from_code(position_code).ok_or_else(|| {
        PersistenceError::InvalidData(format!(
            "invalid position code `{position_code}` in identity {identity_id}"
        ))
    })?;

    let team_member = TeamMember {
        id: row.get("team_member_id")?,
        name: row.get("team_member_name")?,
        sort_key: row.get("sort_key")?,
    };
    let identity = Identity {
        id: Some(identity_id),
        team_member_id: team_member.id,
        category,
        position,
    };
    Ok((team_member, identity))
}

fn parse_attribute_row(row: &Row<'_>) -> PersistenceResult<Attribute> {
    let attribute = Attribute {
        id: Some(row.get("id")?),
        identity_id: row.get("identityId")?,
        name: row.get("name")?,
        value: row.get("value")?,
    };
    if !is_valid_rating(attribute.value) {
        return Err(PersistenceError::InvalidData(format!(
            "rating {} out of range in attribute {}",
            attribute.value,
            attribute.id.unwrap_or_default()
        )));
    }
    Ok(attribute)
}
