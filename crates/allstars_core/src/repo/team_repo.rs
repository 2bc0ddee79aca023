//! Team roster reads and alphabetical sectioning.
//!
//! # Invariants
//! - The roster is read-only; card operations never delete members.
//! - Sections are sorted by title and partition the input roster.

use super::{ensure_connection_ready, PersistenceResult};
use crate::model::team_member::{TeamMember, TeamMemberId};
use rusqlite::{Connection, OptionalExtension, Row};
use std::collections::BTreeMap;

const TEAM_SELECT_SQL: &str = "SELECT \"id\", \"name\", \"sortKey\" FROM \"teamMember\"";

/// One alphabetical group of the roster picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSection {
    pub title: String,
    pub members: Vec<TeamMember>,
}

pub trait TeamRepository {
    /// All members ordered by sort key, name, then id.
    fn list_team_members(&self) -> PersistenceResult<Vec<TeamMember>>;
    fn get_team_member(&self, id: TeamMemberId) -> PersistenceResult<Option<TeamMember>>;
}

pub struct SqliteTeamRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeamRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> PersistenceResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TeamRepository for SqliteTeamRepository<'_> {
    fn list_team_members(&self) -> PersistenceResult<Vec<TeamMember>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TEAM_SELECT_SQL} ORDER BY \"sortKey\" ASC, \"name\" ASC, \"id\" ASC;"
        ))?;
        let members = stmt
            .query_map([], parse_team_member_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    fn get_team_member(&self, id: TeamMemberId) -> PersistenceResult<Option<TeamMember>> {
        let member = self
            .conn
            .query_row(
                &format!("{TEAM_SELECT_SQL} WHERE \"id\" = ?1;"),
                [id],
                parse_team_member_row,
            )
            .optional()?;
        Ok(member)
    }
}

/// Groups members by `sort_key`. Members keep their input order inside a
/// section.
pub fn group_by_sort_key(members: Vec<TeamMember>) -> Vec<TeamSection> {
    let mut grouped: BTreeMap<String, Vec<TeamMember>> = BTreeMap::new();
    for member in members {
        grouped.entry(member.sort_key.clone()).or_default().push(member);
    }
    grouped
        .into_iter()
        .map(|(title, members)| TeamSection { title, members })
        .collect()
}

fn parse_team_member_row(row: &Row<'_>) -> rusqlite::Result<TeamMember> {
    Ok(TeamMember {
        id: row.get("id")?,
        name: row.get("name")?,
        sort_key: row.get("sortKey")?,
    })
}

#[cfg(test)]
mod tests {
    use super::group_by_sort_key;
    use crate::model::team_member::TeamMember;

    #[test]
    fn sections_are_sorted_and_keep_member_order() {
        let sections = group_by_sort_key(vec![
            TeamMember::new(1, "Will Young", "Y"),
            TeamMember::new(2, "Ann Byrne", "B"),
            TeamMember::new(3, "Ben Bishop", "B"),
        ]);

        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "Y"]);
        let b_ids: Vec<i64> = sections[0].members.iter().map(|m| m.id).collect();
        assert_eq!(b_ids, vec![2, 3]);
    }

    #[test]
    fn empty_roster_has_no_sections() {
        assert!(group_by_sort_key(Vec::new()).is_empty());
    }
}
