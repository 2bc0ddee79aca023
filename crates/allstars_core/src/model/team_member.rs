//! Team roster record and fixture decoding.
//!
//! # Responsibility
//! - Define the `TeamMember` record loaded from the bundled roster.
//! - Decode roster JSON documents into ordered member lists.
//!
//! # Invariants
//! - `id` is an external, stable identifier; it is never auto-assigned.
//! - Members are immutable once the roster fixture has been loaded.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable roster identifier, taken from the fixture document.
pub type TeamMemberId = i64;

/// One entry of the team roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub name: String,
    /// Section key used to group the roster alphabetically.
    pub sort_key: String,
}

impl TeamMember {
    pub fn new(id: TeamMemberId, name: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sort_key: sort_key.into(),
        }
    }
}

/// Roster document could not be decoded.
#[derive(Debug)]
pub struct DecodingError(serde_json::Error);

impl Display for DecodingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed team roster: {}", self.0)
    }
}

impl Error for DecodingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serde_json::Error> for DecodingError {
    fn from(value: serde_json::Error) -> Self {
        Self(value)
    }
}

/// Decodes a JSON array of `{ id, name, sortKey }` objects, keeping order.
pub fn decode_roster(json: &str) -> Result<Vec<TeamMember>, DecodingError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::{decode_roster, TeamMember};

    #[test]
    fn decode_roster_keeps_document_order() {
        let roster = decode_roster(
            r#"[
                {"id": 7, "name": "Zoe Quinn", "sortKey": "Q"},
                {"id": 3, "name": "Abe Adams", "sortKey": "A"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            roster,
            vec![
                TeamMember::new(7, "Zoe Quinn", "Q"),
                TeamMember::new(3, "Abe Adams", "A"),
            ]
        );
    }

    #[test]
    fn decode_roster_rejects_missing_sort_key() {
        let err = decode_roster(r#"[{"id": 1, "name": "No Key"}]"#).unwrap_err();
        assert!(err.to_string().contains("sortKey"), "unexpected error: {err}");
    }

    #[test]
    fn decode_roster_rejects_non_array_document() {
        assert!(decode_roster(r#"{"id": 1}"#).is_err());
    }
}
