//! Core data layer for the All Stars card collection.
//! Schema migrations, entity records and the card operations live here.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use db::{DbError, DbResult, MigrationCause, MigrationError, Migrator, Store};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::attribute::{
    Attribute, AttributeId, BATTER_ATTRIBUTE_NAMES, MAX_RATING, MIN_RATING,
    PITCHER_ATTRIBUTE_NAMES,
};
pub use model::card::{Card, CardId};
pub use model::identity::{Category, Identity, IdentityId, Position};
pub use model::roll::{RandomSource, ScriptedRolls, SeededRolls, ThreadRolls};
pub use model::team_member::{decode_roster, DecodingError, TeamMember, TeamMemberId};
pub use repo::card_repo::{CardRepository, SqliteCardRepository};
pub use repo::team_repo::{group_by_sort_key, SqliteTeamRepository, TeamRepository, TeamSection};
pub use repo::{PersistenceError, PersistenceResult};
pub use service::card_service::CardService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
