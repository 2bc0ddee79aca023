//! Entity layer for the All Stars card collection.
//!
//! # Responsibility
//! - Define plain records mapped 1:1 to storage tables.
//! - Define the `Card` read aggregate and the random draws that build cards.
//!
//! # Invariants
//! - `Position` and `Category` integer codes are storage-stable.
//! - Attribute ratings always stay within `MIN_RATING..=MAX_RATING`.
//! - Random draws go through `RandomSource`, never an ambient generator.

pub mod attribute;
pub mod card;
pub mod identity;
pub mod roll;
pub mod team_member;
