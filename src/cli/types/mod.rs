//! Type-safe wrappers and enums for FPL data.

pub mod ids;
pub mod position;

pub use ids::{ClubId, EntryId, GameweekId, PlayerId};
pub use position::Position;
