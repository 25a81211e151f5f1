//! C1: Fixture & Gameweek Indexer. Pure lookups over already-fetched snapshots.

use crate::cli::types::{ClubId, GameweekId};
use crate::model::{Fixture, FixtureContext};
use crate::source::dto::EventDto;

/// The first gameweek flagged `is_next`, falling back to the first unfinished one.
pub fn next_gameweek_id(events: &[EventDto]) -> Option<GameweekId> {
    events
        .iter()
        .find(|e| e.is_next)
        .or_else(|| events.iter().find(|e| !e.finished))
        .map(|e| GameweekId::new(e.id))
}

/// Exactly-one fixture lookup for `(club_id, gameweek_id)`. Returns `None` on
/// a blank gameweek. Double gameweeks: the first match encountered wins
/// (`spec.md` §4.1, §9 — not implemented as a sum).
pub fn fixture_of(fixtures: &[Fixture], club_id: ClubId, gameweek_id: GameweekId) -> Option<Fixture> {
    fixtures
        .iter()
        .find(|f| f.gameweek_id == gameweek_id && (f.home_club == club_id || f.away_club == club_id))
        .copied()
}

/// Resolve difficulty and home/away for `club_id` within a fixture it's known
/// to participate in.
pub fn context_for_club(fixture: &Fixture, club_id: ClubId) -> FixtureContext {
    if fixture.home_club == club_id {
        FixtureContext {
            difficulty: fixture.home_difficulty,
            is_home: true,
        }
    } else {
        FixtureContext {
            difficulty: fixture.away_difficulty,
            is_home: false,
        }
    }
}
