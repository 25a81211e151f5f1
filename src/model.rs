//! Plain data structures shared across the pipeline.

use crate::cli::types::{ClubId, GameweekId, PlayerId, Position};
use serde::{Deserialize, Serialize};

/// A single player's season-to-date underlying stats, cumulative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonStats {
    pub minutes: u32,
    pub starts: u32,
    pub form: f64,
    pub xg: f64,
    pub xa: f64,
    pub xgi: f64,
    pub xgc: f64,
}

/// Availability/injury status as reported upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub status_code: String,
    pub news_text: String,
    pub chance_of_playing_next: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub web_name: String,
    pub position: Position,
    pub club_id: ClubId,
    pub now_cost_tenths: u32,
    pub season_stats: SeasonStats,
    pub availability: Availability,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub fixture_id: u32,
    pub gameweek_id: GameweekId,
    pub home_club: ClubId,
    pub away_club: ClubId,
    pub home_difficulty: u8,
    pub away_difficulty: u8,
}

/// Resolved fixture context for one club in one gameweek.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureContext {
    pub difficulty: u8,
    pub is_home: bool,
}

/// One of the fifteen squad slots an entry owns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquadPick {
    pub player_id: PlayerId,
    pub squad_slot: u8,
    pub multiplier: u8,
    pub is_captain: bool,
    pub is_vice: bool,
    pub purchase_price_tenths: Option<u32>,
}

/// Dense `(player, horizon step)` expected-points table, frozen for one solve.
#[derive(Debug, Clone, Default)]
pub struct ExpectedPointsTable {
    /// `xp[player_id] = [xp at step 0, xp at step 1, ...]`
    values: std::collections::HashMap<PlayerId, Vec<f64>>,
}

impl ExpectedPointsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player_id: PlayerId, row: Vec<f64>) {
        self.values.insert(player_id, row);
    }

    pub fn get(&self, player_id: PlayerId, step: usize) -> Option<f64> {
        self.values.get(&player_id).and_then(|row| row.get(step)).copied()
    }

    pub fn row(&self, player_id: PlayerId) -> Option<&[f64]> {
        self.values.get(&player_id).map(Vec::as_slice)
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
