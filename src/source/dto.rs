//! Wire-format DTOs decoded straight from the upstream FPL API.
//!
//! Every field the engine needs is decoded explicitly; anything the upstream
//! omits maps to `Option::None`, never to an implicit zero.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapResponse {
    pub elements: Vec<PlayerDto>,
    pub teams: Vec<TeamDto>,
    pub events: Vec<EventDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerDto {
    pub id: u32,
    pub web_name: String,
    pub team: u8,
    pub element_type: u8,
    pub now_cost: u32,
    pub minutes: u32,
    pub starts: u32,
    #[serde(deserialize_with = "super::parse_f64_field")]
    pub form: f64,
    #[serde(deserialize_with = "super::parse_f64_field")]
    pub expected_goals: f64,
    #[serde(deserialize_with = "super::parse_f64_field")]
    pub expected_assists: f64,
    #[serde(deserialize_with = "super::parse_f64_field")]
    pub expected_goal_involvements: f64,
    #[serde(deserialize_with = "super::parse_f64_field")]
    pub expected_goals_conceded: f64,
    pub status: String,
    pub news: String,
    pub chance_of_playing_next_round: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamDto {
    pub id: u8,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventDto {
    pub id: u16,
    pub is_next: bool,
    pub finished: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureDto {
    pub id: u32,
    pub event: Option<u16>,
    pub team_h: u8,
    pub team_a: u8,
    pub team_h_difficulty: u8,
    pub team_a_difficulty: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryDto {
    pub current_event: Option<u16>,
    pub last_deadline_bank: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SquadPickDto {
    pub element: u32,
    pub position: u8,
    pub multiplier: u8,
    pub is_captain: bool,
    pub is_vice_captain: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryPicksResponse {
    pub picks: Vec<SquadPickDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferRecord {
    pub element_in: u32,
    pub element_out: u32,
    pub element_in_cost: u32,
    pub event: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GwRecord {
    pub event: u16,
    pub event_transfers: u32,
    pub event_transfers_cost: u32,
    pub active_chip: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryHistoryResponse {
    pub current: Vec<GwRecord>,
}
