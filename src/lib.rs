//! FPL Transfer Planner
//!
//! A multi-gameweek transfer planner for Fantasy Premier League squads: pulls
//! a manager's current squad and the public bootstrap/fixtures data, forecasts
//! expected points per player per gameweek, and solves a mixed-integer program
//! for the transfer sequence that maximises expected points net of transfer
//! hits over the planning horizon.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod model;
pub mod plan;
pub mod solver;
pub mod source;
pub mod transfers;
pub mod xp;

pub use cli::types::{ClubId, EntryId, GameweekId, PlayerId, Position};
pub use config::PlannerConfig;
pub use error::{FplError, Result};
