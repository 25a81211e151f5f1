//! C7: Plan Extractor — solver output to a human-facing `TransferPlan`.

use crate::cli::types::{GameweekId, PlayerId, Position};
use crate::model::{ExpectedPointsTable, Player};
use crate::solver::{builder::Variables, RawSolution};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

const BINARY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Serialize)]
pub struct TransferMove {
    pub player_id: PlayerId,
    pub name: String,
    pub position: String,
    pub cost_millions: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Weekly {
    pub gameweek: u16,
    pub transfers_in: Vec<TransferMove>,
    pub transfers_out: Vec<TransferMove>,
    pub expected_points: f64,
    pub hit_cost: u32,
    pub free_used: u32,
    pub free_left: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferPlan {
    pub current_gameweek: u16,
    pub weekly: Vec<Weekly>,
    pub total_expected: f64,
    pub total_hit_cost: u32,
    pub baseline: f64,
    pub improvement: f64,
}

fn position_order(position: Position) -> u8 {
    match position {
        Position::Goalkeeper => 0,
        Position::Defender => 1,
        Position::Midfielder => 2,
        Position::Forward => 3,
    }
}

/// Translate a solved problem into the caller-facing plan.
///
/// `current_squad` and `free_transfers_now` are the same values the builder
/// was given; they're needed again here to compute `free_used`/`free_left`
/// for t=0 and the loose top-11 baseline.
pub fn extract(
    handles: &Variables,
    solution: &RawSolution,
    players: &[Player],
    xp: &ExpectedPointsTable,
    next_gameweek_id: GameweekId,
    num_gameweeks: usize,
    discount_factor: f64,
    hit_penalty: f64,
    current_squad: &HashSet<PlayerId>,
    free_transfers_now: u8,
) -> TransferPlan {
    let players_by_id: HashMap<PlayerId, &Player> = players.iter().map(|p| (p.player_id, p)).collect();

    let mut weekly = Vec::with_capacity(num_gameweeks);
    let mut total_net = 0.0;
    let mut total_hit_cost: u32 = 0;

    for t in 0..num_gameweeks {
        let transfers_in = collect_moves(handles, solution, players, t, true, &players_by_id);
        let transfers_out = collect_moves(handles, solution, players, t, false, &players_by_id);

        let gw_points: f64 = players
            .iter()
            .filter(|p| is_selected(handles, solution, p.player_id, t, true))
            .map(|p| xp.get(p.player_id, t).unwrap_or(0.0))
            .sum();

        let paid = solution
            .value(handles.paid_transfers[t])
            .round()
            .max(0.0) as u32;
        let hit_cost = paid * hit_penalty.round() as u32;

        let free_avail = if t == 0 {
            free_transfers_now as u32
        } else {
            solution
                .value(handles.free_transfers[t - 1])
                .round()
                .max(0.0) as u32
        };
        let n_in = transfers_in.len() as u32;
        let free_used = n_in.min(free_avail);
        let free_left = solution
            .value(handles.free_transfers[t])
            .round()
            .clamp(0.0, 5.0) as u32;

        let discount = discount_factor.powi(t as i32);
        total_net += discount * (gw_points - hit_cost as f64);
        total_hit_cost += hit_cost;

        weekly.push(Weekly {
            gameweek: next_gameweek_id.value() + t as u16,
            transfers_in,
            transfers_out,
            expected_points: gw_points,
            hit_cost,
            free_used,
            free_left,
        });
    }

    let baseline = loose_baseline(players, xp, current_squad, num_gameweeks, discount_factor);

    TransferPlan {
        current_gameweek: next_gameweek_id.value(),
        weekly,
        total_expected: total_net,
        total_hit_cost,
        baseline,
        improvement: total_net - baseline,
    }
}

fn is_selected(handles: &Variables, solution: &RawSolution, player_id: PlayerId, t: usize, starting: bool) -> bool {
    let var = if starting {
        handles.starting.get(&(player_id, t))
    } else {
        handles.squad.get(&(player_id, t))
    };
    var.map(|&v| solution.value(v) >= BINARY_THRESHOLD).unwrap_or(false)
}

fn collect_moves(
    handles: &Variables,
    solution: &RawSolution,
    players: &[Player],
    t: usize,
    inbound: bool,
    players_by_id: &HashMap<PlayerId, &Player>,
) -> Vec<TransferMove> {
    let var_map = if inbound {
        &handles.transfer_in
    } else {
        &handles.transfer_out
    };

    let mut moves: Vec<TransferMove> = players
        .iter()
        .filter(|p| {
            var_map
                .get(&(p.player_id, t))
                .map(|&v| solution.value(v) >= BINARY_THRESHOLD)
                .unwrap_or(false)
        })
        .map(|p| TransferMove {
            player_id: p.player_id,
            name: p.web_name.clone(),
            position: p.position.to_string(),
            cost_millions: if inbound {
                Some(p.now_cost_tenths as f64 / 10.0)
            } else {
                None
            },
        })
        .collect();

    moves.sort_by_key(|m| {
        players_by_id
            .get(&m.player_id)
            .map(|p| position_order(p.position))
            .unwrap_or(u8::MAX)
    });
    moves
}

/// A deliberately loose upper-bound baseline: the top-11 xp players inside
/// the current squad each step, ignoring formation legality (`spec.md` §4.7).
fn loose_baseline(
    players: &[Player],
    xp: &ExpectedPointsTable,
    current_squad: &HashSet<PlayerId>,
    num_gameweeks: usize,
    discount_factor: f64,
) -> f64 {
    let squad_players: Vec<&Player> = players
        .iter()
        .filter(|p| current_squad.contains(&p.player_id))
        .collect();

    let mut total = 0.0;
    for t in 0..num_gameweeks {
        let mut values: Vec<f64> = squad_players
            .iter()
            .map(|p| xp.get(p.player_id, t).unwrap_or(0.0))
            .collect();
        values.sort_by(|a, b| b.partial_cmp(a).unwrap());
        let top11: f64 = values.into_iter().take(11).sum();
        total += discount_factor.powi(t as i32) * top11;
    }
    total
}
