//! C5: Transfer MIP Builder — constructs the mixed-integer program.

use crate::cli::types::{ClubId, PlayerId, Position};
use crate::model::{ExpectedPointsTable, Player};
use good_lp::{constraint, variable, Expression, ProblemVariables, Variable};
use std::collections::{HashMap, HashSet};

/// Handles to every decision variable, keyed by `(player, horizon step)`
/// where applicable. Just `Variable` tokens, so cheap to clone independently
/// of the `good_lp` model they were registered against.
#[derive(Clone)]
pub struct Variables {
    pub squad: HashMap<(PlayerId, usize), Variable>,
    pub starting: HashMap<(PlayerId, usize), Variable>,
    pub transfer_in: HashMap<(PlayerId, usize), Variable>,
    pub transfer_out: HashMap<(PlayerId, usize), Variable>,
    /// `ft[t]`: free transfers carried forward after step `t`, for `t` in `0..num_gameweeks`.
    pub free_transfers: Vec<Variable>,
    /// `paid[t]`: paid transfers at step `t`.
    pub paid_transfers: Vec<Variable>,
    /// Linearization slack for the flexibility bonus, `u_t >= ft[t] - 1`.
    pub flex_slack: Vec<Variable>,
}

impl Variables {
    /// Every decision variable the builder created, for generic solution extraction.
    pub fn all(&self) -> Vec<Variable> {
        let mut all: Vec<Variable> = self
            .squad
            .values()
            .chain(self.starting.values())
            .chain(self.transfer_in.values())
            .chain(self.transfer_out.values())
            .copied()
            .collect();
        all.extend(self.free_transfers.iter().copied());
        all.extend(self.paid_transfers.iter().copied());
        all.extend(self.flex_slack.iter().copied());
        all
    }
}

pub struct Problem {
    pub vars: ProblemVariables,
    pub handles: Variables,
    pub objective: Expression,
    pub constraints: Vec<good_lp::Constraint>,
}

pub struct BuildInput<'a> {
    pub players: &'a [Player],
    pub current_squad: &'a HashSet<PlayerId>,
    pub free_transfers_now: u8,
    pub total_budget_tenths: u32,
    pub xp: &'a ExpectedPointsTable,
    pub num_gameweeks: usize,
    pub discount_factor: f64,
    pub allow_first_week_transfers: bool,
    pub hit_penalty: f64,
    pub ft_flexibility_bonus: f64,
}

/// Build every variable and constraint described in `spec.md` §4.5.
pub fn build(input: BuildInput) -> Problem {
    let n = input.num_gameweeks;
    let mut vars = ProblemVariables::new();

    let mut squad = HashMap::new();
    let mut starting = HashMap::new();
    let mut transfer_in = HashMap::new();
    let mut transfer_out = HashMap::new();

    for player in input.players {
        for t in 0..n {
            squad.insert((player.player_id, t), vars.add(variable().binary()));
            starting.insert((player.player_id, t), vars.add(variable().binary()));
            transfer_in.insert((player.player_id, t), vars.add(variable().binary()));
            transfer_out.insert((player.player_id, t), vars.add(variable().binary()));
        }
    }

    let free_transfers: Vec<Variable> = (0..n)
        .map(|_| vars.add(variable().integer().min(0).max(5)))
        .collect();
    let paid_transfers: Vec<Variable> = (0..n)
        .map(|_| vars.add(variable().integer().min(0)))
        .collect();
    let flex_slack: Vec<Variable> = (0..n).map(|_| vars.add(variable().min(0))).collect();

    let mut constraints = Vec::new();
    let clubs: HashSet<ClubId> = input.players.iter().map(|p| p.club_id).collect();

    for t in 0..n {
        // Squad size and position quotas.
        let squad_size: Expression = input
            .players
            .iter()
            .map(|p| squad[&(p.player_id, t)])
            .sum();
        constraints.push(constraint!(squad_size == 15.0));

        for position in [
            Position::Goalkeeper,
            Position::Defender,
            Position::Midfielder,
            Position::Forward,
        ] {
            let quota: Expression = input
                .players
                .iter()
                .filter(|p| p.position == position)
                .map(|p| squad[&(p.player_id, t)])
                .sum();
            constraints.push(constraint!(quota == position.squad_quota() as f64));
        }

        // Club cap.
        for &club in &clubs {
            let club_count: Expression = input
                .players
                .iter()
                .filter(|p| p.club_id == club)
                .map(|p| squad[&(p.player_id, t)])
                .sum();
            constraints.push(constraint!(club_count <= 3.0));
        }

        // Starting XI.
        let starting_size: Expression = input
            .players
            .iter()
            .map(|p| starting[&(p.player_id, t)])
            .sum();
        constraints.push(constraint!(starting_size == 11.0));

        for player in input.players {
            constraints.push(constraint!(
                starting[&(player.player_id, t)] <= squad[&(player.player_id, t)]
            ));
        }

        let starting_gk: Expression = input
            .players
            .iter()
            .filter(|p| p.position == Position::Goalkeeper)
            .map(|p| starting[&(p.player_id, t)])
            .sum();
        constraints.push(constraint!(starting_gk == 1.0));

        let starting_def: Expression = input
            .players
            .iter()
            .filter(|p| p.position == Position::Defender)
            .map(|p| starting[&(p.player_id, t)])
            .sum();
        constraints.push(constraint!(starting_def >= 3.0));

        let starting_fwd: Expression = input
            .players
            .iter()
            .filter(|p| p.position == Position::Forward)
            .map(|p| starting[&(p.player_id, t)])
            .sum();
        constraints.push(constraint!(starting_fwd >= 1.0));

        // Transfer conservation.
        let n_in: Expression = input
            .players
            .iter()
            .map(|p| transfer_in[&(p.player_id, t)])
            .sum();
        let n_out: Expression = input
            .players
            .iter()
            .map(|p| transfer_out[&(p.player_id, t)])
            .sum();
        constraints.push(constraint!(n_in.clone() == n_out));

        // Continuity and provenance.
        let first_step_locked = t == 0 && !input.allow_first_week_transfers;
        for player in input.players {
            let was_in_squad = if t == 0 {
                input.current_squad.contains(&player.player_id)
            } else {
                false // handled via s[i,t-1] below
            };

            if t == 0 {
                let indicator = if was_in_squad { 1.0 } else { 0.0 };
                constraints.push(constraint!(squad[&(player.player_id, 0)] == indicator));

                if first_step_locked {
                    constraints.push(constraint!(transfer_in[&(player.player_id, 0)] == 0.0));
                    constraints.push(constraint!(transfer_out[&(player.player_id, 0)] == 0.0));
                } else {
                    constraints.push(constraint!(
                        transfer_out[&(player.player_id, 0)] <= indicator
                    ));
                    constraints.push(constraint!(
                        transfer_in[&(player.player_id, 0)] <= 1.0 - indicator
                    ));
                }
            } else {
                constraints.push(constraint!(
                    squad[&(player.player_id, t)]
                        == squad[&(player.player_id, t - 1)] + transfer_in[&(player.player_id, t)]
                            - transfer_out[&(player.player_id, t)]
                ));
                constraints.push(constraint!(
                    transfer_out[&(player.player_id, t)] <= squad[&(player.player_id, t - 1)]
                ));
                constraints.push(constraint!(
                    transfer_in[&(player.player_id, t)] <= 1.0 - squad[&(player.player_id, t - 1)]
                ));
            }
        }

        // Per-position transfer balance.
        for position in [
            Position::Goalkeeper,
            Position::Defender,
            Position::Midfielder,
            Position::Forward,
        ] {
            let pos_in: Expression = input
                .players
                .iter()
                .filter(|p| p.position == position)
                .map(|p| transfer_in[&(p.player_id, t)])
                .sum();
            let pos_out: Expression = input
                .players
                .iter()
                .filter(|p| p.position == position)
                .map(|p| transfer_out[&(p.player_id, t)])
                .sum();
            constraints.push(constraint!(pos_in == pos_out));
        }

        // Budget.
        let squad_cost: Expression = input
            .players
            .iter()
            .map(|p| squad[&(p.player_id, t)] * p.now_cost_tenths as f64)
            .sum();
        constraints.push(constraint!(squad_cost <= input.total_budget_tenths as f64));

        // Free-transfer accounting.
        let free_avail: Expression = if t == 0 {
            Expression::from(input.free_transfers_now as f64)
        } else {
            free_transfers[t - 1].into()
        };
        constraints.push(constraint!(paid_transfers[t] >= 0.0));
        constraints.push(constraint!(
            paid_transfers[t] >= n_in.clone() - free_avail.clone()
        ));
        constraints.push(constraint!(paid_transfers[t] <= n_in.clone()));
        constraints.push(constraint!(
            free_transfers[t] == free_avail + 1.0 - n_in + paid_transfers[t]
        ));

        // Flexibility-bonus linearization.
        constraints.push(constraint!(flex_slack[t] >= 0.0));
        constraints.push(constraint!(flex_slack[t] >= free_transfers[t] - 1.0));
    }

    let objective = build_objective(&input, &starting, &paid_transfers, &flex_slack);

    Problem {
        vars,
        handles: Variables {
            squad,
            starting,
            transfer_in,
            transfer_out,
            free_transfers,
            paid_transfers,
            flex_slack,
        },
        objective,
        constraints,
    }
}

fn build_objective(
    input: &BuildInput,
    starting: &HashMap<(PlayerId, usize), Variable>,
    paid_transfers: &[Variable],
    flex_slack: &[Variable],
) -> Expression {
    let n = input.num_gameweeks;
    let mut objective = Expression::from(0.0);

    for t in 0..n {
        let discount = input.discount_factor.powi(t as i32);

        let gw_points: Expression = input
            .players
            .iter()
            .map(|p| {
                let xp = input.xp.get(p.player_id, t).unwrap_or(0.0);
                starting[&(p.player_id, t)] * xp
            })
            .sum();

        let beta = if t < n - 1 { input.ft_flexibility_bonus } else { 0.0 };

        objective = objective
            + discount
                * (gw_points - input.hit_penalty * paid_transfers[t] + beta * flex_slack[t]);
    }

    objective
}
