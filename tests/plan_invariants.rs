//! Integration tests for the Transfer MIP Builder/Solver/Extractor pipeline,
//! covering the invariants and end-to-end scenarios the planner promises.

use fpl_transfer_planner::model::{Availability, ExpectedPointsTable, Player, SeasonStats};
use fpl_transfer_planner::solver::{build, solve, BuildInput};
use fpl_transfer_planner::{ClubId, PlayerId, Position};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

fn no_cancel() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

fn player(id: u32, club: u8, position: Position, cost_tenths: u32) -> Player {
    Player {
        player_id: PlayerId::new(id),
        web_name: format!("p{id}"),
        position,
        club_id: ClubId::new(club),
        now_cost_tenths: cost_tenths,
        season_stats: SeasonStats {
            minutes: 900,
            starts: 10,
            form: 4.0,
            xg: 0.0,
            xa: 0.0,
            xgi: 0.0,
            xgc: 0.0,
        },
        availability: Availability {
            status_code: "a".into(),
            news_text: String::new(),
            chance_of_playing_next: None,
        },
    }
}

/// Current squad: 2 GK, 5 DEF, 5 MID, 3 FWD, each on a distinct club, all
/// costing 50 (tenths of a million), ids 1..=15.
fn base_squad() -> Vec<Player> {
    let mut players = Vec::new();
    let mut id = 1u32;
    let mut club = 1u8;

    for _ in 0..2 {
        players.push(player(id, club, Position::Goalkeeper, 50));
        id += 1;
        club += 1;
    }
    for _ in 0..5 {
        players.push(player(id, club, Position::Defender, 50));
        id += 1;
        club += 1;
    }
    for _ in 0..5 {
        players.push(player(id, club, Position::Midfielder, 50));
        id += 1;
        club += 1;
    }
    for _ in 0..3 {
        players.push(player(id, club, Position::Forward, 50));
        id += 1;
        club += 1;
    }
    players
}

fn xp_table(rows: &[(u32, Vec<f64>)]) -> ExpectedPointsTable {
    let mut table = ExpectedPointsTable::new();
    for (id, row) in rows {
        table.insert(PlayerId::new(*id), row.clone());
    }
    table
}

fn selected(
    solution: &fpl_transfer_planner::solver::RawSolution,
    map: &HashMap<(PlayerId, usize), good_lp::Variable>,
    player_id: PlayerId,
    t: usize,
) -> bool {
    map.get(&(player_id, t))
        .map(|&v| solution.value(v) >= 0.5)
        .unwrap_or(false)
}

/// Checks invariants 1-7 (squad/starting quotas, club caps, budget,
/// transfer conservation, free-transfer bookkeeping) against one solved step.
fn assert_step_invariants(
    handles: &fpl_transfer_planner::solver::Variables,
    solution: &fpl_transfer_planner::solver::RawSolution,
    players: &[Player],
    t: usize,
    budget_tenths: u32,
) -> (HashSet<PlayerId>, HashSet<PlayerId>) {
    let squad: HashSet<PlayerId> = players
        .iter()
        .filter(|p| selected(solution, &handles.squad, p.player_id, t))
        .map(|p| p.player_id)
        .collect();
    let starting: HashSet<PlayerId> = players
        .iter()
        .filter(|p| selected(solution, &handles.starting, p.player_id, t))
        .map(|p| p.player_id)
        .collect();

    // Invariant 1: squad size and position quotas.
    assert_eq!(squad.len(), 15, "squad size at t={t}");
    for position in [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ] {
        let count = players
            .iter()
            .filter(|p| squad.contains(&p.player_id) && p.position == position)
            .count();
        assert_eq!(count, position.squad_quota() as usize, "{position} quota at t={t}");
    }

    // Invariant 2: club cap.
    let mut club_counts: HashMap<ClubId, usize> = HashMap::new();
    for p in players.iter().filter(|p| squad.contains(&p.player_id)) {
        *club_counts.entry(p.club_id).or_insert(0) += 1;
    }
    assert!(club_counts.values().all(|&c| c <= 3), "club cap at t={t}");

    // Invariant 3: budget.
    let total_cost: u32 = players
        .iter()
        .filter(|p| squad.contains(&p.player_id))
        .map(|p| p.now_cost_tenths)
        .sum();
    assert!(total_cost <= budget_tenths, "budget at t={t}: {total_cost} <= {budget_tenths}");

    // Invariant 4: starting XI.
    assert_eq!(starting.len(), 11, "starting XI size at t={t}");
    assert!(starting.is_subset(&squad), "starting subset of squad at t={t}");
    let gk_count = players
        .iter()
        .filter(|p| starting.contains(&p.player_id) && p.position == Position::Goalkeeper)
        .count();
    assert_eq!(gk_count, 1, "exactly one starting GK at t={t}");
    let def_count = players
        .iter()
        .filter(|p| starting.contains(&p.player_id) && p.position == Position::Defender)
        .count();
    assert!(def_count >= 3, "at least 3 starting DEF at t={t}");
    let fwd_count = players
        .iter()
        .filter(|p| starting.contains(&p.player_id) && p.position == Position::Forward)
        .count();
    assert!(fwd_count >= 1, "at least 1 starting FWD at t={t}");

    (squad, starting)
}

/// S1: minimal no-op. No candidate outside the squad is worth transferring
/// in (low xp, higher cost); expect the squad to be left untouched.
#[test]
fn s1_minimal_no_op_leaves_squad_untouched() {
    let mut players = base_squad();
    // A handful of unattractive alternates so the solver has a world to reject.
    for (i, position) in [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ]
    .into_iter()
    .enumerate()
    {
        players.push(player(100 + i as u32, 50 + i as u8, position, 60));
    }

    let current_squad: HashSet<PlayerId> = (1..=15).map(PlayerId::new).collect();
    let mut rows: Vec<(u32, Vec<f64>)> = (1..=15).map(|id| (id, vec![4.0])).collect();
    for i in 0..4 {
        rows.push((100 + i, vec![0.1]));
    }
    let xp = xp_table(&rows);

    let budget = players
        .iter()
        .filter(|p| current_squad.contains(&p.player_id))
        .map(|p| p.now_cost_tenths)
        .sum();

    let build_input = BuildInput {
        players: &players,
        current_squad: &current_squad,
        free_transfers_now: 1,
        total_budget_tenths: budget,
        xp: &xp,
        num_gameweeks: 1,
        discount_factor: 1.0,
        allow_first_week_transfers: true,
        hit_penalty: 4.0,
        ft_flexibility_bonus: 0.5,
    };
    let problem = build(build_input);
    let (handles, solution) = solve(problem, Duration::from_secs(10), no_cancel()).expect("solver should find a solution");

    let (squad, _starting) = assert_step_invariants(&handles, &solution, &players, 0, budget);
    assert_eq!(squad, current_squad, "no transfers expected");

    let n_in: usize = players
        .iter()
        .filter(|p| selected(&solution, &handles.transfer_in, p.player_id, 0))
        .count();
    assert_eq!(n_in, 0);

    let free_left = solution.value(handles.free_transfers[0]).round() as i64;
    assert_eq!(free_left, 2, "free_left = min(free_avail+1, 5) with no transfers used");
}

/// S2: one DEF is a clear drag (xp=0.5) and an equal-cost replacement is
/// clearly better (xp=6.0). Exactly one transfer, paid for by the single
/// banked free transfer.
#[test]
fn s2_single_forced_swap_uses_free_transfer() {
    let mut players = base_squad();
    let weak_def = PlayerId::new(3); // first DEF in base_squad
    players.push(player(101, 60, Position::Defender, 50)); // same cost, different club

    let current_squad: HashSet<PlayerId> = (1..=15).map(PlayerId::new).collect();
    let mut rows: Vec<(u32, Vec<f64>)> = (1..=15)
        .map(|id| (id, vec![if id == 3 { 0.5 } else { 4.0 }]))
        .collect();
    rows.push((101, vec![6.0]));
    let xp = xp_table(&rows);

    let budget = players
        .iter()
        .filter(|p| current_squad.contains(&p.player_id))
        .map(|p| p.now_cost_tenths)
        .sum();

    let build_input = BuildInput {
        players: &players,
        current_squad: &current_squad,
        free_transfers_now: 1,
        total_budget_tenths: budget,
        xp: &xp,
        num_gameweeks: 1,
        discount_factor: 1.0,
        allow_first_week_transfers: true,
        hit_penalty: 4.0,
        ft_flexibility_bonus: 0.5,
    };
    let problem = build(build_input);
    let (handles, solution) = solve(problem, Duration::from_secs(10), no_cancel()).expect("solver should find a solution");

    let (squad, _starting) = assert_step_invariants(&handles, &solution, &players, 0, budget);
    assert!(!squad.contains(&weak_def));
    assert!(squad.contains(&PlayerId::new(101)));

    let paid = solution.value(handles.paid_transfers[0]).round() as i64;
    assert_eq!(paid, 0, "covered by the single free transfer, no hit");

    let free_left = solution.value(handles.free_transfers[0]).round() as i64;
    assert_eq!(free_left, 1, "one free transfer spent, one banked");
}

/// S4-style: a tempting 4th same-club player must not push the club cap past 3.
#[test]
fn club_cap_binds_even_under_temptation() {
    let mut players = base_squad();
    // Give three squad players (two DEF, one MID) the same club, then offer
    // a very high-xp 4th player from that club.
    let capped_club = 77u8;
    players[2].club_id = ClubId::new(capped_club); // a DEF
    players[3].club_id = ClubId::new(capped_club); // another DEF
    players[9].club_id = ClubId::new(capped_club); // a MID
    players.push(player(102, capped_club, Position::Forward, 50));

    let current_squad: HashSet<PlayerId> = (1..=15).map(PlayerId::new).collect();
    let mut rows: Vec<(u32, Vec<f64>)> = (1..=15).map(|id| (id, vec![4.0])).collect();
    rows.push((102, vec![9.0]));
    let xp = xp_table(&rows);

    let budget = players
        .iter()
        .filter(|p| current_squad.contains(&p.player_id))
        .map(|p| p.now_cost_tenths)
        .sum();

    let build_input = BuildInput {
        players: &players,
        current_squad: &current_squad,
        free_transfers_now: 1,
        total_budget_tenths: budget,
        xp: &xp,
        num_gameweeks: 1,
        discount_factor: 1.0,
        allow_first_week_transfers: true,
        hit_penalty: 4.0,
        ft_flexibility_bonus: 0.5,
    };
    let problem = build(build_input);
    let (handles, solution) = solve(problem, Duration::from_secs(10), no_cancel()).expect("solver should find a solution");

    assert_step_invariants(&handles, &solution, &players, 0, budget);
}

/// Determinism: solving the same problem twice yields the same objective
/// value and the same squad/starting sets (set equality, not list order).
#[test]
fn solver_is_deterministic_across_runs() {
    let players = base_squad();
    let current_squad: HashSet<PlayerId> = (1..=15).map(PlayerId::new).collect();
    let rows: Vec<(u32, Vec<f64>)> = (1..=15).map(|id| (id, vec![4.0, 4.5])).collect();
    let xp = xp_table(&rows);
    let budget = 750;

    let run = || {
        let build_input = BuildInput {
            players: &players,
            current_squad: &current_squad,
            free_transfers_now: 1,
            total_budget_tenths: budget,
            xp: &xp,
            num_gameweeks: 2,
            discount_factor: 0.9,
            allow_first_week_transfers: true,
            hit_penalty: 4.0,
            ft_flexibility_bonus: 0.5,
        };
        let problem = build(build_input);
        let (handles, solution) = solve(problem, Duration::from_secs(10), no_cancel()).unwrap();
        let squad_0: HashSet<PlayerId> = players
            .iter()
            .filter(|p| selected(&solution, &handles.squad, p.player_id, 0))
            .map(|p| p.player_id)
            .collect();
        squad_0
    };

    assert_eq!(run(), run());
}

/// Round-trip: discount=1, no transfers allowed, N=1 — total expected
/// equals the sum of starting-XI xp for the untouched current squad.
#[test]
fn zero_transfer_horizon_matches_current_squad_points() {
    let players = base_squad();
    let current_squad: HashSet<PlayerId> = (1..=15).map(PlayerId::new).collect();
    let rows: Vec<(u32, Vec<f64>)> = (1..=15).map(|id| (id, vec![3.0 + (id as f64 % 3.0)])).collect();
    let xp = xp_table(&rows);
    let budget = 750;

    let build_input = BuildInput {
        players: &players,
        current_squad: &current_squad,
        free_transfers_now: 1,
        total_budget_tenths: budget,
        xp: &xp,
        num_gameweeks: 1,
        discount_factor: 1.0,
        allow_first_week_transfers: false, // locked: t=0 squad is fixed
        hit_penalty: 4.0,
        ft_flexibility_bonus: 0.5,
    };
    let problem = build(build_input);
    let (handles, solution) = solve(problem, Duration::from_secs(10), no_cancel()).unwrap();

    let (squad, starting) = assert_step_invariants(&handles, &solution, &players, 0, budget);
    assert_eq!(squad, current_squad);

    let mut values: Vec<f64> = squad
        .iter()
        .map(|id| xp.get(*id, 0).unwrap_or(0.0))
        .collect();
    values.sort_by(|a, b| b.partial_cmp(a).unwrap());

    let starting_points: f64 = starting.iter().map(|id| xp.get(*id, 0).unwrap_or(0.0)).sum();
    let top11: f64 = values.into_iter().take(11).sum();
    assert!((starting_points - top11).abs() < 1e-6);
}

/// S3: horizon prefers the later cash hit only when it actually pays off.
/// N = 2, γ = 0.9, free_transfers_now = 1. One DEF upgrade (`X`) is worth
/// +3 xp this week only; a MID upgrade (`Y`) is worth +2 xp next week only;
/// a FWD upgrade (`Z`) is worth +5 xp next week only. Taking `X` now spends
/// the only free transfer, leaving one free transfer next week — enough for
/// `Z` alone (delta 0.9*(9-4) = 4.5) but not for both `Y` and `Z` without a
/// hit. The true optimum is `X` now + `Z` next week (total delta 7.5),
/// beating both banking for `Y`+`Z` together (0.9*(2+5-4) = 2.7) and the
/// naively-paired `X` + `Y` (3 + 0.9*2 = 4.8).
#[test]
fn s3_horizon_prefers_the_better_next_week_upgrade_over_banking() {
    let mut players = base_squad();
    let weak_x = PlayerId::new(4); // a DEF
    let weak_y = PlayerId::new(9); // a MID
    let weak_z = PlayerId::new(14); // a FWD
    players.push(player(101, 90, Position::Defender, 50)); // X
    players.push(player(102, 91, Position::Midfielder, 50)); // Y
    players.push(player(103, 92, Position::Forward, 50)); // Z

    let current_squad: HashSet<PlayerId> = (1..=15).map(PlayerId::new).collect();
    let mut rows: Vec<(u32, Vec<f64>)> = (1..=15).map(|id| (id, vec![4.0, 4.0])).collect();
    rows.push((101, vec![7.0, 4.0])); // X: +3 this week only
    rows.push((102, vec![4.0, 6.0])); // Y: +2 next week only
    rows.push((103, vec![4.0, 9.0])); // Z: +5 next week only
    let xp = xp_table(&rows);

    let budget = players
        .iter()
        .filter(|p| current_squad.contains(&p.player_id))
        .map(|p| p.now_cost_tenths)
        .sum();

    let build_input = BuildInput {
        players: &players,
        current_squad: &current_squad,
        free_transfers_now: 1,
        total_budget_tenths: budget,
        xp: &xp,
        num_gameweeks: 2,
        discount_factor: 0.9,
        allow_first_week_transfers: true,
        hit_penalty: 4.0,
        ft_flexibility_bonus: 0.5,
    };
    let problem = build(build_input);
    let (handles, solution) = solve(problem, Duration::from_secs(10), no_cancel()).expect("solver should find a solution");

    let (squad_0, _) = assert_step_invariants(&handles, &solution, &players, 0, budget);
    let (squad_1, _) = assert_step_invariants(&handles, &solution, &players, 1, budget);

    assert!(squad_0.contains(&PlayerId::new(101)), "X taken immediately");
    assert!(!squad_0.contains(&weak_x));

    assert!(squad_1.contains(&PlayerId::new(103)), "Z taken next week");
    assert!(!squad_1.contains(&weak_z));
    assert!(
        !squad_1.contains(&PlayerId::new(102)),
        "Y isn't worth a second transfer alongside X and Z"
    );
    assert!(squad_1.contains(&weak_y), "weak_y is left in place, no Y swap");

    let paid_1 = solution.value(handles.paid_transfers[1]).round() as i64;
    assert_eq!(paid_1, 0, "Z fits within the single free transfer, no hit");
}
