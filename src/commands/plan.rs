//! Wires A4 (data source) through C1–C7 into one CLI-facing plan command.

use crate::cache::disk;
use crate::cache::memo::PlannerCaches;
use crate::cli::types::{ClubId, EntryId, GameweekId, PlayerId, Position};
use crate::config::PlannerConfig;
use crate::error::{FplError, Result};
use crate::fixtures;
use crate::model::{Availability, ExpectedPointsTable, Fixture, Player, SeasonStats, SquadPick};
use crate::plan::{self, TransferPlan};
use crate::solver::{self, builder::BuildInput};
use crate::source::dto::{BootstrapResponse, EntryHistoryResponse, FixtureDto, TransferRecord};
use crate::source::DataSource;
use crate::transfers::{ledger, pricing};
use crate::xp;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Full output of one `plan` invocation; `None` when the entry has no usable
/// current squad (`spec.md` §4.7's "plan-not-applicable" signal).
pub async fn run(
    source: &dyn DataSource,
    entry_id: EntryId,
    config: &PlannerConfig,
    caches: &PlannerCaches,
) -> Result<Option<TransferPlan>> {
    config.validate()?;

    let (bootstrap, fixtures_raw) =
        tokio::try_join!(cached_bootstrap(source, config), cached_fixtures(source, config))?;

    let players = decode_players_cached(&bootstrap, caches)?;
    let fixtures_list = decode_fixtures(&fixtures_raw);

    let next_gw = fixtures::next_gameweek_id(&bootstrap.events)
        .ok_or_else(|| FplError::not_found("no upcoming gameweek"))?;

    let entry = source.get_entry(entry_id.value()).await?;
    let current_event = entry
        .current_event
        .ok_or_else(|| FplError::not_found(format!("entry {entry_id} has no current event")))?;

    let (picks_response, transfers, history) = tokio::try_join!(
        cached_picks(source, entry_id, current_event, config),
        source.get_entry_transfers(entry_id.value()),
        source.get_entry_history(entry_id.value()),
    )?;

    let picks = decode_picks(&picks_response.picks);
    if picks.is_empty() {
        return Ok(None);
    }

    let current_squad: HashSet<PlayerId> = picks.iter().map(|p| p.player_id).collect();
    let now_cost_by_player: HashMap<PlayerId, u32> = players
        .iter()
        .map(|p| (p.player_id, p.now_cost_tenths))
        .collect();

    let picks_with_purchase_price = attach_purchase_prices(picks, &transfers);
    let total_budget_tenths =
        pricing::total_budget_tenths(entry.last_deadline_bank, &picks_with_purchase_price, &now_cost_by_player);

    let free_transfers_now = ledger::free_transfers_now(&history.current);

    let xp_table = cached_xp_table(caches, &players, &fixtures_list, next_gw, config)?;
    if xp_table.is_empty() {
        return Err(FplError::ExpectedPointsFailure {
            message: "expected-points table has no forecastable players".to_string(),
        });
    }

    // Only players the forecast could actually score belong in the candidate
    // pool; a player absent from the table can't appear in the objective.
    let forecastable: HashSet<PlayerId> = xp_table.players().collect();
    let candidates: Vec<Player> = players
        .iter()
        .filter(|p| forecastable.contains(&p.player_id))
        .cloned()
        .collect();
    debug_assert_eq!(xp_table.len(), forecastable.len());

    let build_input = BuildInput {
        players: &candidates,
        current_squad: &current_squad,
        free_transfers_now,
        total_budget_tenths,
        xp: &xp_table,
        num_gameweeks: config.num_gameweeks as usize,
        discount_factor: config.discount_factor,
        allow_first_week_transfers: config.allow_first_week_transfers,
        hit_penalty: config.solver.hit_penalty,
        ft_flexibility_bonus: config.solver.ft_flexibility_bonus,
    };
    let problem = solver::build(build_input);

    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_for_solve = cancel_flag.clone();
    let time_limit = config.solver.solver_time_limit;

    let solve_task =
        tokio::task::spawn_blocking(move || solver::solve(problem, time_limit, cancel_for_solve));

    let (handles, solution) = match tokio::time::timeout(time_limit, solve_task).await {
        Ok(join_result) => join_result.map_err(|e| FplError::upstream(format!("solver task panicked: {e}")))??,
        Err(_) => {
            cancel_flag.store(true, Ordering::SeqCst);
            return Err(FplError::Cancelled);
        }
    };

    let result = plan::extract(
        &handles,
        &solution,
        &candidates,
        &xp_table,
        next_gw,
        config.num_gameweeks as usize,
        config.discount_factor,
        config.solver.hit_penalty,
        &current_squad,
        free_transfers_now,
    );

    Ok(Some(result))
}

async fn cached_bootstrap(source: &dyn DataSource, config: &PlannerConfig) -> Result<BootstrapResponse> {
    if let Some(cached) = disk::read::<BootstrapResponse>("bootstrap", config.cache_ttls.bootstrap) {
        return Ok(cached);
    }
    let fresh = source.get_bootstrap().await?;
    disk::write("bootstrap", &fresh);
    Ok(fresh)
}

async fn cached_fixtures(source: &dyn DataSource, config: &PlannerConfig) -> Result<Vec<FixtureDto>> {
    if let Some(cached) = disk::read::<Vec<FixtureDto>>("fixtures", config.cache_ttls.fixtures) {
        return Ok(cached);
    }
    let fresh = source.get_fixtures().await?;
    disk::write("fixtures", &fresh);
    Ok(fresh)
}

async fn cached_picks(
    source: &dyn DataSource,
    entry_id: EntryId,
    event: u16,
    config: &PlannerConfig,
) -> Result<crate::source::dto::EntryPicksResponse> {
    let key = format!("picks-{entry_id}-{event}");
    if let Some(cached) = disk::read(&key, config.cache_ttls.picks) {
        return Ok(cached);
    }
    let fresh = source.get_entry_picks(entry_id.value(), event).await?;
    disk::write(&key, &fresh);
    Ok(fresh)
}

/// Decode the bootstrap payload, serving individual players from the
/// player-lookup cache where a fresh-enough entry exists and populating it
/// for the rest (`spec.md` §5: player lookup TTL 10 min).
fn decode_players_cached(bootstrap: &BootstrapResponse, caches: &PlannerCaches) -> Result<Vec<Player>> {
    let mut cache = caches.players.lock().expect("player cache poisoned");
    bootstrap
        .elements
        .iter()
        .map(|dto| {
            let player_id = PlayerId::new(dto.id);
            if let Some(player) = cache.get(&player_id) {
                return Ok(player);
            }
            let player = decode_player(dto)?;
            cache.put(player_id, player.clone());
            Ok(player)
        })
        .collect()
}

fn decode_player(dto: &crate::source::dto::PlayerDto) -> Result<Player> {
    Ok(Player {
        player_id: PlayerId::new(dto.id),
        web_name: dto.web_name.clone(),
        position: Position::try_from_element_type(dto.element_type)?,
        club_id: ClubId::new(dto.team),
        now_cost_tenths: dto.now_cost,
        season_stats: SeasonStats {
            minutes: dto.minutes,
            starts: dto.starts,
            form: dto.form,
            xg: dto.expected_goals,
            xa: dto.expected_assists,
            xgi: dto.expected_goal_involvements,
            xgc: dto.expected_goals_conceded,
        },
        availability: Availability {
            status_code: dto.status.clone(),
            news_text: dto.news.clone(),
            chance_of_playing_next: dto.chance_of_playing_next_round,
        },
    })
}

/// Serve the expected-points table from the in-process cache when a
/// fresh-enough entry exists for this `(gameweek, horizon)` pair, otherwise
/// build and cache it (`spec.md` §5: expected-points table TTL 10 min).
fn cached_xp_table(
    caches: &PlannerCaches,
    players: &[Player],
    fixtures_list: &[Fixture],
    next_gw: GameweekId,
    config: &PlannerConfig,
) -> Result<ExpectedPointsTable> {
    let key = (next_gw.value(), config.num_gameweeks);
    {
        let mut cache = caches.xp.lock().expect("xp cache poisoned");
        if let Some(table) = cache.get(&key) {
            return Ok(table);
        }
    }
    let table = xp::build_table(players, fixtures_list, next_gw, config.num_gameweeks)?;
    caches.xp.lock().expect("xp cache poisoned").put(key, table.clone());
    Ok(table)
}

fn decode_fixtures(raw: &[FixtureDto]) -> Vec<Fixture> {
    raw.iter()
        .filter_map(|dto| {
            Some(Fixture {
                fixture_id: dto.id,
                gameweek_id: GameweekId::new(dto.event?),
                home_club: ClubId::new(dto.team_h),
                away_club: ClubId::new(dto.team_a),
                home_difficulty: dto.team_h_difficulty,
                away_difficulty: dto.team_a_difficulty,
            })
        })
        .collect()
}

fn decode_picks(raw: &[crate::source::dto::SquadPickDto]) -> Vec<SquadPick> {
    raw.iter()
        .map(|dto| SquadPick {
            player_id: PlayerId::new(dto.element),
            squad_slot: dto.position,
            multiplier: dto.multiplier,
            is_captain: dto.is_captain,
            is_vice: dto.is_vice_captain,
            purchase_price_tenths: None,
        })
        .collect()
}

/// Resolve each pick's purchase price from the most recent matching transfer
/// record, falling back to `None` (treated as current cost) when the player
/// predates the available transfer history.
fn attach_purchase_prices(picks: Vec<SquadPick>, transfers: &[TransferRecord]) -> Vec<SquadPick> {
    let mut latest_buy: HashMap<PlayerId, (u16, u32)> = HashMap::new();
    for record in transfers {
        let player_id = PlayerId::new(record.element_in);
        let entry = latest_buy.entry(player_id).or_insert((0, record.element_in_cost));
        if record.event >= entry.0 {
            *entry = (record.event, record.element_in_cost);
        }
    }

    picks
        .into_iter()
        .map(|mut pick| {
            pick.purchase_price_tenths = latest_buy.get(&pick.player_id).map(|(_, cost)| *cost);
            pick
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_price_picks_most_recent_transfer() {
        let picks = vec![SquadPick {
            player_id: PlayerId::new(1),
            squad_slot: 1,
            multiplier: 1,
            is_captain: false,
            is_vice: false,
            purchase_price_tenths: None,
        }];
        let transfers = vec![
            TransferRecord { element_in: 1, element_out: 2, element_in_cost: 50, event: 3 },
            TransferRecord { element_in: 1, element_out: 3, element_in_cost: 55, event: 7 },
        ];
        let result = attach_purchase_prices(picks, &transfers);
        assert_eq!(result[0].purchase_price_tenths, Some(55));
    }

    #[test]
    fn missing_transfer_history_leaves_purchase_price_unset() {
        let picks = vec![SquadPick {
            player_id: PlayerId::new(9),
            squad_slot: 1,
            multiplier: 1,
            is_captain: false,
            is_vice: false,
            purchase_price_tenths: None,
        }];
        let result = attach_purchase_prices(picks, &[]);
        assert_eq!(result[0].purchase_price_tenths, None);
    }
}
