//! C4: Expected-Points Engine — builds the frozen `(player, horizon step)` table.

pub mod formula;

use crate::cli::types::GameweekId;
use crate::error::{FplError, Result};
use crate::fixtures;
use crate::model::{ExpectedPointsTable, Fixture, Player};
use rayon::prelude::*;

/// Build the expected-points table for every player in `players` across
/// `num_gameweeks` horizon steps starting at `next_gameweek_id`.
///
/// Per-player failures are tolerated (substituted with `1.0`); the whole
/// computation only fails once more than 10% of players were affected
/// (`spec.md` §7).
pub fn build_table(
    players: &[Player],
    fixtures: &[Fixture],
    next_gameweek_id: GameweekId,
    num_gameweeks: u8,
) -> Result<ExpectedPointsTable> {
    let rows: Vec<(crate::cli::types::PlayerId, Vec<f64>, bool)> = players
        .par_iter()
        .map(|player| {
            let mut row = Vec::with_capacity(num_gameweeks as usize);
            let mut degraded = false;

            for step in 0..num_gameweeks {
                let gw = GameweekId::new(next_gameweek_id.value() + step as u16);
                match compute_one(player, fixtures, gw) {
                    Ok(xp) => row.push(xp),
                    Err(_) => {
                        degraded = true;
                        row.push(1.0);
                    }
                }
            }

            (player.player_id, row, degraded)
        })
        .collect();

    let degraded_count = rows.iter().filter(|(_, _, degraded)| *degraded).count();
    if !players.is_empty() && degraded_count * 10 > players.len() {
        return Err(FplError::ExpectedPointsFailure {
            message: format!(
                "{degraded_count} of {} players failed expected-points computation",
                players.len()
            ),
        });
    }

    let mut table = ExpectedPointsTable::new();
    for (player_id, row, _) in rows {
        table.insert(player_id, row);
    }
    Ok(table)
}

fn compute_one(player: &Player, all_fixtures: &[Fixture], gw: GameweekId) -> Result<f64> {
    if !player.season_stats.xg.is_finite()
        || !player.season_stats.xa.is_finite()
        || !player.season_stats.xgi.is_finite()
        || !player.season_stats.xgc.is_finite()
    {
        return Err(FplError::ExpectedPointsFailure {
            message: format!("non-finite stat for player {}", player.player_id),
        });
    }

    let fixture_ctx = fixtures::fixture_of(all_fixtures, player.club_id, gw)
        .map(|f| fixtures::context_for_club(&f, player.club_id));

    Ok(formula::expected_points(
        player.position,
        &player.season_stats,
        fixture_ctx,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::{ClubId, PlayerId, Position};
    use crate::model::{Availability, SeasonStats};

    fn player(id: u32, club: u8, position: Position) -> Player {
        Player {
            player_id: PlayerId::new(id),
            web_name: format!("player-{id}"),
            position,
            club_id: ClubId::new(club),
            now_cost_tenths: 50,
            season_stats: SeasonStats {
                minutes: 900,
                starts: 10,
                form: 4.0,
                xg: 2.0,
                xa: 1.0,
                xgi: 3.0,
                xgc: 1.0,
            },
            availability: Availability {
                status_code: "a".into(),
                news_text: String::new(),
                chance_of_playing_next: None,
            },
        }
    }

    #[test]
    fn builds_a_row_per_horizon_step() {
        let players = vec![player(1, 3, Position::Forward)];
        let fixtures = vec![Fixture {
            fixture_id: 1,
            gameweek_id: GameweekId::new(10),
            home_club: ClubId::new(3),
            away_club: ClubId::new(9),
            home_difficulty: 2,
            away_difficulty: 4,
        }];

        let table = build_table(&players, &fixtures, GameweekId::new(10), 3).unwrap();
        let row = table.row(PlayerId::new(1)).unwrap();
        assert_eq!(row.len(), 3);
        assert!(row.iter().all(|&xp| (0.5..=8.0).contains(&xp)));
    }

    #[test]
    fn missing_fixture_steps_are_blank() {
        let players = vec![player(1, 3, Position::Forward)];
        let table = build_table(&players, &[], GameweekId::new(10), 1).unwrap();
        assert_eq!(table.get(PlayerId::new(1), 0), Some(0.5));
    }
}
