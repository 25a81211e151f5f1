//! C4 core: the pure per-player-per-gameweek expected-points formula.

use crate::cli::types::Position;
use crate::model::{FixtureContext, SeasonStats};

/// A blank gameweek (no fixture for the player's club) is floored directly to
/// this value, per `spec.md` §4.4's "implementers may instead skip the
/// fixture and treat xp as 0.5" shortcut.
const BLANK_GW_XP: f64 = 0.5;
const MIN_XP: f64 = 0.5;
const MAX_XP: f64 = 8.0;
const NEVER_PLAYED_XP: f64 = 1.0;

/// Compute `xp` for one player in one gameweek. `fixture` is `None` on a
/// blank gameweek.
pub fn expected_points(
    position: Position,
    stats: &SeasonStats,
    fixture: Option<FixtureContext>,
) -> f64 {
    if stats.starts == 0 || stats.minutes == 0 {
        return NEVER_PLAYED_XP;
    }

    let Some(fixture) = fixture else {
        return BLANK_GW_XP;
    };

    let games = stats.starts.max(1) as f64;
    let avg_minutes = stats.minutes as f64 / games;

    let base = base_score(position, stats, games, avg_minutes);

    let fixture_mult = 1.0 + (3.0 - fixture.difficulty as f64) * 0.15;
    let home_away_mult = if fixture.is_home { 1.10 } else { 0.95 };
    let minutes_mult = 0.3 + (avg_minutes / 90.0).min(1.0) * 0.7;

    let raw = (base * fixture_mult * home_away_mult * minutes_mult).min(MAX_XP);
    let adjustment = underlying_adjustment(position, stats, games).clamp(-1.0, 1.5);

    let xp = (raw + adjustment).clamp(MIN_XP, MAX_XP);
    (xp * 10.0).round() / 10.0
}

fn base_score(position: Position, stats: &SeasonStats, games: f64, avg_minutes: f64) -> f64 {
    if stats.form != 0.0 || avg_minutes <= 60.0 {
        return stats.form;
    }

    match position {
        Position::Midfielder | Position::Forward => {
            let xgi_pg = if stats.xgi > 0.0 { stats.xgi / games } else { 0.0 };
            (xgi_pg * 5.0).clamp(1.5, 3.0)
        }
        Position::Goalkeeper | Position::Defender => 2.0,
    }
}

fn underlying_adjustment(position: Position, stats: &SeasonStats, games: f64) -> f64 {
    match position {
        Position::Midfielder | Position::Forward => {
            let xgi_pg = stats.xgi / games;
            (xgi_pg - 0.5 * stats.form).clamp(-0.5, 1.0)
        }
        Position::Defender => {
            let xgc_pg = stats.xgc / games;
            let mut adj = if xgc_pg < 1.0 {
                (1.0 - xgc_pg) * 0.5
            } else if xgc_pg > 1.2 {
                (1.2 - xgc_pg) * 0.3
            } else {
                0.0
            };
            let xgi_pg = stats.xgi / games;
            if xgi_pg > 0.1 {
                adj += xgi_pg * 0.5;
            }
            adj
        }
        Position::Goalkeeper => {
            let xgc_pg = stats.xgc / games;
            if xgc_pg < 1.0 {
                (1.0 - xgc_pg) * 0.8
            } else if xgc_pg > 1.5 {
                (1.5 - xgc_pg) * 0.4
            } else {
                0.0
            }
        }
    }
}
