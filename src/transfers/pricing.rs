//! C3: Selling-Price Calculator — FPL's asymmetric half-profit rule.

use crate::model::SquadPick;
use std::collections::HashMap;

/// Selling price for one pick, given its current cost.
///
/// Half the profit, rounded down, when the price has risen; full loss
/// exposure when it has fallen (`spec.md` §4.3).
pub fn selling_price_tenths(now_cost_tenths: u32, purchase_price_tenths: Option<u32>) -> u32 {
    let buy = purchase_price_tenths.unwrap_or(now_cost_tenths);
    if now_cost_tenths >= buy {
        buy + (now_cost_tenths - buy) / 2
    } else {
        now_cost_tenths
    }
}

/// Total disposable budget: bank plus every squad member's selling price.
/// `now_cost_by_player` supplies each pick's current market price.
pub fn total_budget_tenths(
    bank_tenths: u32,
    picks: &[SquadPick],
    now_cost_by_player: &HashMap<crate::cli::types::PlayerId, u32>,
) -> u32 {
    let squad_value: u32 = picks
        .iter()
        .filter_map(|pick| {
            now_cost_by_player
                .get(&pick.player_id)
                .map(|&now_cost| selling_price_tenths(now_cost, pick.purchase_price_tenths))
        })
        .sum();
    bank_tenths + squad_value
}
