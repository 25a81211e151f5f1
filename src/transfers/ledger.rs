//! C2: Free-Transfer Ledger — replay gameweek history into a current FT count.

use crate::source::dto::GwRecord;

const MIN_FT: i32 = 1;
const MAX_FT: i32 = 5;

fn is_reset_chip(chip: &str) -> bool {
    matches!(chip, "wildcard" | "freehit")
}

/// Replay `history` (chronological) forward to compute the free transfers
/// available for `next_gameweek_id`. Defaults to 1 on any anomaly, per
/// `spec.md` §4.2 ("on any error or missing data, default to 1").
pub fn free_transfers_now(history: &[GwRecord]) -> u8 {
    let mut ft: i32 = 0;

    for record in history {
        if let Some(chip) = record.active_chip.as_deref() {
            if is_reset_chip(chip) {
                ft = 1;
                continue;
            }
        }

        let total = record.event_transfers as i32;
        if total == 0 {
            ft = (ft + 1).min(MAX_FT);
            continue;
        }

        let paid = (record.event_transfers_cost / 4) as i32;
        let free_used = total - paid;
        if free_used >= 0 {
            ft = (ft - free_used + 1).clamp(MIN_FT, MAX_FT);
        }
    }

    ft.clamp(MIN_FT, MAX_FT) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(event: u16, transfers: u32, cost: u32, chip: Option<&str>) -> GwRecord {
        GwRecord {
            event,
            event_transfers: transfers,
            event_transfers_cost: cost,
            active_chip: chip.map(str::to_string),
        }
    }

    #[test]
    fn empty_history_defaults_to_one() {
        assert_eq!(free_transfers_now(&[]), 1);
    }

    #[test]
    fn banks_up_to_cap_of_five() {
        // S6: no transfers across 7 gameweeks saturates at 5.
        let history: Vec<_> = (1..=7).map(|gw| record(gw, 0, 0, None)).collect();
        assert_eq!(free_transfers_now(&history), 5);
    }

    #[test]
    fn wildcard_resets_to_one() {
        let history = vec![
            record(1, 0, 0, None),
            record(2, 0, 0, None),
            record(3, 2, 0, Some("wildcard")),
        ];
        assert_eq!(free_transfers_now(&history), 1);
    }

    #[test]
    fn paid_transfer_reduces_free_used() {
        // 1 free transfer banked, then 2 transfers with 1 paid (cost 4): free_used = 1.
        let history = vec![record(1, 0, 0, None), record(2, 2, 4, None)];
        // ft after gw1 = 1; after gw2 free_used = 2 - 1 = 1, ft = clamp(1-1+1,1,5) = 1
        assert_eq!(free_transfers_now(&history), 1);
    }
}
