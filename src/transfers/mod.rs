//! C2/C3: free-transfer ledger replay and selling-price calculation.

pub mod ledger;
pub mod pricing;
