pub mod ledger;

pub use ledger::{
    summarize_payouts, summarize_payouts_with, BasisTotals, PayoutSummary, SettlementTotals,
};
