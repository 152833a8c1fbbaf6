use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;

use crate::commission::{CalculatorSettings, CommissionCalculator, PayoutRecord};
use crate::types::{with_metadata, ComputationOutput, Money};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Count and net profit for one settlement status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementTotals {
    pub count: usize,
    pub amount_after_tds: Money,
    pub net_profit: Money,
}

/// Totals for one commission basis label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisTotals {
    pub basis: String,
    pub count: usize,
    pub earning: Money,
    pub net_profit: Money,
}

/// Batch totals for the payout-records screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutSummary {
    pub record_count: usize,
    pub total_premium: Money,
    pub total_earning: Money,
    pub total_tds: Money,
    pub total_amount_after_tds: Money,
    pub total_expenses: Money,
    pub total_net_profit: Money,
    /// Records whose net profit is below zero
    pub loss_making_records: usize,
    pub received: SettlementTotals,
    pub pending: SettlementTotals,
    /// Ordered by basis label
    pub by_basis: Vec<BasisTotals>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Summarise a batch with the default calculator settings.
pub fn summarize_payouts(records: &[PayoutRecord]) -> ComputationOutput<PayoutSummary> {
    summarize_payouts_with(records, &CalculatorSettings::default())
}

/// Summarise a batch. Each record is recomputed first; derived values stored
/// on the input are not trusted.
pub fn summarize_payouts_with(
    records: &[PayoutRecord],
    settings: &CalculatorSettings,
) -> ComputationOutput<PayoutSummary> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let calculator = CommissionCalculator::new(settings.clone());

    let mut total_premium = Decimal::ZERO;
    let mut total_earning = Decimal::ZERO;
    let mut total_tds = Decimal::ZERO;
    let mut total_after_tds = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut total_net_profit = Decimal::ZERO;
    let mut loss_making_records = 0usize;
    let mut stale_records = 0usize;
    let mut unrecognised_basis = 0usize;
    let mut received = SettlementTotals::default();
    let mut pending = SettlementTotals::default();
    let mut by_basis: BTreeMap<String, BasisTotals> = BTreeMap::new();

    for record in records {
        let figures = calculator.derive_figures(record);
        if figures.differs_from(&record.figures(), settings.net_profit_tolerance) {
            stale_records += 1;
        }
        if !record.commission_on.is_recognised() {
            unrecognised_basis += 1;
        }

        let expenses = record.total_expenses();
        total_premium = total_premium.saturating_add(record.premium_amount);
        total_earning = total_earning.saturating_add(figures.earning);
        total_tds = total_tds.saturating_add(figures.tds);
        total_after_tds = total_after_tds.saturating_add(figures.amount_after_tds);
        total_expenses = total_expenses.saturating_add(expenses);
        total_net_profit = total_net_profit.saturating_add(figures.net_profit);
        if figures.net_profit < Decimal::ZERO {
            loss_making_records += 1;
        }

        let settlement = if record.payment_received.is_received() {
            &mut received
        } else {
            &mut pending
        };
        settlement.count += 1;
        settlement.amount_after_tds = settlement
            .amount_after_tds
            .saturating_add(figures.amount_after_tds);
        settlement.net_profit = settlement.net_profit.saturating_add(figures.net_profit);

        let label = record.commission_on.label().to_string();
        let entry = by_basis.entry(label.clone()).or_insert_with(|| BasisTotals {
            basis: label,
            count: 0,
            earning: Decimal::ZERO,
            net_profit: Decimal::ZERO,
        });
        entry.count += 1;
        entry.earning = entry.earning.saturating_add(figures.earning);
        entry.net_profit = entry.net_profit.saturating_add(figures.net_profit);
    }

    if records.is_empty() {
        warnings.push("No payout records supplied; all totals are zero".into());
    }
    if stale_records > 0 {
        warnings.push(format!(
            "{} record(s) carried stale derived figures; recomputed values used",
            stale_records
        ));
    }
    if unrecognised_basis > 0 {
        warnings.push(format!(
            "{} record(s) have an unrecognised commission basis; premium amount used as base",
            unrecognised_basis
        ));
    }
    if loss_making_records > 0 {
        warnings.push(format!(
            "{} record(s) are loss-making after deductions",
            loss_making_records
        ));
    }

    debug!(
        records = records.len(),
        total_net_profit = %total_net_profit,
        "payout batch summarised"
    );

    let summary = PayoutSummary {
        record_count: records.len(),
        total_premium,
        total_earning,
        total_tds,
        total_amount_after_tds: total_after_tds,
        total_expenses,
        total_net_profit,
        loss_making_records,
        received,
        pending,
        by_basis: by_basis.into_values().collect(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Per-record recompute, then totals by settlement status and commission basis",
        settings,
        warnings,
        elapsed,
        summary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commission::{CommissionBasis, PaymentStatus};
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_batch() {
        let out = summarize_payouts(&[]);
        assert_eq!(out.result.record_count, 0);
        assert_eq!(out.result.total_net_profit, Decimal::ZERO);
        assert!(out.result.by_basis.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_settlement_split() {
        let paid = PayoutRecord {
            commission_on: CommissionBasis::OnlinePoints,
            points: dec!(100),
            tds_rate: Some(dec!(0)),
            payment_received: PaymentStatus::Yes,
            ..Default::default()
        };
        let unpaid = PayoutRecord {
            payment_received: PaymentStatus::No,
            ..paid.clone()
        };
        let out = summarize_payouts(&[paid, unpaid.clone(), unpaid]);
        assert_eq!(out.result.received.count, 1);
        assert_eq!(out.result.received.net_profit, dec!(100));
        assert_eq!(out.result.pending.count, 2);
        assert_eq!(out.result.pending.net_profit, dec!(200));
    }
}
