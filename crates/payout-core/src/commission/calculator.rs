use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::basis::CommissionBasis;
use super::record::{DerivedFigures, PayoutRecord};
use crate::coerce::lenient;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

/// TDS rate applied when a record carries none.
pub const DEFAULT_TDS_RATE: Percent = dec!(2);

/// Net profit movements at or below this are treated as unchanged. Decimal
/// arithmetic is exact, so the default compares exactly.
pub const NET_PROFIT_TOLERANCE: Money = Decimal::ZERO;

const ONE_HUNDRED: Decimal = dec!(100);

/// `pct` percent of `amount`. Saturates instead of overflowing.
fn percent_of(amount: Money, pct: Percent) -> Money {
    amount.saturating_mul(pct) / ONE_HUNDRED
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Host-tunable defaults for the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    /// Applied (and persisted) when `tds_rate` is absent
    #[serde(deserialize_with = "lenient")]
    pub default_tds_rate: Percent,
    /// Write-back tolerance for net profit while editing. Submit always
    /// writes exact figures.
    #[serde(deserialize_with = "lenient")]
    pub net_profit_tolerance: Money,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            default_tds_rate: DEFAULT_TDS_RATE,
            net_profit_tolerance: NET_PROFIT_TOLERANCE,
        }
    }
}

// ---------------------------------------------------------------------------
// Breakdown types
// ---------------------------------------------------------------------------

/// Where the gross commission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseSource {
    /// Flat points amount, no rate applied
    Points,
    /// OD and TP premiums at their own rates, summed
    OdTpSplit,
    NetPremium,
    OdPremium,
    TpPremium,
    /// Fallback for an unrecognised basis
    PremiumAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitSign {
    Profit,
    BreakEven,
    Loss,
}

impl ProfitSign {
    pub fn of(amount: Money) -> Self {
        if amount > Decimal::ZERO {
            ProfitSign::Profit
        } else if amount < Decimal::ZERO {
            ProfitSign::Loss
        } else {
            ProfitSign::BreakEven
        }
    }
}

/// Every intermediate value of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionBreakdown {
    pub basis: CommissionBasis,
    pub base_source: BaseSource,
    /// Single base the rate was applied to (absent for points and OD+TP)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub od_commission: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_commission: Option<Money>,
    pub earning: Money,
    pub tds_rate: Percent,
    pub tds_rate_defaulted: bool,
    pub tds: Money,
    pub amount_after_tds: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
    pub profit_sign: ProfitSign,
}

impl CommissionBreakdown {
    pub fn figures(&self) -> DerivedFigures {
        DerivedFigures {
            earning: self.earning,
            tds: self.tds,
            amount_after_tds: self.amount_after_tds,
            net_profit: self.net_profit,
        }
    }
}

struct Gross {
    source: BaseSource,
    base_amount: Option<Money>,
    commission_rate: Option<Percent>,
    od_commission: Option<Money>,
    tp_commission: Option<Money>,
    earning: Money,
}

/// Step 1: gross commission by basis.
fn gross_commission(record: &PayoutRecord) -> Gross {
    match &record.commission_on {
        CommissionBasis::OnlinePoints => Gross {
            source: BaseSource::Points,
            base_amount: None,
            commission_rate: None,
            od_commission: None,
            tp_commission: None,
            earning: record.points,
        },
        CommissionBasis::OdTp => {
            let od = percent_of(record.od_premium, record.od_percentage);
            let tp = percent_of(record.tp_premium, record.tp_percentage);
            Gross {
                source: BaseSource::OdTpSplit,
                base_amount: None,
                commission_rate: None,
                od_commission: Some(od),
                tp_commission: Some(tp),
                earning: od.saturating_add(tp),
            }
        }
        basis => {
            let (source, base) = match basis {
                CommissionBasis::Net | CommissionBasis::Fixed => {
                    (BaseSource::NetPremium, record.net_premium)
                }
                CommissionBasis::Od => (BaseSource::OdPremium, record.od_premium),
                CommissionBasis::Tp => (BaseSource::TpPremium, record.tp_premium),
                _ => {
                    warn!(basis = %basis, "unrecognised commission basis, using premium amount");
                    (BaseSource::PremiumAmount, record.premium_amount)
                }
            };
            Gross {
                source,
                base_amount: Some(base),
                commission_rate: Some(record.commission_rate),
                od_commission: None,
                tp_commission: None,
                earning: percent_of(base, record.commission_rate),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Stateless commission calculator bound to a set of defaults.
#[derive(Debug, Clone, Default)]
pub struct CommissionCalculator {
    settings: CalculatorSettings,
}

impl CommissionCalculator {
    pub fn new(settings: CalculatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CalculatorSettings {
        &self.settings
    }

    pub fn effective_tds_rate(&self, record: &PayoutRecord) -> Percent {
        record.tds_rate.unwrap_or(self.settings.default_tds_rate)
    }

    /// Run steps 1-4 and keep every intermediate.
    pub fn breakdown(&self, record: &PayoutRecord) -> CommissionBreakdown {
        let gross = gross_commission(record);

        let tds_rate = self.effective_tds_rate(record);
        let tds = percent_of(gross.earning, tds_rate);
        let amount_after_tds = gross.earning.saturating_sub(tds);

        let total_expenses = record.total_expenses();
        let net_profit = amount_after_tds.saturating_sub(total_expenses);

        CommissionBreakdown {
            basis: record.commission_on.clone(),
            base_source: gross.source,
            base_amount: gross.base_amount,
            commission_rate: gross.commission_rate,
            od_commission: gross.od_commission,
            tp_commission: gross.tp_commission,
            earning: gross.earning,
            tds_rate,
            tds_rate_defaulted: record.tds_rate.is_none(),
            tds,
            amount_after_tds,
            total_expenses,
            net_profit,
            profit_sign: ProfitSign::of(net_profit),
        }
    }

    pub fn derive_figures(&self, record: &PayoutRecord) -> DerivedFigures {
        self.breakdown(record).figures()
    }

    /// Overwrite the derived fields and persist the effective TDS rate.
    pub fn recompute(&self, mut record: PayoutRecord) -> PayoutRecord {
        let figures = self.derive_figures(&record);
        record.tds_rate = Some(self.effective_tds_rate(&record));
        record.write_figures(&figures);
        debug!(
            id = record.id.as_deref().unwrap_or("-"),
            basis = %record.commission_on,
            earning = %figures.earning,
            net_profit = %figures.net_profit,
            "payout recomputed"
        );
        record
    }

    /// Breakdown wrapped in the computation envelope, with warnings for
    /// conditions an admin would want flagged.
    pub fn analyse(&self, record: &PayoutRecord) -> ComputationOutput<CommissionBreakdown> {
        let start = Instant::now();
        let mut warnings: Vec<String> = Vec::new();
        let breakdown = self.breakdown(record);

        match &record.commission_on {
            CommissionBasis::Other(raw) => {
                let msg = if raw.trim().is_empty() {
                    "commissionOn not set; premium amount used as commission base".to_string()
                } else {
                    format!(
                        "commissionOn '{}' is not a recognised basis; premium amount used as commission base",
                        raw
                    )
                };
                warnings.push(msg);
            }
            CommissionBasis::OnlinePoints if !record.commission_rate.is_zero() => {
                warnings.push(format!(
                    "commissionRate {}% ignored for {} basis",
                    record.commission_rate,
                    CommissionBasis::OnlinePoints
                ));
            }
            _ => {}
        }

        if breakdown.tds_rate_defaulted {
            warnings.push(format!(
                "tdsRate not set; default of {}% applied",
                self.settings.default_tds_rate
            ));
        }

        if breakdown.profit_sign == ProfitSign::Loss {
            warnings.push(format!(
                "Net profit is negative ({}): deductions exceed commission after TDS",
                breakdown.net_profit
            ));
        }

        let elapsed = start.elapsed().as_micros() as u64;
        with_metadata(
            "Gross commission by basis, less TDS, less discount/brokerage/other expense",
            &self.settings,
            warnings,
            elapsed,
            breakdown,
        )
    }
}

// ---------------------------------------------------------------------------
// Free functions with default settings
// ---------------------------------------------------------------------------

/// Recompute `earning`, `tds`, `amount_after_tds` and `net_profit` from the
/// record's inputs. Never fails; absent TDS rate becomes 2%.
pub fn recompute(record: PayoutRecord) -> PayoutRecord {
    CommissionCalculator::default().recompute(record)
}

pub fn derive_figures(record: &PayoutRecord) -> DerivedFigures {
    CommissionCalculator::default().derive_figures(record)
}

/// Full breakdown of one record using the default settings.
pub fn calculate_commission(record: &PayoutRecord) -> ComputationOutput<CommissionBreakdown> {
    CommissionCalculator::default().analyse(record)
}
