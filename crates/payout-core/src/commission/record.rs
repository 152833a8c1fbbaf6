use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::basis::{CommissionBasis, PaymentStatus};
use crate::coerce::{lenient, lenient_opt};
use crate::types::{Money, Percent};

/// A payout record as the admin payout-records screen holds it.
///
/// Numeric inputs decode leniently: missing, null or malformed values are 0.
/// `earning`, `tds`, `amount_after_tds` and `net_profit` are outputs of the
/// calculator; whatever arrives in them is overwritten on recompute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    /// Total policy premium ex-GST; base of last resort
    #[serde(default, deserialize_with = "lenient")]
    pub premium_amount: Money,
    #[serde(default)]
    pub commission_on: CommissionBasis,
    /// Base for Net and Fixed
    #[serde(default, deserialize_with = "lenient")]
    pub net_premium: Money,
    #[serde(default, deserialize_with = "lenient")]
    pub od_premium: Money,
    #[serde(default, deserialize_with = "lenient")]
    pub tp_premium: Money,
    /// OD+TP only
    #[serde(default, deserialize_with = "lenient")]
    pub od_percentage: Percent,
    /// OD+TP only
    #[serde(default, deserialize_with = "lenient")]
    pub tp_percentage: Percent,
    #[serde(default, deserialize_with = "lenient")]
    pub commission_rate: Percent,
    /// Flat commission for ONLINE POINTS
    #[serde(default, deserialize_with = "lenient")]
    pub points: Decimal,
    /// Absent until the first recompute persists the default
    #[serde(default, deserialize_with = "lenient_opt")]
    pub tds_rate: Option<Percent>,
    #[serde(default, deserialize_with = "lenient")]
    pub discount: Money,
    #[serde(default, deserialize_with = "lenient")]
    pub broker_payment: Money,
    #[serde(default, deserialize_with = "lenient")]
    pub other_expense: Money,

    #[serde(default, deserialize_with = "lenient")]
    pub earning: Money,
    #[serde(default, deserialize_with = "lenient")]
    pub tds: Money,
    #[serde(default, deserialize_with = "lenient")]
    pub amount_after_tds: Money,
    #[serde(default, deserialize_with = "lenient")]
    pub net_profit: Money,

    #[serde(default)]
    pub payment_received: PaymentStatus,
}

impl PayoutRecord {
    /// Sum of the post-TDS deductions.
    pub fn total_expenses(&self) -> Money {
        self.discount
            .saturating_add(self.broker_payment)
            .saturating_add(self.other_expense)
    }

    /// The derived fields currently stored on the record.
    pub fn figures(&self) -> DerivedFigures {
        DerivedFigures {
            earning: self.earning,
            tds: self.tds,
            amount_after_tds: self.amount_after_tds,
            net_profit: self.net_profit,
        }
    }

    pub(crate) fn write_figures(&mut self, figures: &DerivedFigures) {
        self.earning = figures.earning;
        self.tds = figures.tds;
        self.amount_after_tds = figures.amount_after_tds;
        self.net_profit = figures.net_profit;
    }
}

/// The four values the calculator owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFigures {
    pub earning: Money,
    pub tds: Money,
    pub amount_after_tds: Money,
    pub net_profit: Money,
}

impl DerivedFigures {
    /// Write-back guard. Earning, TDS and post-TDS amount compare exactly;
    /// net profit only counts as changed when it moves by more than
    /// `tolerance`.
    pub fn differs_from(&self, other: &DerivedFigures, tolerance: Money) -> bool {
        self.earning != other.earning
            || self.tds != other.tds
            || self.amount_after_tds != other.amount_after_tds
            || self.net_profit.saturating_sub(other.net_profit).abs() > tolerance
    }
}
