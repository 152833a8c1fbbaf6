use rust_decimal::Decimal;

use crate::coerce::{parse_decimal, parse_or_zero};
use crate::commission::{CommissionBasis, PaymentStatus, PayoutRecord};
use crate::error::PayoutError;
use crate::types::{Money, Percent};
use crate::PayoutResult;

/// A single admin edit to one input field of a payout record.
///
/// Derived fields have no variant: they are only ever written by the
/// calculator.
#[derive(Debug, Clone, PartialEq)]
pub enum PayoutEdit {
    PremiumAmount(Money),
    CommissionOn(CommissionBasis),
    NetPremium(Money),
    OdPremium(Money),
    TpPremium(Money),
    OdPercentage(Percent),
    TpPercentage(Percent),
    CommissionRate(Percent),
    Points(Decimal),
    /// `None` clears the rate so the default applies again
    TdsRate(Option<Percent>),
    Discount(Money),
    BrokerPayment(Money),
    OtherExpense(Money),
    PaymentReceived(PaymentStatus),
}

const DERIVED_FIELDS: [&str; 4] = ["earning", "tds", "amountaftertds", "netprofit"];

impl PayoutEdit {
    /// Wire name of the field this edit targets.
    pub fn field(&self) -> &'static str {
        match self {
            PayoutEdit::PremiumAmount(_) => "premiumAmount",
            PayoutEdit::CommissionOn(_) => "commissionOn",
            PayoutEdit::NetPremium(_) => "netPremium",
            PayoutEdit::OdPremium(_) => "odPremium",
            PayoutEdit::TpPremium(_) => "tpPremium",
            PayoutEdit::OdPercentage(_) => "odPercentage",
            PayoutEdit::TpPercentage(_) => "tpPercentage",
            PayoutEdit::CommissionRate(_) => "commissionRate",
            PayoutEdit::Points(_) => "points",
            PayoutEdit::TdsRate(_) => "tdsRate",
            PayoutEdit::Discount(_) => "discount",
            PayoutEdit::BrokerPayment(_) => "brokerPayment",
            PayoutEdit::OtherExpense(_) => "otherExpense",
            PayoutEdit::PaymentReceived(_) => "paymentReceived",
        }
    }

    /// Settlement status is the only input the calculator does not read.
    pub fn triggers_recompute(&self) -> bool {
        !matches!(self, PayoutEdit::PaymentReceived(_))
    }

    /// Build an edit from a field name (camelCase or snake_case) and the raw
    /// text an admin typed. Numeric text that does not parse becomes 0.
    pub fn parse(field: &str, raw: &str) -> PayoutResult<Self> {
        let key: String = field
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        let edit = match key.as_str() {
            "premiumamount" => PayoutEdit::PremiumAmount(parse_or_zero(raw)),
            "commissionon" => PayoutEdit::CommissionOn(CommissionBasis::from(raw.trim())),
            "netpremium" => PayoutEdit::NetPremium(parse_or_zero(raw)),
            "odpremium" => PayoutEdit::OdPremium(parse_or_zero(raw)),
            "tppremium" => PayoutEdit::TpPremium(parse_or_zero(raw)),
            "odpercentage" => PayoutEdit::OdPercentage(parse_or_zero(raw)),
            "tppercentage" => PayoutEdit::TpPercentage(parse_or_zero(raw)),
            "commissionrate" => PayoutEdit::CommissionRate(parse_or_zero(raw)),
            "points" => PayoutEdit::Points(parse_or_zero(raw)),
            "tdsrate" => PayoutEdit::TdsRate(parse_decimal(raw)),
            "discount" => PayoutEdit::Discount(parse_or_zero(raw)),
            "brokerpayment" => PayoutEdit::BrokerPayment(parse_or_zero(raw)),
            "otherexpense" => PayoutEdit::OtherExpense(parse_or_zero(raw)),
            "paymentreceived" => PayoutEdit::PaymentReceived(parse_status(raw)?),
            k if DERIVED_FIELDS.contains(&k) => {
                return Err(PayoutError::InvalidInput {
                    field: field.to_string(),
                    reason: "derived field; recomputed from the other inputs".into(),
                })
            }
            _ => {
                return Err(PayoutError::InvalidInput {
                    field: field.to_string(),
                    reason: "unknown payout field".into(),
                })
            }
        };
        Ok(edit)
    }

    /// Parse a `field=value` pair.
    pub fn parse_assignment(assignment: &str) -> PayoutResult<Self> {
        match assignment.split_once('=') {
            Some((field, raw)) => PayoutEdit::parse(field.trim(), raw),
            None => Err(PayoutError::InvalidInput {
                field: assignment.to_string(),
                reason: "expected field=value".into(),
            }),
        }
    }

    /// Write the new value. Returns false when the field already held it.
    pub(crate) fn apply_to(&self, record: &mut PayoutRecord) -> bool {
        fn set<T: PartialEq + Clone>(slot: &mut T, value: &T) -> bool {
            if slot == value {
                return false;
            }
            *slot = value.clone();
            true
        }

        match self {
            PayoutEdit::PremiumAmount(v) => set(&mut record.premium_amount, v),
            PayoutEdit::CommissionOn(v) => set(&mut record.commission_on, v),
            PayoutEdit::NetPremium(v) => set(&mut record.net_premium, v),
            PayoutEdit::OdPremium(v) => set(&mut record.od_premium, v),
            PayoutEdit::TpPremium(v) => set(&mut record.tp_premium, v),
            PayoutEdit::OdPercentage(v) => set(&mut record.od_percentage, v),
            PayoutEdit::TpPercentage(v) => set(&mut record.tp_percentage, v),
            PayoutEdit::CommissionRate(v) => set(&mut record.commission_rate, v),
            PayoutEdit::Points(v) => set(&mut record.points, v),
            PayoutEdit::TdsRate(v) => set(&mut record.tds_rate, v),
            PayoutEdit::Discount(v) => set(&mut record.discount, v),
            PayoutEdit::BrokerPayment(v) => set(&mut record.broker_payment, v),
            PayoutEdit::OtherExpense(v) => set(&mut record.other_expense, v),
            PayoutEdit::PaymentReceived(v) => set(&mut record.payment_received, v),
        }
    }
}

fn parse_status(raw: &str) -> PayoutResult<PaymentStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(PaymentStatus::Yes),
        "no" | "n" | "false" | "" => Ok(PaymentStatus::No),
        _ => Err(PayoutError::InvalidInput {
            field: "paymentReceived".into(),
            reason: format!("expected Yes or No, got '{}'", raw.trim()),
        }),
    }
}
