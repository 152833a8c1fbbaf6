use clap::Args;
use serde_json::Value;

use payout_core::commission::{CalculatorSettings, PayoutRecord};
use payout_core::summary;

use crate::input;

/// Arguments for summarising a batch of payout records
#[derive(Args)]
pub struct SummaryArgs {
    /// Path to JSON/YAML array of payout records
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_summary(
    args: SummaryArgs,
    settings: &CalculatorSettings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let records: Vec<PayoutRecord> = input::load(args.input.as_deref(), "summary")?;
    let result = summary::summarize_payouts_with(&records, settings);
    Ok(serde_json::to_value(result)?)
}
