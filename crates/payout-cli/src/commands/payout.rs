use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use payout_core::commission::{CalculatorSettings, CommissionCalculator, PayoutRecord};
use payout_core::editor::{EditOutcome, PayoutEdit, PayoutEditor, PayoutStore};
use payout_core::{PayoutError, PayoutResult};

use crate::input;

/// Arguments for recomputing a single payout record
#[derive(Args)]
pub struct RecomputeArgs {
    /// Path to JSON/YAML payout record
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a full commission breakdown
#[derive(Args)]
pub struct BreakdownArgs {
    /// Path to JSON/YAML payout record
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for editing a payout record
#[derive(Args)]
pub struct EditArgs {
    /// Path to JSON/YAML payout record
    #[arg(long)]
    pub input: Option<String>,

    /// Field assignment, repeatable (e.g. --set commissionRate=12.5 --set commissionOn=OD)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub edits: Vec<String>,

    /// Submit the edited record to this JSON file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

/// Writes submitted records as pretty JSON, replacing the file each time.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PayoutStore for JsonFileStore {
    fn save(&mut self, record: &PayoutRecord) -> PayoutResult<()> {
        let body = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, body).map_err(|e| {
            PayoutError::Persistence(format!("Failed to write '{}': {}", self.path.display(), e))
        })
    }
}

#[derive(Serialize)]
struct EditReport {
    record: PayoutRecord,
    /// Stale figures or a missing TDS rate were corrected on load
    initial_sync: bool,
    outcomes: Vec<FieldOutcome>,
    revision: u64,
    saved: bool,
}

#[derive(Serialize)]
struct FieldOutcome {
    field: &'static str,
    #[serde(flatten)]
    outcome: EditOutcome,
}

pub fn run_recompute(
    args: RecomputeArgs,
    settings: &CalculatorSettings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let record: PayoutRecord = input::load(args.input.as_deref(), "recompute")?;
    let calculator = CommissionCalculator::new(settings.clone());
    let result = calculator.recompute(record);
    Ok(serde_json::to_value(result)?)
}

pub fn run_breakdown(
    args: BreakdownArgs,
    settings: &CalculatorSettings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let record: PayoutRecord = input::load(args.input.as_deref(), "breakdown")?;
    let calculator = CommissionCalculator::new(settings.clone());
    let result = calculator.analyse(&record);
    Ok(serde_json::to_value(result)?)
}

pub fn run_edit(
    args: EditArgs,
    settings: &CalculatorSettings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let edits = args
        .edits
        .iter()
        .map(|assignment| PayoutEdit::parse_assignment(assignment))
        .collect::<PayoutResult<Vec<_>>>()?;

    let record: PayoutRecord = input::load(args.input.as_deref(), "edit")?;
    let (mut editor, opened) = PayoutEditor::open(record, settings.clone());

    let outcomes: Vec<FieldOutcome> = edits
        .into_iter()
        .map(|edit| {
            let field = edit.field();
            FieldOutcome {
                field,
                outcome: editor.apply(edit),
            }
        })
        .collect();

    let saved = match args.save {
        Some(path) => {
            editor.submit(&mut JsonFileStore::new(path))?;
            true
        }
        None => false,
    };

    let report = EditReport {
        revision: editor.revision(),
        record: editor.into_record(),
        initial_sync: opened.derived_written,
        outcomes,
        saved,
    };
    Ok(serde_json::to_value(report)?)
}
