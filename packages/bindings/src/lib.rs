use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use payout_core::commission::{self, CalculatorSettings, PayoutRecord};
use payout_core::editor::{EditOutcome, PayoutEdit, PayoutEditor};
use payout_core::summary;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_record(record_json: &str) -> NapiResult<PayoutRecord> {
    serde_json::from_str(record_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Recompute the derived figures of one record. Call on every input change.
#[napi]
pub fn recompute_payout(record_json: String) -> NapiResult<String> {
    let record = parse_record(&record_json)?;
    let output = commission::recompute(record);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn commission_breakdown(record_json: String) -> NapiResult<String> {
    let record = parse_record(&record_json)?;
    let output = commission::calculate_commission(&record);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct EditResponse {
    record: PayoutRecord,
    outcome: EditOutcome,
}

/// Apply one field edit with the write-back guard. The host re-renders only
/// when `outcome.derived_written` or `outcome.input_changed` is true.
/// Corrections made while opening a stale record count as derived writes.
#[napi]
pub fn apply_payout_edit(record_json: String, field: String, value: String) -> NapiResult<String> {
    let record = parse_record(&record_json)?;
    let edit = PayoutEdit::parse(&field, &value).map_err(to_napi_error)?;
    let (mut editor, opened) = PayoutEditor::open(record, CalculatorSettings::default());
    let mut outcome = editor.apply(edit);
    outcome.derived_written |= opened.derived_written;
    let response = EditResponse {
        record: editor.into_record(),
        outcome,
    };
    serde_json::to_string(&response).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

#[napi]
pub fn summarize_payouts(records_json: String) -> NapiResult<String> {
    let records: Vec<PayoutRecord> = serde_json::from_str(&records_json).map_err(to_napi_error)?;
    let output = summary::summarize_payouts(&records);
    serde_json::to_string(&output).map_err(to_napi_error)
}
