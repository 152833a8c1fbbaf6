pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The object holding the figures: the `result` of a computation envelope,
/// the `record` of an edit report, or the value itself.
pub(crate) fn primary(value: &Value) -> &Value {
    value
        .get("result")
        .or_else(|| value.get("record"))
        .unwrap_or(value)
}

/// Net profit of whatever was printed, if it carries one.
pub(crate) fn net_profit_of(value: &Value) -> Option<rust_decimal::Decimal> {
    let figures = primary(value);
    ["net_profit", "netProfit", "total_net_profit"]
        .iter()
        .find_map(|key| figures.get(*key))
        .and_then(|v| match v {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.to_string().parse().ok(),
            _ => None,
        })
}
