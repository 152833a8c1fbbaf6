use serde_json::Value;
use std::io;

use super::primary;

/// Write output as two-column `field,value` CSV to stdout. Nested objects
/// and arrays flatten to dotted / indexed field names
/// (`received.count`, `by_basis[0].earning`).
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let mut rows: Vec<(String, String)> = Vec::new();
    flatten("", primary(value), &mut rows);

    let _ = wtr.write_record(["field", "value"]);
    for (field, val) in &rows {
        let _ = wtr.write_record([field.as_str(), val.as_str()]);
    }
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for (i, w) in warnings.iter().enumerate() {
            let _ = wtr.write_record([format!("warnings[{}]", i), format_csv_value(w)]);
        }
    }

    let _ = wtr.flush();
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&name, val, rows);
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                flatten(&format!("{}[{}]", prefix, i), item, rows);
            }
        }
        scalar => rows.push((prefix.to_string(), format_csv_value(scalar))),
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
