use serde_json::Value;

use super::primary;

/// Print just the key figure: net profit when present, otherwise the first
/// field of the result.
pub fn print_minimal(value: &Value) {
    let result_obj = primary(value);

    // Priority list of key output fields
    let priority_keys = [
        "net_profit",
        "netProfit",
        "total_net_profit",
        "amount_after_tds",
        "amountAfterTds",
        "earning",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
