use colored::Colorize;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{net_profit_of, primary};

/// Format output as tables using the tabled crate.
///
/// Scalar fields go into one Field/Value table; each array of objects (basis
/// totals, edit outcomes) gets its own table underneath.
pub fn print_table(value: &Value) {
    match primary(value) {
        Value::Object(map) => print_object(map),
        Value::Array(arr) => print_array_table(arr),
        other => println!("{}", format_value(other)),
    }

    if let Some(Value::Array(outcomes)) = value.get("outcomes") {
        println!("\nEdits:");
        print_array_table(outcomes);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s.yellow());
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }

    if let Some(net) = net_profit_of(value) {
        let line = format!("Net profit: {}", net);
        if net < Decimal::ZERO {
            println!("\n{}", line.red().bold());
        } else if net > Decimal::ZERO {
            println!("\n{}", line.green().bold());
        } else {
            println!("\n{}", line);
        }
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested: Vec<(&String, &Vec<Value>)> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(arr) if arr.iter().any(Value::is_object) => nested.push((key, arr)),
            Value::Object(inner) => {
                for (sub, sub_val) in inner {
                    builder.push_record([format!("{}.{}", key, sub), format_value(sub_val)]);
                }
            }
            _ => builder.push_record([key.clone(), format_value(val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, arr) in nested {
        println!("\n{}:", key);
        print_array_table(arr);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Headers from the first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
