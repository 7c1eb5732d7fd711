use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Scenario comparisons print one `name: total_paid` line per strategy;
/// single results fall through a priority list of well-known fields.
pub fn print_minimal(value: &Value) {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::Array(scenarios)) = result_obj.as_object().and_then(|m| m.get("scenarios")) {
        for scenario in scenarios {
            if let Value::Object(map) = scenario {
                let name = map.get("name").and_then(Value::as_str).unwrap_or("?");
                let total = map.get("total_paid").map(format_minimal).unwrap_or_default();
                println!("{}: {}", name, total);
            }
        }
        return;
    }

    // Priority list of key output fields
    let priority_keys = [
        "total_paid",
        "scheduled_payment",
        "duration_months",
        "refinance_payment",
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

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    // Not an object, just print directly
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
