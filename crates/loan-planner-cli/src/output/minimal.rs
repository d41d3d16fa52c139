use serde_json::Value;

use super::cell;

/// Fields that answer "what does this command tell me", in priority order.
const PRIORITY_KEYS: [&str; 5] = [
    "monthly_payment",
    "total_monthly_payment",
    "months_to_payoff",
    "interest_saved",
    "total_interest_paid",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    if let Value::Object(map) = result {
        if let Some(val) = PRIORITY_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .find(|v| !v.is_null())
        {
            println!("{}", cell(val));
            return;
        }
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, cell(val));
            return;
        }
    }

    println!("{}", cell(result));
}
