use chrono::Utc;
use rand::Rng;
use serde_json::Value;

/// Walks a dotted path such as `property.city`.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.get(key))
        .filter(|v| !v.is_null())
}

/// First alias that is present and not null. An empty string still counts as
/// present, so it shadows later aliases.
pub fn first_present<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| lookup(value, alias))
}

pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(number_to_string(n)),
        _ => None,
    }
}

/// Numeric coercion: JSON numbers and numeric strings ("9000000.00").
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Identifiers keep their string form. Zero and empty strings mean unset.
pub fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => text(other),
    }
}

fn number_to_string(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

pub fn text_field(value: &Value, aliases: &[&str]) -> Option<String> {
    first_present(value, aliases).and_then(text)
}

pub fn number_field(value: &Value, aliases: &[&str]) -> Option<f64> {
    first_present(value, aliases).and_then(number)
}

/// Local stand-in id for a saved record the server did not describe.
pub fn generate_temporary_id() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("{}{:03}", Utc::now().timestamp_millis(), suffix)
}
