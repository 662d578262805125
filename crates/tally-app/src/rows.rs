//! Reading loosely typed row fields.

use serde_json::Value;
use tally_db::Row;

/// Numeric field, accepting numeric text. Missing or non-numeric is 0.
pub fn number(row: &Row, column: &str) -> f64 {
    match row.get(column) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Text field, if present and a string.
pub fn text<'a>(row: &'a Row, column: &str) -> Option<&'a str> {
    row.get(column).and_then(Value::as_str)
}

/// Field as-is, NULL when missing.
pub fn raw(row: &Row, column: &str) -> Value {
    row.get(column).cloned().unwrap_or(Value::Null)
}

/// Sum of a numeric column over rows.
pub fn sum(rows: &[Row], column: &str) -> f64 {
    rows.iter().map(|r| number(r, column)).sum()
}

/// Escapes LIKE wildcards so the pattern matches `value` literally.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
