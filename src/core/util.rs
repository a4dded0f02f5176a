//! Generic utilities used across core modules.

use std::time::Duration;

/// Case-insensitive match of a query against two string fields.
/// An empty query matches everything.
pub fn matches_query(query: &str, a: &str, b: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    a.to_lowercase().contains(&q) || b.to_lowercase().contains(&q)
}

/// Format an integer with comma thousands separators (e.g. "1,048,576").
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a duration as seconds with two decimals (e.g. "0.42s").
pub fn format_latency(d: Duration) -> String {
    format!("{:.2}s", d.as_secs_f64())
}
