//! Output formatting utilities.

use serde::Serialize;

/// Formats a value as pretty JSON.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a resolved key as a table row.
pub fn format_key_row(kid: &str, index: usize, public_key_hex: &str) -> String {
    format!("{:<24} {:<6} {}", truncate(kid, 24), index, public_key_hex)
}

/// Prints the key table header.
#[allow(clippy::print_literal)]
pub fn print_key_header() {
    println!("{:<24} {:<6} {}", "KID", "INDEX", "PUBLIC_KEY");
    println!("{}", "-".repeat(96));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
